pub mod commands;
pub mod http;
pub mod index;
pub mod package;
pub mod runtime;
