//! Package management module
//!
//! Data types for sniffer packages, the composer manifest that declares them
//! and the local record of what has been installed.

mod descriptor;
mod error;
mod manifest;
mod repository;
mod state;

pub use descriptor::{Branch, PACKAGE_REPOSITORY_TYPE, PackageDescriptor, RepositoryEntry};
pub use error::SnifferError;
pub use manifest::{LEGACY_PACKAGE, Manifest, Reconciliation};
pub use repository::{FileManifestStore, FileStateStore, ManifestStore, StateStore, record};
pub use state::{InstalledSniffer, InstalledSniffers};

