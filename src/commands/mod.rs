use anyhow::Result;
use log::debug;

use crate::runtime::Runtime;

mod bootstrap;
mod composer;
pub mod config;
mod help;
pub mod install;
pub mod paths;
mod phpcs_config;
pub mod services;
mod show;
mod wrappers;

pub use bootstrap::{COMPOSER_MAX_AGE, bootstrap, composer_needs_refresh, ensure_install_dirs};
pub use composer::{composer_args, run_composer};
pub use help::{HelpTopic, help};
pub use install::{InstallReport, Installer, install, update};
pub use phpcs_config::{render_config, resolve_plugin_paths, write_configs};
pub use show::show;
pub use wrappers::install_wrappers;

use config::{Config, ConfigOverrides};
use services::{build_http_client, build_index};

/// A fully parsed invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Show,
    Install(String),
    Update(String),
    Help(HelpTopic),
}

impl Command {
    /// Map the first two CLI tokens to a command.
    ///
    /// Unknown or missing commands fall back to the general usage, and
    /// `install`/`update` without a sniffer name to that command's usage.
    pub fn from_tokens(command: Option<&str>, argument: Option<&str>) -> Self {
        match (command, argument) {
            (Some("list"), _) => Command::List,
            (Some("show"), _) => Command::Show,
            (Some("install"), Some(name)) => Command::Install(name.to_string()),
            (Some("install"), None) => Command::Help(HelpTopic::Install),
            (Some("update"), Some(name)) => Command::Update(name.to_string()),
            (Some("update"), None) => Command::Help(HelpTopic::Update),
            (Some("help"), topic) => Command::Help(HelpTopic::for_command(topic)),
            _ => Command::Help(HelpTopic::General),
        }
    }
}

/// Prepare the install directory and execute `command`.
#[tracing::instrument(skip(runtime, overrides))]
pub async fn run<R: Runtime>(runtime: &R, command: Command, overrides: ConfigOverrides) -> Result<()> {
    let config = Config::load(runtime, overrides)?;
    let http_client = build_http_client()?;

    bootstrap(runtime, &config.layout(), &http_client, &config.composer_url).await?;

    debug!("Dispatching {:?}", command);
    match command {
        Command::List => help(HelpTopic::General),
        Command::Help(topic) => help(topic),
        Command::Show => {
            let index = build_index(&config, http_client);
            show(&index, &mut std::io::stdout()).await?;
        }
        Command::Install(name) => install(runtime, &config, http_client, &name).await?,
        Command::Update(name) => update(runtime, &config, http_client, &name).await?,
    }

    Ok(())
}
