use anyhow::Result;
use log::debug;
use std::path::PathBuf;

use crate::index::DEFAULT_API_URL;
use crate::runtime::Runtime;

use super::paths::{InstallLayout, default_install_root};

/// Default PHP runtime used to execute composer.phar
pub const DEFAULT_PHP: &str = "php";

/// Where composer.phar is downloaded from
pub const DEFAULT_COMPOSER_URL: &str = "https://getcomposer.org/composer.phar";

/// Options given on the command line (or through their environment variables).
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub install_root: Option<PathBuf>,
    pub api_url: Option<String>,
    pub php: Option<String>,
    pub composer_url: Option<String>,
}

/// Resolved settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub install_root: PathBuf,
    pub api_url: String,
    pub php: String,
    pub composer_url: String,
}

impl Config {
    pub fn load<R: Runtime>(runtime: &R, overrides: ConfigOverrides) -> Result<Self> {
        let install_root = match overrides.install_root {
            Some(path) => path,
            None => default_install_root(runtime)?,
        };

        let config = Self {
            install_root,
            api_url: overrides
                .api_url
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            php: overrides.php.unwrap_or_else(|| DEFAULT_PHP.to_string()),
            composer_url: overrides
                .composer_url
                .unwrap_or_else(|| DEFAULT_COMPOSER_URL.to_string()),
        };

        debug!("Using config: {:?}", config);
        Ok(config)
    }

    pub fn layout(&self) -> InstallLayout {
        InstallLayout::new(self.install_root.clone())
    }
}
