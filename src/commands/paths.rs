use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::package::Branch;
use crate::runtime::Runtime;

/// Name of the per-user install directory
pub const INSTALL_DIR_NAME: &str = ".php-code-sniffer-tool";

/// Get the default install directory from the user's home.
///
/// Windows uses `%HOMEDRIVE%%HOMEPATH%`, everything else `$HOME`; both fall
/// back to the platform home directory.
#[tracing::instrument(skip(runtime))]
pub fn default_install_root<R: Runtime>(runtime: &R) -> Result<PathBuf> {
    let home = env_home(runtime)
        .or_else(|| runtime.home_dir())
        .context("Could not find home directory")?;
    Ok(home.join(INSTALL_DIR_NAME))
}

#[cfg(windows)]
fn env_home<R: Runtime>(runtime: &R) -> Option<PathBuf> {
    let drive = runtime.env_var("HOMEDRIVE").ok()?;
    let path = runtime.env_var("HOMEPATH").ok()?;
    Some(PathBuf::from(format!("{}{}", drive, path)))
}

#[cfg(not(windows))]
fn env_home<R: Runtime>(runtime: &R) -> Option<PathBuf> {
    runtime
        .env_var("HOME")
        .ok()
        .filter(|h| !h.is_empty())
        .map(PathBuf::from)
}

/// Every path this tool reads or writes inside the install directory.
#[derive(Debug, Clone, PartialEq)]
pub struct InstallLayout {
    root: PathBuf,
}

impl InstallLayout {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/composer.json`
    pub fn manifest(&self) -> PathBuf {
        self.root.join("composer.json")
    }

    /// `<root>/installed.json`
    pub fn state(&self) -> PathBuf {
        self.root.join("installed.json")
    }

    /// `<root>/composer.lock`, owned by composer
    pub fn lock(&self) -> PathBuf {
        self.root.join("composer.lock")
    }

    /// `<root>/composer.phar`
    pub fn composer_phar(&self) -> PathBuf {
        self.root.join("composer.phar")
    }

    /// `<root>/bin`
    pub fn bin_dir(&self) -> PathBuf {
        self.root.join("bin")
    }

    /// `<root>/vendor`
    pub fn vendor_dir(&self) -> PathBuf {
        self.root.join("vendor")
    }

    /// `<root>/vendor/squizlabs/phpcs-<branch>/CodeSniffer.conf`
    pub fn codesniffer_conf(&self, branch: Branch) -> PathBuf {
        self.vendor_dir()
            .join("squizlabs")
            .join(format!("phpcs-{}", branch))
            .join("CodeSniffer.conf")
    }
}
