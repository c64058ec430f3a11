//! Persistence for composer.json and installed.json.
//!
//! Both files are read fail-soft: a missing or malformed file loads as an
//! empty value. Writes always overwrite the whole file.

use anyhow::{Context, Result};
use log::{debug, warn};
use serde::{Serialize, de::DeserializeOwned};
use std::path::{Path, PathBuf};

use crate::runtime::Runtime;

use super::{Branch, InstalledSniffers, Manifest};

#[cfg_attr(test, mockall::automock)]
pub trait ManifestStore {
    /// Load and normalize the manifest.
    fn load(&self) -> Manifest;
    fn save(&self, manifest: &Manifest) -> Result<()>;
}

#[cfg_attr(test, mockall::automock)]
pub trait StateStore {
    fn load(&self) -> InstalledSniffers;
    fn save(&self, sniffers: &InstalledSniffers) -> Result<()>;
}

/// Record `name` as installed for `branch`.
///
/// The branch is validated before the store is touched, so an unsupported
/// branch leaves installed.json as it was.
#[tracing::instrument(skip(store))]
pub fn record<S: StateStore + ?Sized>(store: &S, name: &str, branch: &str) -> Result<()> {
    let branch: Branch = branch.parse()?;

    let mut sniffers = store.load();
    sniffers.insert(name, branch);
    store.save(&sniffers)
}

/// composer.json backed by the file system.
pub struct FileManifestStore<'a, R: Runtime> {
    runtime: &'a R,
    path: PathBuf,
}

impl<'a, R: Runtime> FileManifestStore<'a, R> {
    pub fn new(runtime: &'a R, path: PathBuf) -> Self {
        Self { runtime, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<R: Runtime> ManifestStore for FileManifestStore<'_, R> {
    #[tracing::instrument(skip(self))]
    fn load(&self) -> Manifest {
        let mut manifest: Manifest = load_json_or_default(self.runtime, &self.path);
        manifest.normalize();
        manifest
    }

    #[tracing::instrument(skip(self, manifest))]
    fn save(&self, manifest: &Manifest) -> Result<()> {
        save_json(self.runtime, &self.path, manifest)
    }
}

/// installed.json backed by the file system.
pub struct FileStateStore<'a, R: Runtime> {
    runtime: &'a R,
    path: PathBuf,
}

impl<'a, R: Runtime> FileStateStore<'a, R> {
    pub fn new(runtime: &'a R, path: PathBuf) -> Self {
        Self { runtime, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<R: Runtime> StateStore for FileStateStore<'_, R> {
    #[tracing::instrument(skip(self))]
    fn load(&self) -> InstalledSniffers {
        load_json_or_default(self.runtime, &self.path)
    }

    #[tracing::instrument(skip(self, sniffers))]
    fn save(&self, sniffers: &InstalledSniffers) -> Result<()> {
        save_json(self.runtime, &self.path, sniffers)
    }
}

fn load_json_or_default<R: Runtime, T: DeserializeOwned + Default>(runtime: &R, path: &Path) -> T {
    if !runtime.exists(path) {
        debug!("{:?} does not exist, starting empty", path);
        return T::default();
    }

    let content = match runtime.read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            warn!("Failed to read {:?}: {}. Starting empty.", path, e);
            return T::default();
        }
    };

    serde_json::from_str(&content).unwrap_or_else(|e| {
        warn!("Ignoring malformed {:?}: {}", path, e);
        T::default()
    })
}

fn save_json<R: Runtime, T: Serialize>(runtime: &R, path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent()
        && !runtime.exists(parent)
    {
        runtime.create_dir_all(parent)?;
    }

    let content = serde_json::to_string_pretty(value)?;
    runtime
        .write(path, content.as_bytes())
        .with_context(|| format!("Failed to save {:?}", path))
}
