//! Preparation done before every command: the install directory layout and a
//! reasonably fresh composer.phar.

use anyhow::{Context, Result};
use log::{debug, warn};
use std::path::Path;
use std::time::{Duration, SystemTime};

use crate::http::HttpClient;
use crate::runtime::Runtime;

use super::paths::InstallLayout;

/// composer.phar older than this is downloaded again
pub const COMPOSER_MAX_AGE: Duration = Duration::from_secs(30 * 24 * 60 * 60);

#[tracing::instrument(skip(runtime, layout, http_client))]
pub async fn bootstrap<R: Runtime>(
    runtime: &R,
    layout: &InstallLayout,
    http_client: &HttpClient,
    composer_url: &str,
) -> Result<()> {
    ensure_install_dirs(runtime, layout)?;

    if composer_needs_refresh(runtime, &layout.composer_phar(), SystemTime::now()) {
        println!("Download composer.phar...");
        if let Err(e) = download_composer(runtime, layout, http_client, composer_url).await {
            warn!("Failed to download composer.phar: {:#}", e);
        }
    }

    Ok(())
}

/// Create the install directory and its `bin` folder.
#[tracing::instrument(skip(runtime, layout))]
pub fn ensure_install_dirs<R: Runtime>(runtime: &R, layout: &InstallLayout) -> Result<()> {
    let root = layout.root();
    if !runtime.is_dir(root) {
        println!("Create install directory: \"{}\"", root.display());
        runtime
            .create_dir_all(root)
            .with_context(|| format!("Failed to create install directory {:?}", root))?;
    }

    let bin_dir = layout.bin_dir();
    if !runtime.is_dir(&bin_dir) {
        runtime
            .create_dir_all(&bin_dir)
            .with_context(|| format!("Failed to create {:?}", bin_dir))?;
    }

    Ok(())
}

/// True when composer.phar is missing, unreadable or older than [`COMPOSER_MAX_AGE`].
pub fn composer_needs_refresh<R: Runtime>(runtime: &R, phar: &Path, now: SystemTime) -> bool {
    if !runtime.exists(phar) {
        return true;
    }

    match runtime.modified(phar) {
        // A timestamp in the future counts as fresh
        Ok(modified) => now
            .duration_since(modified)
            .map(|age| age > COMPOSER_MAX_AGE)
            .unwrap_or(false),
        Err(e) => {
            debug!("Cannot read age of {:?}: {}", phar, e);
            true
        }
    }
}

async fn download_composer<R: Runtime>(
    runtime: &R,
    layout: &InstallLayout,
    http_client: &HttpClient,
    url: &str,
) -> Result<()> {
    let phar = layout.composer_phar();
    let tmp_path = phar.with_extension("phar.tmp");

    let downloaded = http_client
        .download_file(url, || {
            runtime
                .create_file(&tmp_path)
                .with_context(|| format!("Failed to create temporary file at {:?}", tmp_path))
        })
        .await
        .and_then(|_| runtime.rename(&tmp_path, &phar));

    if let Err(e) = downloaded {
        if runtime.exists(&tmp_path)
            && let Err(cleanup) = runtime.remove_file(&tmp_path)
        {
            debug!("Failed to remove {:?}: {}", tmp_path, cleanup);
        }
        return Err(e);
    }

    debug!("composer.phar saved to {:?}", phar);
    Ok(())
}
