use anyhow::Result;

use crate::{
    http::HttpClient,
    package::{FileManifestStore, FileStateStore},
    runtime::Runtime,
};

use super::config::Config;
use super::services::build_index;

mod installer;

pub use installer::{InstallReport, Installer};

#[tracing::instrument(skip(runtime, config, http_client))]
pub async fn install<R: Runtime>(
    runtime: &R,
    config: &Config,
    http_client: HttpClient,
    sniffer_name: &str,
) -> Result<()> {
    run(runtime, config, http_client, sniffer_name, false).await
}

#[tracing::instrument(skip(runtime, config, http_client))]
pub async fn update<R: Runtime>(
    runtime: &R,
    config: &Config,
    http_client: HttpClient,
    sniffer_name: &str,
) -> Result<()> {
    run(runtime, config, http_client, sniffer_name, true).await
}

async fn run<R: Runtime>(
    runtime: &R,
    config: &Config,
    http_client: HttpClient,
    sniffer_name: &str,
    force_install: bool,
) -> Result<()> {
    let layout = config.layout();
    let index = build_index(config, http_client);
    let manifest_store = FileManifestStore::new(runtime, layout.manifest());
    let state_store = FileStateStore::new(runtime, layout.state());

    let installer = Installer::new(
        runtime,
        &index,
        &manifest_store,
        &state_store,
        layout,
        &config.php,
    );
    installer.install(sniffer_name, force_install).await?;
    Ok(())
}
