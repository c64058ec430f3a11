use anyhow::{Context, Result};
use log::debug;
use std::path::PathBuf;

use crate::runtime::Runtime;

use super::paths::InstallLayout;

const PHPCS_SH: &str = include_str!("../../templates/phpcs");
const PHPCS_BAT: &str = include_str!("../../templates/phpcs.bat");

/// Entry points copied into `<root>/bin`: (file name, content, executable)
const WRAPPERS: [(&str, &str, bool); 2] = [("phpcs", PHPCS_SH, true), ("phpcs.bat", PHPCS_BAT, false)];

/// Install or refresh the `phpcs` entry points. Returns the shell entry point path.
#[tracing::instrument(skip(runtime, layout))]
pub fn install_wrappers<R: Runtime>(runtime: &R, layout: &InstallLayout) -> Result<PathBuf> {
    let bin_dir = layout.bin_dir();
    runtime.create_dir_all(&bin_dir)?;

    for (name, content, executable) in WRAPPERS {
        let path = bin_dir.join(name);
        debug!("Writing wrapper {:?}", path);

        runtime
            .write(&path, content.as_bytes())
            .with_context(|| format!("Failed to write {:?}", path))?;

        if executable {
            runtime.set_permissions(&path, 0o755)?;
        }
    }

    Ok(bin_dir.join("phpcs"))
}
