//! CodeSniffer.conf generation.
//!
//! PHP_CodeSniffer reads `CodeSniffer.conf` from its package directory as a
//! PHP file assigning `$phpCodeSnifferConfig`. The only key written here is
//! `installed_paths`, a comma separated list of directories holding standards.

use anyhow::{Context, Result};
use log::debug;
use std::path::{Path, PathBuf};

use crate::package::Branch;
use crate::runtime::Runtime;

use super::paths::InstallLayout;

/// Deduplicate plugin paths and make them absolute.
///
/// Paths that do not exist (yet) cannot be canonicalized and are kept as
/// given; the first occurrence of a path wins.
pub fn resolve_plugin_paths<R: Runtime>(runtime: &R, paths: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut resolved: Vec<PathBuf> = Vec::with_capacity(paths.len());

    for path in paths {
        let absolute = runtime.canonicalize(&path).unwrap_or_else(|e| {
            debug!("Keeping {:?} as is: {}", path, e);
            path
        });
        if !resolved.contains(&absolute) {
            resolved.push(absolute);
        }
    }

    resolved
}

/// Render the configuration the way PHP's `var_export` prints an array.
pub fn render_config(plugin_paths: &[PathBuf]) -> String {
    let installed_paths = plugin_paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(",");

    format!(
        "<?php $phpCodeSnifferConfig=array (\n  'installed_paths' => {},\n); ?>",
        php_string(&installed_paths)
    )
}

/// Single-quoted PHP string literal
fn php_string(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}

/// Write CodeSniffer.conf for every supported branch.
#[tracing::instrument(skip(runtime, layout, plugin_paths))]
pub fn write_configs<R: Runtime>(
    runtime: &R,
    layout: &InstallLayout,
    plugin_paths: &[PathBuf],
) -> Result<()> {
    let content = render_config(plugin_paths);

    for branch in Branch::ALL {
        let path = layout.codesniffer_conf(branch);
        write_config(runtime, &path, &content)?;
    }

    Ok(())
}

fn write_config<R: Runtime>(runtime: &R, path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        runtime.create_dir_all(parent)?;
    }

    debug!("Writing {:?}", path);
    runtime
        .write(path, content.as_bytes())
        .with_context(|| format!("Failed to write {:?}", path))
}
