use anyhow::{Result, bail};
use log::info;

use crate::runtime::Runtime;

use super::paths::InstallLayout;

/// `install` on the first run, `update` once composer has written its lock file.
pub fn composer_subcommand<R: Runtime>(runtime: &R, layout: &InstallLayout) -> &'static str {
    if runtime.exists(&layout.lock()) {
        "update"
    } else {
        "install"
    }
}

/// Arguments passed to PHP: `<root>/composer.phar --working-dir=<root> <subcommand>`
pub fn composer_args(layout: &InstallLayout, subcommand: &str) -> Vec<String> {
    vec![
        layout.composer_phar().display().to_string(),
        format!("--working-dir={}", layout.root().display()),
        subcommand.to_string(),
    ]
}

/// Run composer over the manifest in the install directory.
///
/// Composer's output is streamed to the terminal. A non-zero exit status is an error.
#[tracing::instrument(skip(runtime, layout))]
pub fn run_composer<R: Runtime>(runtime: &R, php: &str, layout: &InstallLayout) -> Result<()> {
    let subcommand = composer_subcommand(runtime, layout);
    let args = composer_args(layout, subcommand);

    println!();
    println!("Execute command: {} {}", php, args.join(" "));

    let code = runtime.run_command(php, &args)?;
    if code != 0 {
        bail!("composer {} failed with exit code {}", subcommand, code);
    }

    info!("composer {} finished", subcommand);
    Ok(())
}
