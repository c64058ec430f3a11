//! External process execution.

use anyhow::{Context, Result};
use log::debug;
use std::process::{Command, Stdio};

use super::RealRuntime;

impl RealRuntime {
    #[tracing::instrument(skip(self))]
    pub(crate) fn run_command_impl(&self, program: &str, args: &[String]) -> Result<i32> {
        debug!("Spawning {} {:?}", program, args);

        let status = Command::new(program)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .with_context(|| format!("Failed to execute {}", program))?;

        Ok(status.code().unwrap_or(-1))
    }
}
