use anyhow::Result;
use std::io::Write;

use crate::index::SnifferIndex;

/// Print the sniffers available from the index, one per line.
#[tracing::instrument(skip(index, out))]
pub async fn show<I: SnifferIndex, W: Write>(index: &I, out: &mut W) -> Result<()> {
    let names = index.list().await;

    if names.is_empty() {
        writeln!(out, "No sniffers found.")?;
        return Ok(());
    }

    for name in names {
        writeln!(out, "{}", name)?;
    }
    Ok(())
}
