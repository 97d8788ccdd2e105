use anyhow::Result;
use tracing::info;

use super::Source;
use crate::output::{self, OutputFormat};

pub fn execute(source: &Source<'_>, format: OutputFormat) -> Result<()> {
    info!("Checking {}", source.describe());

    let registry = source.load_registry()?;

    output::print_check_summary(&registry, format);
    Ok(())
}
