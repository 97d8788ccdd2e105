use anyhow::Result;
use dispatch_core::ContractKind;

use super::Source;
use crate::output::{self, OutputFormat};

pub fn execute(source: &Source<'_>, kind: Option<ContractKind>, format: OutputFormat) -> Result<()> {
    let registry = source.load_registry()?;

    let contracts: Vec<_> = registry
        .contracts()
        .filter(|contract| kind.is_none_or(|kind| contract.kind() == kind))
        .collect();

    output::print_contract_list(&contracts, format);
    Ok(())
}
