use anyhow::Result;
use dispatch_engine::{Dispatcher, RegistryHandle};
use tracing::info;

use super::Source;
use crate::output::{self, OutputFormat};

pub fn execute(source: &Source<'_>, name: &str, props: &str, format: OutputFormat) -> Result<()> {
    let dispatcher = Dispatcher::new(RegistryHandle::new(source.load_registry()?));

    info!("Selecting component: {}", name);
    let result = dispatcher.select_json(name, props);

    output::print_selection(name, &result, format)?;

    if !result.is_ok() {
        std::process::exit(1);
    }

    Ok(())
}
