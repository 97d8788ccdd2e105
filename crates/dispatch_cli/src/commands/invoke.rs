use anyhow::Result;
use dispatch_engine::{Dispatcher, RegistryHandle};
use tracing::info;

use super::Source;
use crate::output::{self, OutputFormat};

pub async fn execute(source: &Source<'_>, name: &str, args: &str, format: OutputFormat) -> Result<()> {
    let dispatcher = Dispatcher::new(RegistryHandle::new(source.load_registry()?));

    info!("Invoking tool: {}", name);
    let result = dispatcher.invoke_json(name, args).await;

    output::print_invocation(name, &result, format)?;

    if !result.is_ok() {
        std::process::exit(1);
    }

    Ok(())
}
