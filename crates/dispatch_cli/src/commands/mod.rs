pub mod check;
pub mod invoke;
pub mod list;
pub mod select;

use anyhow::{Context, Result};
use dispatch_collaborators::{CollaboratorConfig, builtin_declarations, handler_catalog};
use dispatch_core::DeclarationList;
use dispatch_engine::ContractRegistry;
use std::path::Path;
use tracing::{debug, info};

/// Where the registry comes from.
pub struct Source<'a> {
    pub declarations: Option<&'a Path>,
    pub config: Option<&'a Path>,
}

impl Source<'_> {
    pub fn describe(&self) -> String {
        match self.declarations {
            Some(path) => path.display().to_string(),
            None => "built-in declarations".to_string(),
        }
    }

    fn declarations(&self) -> Result<DeclarationList> {
        match self.declarations {
            Some(path) => dispatch_parser::parse_file(path)
                .with_context(|| format!("Failed to parse declaration file: {}", path.display())),
            None => builtin_declarations().context("Failed to load built-in declarations"),
        }
    }

    fn config(&self) -> Result<CollaboratorConfig> {
        let config = CollaboratorConfig::load(self.config).with_context(|| match self.config {
            Some(path) => format!("Failed to load configuration: {}", path.display()),
            None => "Failed to load configuration from the environment".to_string(),
        })?;
        debug!(
            analysis_url = %config.analysis_url,
            timeout_ms = config.analysis_timeout_ms,
            "Collaborator configuration loaded"
        );
        Ok(config)
    }

    /// Parses the declarations and binds them to the built-in handlers.
    pub fn load_registry(&self) -> Result<ContractRegistry> {
        info!("Loading {}", self.describe());
        let declarations = self.declarations()?;
        let config = self.config()?;
        let handlers = handler_catalog(&config).context("Failed to set up tool handlers")?;

        ContractRegistry::from_declarations(&declarations, &handlers)
            .with_context(|| format!("Invalid declarations in {}", self.describe()))
    }
}
