//! External collaborators of the kitchen assistant.
//!
//! This crate provides the handlers behind the built-in tools and the
//! declaration list that binds them:
//!
//! - pantry lookup over a category → ingredients table
//! - country and global population statistics over an embedded dataset
//! - health-report analysis through an HTTP analysis service
//!
//! Handlers are only ever reached through the engine's tool invoker, which
//! validates their arguments and results and applies each tool's failure
//! policy.
//!
//! # Example
//!
//! ```no_run
//! use dispatch_collaborators::{CollaboratorConfig, builtin_registry};
//! use dispatch_engine::{Dispatcher, RegistryHandle};
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = CollaboratorConfig::builder()
//!     .analysis_url("http://localhost:3000/api/analyze-health-report")
//!     .build()?;
//!
//! let dispatcher = Dispatcher::new(RegistryHandle::new(builtin_registry(&config)?));
//! let result = dispatcher
//!     .invoke("countryPopulation", &json!({ "continent": "Asia", "limit": 3 }))
//!     .await;
//! println!("{}", serde_json::to_string_pretty(&result)?);
//! # Ok(())
//! # }
//! ```

use thiserror::Error;

mod builtin;
mod config;
mod health;
mod pantry;
mod population;

pub use builtin::{builtin_declarations, builtin_registry, handler_catalog, refs};
pub use config::{CollaboratorConfig, CollaboratorConfigBuilder};
pub use health::HealthAnalyzer;
pub use pantry::{
    Ingredient, Pantry, PantryByCategory, PantryList, PantrySearch, PantrySource,
    humanize_category,
};
pub use population::{
    CountryPopulation, CountryPopulationHandler, CountryQuery, GlobalPopulation,
    GlobalPopulationHandler, PopulationData, SortKey, SortOrder, YearRange,
};

/// Error types raised while setting collaborators up.
///
/// Failures during a tool call are reported as
/// [`HandlerError`](dispatch_engine::HandlerError)s instead.
#[derive(Error, Debug)]
pub enum CollaboratorError {
    /// Configuration error
    #[error("Invalid collaborator configuration: {0}")]
    ConfigurationError(String),

    /// Configuration file could not be read
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// Configuration file is not valid TOML
    #[error("Failed to parse configuration file: {0}")]
    TomlError(#[from] toml::de::Error),

    /// Embedded dataset could not be decoded
    #[error("Invalid embedded dataset: {0}")]
    DatasetError(#[from] serde_json::Error),

    /// HTTP client could not be created
    #[error("Failed to build HTTP client: {0}")]
    HttpClientError(#[from] reqwest::Error),

    /// Built-in declarations could not be parsed
    #[error(transparent)]
    DeclarationError(#[from] dispatch_parser::ParserError),

    /// Registry could not be built
    #[error(transparent)]
    RegistryError(#[from] dispatch_engine::RegistryError),
}

/// Result type alias for collaborator setup.
pub type Result<T> = std::result::Result<T, CollaboratorError>;
