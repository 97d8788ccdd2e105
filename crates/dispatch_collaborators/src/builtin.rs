//! Built-in declarations and the handler catalog they bind to.

use crate::{
    CollaboratorConfig, CountryPopulationHandler, GlobalPopulationHandler, HealthAnalyzer,
    PantryByCategory, PantryList, PantrySearch, PantrySource, PopulationData, Result,
};
use dispatch_core::DeclarationList;
use dispatch_engine::{ContractRegistry, HandlerCatalog};
use std::sync::Arc;

const KITCHEN_DECLARATIONS: &str = include_str!("../declarations/kitchen.yml");

/// Handler references used by the built-in declarations.
pub mod refs {
    pub const PANTRY_LIST: &str = "pantry.list";
    pub const PANTRY_SEARCH: &str = "pantry.search";
    pub const PANTRY_BY_CATEGORY: &str = "pantry.by_category";
    pub const POPULATION_COUNTRIES: &str = "population.countries";
    pub const POPULATION_GLOBAL: &str = "population.global";
    pub const HEALTH_ANALYZE: &str = "health.analyze";
}

/// The kitchen assistant's tools and components, in declaration order.
pub fn builtin_declarations() -> Result<DeclarationList> {
    Ok(dispatch_parser::parse_yaml(KITCHEN_DECLARATIONS)?)
}

/// Handlers for every reference in [`refs`].
pub fn handler_catalog(config: &CollaboratorConfig) -> Result<HandlerCatalog> {
    let pantry = PantrySource::from_path(config.pantry_path.clone());
    let population = Arc::new(PopulationData::embedded()?);

    Ok(HandlerCatalog::new()
        .with(refs::PANTRY_LIST, PantryList::new(pantry.clone()))
        .with(refs::PANTRY_SEARCH, PantrySearch::new(pantry.clone()))
        .with(refs::PANTRY_BY_CATEGORY, PantryByCategory::new(pantry))
        .with(
            refs::POPULATION_COUNTRIES,
            CountryPopulationHandler::new(Arc::clone(&population)),
        )
        .with(
            refs::POPULATION_GLOBAL,
            GlobalPopulationHandler::new(population),
        )
        .with(refs::HEALTH_ANALYZE, HealthAnalyzer::new(config)?))
}

/// Registry of the built-in declarations bound to the built-in handlers.
pub fn builtin_registry(config: &CollaboratorConfig) -> Result<ContractRegistry> {
    let declarations = builtin_declarations()?;
    let handlers = handler_catalog(config)?;
    Ok(ContractRegistry::from_declarations(&declarations, &handlers)?)
}
