//! The contract registry.
//!
//! A [`ContractRegistry`] is built once from a declaration list and never
//! mutated afterwards. It is shared behind an `Arc` and read without locking.
//! When contracts must be reloaded, a [`RegistryHandle`] swaps a whole new
//! registry in; calls already running keep the snapshot they started with.

use crate::{Contract, DispatchError, HandlerCatalog, RegistryError};
use crate::{ComponentBinding, ToolBinding};
use dispatch_core::{ContractKind, DeclarationList};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::{debug, info};

/// Immutable name → contract table.
#[derive(Debug, Default)]
pub struct ContractRegistry {
    contracts: Vec<Contract>,
    index: HashMap<String, usize>,
}

impl ContractRegistry {
    /// Starts an empty registry builder.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Builds a registry from an ordered declaration list.
    ///
    /// Loading is all-or-nothing: the first invalid declaration, duplicate
    /// name or unresolved handler aborts the whole load.
    ///
    /// # Example
    ///
    /// ```rust
    /// use dispatch_core::{DeclarationBuilder, DeclarationList, ObjectSchemaBuilder, Schema};
    /// use dispatch_engine::{ContractRegistry, HandlerCatalog};
    ///
    /// let declarations = DeclarationList::new(vec![
    ///     DeclarationBuilder::component("RecipeCard")
    ///         .props_schema(ObjectSchemaBuilder::new().field("title", Schema::String).build())
    ///         .build(),
    /// ]);
    ///
    /// let registry = ContractRegistry::from_declarations(&declarations, &HandlerCatalog::new()).unwrap();
    /// assert_eq!(registry.len(), 1);
    /// ```
    pub fn from_declarations(
        declarations: &DeclarationList,
        handlers: &HandlerCatalog,
    ) -> Result<Self, RegistryError> {
        let mut builder = RegistryBuilder::new();
        for declaration in &declarations.contracts {
            let contract = Contract::from_declaration(declaration, handlers)?;
            builder.register(contract)?;
        }

        let registry = builder.build();
        info!(
            tools = registry.tools().count(),
            components = registry.components().count(),
            "Contract registry loaded"
        );
        Ok(registry)
    }

    /// Looks up a contract by name and kind.
    ///
    /// A contract registered under the other kind is reported as not found.
    pub fn lookup(&self, name: &str, kind: ContractKind) -> Result<&Contract, DispatchError> {
        self.get(name)
            .filter(|contract| contract.kind() == kind)
            .ok_or_else(|| DispatchError::NotFound {
                name: name.to_string(),
                kind,
            })
    }

    /// Looks up a tool binding by name.
    pub fn tool(&self, name: &str) -> Result<&ToolBinding, DispatchError> {
        self.lookup(name, ContractKind::Tool)?
            .as_tool()
            .ok_or_else(|| DispatchError::NotFound {
                name: name.to_string(),
                kind: ContractKind::Tool,
            })
    }

    /// Looks up a component binding by name.
    pub fn component(&self, name: &str) -> Result<&ComponentBinding, DispatchError> {
        self.lookup(name, ContractKind::Component)?
            .as_component()
            .ok_or_else(|| DispatchError::NotFound {
                name: name.to_string(),
                kind: ContractKind::Component,
            })
    }

    /// Any contract with this name, regardless of kind.
    pub fn get(&self, name: &str) -> Option<&Contract> {
        self.index.get(name).map(|&position| &self.contracts[position])
    }

    /// All contracts in registration order.
    pub fn contracts(&self) -> impl Iterator<Item = &Contract> {
        self.contracts.iter()
    }

    pub fn tools(&self) -> impl Iterator<Item = &Contract> {
        self.of_kind(ContractKind::Tool)
    }

    pub fn components(&self) -> impl Iterator<Item = &Contract> {
        self.of_kind(ContractKind::Component)
    }

    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }

    fn of_kind(&self, kind: ContractKind) -> impl Iterator<Item = &Contract> {
        self.contracts.iter().filter(move |c| c.kind() == kind)
    }
}

/// Accumulates contracts during the single initialization phase.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    registry: ContractRegistry,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a contract.
    ///
    /// Names are unique across tools and components. On a duplicate the
    /// contract registered first is kept and the new one is discarded.
    pub fn register(&mut self, contract: Contract) -> Result<(), RegistryError> {
        if let Some(existing) = self.registry.get(contract.name()) {
            return Err(RegistryError::DuplicateName {
                name: contract.name().to_string(),
                existing: existing.kind(),
            });
        }

        debug!(name = contract.name(), kind = %contract.kind(), "Registering contract");
        let position = self.registry.contracts.len();
        self.registry
            .index
            .insert(contract.name().to_string(), position);
        self.registry.contracts.push(contract);
        Ok(())
    }

    /// Freezes the registry.
    pub fn build(self) -> ContractRegistry {
        self.registry
    }
}

/// Shared, atomically replaceable reference to the current registry.
///
/// Readers take an `Arc` snapshot and release the lock immediately, so no
/// lock is ever held while a handler runs.
#[derive(Debug, Clone)]
pub struct RegistryHandle {
    current: Arc<RwLock<Arc<ContractRegistry>>>,
}

impl RegistryHandle {
    pub fn new(registry: ContractRegistry) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(registry))),
        }
    }

    /// The registry as of now.
    pub fn snapshot(&self) -> Arc<ContractRegistry> {
        let guard = self
            .current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&*guard)
    }

    /// Swaps in a new registry and returns the previous one.
    pub fn replace(&self, registry: ContractRegistry) -> Arc<ContractRegistry> {
        let next = Arc::new(registry);
        let mut guard = self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        info!(contracts = next.len(), "Contract registry replaced");
        std::mem::replace(&mut *guard, next)
    }
}

impl From<ContractRegistry> for RegistryHandle {
    fn from(registry: ContractRegistry) -> Self {
        Self::new(registry)
    }
}

/// The process-wide registry.
///
/// Installed once during start-up; there is no teardown other than process
/// exit.
pub mod global {
    use super::{ContractRegistry, RegistryHandle};
    use crate::RegistryError;
    use std::sync::OnceLock;

    static GLOBAL: OnceLock<RegistryHandle> = OnceLock::new();

    /// Installs the process-wide registry.
    ///
    /// Fails with [`RegistryError::AlreadyInstalled`] on a second call.
    pub fn install(registry: ContractRegistry) -> Result<RegistryHandle, RegistryError> {
        let handle = RegistryHandle::new(registry);
        GLOBAL
            .set(handle.clone())
            .map_err(|_| RegistryError::AlreadyInstalled)?;
        Ok(handle)
    }

    /// The installed registry handle, if any.
    pub fn get() -> Option<RegistryHandle> {
        GLOBAL.get().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HandlerError, ToolHandler};
    use async_trait::async_trait;
    use dispatch_core::{DeclarationBuilder, ObjectSchemaBuilder, Schema};
    use dispatch_validator::ValidatedValue;
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    struct Noop;

    #[async_trait]
    impl ToolHandler for Noop {
        async fn call(&self, _args: &ValidatedValue) -> Result<Value, HandlerError> {
            Ok(json!([]))
        }
    }

    fn catalog() -> HandlerCatalog {
        HandlerCatalog::new().with("pantry.list", Noop)
    }

    fn pantry_tool(name: &str) -> dispatch_core::ContractDeclaration {
        DeclarationBuilder::tool(name, "pantry.list")
            .description("List pantry ingredients")
            .input_schema(Schema::empty_object())
            .output_schema(Schema::array(
                ObjectSchemaBuilder::new()
                    .field("name", Schema::String)
                    .field("category", Schema::String)
                    .build(),
            ))
            .build()
    }

    fn card(name: &str, title_schema: Schema) -> dispatch_core::ContractDeclaration {
        DeclarationBuilder::component(name)
            .props_schema(ObjectSchemaBuilder::new().field("title", title_schema).build())
            .build()
    }

    fn contract(decl: &dispatch_core::ContractDeclaration) -> Contract {
        Contract::from_declaration(decl, &catalog()).unwrap()
    }

    #[test]
    fn test_duplicate_name_keeps_first() {
        let mut builder = ContractRegistry::builder();
        builder
            .register(contract(&card("RecipeCard", Schema::String)))
            .unwrap();

        let err = builder
            .register(contract(&card("RecipeCard", Schema::Number)))
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::DuplicateName {
                name: "RecipeCard".into(),
                existing: ContractKind::Component,
            }
        );

        let registry = builder.build();
        assert_eq!(registry.len(), 1);
        let kept = registry.component("RecipeCard").unwrap();
        assert_eq!(kept.props_schema.field("title").unwrap().schema, Schema::String);
    }

    #[test]
    fn test_duplicate_across_kinds() {
        let mut builder = RegistryBuilder::new();
        builder.register(contract(&pantry_tool("Pantry"))).unwrap();

        let err = builder
            .register(contract(&card("Pantry", Schema::String)))
            .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::DuplicateName {
                existing: ContractKind::Tool,
                ..
            }
        ));
    }

    #[test]
    fn test_from_declarations_is_all_or_nothing() {
        let declarations = DeclarationList::new(vec![
            pantry_tool("getPantryIngredients"),
            card("RecipeCard", Schema::String),
            DeclarationBuilder::tool("analyzeHealthReport", "health.analyze")
                .input_schema(Schema::empty_object())
                .output_schema(Schema::empty_object())
                .build(),
        ]);

        let err = ContractRegistry::from_declarations(&declarations, &catalog()).unwrap_err();
        assert!(matches!(err, RegistryError::UnknownHandler { ref handler, .. } if handler == "health.analyze"));
    }

    #[test]
    fn test_from_declarations_rejects_duplicates() {
        let declarations = DeclarationList::new(vec![
            pantry_tool("getPantryIngredients"),
            pantry_tool("getPantryIngredients"),
        ]);

        let err = ContractRegistry::from_declarations(&declarations, &catalog()).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateName { .. }));
    }

    #[test]
    fn test_lookup_by_kind() {
        let declarations = DeclarationList::new(vec![
            pantry_tool("getPantryIngredients"),
            card("RecipeCard", Schema::String),
        ]);
        let registry = ContractRegistry::from_declarations(&declarations, &catalog()).unwrap();

        assert!(registry.lookup("getPantryIngredients", ContractKind::Tool).is_ok());
        assert_eq!(
            registry
                .lookup("getPantryIngredients", ContractKind::Component)
                .unwrap_err(),
            DispatchError::NotFound {
                name: "getPantryIngredients".into(),
                kind: ContractKind::Component,
            }
        );
        assert!(registry.tool("RecipeCard").is_err());
        assert!(registry.lookup("doesNotExist", ContractKind::Tool).is_err());
    }

    #[test]
    fn test_listing_preserves_declaration_order() {
        let declarations = DeclarationList::new(vec![
            card("Graph", Schema::String),
            pantry_tool("getPantryIngredients"),
            card("DataCard", Schema::String),
        ]);
        let registry = ContractRegistry::from_declarations(&declarations, &catalog()).unwrap();

        let names: Vec<&str> = registry.contracts().map(Contract::name).collect();
        assert_eq!(names, vec!["Graph", "getPantryIngredients", "DataCard"]);

        let components: Vec<&str> = registry.components().map(Contract::name).collect();
        assert_eq!(components, vec!["Graph", "DataCard"]);
        assert_eq!(registry.tools().count(), 1);
    }

    #[test]
    fn test_handle_replace_keeps_old_snapshots() {
        let first = DeclarationList::new(vec![card("RecipeCard", Schema::String)]);
        let second = DeclarationList::new(vec![card("DataCard", Schema::String)]);

        let handle = RegistryHandle::new(
            ContractRegistry::from_declarations(&first, &catalog()).unwrap(),
        );
        let before = handle.snapshot();

        let previous =
            handle.replace(ContractRegistry::from_declarations(&second, &catalog()).unwrap());

        assert!(Arc::ptr_eq(&before, &previous));
        assert!(before.get("RecipeCard").is_some());
        assert!(before.get("DataCard").is_none());

        let after = handle.snapshot();
        assert!(after.get("RecipeCard").is_none());
        assert!(after.get("DataCard").is_some());
    }

    #[test]
    fn test_global_install_once() {
        let handle = global::install(ContractRegistry::default()).unwrap();
        assert!(global::get().is_some());
        assert!(handle.snapshot().is_empty());

        let err = global::install(ContractRegistry::default()).unwrap_err();
        assert_eq!(err, RegistryError::AlreadyInstalled);
    }
}
