//! Pantry lookup.
//!
//! The pantry is a JSON table mapping category keys to ingredient names:
//!
//! ```json
//! { "dairy_products": ["Whole Milk", "Paneer"], "spices": ["Turmeric"] }
//! ```
//!
//! Lookups flatten it into `{name, category}` records with humanized category
//! names (`dairy_products` → `Dairy Products`).

use async_trait::async_trait;
use dispatch_engine::{HandlerError, ToolHandler};
use dispatch_validator::ValidatedValue;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::PathBuf;
use tracing::debug;

const SAMPLE_PANTRY: &str = include_str!("../data/pantry.json");

/// One pantry entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ingredient {
    pub name: String,
    pub category: String,
}

/// A flattened pantry table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pantry {
    ingredients: Vec<Ingredient>,
}

impl Pantry {
    /// Parses a category → items table, keeping the table's category order.
    pub fn from_json(content: &str) -> Result<Self, HandlerError> {
        let malformed = |e: serde_json::Error| HandlerError::Malformed(format!("pantry table: {e}"));
        let table: Map<String, Value> = serde_json::from_str(content).map_err(malformed)?;

        let mut ingredients = Vec::new();
        for (key, items) in table {
            let items: Vec<String> = serde_json::from_value(items).map_err(malformed)?;
            let category = humanize_category(&key);
            ingredients.extend(items.into_iter().map(|name| Ingredient {
                name,
                category: category.clone(),
            }));
        }

        Ok(Self { ingredients })
    }

    /// Every ingredient, in table order.
    pub fn all(&self) -> &[Ingredient] {
        &self.ingredients
    }

    /// Ingredients whose name contains `query`, ignoring case.
    pub fn search(&self, query: &str) -> Vec<Ingredient> {
        let query = query.to_lowercase();
        self.ingredients
            .iter()
            .filter(|item| item.name.to_lowercase().contains(&query))
            .cloned()
            .collect()
    }

    /// Ingredients of one humanized category, ignoring case.
    pub fn by_category(&self, category: &str) -> Vec<Ingredient> {
        self.ingredients
            .iter()
            .filter(|item| item.category.eq_ignore_ascii_case(category.trim()))
            .cloned()
            .collect()
    }
}

/// Turns a category key into a display name.
///
/// Underscores become spaces and the first letter of every word is
/// uppercased; other letters are left as they are.
///
/// ```rust
/// use dispatch_collaborators::humanize_category;
///
/// assert_eq!(humanize_category("dairy_products"), "Dairy Products");
/// assert_eq!(humanize_category("stir-fry_sauces"), "Stir-Fry Sauces");
/// ```
pub fn humanize_category(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut at_word_start = true;
    for ch in key.chars() {
        let ch = if ch == '_' { ' ' } else { ch };
        if ch.is_alphanumeric() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.push(ch);
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = true;
        }
    }
    out
}

/// Where the pantry table comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum PantrySource {
    /// The sample table compiled into the crate
    Embedded,
    /// A JSON file, re-read on every call
    File(PathBuf),
}

impl PantrySource {
    pub fn from_path(path: Option<PathBuf>) -> Self {
        path.map_or(Self::Embedded, Self::File)
    }

    /// Loads the table. A missing or malformed file is a handler failure.
    pub async fn load(&self) -> Result<Pantry, HandlerError> {
        match self {
            Self::Embedded => Pantry::from_json(SAMPLE_PANTRY),
            Self::File(path) => {
                debug!(path = %path.display(), "Reading pantry table");
                let content = tokio::fs::read_to_string(path)
                    .await
                    .map_err(|e| HandlerError::Io(format!("{}: {e}", path.display())))?;
                Pantry::from_json(&content)
            }
        }
    }
}

fn to_value(ingredients: &[Ingredient]) -> Result<Value, HandlerError> {
    serde_json::to_value(ingredients).map_err(|e| HandlerError::Malformed(e.to_string()))
}

fn parse_args<T: for<'de> Deserialize<'de>>(args: &ValidatedValue) -> Result<T, HandlerError> {
    args.parse().map_err(|e| HandlerError::Rejected(e.to_string()))
}

/// `pantry.list`: every ingredient.
#[derive(Debug, Clone)]
pub struct PantryList {
    source: PantrySource,
}

impl PantryList {
    pub fn new(source: PantrySource) -> Self {
        Self { source }
    }
}

#[async_trait]
impl ToolHandler for PantryList {
    async fn call(&self, _args: &ValidatedValue) -> Result<Value, HandlerError> {
        let pantry = self.source.load().await?;
        to_value(pantry.all())
    }
}

#[derive(Deserialize)]
struct SearchArgs {
    query: String,
}

/// `pantry.search`: case-insensitive substring match on names.
#[derive(Debug, Clone)]
pub struct PantrySearch {
    source: PantrySource,
}

impl PantrySearch {
    pub fn new(source: PantrySource) -> Self {
        Self { source }
    }
}

#[async_trait]
impl ToolHandler for PantrySearch {
    async fn call(&self, args: &ValidatedValue) -> Result<Value, HandlerError> {
        let SearchArgs { query } = parse_args(args)?;
        let pantry = self.source.load().await?;
        to_value(&pantry.search(&query))
    }
}

#[derive(Deserialize)]
struct CategoryArgs {
    category: String,
}

/// `pantry.by_category`: ingredients of one category.
#[derive(Debug, Clone)]
pub struct PantryByCategory {
    source: PantrySource,
}

impl PantryByCategory {
    pub fn new(source: PantrySource) -> Self {
        Self { source }
    }
}

#[async_trait]
impl ToolHandler for PantryByCategory {
    async fn call(&self, args: &ValidatedValue) -> Result<Value, HandlerError> {
        let CategoryArgs { category } = parse_args(args)?;
        let pantry = self.source.load().await?;
        to_value(&pantry.by_category(&category))
    }
}
