//! Tool handlers and the catalog declarations bind to.
//!
//! A handler does the actual work of a tool. It only ever receives arguments
//! that already passed the tool's input schema, and it reports failures as
//! [`HandlerError`]s so the invoker can apply the tool's failure policy.

use async_trait::async_trait;
use dispatch_validator::ValidatedValue;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Failure reported by a handler or by the invoker on its behalf.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandlerError {
    /// The attempt exceeded the tool's declared timeout
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// The upstream service answered with a non-success status
    #[error("upstream responded with status {0}")]
    Status(u16),

    /// The upstream body could not be read as the expected payload
    #[error("malformed upstream response: {0}")]
    Malformed(String),

    /// The request never completed (connection refused, DNS, TLS...)
    #[error("transport error: {0}")]
    Transport(String),

    /// The handler refused its (schema-valid) input
    #[error("rejected input: {0}")]
    Rejected(String),

    /// Local file or resource access failed
    #[error("I/O error: {0}")]
    Io(String),

    /// The handler observed cancellation of its own work
    #[error("cancelled")]
    Cancelled,
}

impl HandlerError {
    /// Cancellation is an outcome of its own; it never triggers retries or
    /// fallback substitution.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// A rejected input fails the same way on every attempt, so only the
    /// other failures are worth another call.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::Rejected(_) | Self::Cancelled)
    }
}

/// The callable behind a tool.
///
/// Implementations must be safe to call concurrently: the same handler
/// instance serves every invocation of its tool.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use dispatch_engine::{HandlerError, ToolHandler};
/// use dispatch_validator::ValidatedValue;
/// use serde_json::{Value, json};
///
/// struct Greeting;
///
/// #[async_trait]
/// impl ToolHandler for Greeting {
///     async fn call(&self, args: &ValidatedValue) -> Result<Value, HandlerError> {
///         let name = args.get("name").and_then(Value::as_str).unwrap_or("there");
///         Ok(json!({ "message": format!("Hello, {name}!") }))
///     }
/// }
/// ```
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Runs the tool with validated arguments and returns its raw result.
    async fn call(&self, args: &ValidatedValue) -> Result<Value, HandlerError>;
}

/// Maps handler references used in declaration files to handler instances.
#[derive(Clone, Default)]
pub struct HandlerCatalog {
    handlers: HashMap<String, Arc<dyn ToolHandler>>,
}

impl HandlerCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler under a reference, replacing any previous one.
    pub fn insert(&mut self, reference: impl Into<String>, handler: impl ToolHandler + 'static) {
        self.handlers.insert(reference.into(), Arc::new(handler));
    }

    /// Builder-style variant of [`insert`](Self::insert).
    pub fn with(mut self, reference: impl Into<String>, handler: impl ToolHandler + 'static) -> Self {
        self.insert(reference, handler);
        self
    }

    /// Registers an already shared handler.
    pub fn insert_shared(&mut self, reference: impl Into<String>, handler: Arc<dyn ToolHandler>) {
        self.handlers.insert(reference.into(), handler);
    }

    /// Looks up a handler by reference.
    pub fn get(&self, reference: &str) -> Option<Arc<dyn ToolHandler>> {
        self.handlers.get(reference).cloned()
    }

    /// Returns true if the reference is known.
    pub fn contains(&self, reference: &str) -> bool {
        self.handlers.contains_key(reference)
    }

    /// Known references, sorted.
    pub fn references(&self) -> Vec<&str> {
        let mut refs: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        refs.sort_unstable();
        refs
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for HandlerCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerCatalog")
            .field("references", &self.references())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct Noop;

    #[async_trait]
    impl ToolHandler for Noop {
        async fn call(&self, _args: &ValidatedValue) -> Result<Value, HandlerError> {
            Ok(Value::Null)
        }
    }

    #[test]
    fn test_catalog_references_are_sorted() {
        let catalog = HandlerCatalog::new()
            .with("pantry.search", Noop)
            .with("health.analyze", Noop)
            .with("pantry.list", Noop);

        assert_eq!(
            catalog.references(),
            vec!["health.analyze", "pantry.list", "pantry.search"]
        );
        assert_eq!(catalog.len(), 3);
        assert!(catalog.contains("pantry.list"));
        assert!(catalog.get("pantry.unknown").is_none());
    }

    #[test]
    fn test_handler_error_messages() {
        assert_eq!(
            HandlerError::Status(503).to_string(),
            "upstream responded with status 503"
        );
        assert_eq!(
            HandlerError::Timeout(Duration::from_millis(20)).to_string(),
            "timed out after 20ms"
        );
        assert!(HandlerError::Cancelled.is_cancelled());
        assert!(!HandlerError::Rejected("x".into()).is_cancelled());
    }

    #[test]
    fn test_retryable_errors() {
        assert!(HandlerError::Status(503).is_retryable());
        assert!(HandlerError::Timeout(Duration::from_millis(20)).is_retryable());
        assert!(HandlerError::Transport("refused".into()).is_retryable());
        assert!(HandlerError::Malformed("eof".into()).is_retryable());
        assert!(!HandlerError::Rejected("not base64".into()).is_retryable());
        assert!(!HandlerError::Cancelled.is_retryable());
    }
}
