//! The tool invoker.
//!
//! Invocation runs in a fixed order:
//!
//! 1. look the tool up (kind must be tool),
//! 2. validate the raw arguments against the input schema,
//! 3. call the handler under the tool's failure policy (timeout per attempt,
//!    retries with exponential backoff),
//! 4. substitute the declared fallback if every attempt failed,
//! 5. validate a live result against the output schema.
//!
//! A result that violates the output schema is never retried and never
//! replaced by the fallback.

use crate::{ContractRegistry, DispatchError, HandlerError, ToolBinding};
use dispatch_validator::{SchemaValidator, ValidatedValue};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

/// Where an invocation's value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    /// Validated handler output
    Live,
    /// The tool's declared fallback, after the handler failed
    Degraded,
}

/// A successful invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub value: ValidatedValue,
    pub provenance: Provenance,
    /// Handler attempts made, including the first
    pub attempts: u32,
}

impl Invocation {
    pub fn is_degraded(&self) -> bool {
        self.provenance == Provenance::Degraded
    }
}

/// Invokes tools from one registry snapshot.
///
/// Cheap to clone; clones share the snapshot.
#[derive(Debug, Clone)]
pub struct ToolInvoker {
    registry: Arc<ContractRegistry>,
    validator: SchemaValidator,
}

impl ToolInvoker {
    pub fn new(registry: Arc<ContractRegistry>) -> Self {
        Self {
            registry,
            validator: SchemaValidator::new(),
        }
    }

    pub fn registry(&self) -> &ContractRegistry {
        &self.registry
    }

    /// Invokes a tool with raw arguments.
    pub async fn invoke(&self, name: &str, args: &Value) -> Result<Invocation, DispatchError> {
        self.invoke_with_cancel(name, args, &CancellationToken::new())
            .await
    }

    /// Invokes a tool, abandoning it when `cancel` fires.
    ///
    /// On cancellation the in-flight handler future is dropped, and the
    /// result is [`DispatchError::Cancelled`] whether or not a fallback is
    /// declared.
    pub async fn invoke_with_cancel(
        &self,
        name: &str,
        args: &Value,
        cancel: &CancellationToken,
    ) -> Result<Invocation, DispatchError> {
        let tool = self.registry.tool(name)?;
        debug!(tool = name, handler = %tool.handler_ref, "Dispatching tool invocation");

        let args = self
            .validator
            .validate(&tool.input_schema, args)
            .map_err(|details| {
                debug!(tool = name, error = %details, "Rejected tool arguments");
                DispatchError::InvalidArguments {
                    name: name.to_string(),
                    details,
                }
            })?;

        let retry = tool.policy.retry;
        let mut attempts = 0;
        let outcome = loop {
            attempts += 1;
            match attempt(tool, &args, cancel).await {
                Ok(raw) => break Ok(raw),
                Err(HandlerError::Cancelled) => {
                    debug!(tool = name, attempt = attempts, "Invocation cancelled");
                    return Err(DispatchError::Cancelled {
                        name: name.to_string(),
                    });
                }
                Err(cause) if cause.is_retryable() && attempts <= retry.max_retries => {
                    let delay = retry.delay_before(attempts);
                    warn!(
                        tool = name,
                        attempt = attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %cause,
                        "Handler failed, retrying"
                    );
                    tokio::select! {
                        _ = cancel.cancelled() => {
                            return Err(DispatchError::Cancelled { name: name.to_string() });
                        }
                        _ = tokio::time::sleep(delay) => {}
                    }
                }
                Err(cause) => break Err(cause),
            }
        };

        match outcome {
            Ok(raw) => match self.validator.validate(&tool.output_schema, &raw) {
                Ok(value) => {
                    debug!(tool = name, attempts, "Tool result validated");
                    Ok(Invocation {
                        value,
                        provenance: Provenance::Live,
                        attempts,
                    })
                }
                Err(details) => {
                    error!(tool = name, error = %details, "Handler result violates output schema");
                    Err(DispatchError::ContractViolation {
                        name: name.to_string(),
                        details,
                    })
                }
            },
            Err(cause) => match &tool.policy.fallback {
                Some(fallback) => {
                    warn!(tool = name, attempts, error = %cause, "Handler failed, returning fallback data");
                    Ok(Invocation {
                        value: fallback.clone(),
                        provenance: Provenance::Degraded,
                        attempts,
                    })
                }
                None => {
                    warn!(tool = name, attempts, error = %cause, "Handler failed, no fallback declared");
                    Err(DispatchError::Upstream {
                        name: name.to_string(),
                        cause,
                    })
                }
            },
        }
    }
}

/// One handler call, bounded by the tool's timeout and the caller's token.
async fn attempt(
    tool: &ToolBinding,
    args: &ValidatedValue,
    cancel: &CancellationToken,
) -> Result<Value, HandlerError> {
    let call = tool.handler.call(args);
    let bounded = async {
        match tool.policy.timeout {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(result) => result,
                Err(_) => Err(HandlerError::Timeout(limit)),
            },
            None => call.await,
        }
    };

    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(HandlerError::Cancelled),
        result = bounded => result,
    }
}
