//! Test handlers shared by the engine integration suites.

#![allow(dead_code)]

use async_trait::async_trait;
use dispatch_core::{ObjectSchemaBuilder, Schema};
use dispatch_engine::{HandlerError, ToolHandler};
use dispatch_validator::ValidatedValue;
use serde_json::Value;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Counts calls across clones.
#[derive(Debug, Clone, Default)]
pub struct CallCounter(Arc<AtomicU32>);

impl CallCounter {
    pub fn bump(&self) -> u32 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn get(&self) -> u32 {
        self.0.load(Ordering::SeqCst)
    }
}

/// Returns a fixed value.
pub struct Fixed {
    pub value: Value,
    pub calls: CallCounter,
}

#[async_trait]
impl ToolHandler for Fixed {
    async fn call(&self, _args: &ValidatedValue) -> Result<Value, HandlerError> {
        self.calls.bump();
        Ok(self.value.clone())
    }
}

/// Always fails with the same error.
pub struct Failing {
    pub error: HandlerError,
    pub calls: CallCounter,
}

#[async_trait]
impl ToolHandler for Failing {
    async fn call(&self, _args: &ValidatedValue) -> Result<Value, HandlerError> {
        self.calls.bump();
        Err(self.error.clone())
    }
}

/// Fails a number of times, then succeeds.
pub struct Flaky {
    pub failures: u32,
    pub value: Value,
    pub calls: CallCounter,
}

#[async_trait]
impl ToolHandler for Flaky {
    async fn call(&self, _args: &ValidatedValue) -> Result<Value, HandlerError> {
        if self.calls.bump() <= self.failures {
            Err(HandlerError::Status(503))
        } else {
            Ok(self.value.clone())
        }
    }
}

/// Sleeps before answering.
pub struct Slow {
    pub delay: Duration,
    pub value: Value,
    pub calls: CallCounter,
}

#[async_trait]
impl ToolHandler for Slow {
    async fn call(&self, _args: &ValidatedValue) -> Result<Value, HandlerError> {
        self.calls.bump();
        tokio::time::sleep(self.delay).await;
        Ok(self.value.clone())
    }
}

/// Echoes its validated arguments and records every call.
#[derive(Default)]
pub struct Recording {
    pub seen: Arc<Mutex<Vec<Value>>>,
}

#[async_trait]
impl ToolHandler for Recording {
    async fn call(&self, args: &ValidatedValue) -> Result<Value, HandlerError> {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(args.as_value().clone());
        }
        Ok(args.as_value().clone())
    }
}

pub fn report_schema() -> Schema {
    ObjectSchemaBuilder::new()
        .field("summary", Schema::String)
        .field(
            "urgency",
            Schema::enumeration(["routine", "monitor", "consult_doctor"]),
        )
        .build()
}

pub fn image_input_schema() -> Schema {
    ObjectSchemaBuilder::new()
        .field("imageBase64", Schema::String)
        .build()
}
