//! Health-report analysis through an external HTTP service.
//!
//! The service takes `{"image": "<base64>"}` and answers with a structured
//! report. Every way the call can go wrong maps to a [`HandlerError`] so the
//! invoker can retry or fall back to the tool's declared sample report.

use crate::{CollaboratorConfig, Result};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use dispatch_engine::{HandlerError, ToolHandler};
use dispatch_validator::ValidatedValue;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeArgs {
    image_base64: String,
}

/// The report shape the analysis service answers with. Anything else is a
/// malformed answer and leaves the tool to its fallback.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    report_date: Option<String>,
    metrics: Vec<HealthMetric>,
    summary: String,
    urgency: Urgency,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthMetric {
    name: String,
    value: String,
    normal_range: String,
    status: MetricStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    recommendation: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
enum MetricStatus {
    Normal,
    Low,
    High,
    Critical,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
enum Urgency {
    Routine,
    Monitor,
    ConsultDoctor,
}

/// Reads a service answer as a [`HealthReport`].
fn parse_report(body: &[u8]) -> std::result::Result<Value, HandlerError> {
    let report: HealthReport = serde_json::from_slice(body)
        .map_err(|e| HandlerError::Malformed(format!("analysis report: {e}")))?;
    serde_json::to_value(report).map_err(|e| HandlerError::Malformed(e.to_string()))
}

/// `health.analyze`: posts a report image to the analysis service.
#[derive(Debug, Clone)]
pub struct HealthAnalyzer {
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl HealthAnalyzer {
    /// Creates an analyzer with its own HTTP client.
    pub fn new(config: &CollaboratorConfig) -> Result<Self> {
        let timeout = config.analysis_timeout();
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: config.analysis_url.clone(),
            timeout,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn classify(&self, err: reqwest::Error) -> HandlerError {
        if err.is_timeout() {
            HandlerError::Timeout(self.timeout)
        } else {
            HandlerError::Transport(err.to_string())
        }
    }
}

/// Checks that an image payload is base64, accepting an optional
/// `data:<mime>;base64,` prefix.
fn check_base64(image: &str) -> std::result::Result<(), HandlerError> {
    let payload = match image.split_once(";base64,") {
        Some((prefix, data)) if prefix.starts_with("data:") => data,
        _ => image,
    };

    if payload.trim().is_empty() {
        return Err(HandlerError::Rejected("image is empty".to_string()));
    }

    STANDARD
        .decode(payload.trim())
        .map(|_| ())
        .map_err(|e| HandlerError::Rejected(format!("image is not valid base64: {e}")))
}

#[async_trait]
impl ToolHandler for HealthAnalyzer {
    async fn call(&self, args: &ValidatedValue) -> std::result::Result<Value, HandlerError> {
        let AnalyzeArgs { image_base64 } = args
            .parse()
            .map_err(|e| HandlerError::Rejected(e.to_string()))?;
        check_base64(&image_base64)?;

        debug!(endpoint = %self.endpoint, bytes = image_base64.len(), "Requesting report analysis");
        let response = self
            .client
            .post(&self.endpoint)
            .json(&json!({ "image": image_base64 }))
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            warn!(endpoint = %self.endpoint, status = status.as_u16(), "Analysis service rejected request");
            return Err(HandlerError::Status(status.as_u16()));
        }

        let body = response.bytes().await.map_err(|e| self.classify(e))?;
        parse_report(&body)
    }
}
