//! Published metrics record and wire formatting
//!
//! Defines the payload shape subscribers depend on (matches the
//! agents.status metrics contract): topic
//! `lucid/agents/{agent_id}/status/{component_id}/metrics` with a JSON body
//! of `cpu_percent`, `temperature_c` and `timestamp`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One published metrics reading.
///
/// `temperature_c` is `null` on the wire whenever the host exposes no usable
/// temperature sensor, or the read failed for this cycle only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSample {
    pub cpu_percent: f64,
    pub temperature_c: Option<f64>,
    pub timestamp: String,
}

/// Per-cycle failure taxonomy for sample production.
///
/// The anyhow fields render with `{:#}` so the whole cause chain lands in a
/// single log line, not just the outermost context message.
#[derive(Debug, thiserror::Error)]
pub enum SampleError {
    #[error("CPU usage read failed: {0:#}")]
    Cpu(anyhow::Error),
    #[error("Failed to encode metrics payload: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("Publish to {topic} failed: {reason:#}")]
    Publish { topic: String, reason: anyhow::Error },
}

/// Build the status topic for one component of one agent.
pub fn metrics_topic(agent_id: &str, component_id: &str) -> String {
    format!("lucid/agents/{agent_id}/status/{component_id}/metrics")
}

/// Current UTC time in the wire format.
pub fn utc_timestamp() -> String {
    format_timestamp(Utc::now())
}

/// Second-precision UTC timestamp with a literal trailing `Z`.
pub(crate) fn format_timestamp(instant: DateTime<Utc>) -> String {
    instant.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}
