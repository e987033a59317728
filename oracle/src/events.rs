//! Notifications emitted by committed operations.

use serde::{Deserialize, Serialize};

use crate::types::{Identity, Trend, Weights};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum OracleEvent {
    Initialized {
        controller: Identity,
        weights: Weights,
        timestamp: u64,
    },
    ModelUpdated {
        caller: Identity,
        weights: Weights,
        timestamp: u64,
        update_count: u64,
    },
    Predicted {
        caller: Identity,
        trend: Trend,
        confidence: u8,
        timestamp: u64,
    },
    Withdrawn {
        to: Identity,
        amount: u128,
        timestamp: u64,
    },
}

impl OracleEvent {
    pub fn name(&self) -> &'static str {
        match self {
            OracleEvent::Initialized { .. } => "Initialized",
            OracleEvent::ModelUpdated { .. } => "ModelUpdated",
            OracleEvent::Predicted { .. } => "Predicted",
            OracleEvent::Withdrawn { .. } => "Withdrawn",
        }
    }
}

/// Receives notifications.
///
/// Called while the instance guard is held, so implementations must not call
/// back into the oracle.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: OracleEvent);
}

/// Writes every event as a structured log line.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: OracleEvent) {
        match serde_json::to_string(&event) {
            Ok(payload) => {
                tracing::info!(target: "oracle::events", event = event.name(), %payload, "event emitted")
            }
            Err(e) => {
                tracing::warn!(target: "oracle::events", event = event.name(), error = %e, "event not serializable")
            }
        }
    }
}
