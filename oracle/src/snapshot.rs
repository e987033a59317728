//! Durable footprint of an instance: `{controller, weights, last_updated, update_count}`.

use serde::{Deserialize, Serialize};

use crate::error::{OracleError, Result};
use crate::types::{Identity, Weights};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleSnapshot {
    pub controller: Identity,
    pub weights: Weights,
    pub last_updated: u64,
    pub update_count: u64,
}

impl OracleSnapshot {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| OracleError::Snapshot(e.to_string()))
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| OracleError::Snapshot(e.to_string()))
    }
}
