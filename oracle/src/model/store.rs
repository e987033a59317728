use serde::{Deserialize, Serialize};

use crate::types::Weights;

/// Weights a fresh instance starts from.
pub const DEFAULT_WEIGHTS: Weights = [1, 0, 0];

/// Model state owned by one running instance.
///
/// Only [`crate::model::update::advance`] produces a successor; everything else
/// reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelStore {
    pub weights: Weights,
    /// Logical clock at the last successful update (or at genesis).
    pub last_updated: u64,
    pub update_count: u64,
}

impl ModelStore {
    pub fn genesis(now: u64) -> Self {
        Self {
            weights: DEFAULT_WEIGHTS,
            last_updated: now,
            update_count: 0,
        }
    }
}
