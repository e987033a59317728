//! Feature extraction from environment signals.

use serde::{Deserialize, Serialize};

use crate::env::Environment;

/// Every raw signal is reduced modulo this value.
pub const FEATURE_MODULUS: u64 = 1_000;

/// Three features sampled at a single instant.
///
/// Each component lies in `0..FEATURE_MODULUS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureTriple {
    pub f0: i128,
    pub f1: i128,
    pub f2: i128,
}

impl FeatureTriple {
    pub const fn new(f0: i128, f1: i128, f2: i128) -> Self {
        Self { f0, f1, f2 }
    }

    pub const fn as_array(&self) -> [i128; 3] {
        [self.f0, self.f1, self.f2]
    }
}

/// Samples the environment once.
///
/// Callers that need several features from the same instant must reuse the
/// returned triple rather than calling this again.
pub fn extract<E: Environment + ?Sized>(env: &E) -> FeatureTriple {
    FeatureTriple {
        f0: i128::from(env.logical_clock() % FEATURE_MODULUS),
        f1: i128::from(env.sequence() % FEATURE_MODULUS),
        f2: (env.balance() % u128::from(FEATURE_MODULUS)) as i128,
    }
}
