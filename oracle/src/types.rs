use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque caller identity as handed in by the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    pub fn new(v: impl Into<String>) -> Self {
        Self(v.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identity {
    fn from(v: &str) -> Self {
        Self::new(v)
    }
}

/// Weight vector, one signed weight per feature dimension.
pub type Weights = [i128; 3];

/// Classification bucket for the scaled score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trend {
    Down,
    Stable,
    Up,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Trend::Down => "Down",
            Trend::Stable => "Stable",
            Trend::Up => "Up",
        };
        f.write_str(s)
    }
}

/// Output of one classification. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    pub trend: Trend,
    /// Always within `0..=100`.
    pub confidence: u8,
}
