pub mod access;
pub mod config;
pub mod env;
pub mod events;
pub mod features;
pub mod host;
pub mod instance;
pub mod metrics;
pub mod model;
pub mod snapshot;
pub mod types;

pub mod error;

pub use error::{OracleError, Result};
pub use instance::TrendOracle;
