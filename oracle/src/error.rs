use thiserror::Error;

use crate::types::Identity;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OracleError {
    #[error("instance already initialized")]
    AlreadyInitialized,

    #[error("instance not initialized")]
    NotInitialized,

    #[error("caller {caller} is not the controller")]
    Unauthorized { caller: Identity },

    #[error("arithmetic overflow during {0}")]
    ArithmeticOverflow(&'static str),

    #[error("invalid snapshot: {0}")]
    Snapshot(String),
}

pub type Result<T> = std::result::Result<T, OracleError>;
