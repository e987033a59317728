//! Host-provided signals and fund movement.
//!
//! The oracle never owns time, ordering or money; it reads them through these
//! traits at call time.

use crate::types::Identity;

/// Read-only signals of the hosting runtime.
pub trait Environment: Send + Sync {
    /// Logical clock, non-decreasing.
    fn logical_clock(&self) -> u64;

    /// Sequence counter, increasing with every committed transaction.
    fn sequence(&self) -> u64;

    /// Balance attached to the running instance, in the smallest denomination.
    fn balance(&self) -> u128;
}

/// Fund movement out of the instance balance.
pub trait Treasury: Environment {
    /// Moves the entire instance balance to `to` and returns the amount moved.
    fn transfer_all(&self, to: &Identity) -> u128;
}
