//! In-process stand-in for the hosting runtime.
//!
//! Committed work goes through [`SimulatedHost::transact`], which advances the
//! sequence counter and logical clock once the operation succeeds. Queries go
//! through [`SimulatedHost::call`] and leave no trace.

use std::collections::HashMap;

use parking_lot::Mutex;
use tracing::debug;

use crate::env::{Environment, Treasury};
use crate::types::Identity;

#[derive(Debug, Default)]
struct HostState {
    clock: u64,
    sequence: u64,
    balance: u128,
    payouts: HashMap<Identity, u128>,
}

pub struct SimulatedHost {
    state: Mutex<HostState>,
    // Serializes committed transactions.
    tx_gate: Mutex<()>,
    clock_step: u64,
}

impl SimulatedHost {
    pub fn new(genesis_clock: u64, clock_step: u64) -> Self {
        Self {
            state: Mutex::new(HostState {
                clock: genesis_clock,
                ..HostState::default()
            }),
            tx_gate: Mutex::new(()),
            clock_step,
        }
    }

    pub fn deposit(&self, amount: u128) {
        let mut s = self.state.lock();
        s.balance = s.balance.saturating_add(amount);
    }

    pub fn advance_clock(&self, by: u64) {
        let mut s = self.state.lock();
        s.clock = s.clock.saturating_add(by);
    }

    /// Total paid out to `who` so far.
    pub fn paid_out(&self, who: &Identity) -> u128 {
        self.state.lock().payouts.get(who).copied().unwrap_or(0)
    }

    /// Runs a committed operation. On success the sequence moves by one and
    /// the clock by the configured step; on failure nothing moves.
    pub fn transact<T, Er, F>(&self, op: F) -> Result<T, Er>
    where
        F: FnOnce(&Self) -> Result<T, Er>,
    {
        let _gate = self.tx_gate.lock();

        let out = op(self)?;

        let mut s = self.state.lock();
        s.sequence = s.sequence.saturating_add(1);
        s.clock = s.clock.saturating_add(self.clock_step);
        debug!(sequence = s.sequence, clock = s.clock, "transaction committed");

        Ok(out)
    }

    /// Runs a read-only query against the current host state.
    pub fn call<T, F>(&self, op: F) -> T
    where
        F: FnOnce(&Self) -> T,
    {
        op(self)
    }
}

impl Environment for SimulatedHost {
    fn logical_clock(&self) -> u64 {
        self.state.lock().clock
    }

    fn sequence(&self) -> u64 {
        self.state.lock().sequence
    }

    fn balance(&self) -> u128 {
        self.state.lock().balance
    }
}

impl Treasury for SimulatedHost {
    fn transfer_all(&self, to: &Identity) -> u128 {
        let mut s = self.state.lock();
        let amount = std::mem::take(&mut s.balance);
        *s.payouts.entry(to.clone()).or_default() += amount;
        amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn committed_transaction_advances_history() {
        let host = SimulatedHost::new(1_000, 12);

        let r: Result<u64, ()> = host.transact(|h| Ok(h.sequence()));
        assert_eq!(r, Ok(0));
        assert_eq!(host.sequence(), 1);
        assert_eq!(host.logical_clock(), 1_012);
    }

    #[test]
    fn failed_transaction_leaves_history_untouched() {
        let host = SimulatedHost::new(1_000, 12);

        let r: Result<(), &str> = host.transact(|_| Err("reverted"));
        assert_eq!(r, Err("reverted"));
        assert_eq!(host.sequence(), 0);
        assert_eq!(host.logical_clock(), 1_000);
    }

    #[test]
    fn advance_clock_moves_time_only() {
        let host = SimulatedHost::new(1_000, 12);
        host.advance_clock(250);

        assert_eq!(host.logical_clock(), 1_250);
        assert_eq!(host.sequence(), 0);
        assert_eq!(host.call(|h| h.logical_clock() % 1_000), 250);
    }

    #[test]
    fn call_never_advances() {
        let host = SimulatedHost::new(5, 12);
        let seen = host.call(|h| (h.logical_clock(), h.sequence()));

        assert_eq!(seen, (5, 0));
        assert_eq!(host.sequence(), 0);
    }

    #[test]
    fn transfer_all_drains_balance() {
        let host = SimulatedHost::new(0, 1);
        host.deposit(700);
        host.deposit(310);

        let alice = Identity::from("alice");
        assert_eq!(host.transfer_all(&alice), 1_010);
        assert_eq!(host.balance(), 0);
        assert_eq!(host.transfer_all(&alice), 0);
        assert_eq!(host.paid_out(&alice), 1_010);
    }
}
