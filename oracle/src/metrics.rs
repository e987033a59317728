use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Minimal counters for operational visibility.
#[derive(Clone, Debug, Default)]
pub struct Counters {
    pub updates: Arc<AtomicU64>,
    pub predictions_committed: Arc<AtomicU64>,
    pub predictions_silent: Arc<AtomicU64>,
    pub withdrawals: Arc<AtomicU64>,

    // rejections
    pub rejected_unauthorized: Arc<AtomicU64>,
    pub rejected_overflow: Arc<AtomicU64>,
}

impl Counters {
    pub(crate) fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn read(counter: &AtomicU64) -> u64 {
        counter.load(Ordering::Relaxed)
    }
}
