//! Inference module
//!
//! Provides the per-request core of the service:
//! - [`Predictor`]: persisted transformer + model, transform-then-predict
//! - [`InferenceStats`]: lock-free request counters

mod predictor;

pub use predictor::{Prediction, Predictor, PREDICTION_DECIMALS};

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Counters shared by concurrent requests
#[derive(Debug)]
pub struct InferenceStats {
    started: Instant,
    requests: AtomicU64,
    failures: AtomicU64,
    unknown_categories: AtomicU64,
}

/// Point-in-time copy of [`InferenceStats`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub requests: u64,
    pub failures: u64,
    pub unknown_categories: u64,
    pub uptime_secs: u64,
}

impl Default for InferenceStats {
    fn default() -> Self {
        Self::new()
    }
}

impl InferenceStats {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            requests: AtomicU64::new(0),
            failures: AtomicU64::new(0),
            unknown_categories: AtomicU64::new(0),
        }
    }

    pub fn record_success(&self, unknown_categories: usize) {
        self.requests.fetch_add(1, Ordering::Relaxed);
        self.unknown_categories
            .fetch_add(unknown_categories as u64, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            requests: self.requests.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            unknown_categories: self.unknown_categories.load(Ordering::Relaxed),
            uptime_secs: self.started.elapsed().as_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_counts() {
        let stats = InferenceStats::new();
        stats.record_success(2);
        stats.record_success(0);
        stats.record_failure();

        let snap = stats.snapshot();
        assert_eq!(snap.requests, 3);
        assert_eq!(snap.failures, 1);
        assert_eq!(snap.unknown_categories, 2);
    }
}
