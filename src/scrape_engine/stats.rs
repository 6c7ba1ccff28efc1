//! Batch statistics accounting
//!
//! Every task of a batch reports into one `StatisticsAccumulator`. Each
//! record updates the total, the matching counter, and the matching URL list
//! under a single lock so the three never disagree.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Aggregate outcome of one batch
///
/// `total_requests == successful_requests + failed_requests`, and each URL
/// list is as long as its counter. URL lists are in completion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchStatistics {
    pub total_requests: usize,
    pub successful_requests: usize,
    pub failed_requests: usize,
    pub failed_urls: Vec<String>,
    pub successful_urls: Vec<String>,
}

impl BatchStatistics {
    /// Fraction of requests that succeeded, 0.0 for an empty batch
    #[must_use]
    pub fn success_rate(&self) -> f64 {
        if self.total_requests == 0 {
            return 0.0;
        }
        self.successful_requests as f64 / self.total_requests as f64
    }
}

#[derive(Debug, Default)]
pub struct StatisticsAccumulator {
    inner: Mutex<BatchStatistics>,
}

impl StatisticsAccumulator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&self, url: &str) {
        let mut stats = self.inner.lock();
        stats.total_requests += 1;
        stats.successful_requests += 1;
        stats.successful_urls.push(url.to_string());
    }

    pub fn record_failure(&self, url: &str) {
        let mut stats = self.inner.lock();
        stats.total_requests += 1;
        stats.failed_requests += 1;
        stats.failed_urls.push(url.to_string());
    }

    /// Copy of the current state
    #[must_use]
    pub fn snapshot(&self) -> BatchStatistics {
        self.inner.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::Arc;

    #[test]
    fn test_empty_snapshot() {
        let stats = StatisticsAccumulator::new().snapshot();
        assert_eq!(stats, BatchStatistics::default());
        assert!(stats.success_rate().abs() < f64::EPSILON);
    }

    #[test]
    fn test_records_keep_completion_order() {
        let acc = StatisticsAccumulator::new();
        acc.record_success("b");
        acc.record_failure("x");
        acc.record_success("a");

        let stats = acc.snapshot();
        assert_eq!(stats.total_requests, 3);
        assert_eq!(stats.successful_urls, ["b", "a"]);
        assert_eq!(stats.failed_urls, ["x"]);
    }

    #[test]
    fn test_concurrent_records_are_consistent() {
        let acc = Arc::new(StatisticsAccumulator::new());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let acc = Arc::clone(&acc);
                std::thread::spawn(move || {
                    for i in 0..250 {
                        let url = format!("https://t{t}.test/{i}");
                        if i % 3 == 0 {
                            acc.record_failure(&url);
                        } else {
                            acc.record_success(&url);
                        }
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("recorder thread");
        }

        let stats = acc.snapshot();
        assert_eq!(stats.total_requests, 2000);
        assert_eq!(
            stats.total_requests,
            stats.successful_requests + stats.failed_requests
        );
        assert_eq!(stats.successful_urls.len(), stats.successful_requests);
        assert_eq!(stats.failed_urls.len(), stats.failed_requests);
    }

    proptest! {
        #[test]
        fn prop_counters_match_lists(outcomes in proptest::collection::vec(any::<bool>(), 0..64)) {
            let acc = StatisticsAccumulator::new();
            for (i, ok) in outcomes.iter().enumerate() {
                let url = format!("u{i}");
                if *ok { acc.record_success(&url) } else { acc.record_failure(&url) }
            }
            let stats = acc.snapshot();
            prop_assert_eq!(stats.total_requests, outcomes.len());
            prop_assert_eq!(stats.successful_requests, outcomes.iter().filter(|o| **o).count());
            prop_assert_eq!(stats.total_requests, stats.successful_requests + stats.failed_requests);
            prop_assert_eq!(stats.successful_urls.len(), stats.successful_requests);
            prop_assert_eq!(stats.failed_urls.len(), stats.failed_requests);
        }
    }
}
