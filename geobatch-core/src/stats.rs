use crate::usecases::FailureKind;
use std::sync::atomic::{AtomicUsize, Ordering};
use strum::{EnumCount, IntoEnumIterator};

/// Counters of a single batch run.
#[derive(Debug, Default)]
pub struct Statistics {
    resolved: AtomicUsize,
    cache_hits: AtomicUsize,
    provider_calls: AtomicUsize,
    failures: [AtomicUsize; FailureKind::COUNT],
}

impl Statistics {
    pub(crate) fn count_resolved(&self) {
        self.resolved.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn count_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn count_provider_call(&self) {
        self.provider_calls.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn count_failure(&self, kind: FailureKind) {
        self.failures[kind as usize].fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatisticsSnapshot {
        StatisticsSnapshot {
            resolved: self.resolved.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            provider_calls: self.provider_calls.load(Ordering::Relaxed),
            failures: FailureKind::iter()
                .map(|kind| (kind, self.failures[kind as usize].load(Ordering::Relaxed)))
                .filter(|(_, count)| *count > 0)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatisticsSnapshot {
    /// Addresses that resolved to a coordinate, including cache hits.
    pub resolved: usize,
    pub cache_hits: usize,
    pub provider_calls: usize,
    /// Non-zero failure counters in declaration order.
    pub failures: Vec<(FailureKind, usize)>,
}

impl StatisticsSnapshot {
    pub fn failures_of(&self, kind: FailureKind) -> usize {
        self.failures
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, count)| *count)
            .unwrap_or_default()
    }

    pub fn total_failures(&self) -> usize {
        self.failures.iter().map(|(_, count)| count).sum()
    }
}
