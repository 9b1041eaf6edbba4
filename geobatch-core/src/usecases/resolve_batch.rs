use super::{
    prelude::*,
    resolve_address::{log_failure, try_resolve_address, Lookup},
};
use crate::stats::{Statistics, StatisticsSnapshot};
use rayon::prelude::*;

/// Resolves sequences of addresses with a cache that lives as long
/// as the resolver.
///
/// A resolver without a gateway represents a client that could not
/// be initialized: every address resolves to `Unresolved`.
#[derive(Debug)]
pub struct BatchResolver<G> {
    gateway: Option<G>,
    cache: CoordinateCache,
    stats: Statistics,
}

impl<G> BatchResolver<G>
where
    G: GeoCodingGateway,
{
    pub fn new(gateway: Option<G>) -> Self {
        if gateway.is_none() {
            log::warn!("No geocoding client available: all addresses will be unresolved");
        }
        Self {
            gateway,
            cache: CoordinateCache::new(),
            stats: Statistics::default(),
        }
    }

    pub fn resolve_one(&self, query: Option<&str>) -> CoordinateOutcome {
        let res = try_resolve_address(self.gateway.as_ref(), &self.cache, query);
        self.record(&res);
        match res {
            Ok(Lookup { outcome, .. }) => outcome,
            Err(err) => {
                log_failure(&err, query);
                CoordinateOutcome::Unresolved
            }
        }
    }

    /// Resolves all queries one after another.
    ///
    /// The result has the same length and order as the input.
    pub fn resolve_batch<'q, I>(&self, queries: I) -> Vec<CoordinateOutcome>
    where
        I: IntoIterator<Item = Option<&'q str>>,
    {
        queries.into_iter().map(|q| self.resolve_one(q)).collect()
    }

    pub fn cache(&self) -> &CoordinateCache {
        &self.cache
    }

    pub fn stats(&self) -> StatisticsSnapshot {
        self.stats.snapshot()
    }

    fn record(&self, res: &Result<Lookup, LookupFailure>) {
        match res {
            Ok(lookup) => {
                if lookup.cache_hit {
                    self.stats.count_cache_hit();
                } else {
                    self.stats.count_provider_call();
                }
                if lookup.outcome.is_resolved() {
                    self.stats.count_resolved();
                }
            }
            Err(err) => {
                let kind = err.kind();
                if !matches!(
                    kind,
                    FailureKind::ClientUnavailable | FailureKind::InvalidQuery
                ) {
                    self.stats.count_provider_call();
                }
                self.stats.count_failure(kind);
            }
        }
    }
}

impl<G> BatchResolver<G>
where
    G: GeoCodingGateway + Sync,
{
    /// Resolves the queries on a pool of `workers` threads.
    ///
    /// Repeated queries are sent to the provider at most once at a
    /// time: the first thread claims the cache slot and all others
    /// wait for its outcome. The result keeps the input order.
    pub fn resolve_batch_parallel(
        &self,
        queries: &[Option<&str>],
        workers: usize,
    ) -> Vec<CoordinateOutcome> {
        if workers <= 1 {
            return self.resolve_batch(queries.iter().copied());
        }
        let pool = match rayon::ThreadPoolBuilder::new().num_threads(workers).build() {
            Ok(pool) => pool,
            Err(err) => {
                log::warn!(
                    "Failed to start {workers} worker threads, resolving sequentially: {err}"
                );
                return self.resolve_batch(queries.iter().copied());
            }
        };
        pool.install(|| queries.par_iter().map(|q| self.resolve_one(*q)).collect())
    }
}
