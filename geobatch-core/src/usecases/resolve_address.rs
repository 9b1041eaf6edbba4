use super::prelude::*;

/// A successful lookup.
///
/// `Unresolved` is only ever returned from the cache, i.e. for
/// queries the provider did not find earlier in the same run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lookup {
    pub outcome: CoordinateOutcome,
    pub cache_hit: bool,
}

/// Resolves a single query, consulting the cache first.
///
/// Only `NotFound` failures are written back to the cache (as
/// `Unresolved`). Neither a missing client nor an invalid query
/// touch the cache.
pub fn try_resolve_address<G>(
    gateway: Option<&G>,
    cache: &CoordinateCache,
    query: Option<&str>,
) -> Result<Lookup, LookupFailure>
where
    G: GeoCodingGateway + ?Sized,
{
    let gateway = gateway.ok_or(LookupFailure::ClientUnavailable)?;
    let query = AddressQuery::parse(query).ok_or(LookupFailure::InvalidQuery)?;

    let slot = cache.slot(&query);
    let mut entry = slot.lock();
    if let Some(outcome) = *entry {
        log::debug!("Cache hit for '{query}': {outcome:?}");
        return Ok(Lookup {
            outcome,
            cache_hit: true,
        });
    }

    let candidates = gateway.forward(&query)?;
    let Some(first) = candidates.first() else {
        *entry = Some(CoordinateOutcome::Unresolved);
        return Err(LookupFailure::NotFound);
    };
    let pos = first
        .try_into_map_point()
        .map_err(|err| LookupFailure::Unknown(err.into()))?;
    log::debug!("Resolved address location '{query}': {pos}");
    let outcome = CoordinateOutcome::Resolved(pos);
    *entry = Some(outcome);
    Ok(Lookup {
        outcome,
        cache_hit: false,
    })
}

pub(crate) fn log_failure(err: &LookupFailure, query: Option<&str>) {
    let query = query.unwrap_or_default();
    match err.kind() {
        FailureKind::ClientUnavailable => log::error!("{err}"),
        _ => log::warn!("{err} | query: '{query}'"),
    }
}

#[cfg(test)]
mod tests {
    use super::{super::tests::MockGeocoder, *};

    fn resolve(gw: &MockGeocoder, cache: &CoordinateCache, query: &str) -> CoordinateOutcome {
        try_resolve_address(Some(gw), cache, Some(query))
            .map(|lookup| lookup.outcome)
            .unwrap_or(CoordinateOutcome::Unresolved)
    }

    #[test]
    fn resolve_with_first_candidate() {
        let gw = MockGeocoder::default()
            .with_candidates("Av. Paulista", &[(-23.561, -46.656), (-22.0, -47.0)]);
        let cache = CoordinateCache::new();
        let outcome = resolve(&gw, &cache, "Av. Paulista");
        assert_eq!(Some((-23.561, -46.656)), outcome.to_lat_lng_deg());
        assert_eq!(Some(outcome), cache.lookup("Av. Paulista"));
    }

    #[test]
    fn second_lookup_is_served_from_cache() {
        let gw = MockGeocoder::default().with_candidates("Praça da Sé", &[(-23.55, -46.63)]);
        let cache = CoordinateCache::new();
        let first = try_resolve_address(Some(&gw), &cache, Some("Praça da Sé")).unwrap();
        let second = try_resolve_address(Some(&gw), &cache, Some("Praça da Sé")).unwrap();
        assert!(!first.cache_hit);
        assert!(second.cache_hit);
        assert_eq!(first.outcome, second.outcome);
        assert_eq!(1, gw.calls("Praça da Sé"));
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let gw = MockGeocoder::default().with_candidates("Praça da Sé", &[(-23.55, -46.63)]);
        let cache = CoordinateCache::new();
        let a = resolve(&gw, &cache, "Praça da Sé");
        let b = resolve(&gw, &cache, "  Praça da Sé\t");
        assert_eq!(a, b);
        assert_eq!(1, gw.total_calls());
    }

    #[test]
    fn invalid_queries_never_reach_the_provider() {
        let gw = MockGeocoder::default();
        let cache = CoordinateCache::new();
        for query in [None, Some(""), Some("   ")] {
            let res = try_resolve_address(Some(&gw), &cache, query);
            assert!(matches!(res, Err(LookupFailure::InvalidQuery)));
        }
        assert_eq!(0, gw.total_calls());
        assert!(cache.is_empty());
    }

    #[test]
    fn missing_client_short_circuits() {
        let cache = CoordinateCache::new();
        let res = try_resolve_address::<MockGeocoder>(None, &cache, Some("Av. Paulista"));
        assert!(matches!(res, Err(LookupFailure::ClientUnavailable)));
        // checked before the query is validated
        let res = try_resolve_address::<MockGeocoder>(None, &cache, Some(""));
        assert!(matches!(res, Err(LookupFailure::ClientUnavailable)));
        assert!(cache.is_empty());
    }

    #[test]
    fn not_found_is_cached() {
        let gw = MockGeocoder::default();
        let cache = CoordinateCache::new();
        let query = "Nonexistent Place Xyz123";
        let res = try_resolve_address(Some(&gw), &cache, Some(query));
        assert!(matches!(res, Err(LookupFailure::NotFound)));
        assert_eq!(Some(CoordinateOutcome::Unresolved), cache.lookup(query));

        let res = try_resolve_address(Some(&gw), &cache, Some(query)).unwrap();
        assert!(res.cache_hit);
        assert_eq!(CoordinateOutcome::Unresolved, res.outcome);
        assert_eq!(1, gw.calls(query));
    }

    #[test]
    fn provider_errors_are_not_cached() {
        let gw = MockGeocoder::default()
            .with_error("rejected", || GeocodingError::Rejected("over quota".into()))
            .with_error("timeout", || GeocodingError::Timeout)
            .with_error("other", || GeocodingError::Other(anyhow::anyhow!("boom")));
        let cache = CoordinateCache::new();
        for (query, kind) in [
            ("rejected", FailureKind::ProviderRejected),
            ("timeout", FailureKind::Transient),
            ("other", FailureKind::Unknown),
        ] {
            for _ in 0..2 {
                let err = try_resolve_address(Some(&gw), &cache, Some(query)).unwrap_err();
                assert_eq!(kind, err.kind());
            }
            assert_eq!(2, gw.calls(query));
            assert_eq!(None, cache.lookup(query));
        }
        assert!(cache.is_empty());
    }

    #[test]
    fn out_of_range_candidate_is_an_unknown_failure() {
        let gw = MockGeocoder::default().with_candidates("broken", &[(123.0, 0.0)]);
        let cache = CoordinateCache::new();
        let err = try_resolve_address(Some(&gw), &cache, Some("broken")).unwrap_err();
        assert_eq!(FailureKind::Unknown, err.kind());
        assert_eq!(None, cache.lookup("broken"));
    }
}
