use super::prelude::*;
use parking_lot::Mutex;
use std::{collections::HashMap, thread, time::Duration};

enum Response {
    Candidates(Vec<Candidate>),
    Error(fn() -> GeocodingError),
}

/// A geocoding provider with canned answers that counts its calls.
///
/// Unknown queries are answered with zero candidates.
#[derive(Default)]
pub struct MockGeocoder {
    responses: HashMap<String, Response>,
    calls: Mutex<HashMap<String, usize>>,
    delay: Option<Duration>,
}

impl MockGeocoder {
    pub fn with_candidates(mut self, query: &str, lat_lng: &[(f64, f64)]) -> Self {
        let candidates = lat_lng
            .iter()
            .map(|&(lat, lng)| Candidate { lat, lng })
            .collect();
        self.responses
            .insert(query.into(), Response::Candidates(candidates));
        self
    }

    pub fn with_error(mut self, query: &str, err: fn() -> GeocodingError) -> Self {
        self.responses.insert(query.into(), Response::Error(err));
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self, query: &str) -> usize {
        self.calls.lock().get(query).copied().unwrap_or_default()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().values().sum()
    }
}

impl GeoCodingGateway for MockGeocoder {
    fn forward(&self, query: &AddressQuery) -> Result<Vec<Candidate>, GeocodingError> {
        *self.calls.lock().entry(query.to_string()).or_default() += 1;
        if let Some(delay) = self.delay {
            thread::sleep(delay);
        }
        match self.responses.get(query.as_str()) {
            Some(Response::Candidates(candidates)) => Ok(candidates.clone()),
            Some(Response::Error(err)) => Err(err()),
            None => Ok(vec![]),
        }
    }
}
