use crate::entities::{AddressQuery, MapPoint, OutOfRange};
use thiserror::Error;

/// A location candidate as returned by a geocoding provider,
/// ordered by descending confidence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub lat: f64,
    pub lng: f64,
}

impl Candidate {
    pub fn try_into_map_point(self) -> Result<MapPoint, OutOfRange> {
        MapPoint::try_from((self.lat, self.lng))
    }
}

#[derive(Debug, Error)]
pub enum GeocodingError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Request rejected (quota or authorization): {0}")]
    Rejected(String),
    #[error("Request timed out")]
    Timeout,
    #[error("Transport failure: {0}")]
    Transport(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub trait GeoCodingGateway {
    /// Forward geocoding of a free-text query.
    ///
    /// An empty result means that the provider has been reached
    /// but did not find any matching location.
    fn forward(&self, query: &AddressQuery) -> Result<Vec<Candidate>, GeocodingError>;
}

impl<G> GeoCodingGateway for &G
where
    G: GeoCodingGateway + ?Sized,
{
    fn forward(&self, query: &AddressQuery) -> Result<Vec<Candidate>, GeocodingError> {
        (**self).forward(query)
    }
}

impl<G> GeoCodingGateway for Box<G>
where
    G: GeoCodingGateway + ?Sized,
{
    fn forward(&self, query: &AddressQuery) -> Result<Vec<Candidate>, GeocodingError> {
        (**self).forward(query)
    }
}
