use super::{classify_error, to_candidates, ClientError};
use ::geocoding::{Forward, Openstreetmap};
use geobatch_core::{
    entities::AddressQuery,
    gateways::geocode::{Candidate, GeoCodingGateway, GeocodingError},
};

/// Forward geocoding with a Nominatim instance.
#[derive(Debug, Clone, Default)]
pub struct OpenStreetMap {
    endpoint: Option<String>,
}

impl OpenStreetMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_with_endpoint(endpoint: impl Into<String>) -> Result<Self, ClientError> {
        let endpoint = endpoint.into();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(ClientError::InvalidEndpoint(endpoint));
        }
        let endpoint = if endpoint.ends_with('/') {
            endpoint
        } else {
            format!("{endpoint}/")
        };
        Ok(Self {
            endpoint: Some(endpoint),
        })
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }
}

impl GeoCodingGateway for OpenStreetMap {
    fn forward(&self, query: &AddressQuery) -> Result<Vec<Candidate>, GeocodingError> {
        let osm_req = match &self.endpoint {
            Some(endpoint) => Openstreetmap::new_with_endpoint(endpoint.clone()),
            None => Openstreetmap::new(),
        };
        let points: Vec<::geocoding::Point<f64>> = osm_req
            .forward(query.as_str())
            .map_err(classify_error)?;
        log::debug!("Nominatim returned {} results for '{query}'", points.len());
        Ok(to_candidates(points))
    }
}
