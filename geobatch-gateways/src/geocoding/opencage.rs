use super::{classify_error, to_candidates, ClientError};
use ::geocoding::{Forward, Opencage};
use geobatch_core::{
    entities::AddressQuery,
    gateways::geocode::{Candidate, GeoCodingGateway, GeocodingError},
};

/// Forward geocoding with the OpenCage API.
#[derive(Debug, Clone)]
pub struct OpenCage {
    api_key: String,
}

impl OpenCage {
    pub fn try_new(api_key: impl Into<String>) -> Result<Self, ClientError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ClientError::MissingApiKey);
        }
        Ok(Self { api_key })
    }
}

impl GeoCodingGateway for OpenCage {
    fn forward(&self, query: &AddressQuery) -> Result<Vec<Candidate>, GeocodingError> {
        let oc_req = Opencage::new(self.api_key.clone());
        let points: Vec<::geocoding::Point<f64>> = oc_req
            .forward(query.as_str())
            .map_err(classify_error)?;
        log::debug!("OpenCage returned {} results for '{query}'", points.len());
        Ok(to_candidates(points))
    }
}
