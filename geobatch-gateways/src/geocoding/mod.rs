use geobatch_core::gateways::geocode::{Candidate, GeocodingError};
use thiserror::Error;

mod opencage;
mod openstreetmap;

pub use self::{opencage::OpenCage, openstreetmap::OpenStreetMap};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Missing API key")]
    MissingApiKey,
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

// Points of the geocoding crate are (x, y) = (lng, lat).
fn to_candidates(points: Vec<::geocoding::Point<f64>>) -> Vec<Candidate> {
    points
        .into_iter()
        .map(|p| Candidate {
            lat: p.y(),
            lng: p.x(),
        })
        .collect()
}

fn classify_error(err: ::geocoding::GeocodingError) -> GeocodingError {
    match err {
        ::geocoding::GeocodingError::Request(err) => {
            if err.is_timeout() {
                GeocodingError::Timeout
            } else if let Some(status) = err.status() {
                classify_status(status.as_u16(), err.to_string())
            } else if err.is_decode() {
                GeocodingError::Other(err.into())
            } else {
                GeocodingError::Transport(err.to_string())
            }
        }
        err => GeocodingError::Other(err.into()),
    }
}

fn classify_status(status: u16, message: String) -> GeocodingError {
    match status {
        400 => GeocodingError::InvalidRequest(message),
        401 | 402 | 403 | 429 => GeocodingError::Rejected(message),
        408 | 504 => GeocodingError::Timeout,
        500..=599 => GeocodingError::Transport(message),
        _ => GeocodingError::Other(anyhow::anyhow!("Unexpected HTTP status {status}: {message}")),
    }
}
