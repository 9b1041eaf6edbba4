use crate::gateways::geocode::GeocodingError;
use strum::{EnumCount, EnumIter, IntoStaticStr};
use thiserror::Error;

/// Why an address could not be resolved.
///
/// A failure never aborts a batch. It is reported as a diagnostic
/// and the address resolves to `Unresolved`.
#[derive(Debug, Error)]
pub enum LookupFailure {
    #[error("Geocoding client is not available")]
    ClientUnavailable,
    #[error("Invalid or empty query")]
    InvalidQuery,
    #[error("Address not found by the provider")]
    NotFound,
    #[error("Provider rejected the request: {0}")]
    ProviderRejected(#[source] GeocodingError),
    #[error("Network failure or timeout: {0}")]
    Transient(#[source] GeocodingError),
    #[error("Unexpected failure: {0}")]
    Unknown(#[source] anyhow::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumCount, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum FailureKind {
    ClientUnavailable,
    InvalidQuery,
    NotFound,
    ProviderRejected,
    Transient,
    Unknown,
}

impl LookupFailure {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::ClientUnavailable => FailureKind::ClientUnavailable,
            Self::InvalidQuery => FailureKind::InvalidQuery,
            Self::NotFound => FailureKind::NotFound,
            Self::ProviderRejected(_) => FailureKind::ProviderRejected,
            Self::Transient(_) => FailureKind::Transient,
            Self::Unknown(_) => FailureKind::Unknown,
        }
    }
}

impl FailureKind {
    /// Only a definite answer of the provider is remembered for the
    /// rest of the run. Rejected, transient and unknown failures are
    /// retried on every repeated occurrence of the query.
    pub const fn is_cacheable(self) -> bool {
        matches!(self, Self::NotFound)
    }

    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

impl From<GeocodingError> for LookupFailure {
    fn from(err: GeocodingError) -> Self {
        match err {
            GeocodingError::InvalidRequest(_) | GeocodingError::Rejected(_) => {
                Self::ProviderRejected(err)
            }
            GeocodingError::Timeout | GeocodingError::Transport(_) => Self::Transient(err),
            GeocodingError::Other(err) => Self::Unknown(err),
        }
    }
}
