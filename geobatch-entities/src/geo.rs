use std::fmt;
use thiserror::Error;

const LAT_DEG_MAX: f64 = 90.0;
const LAT_DEG_MIN: f64 = -90.0;
const LNG_DEG_MAX: f64 = 180.0;
const LNG_DEG_MIN: f64 = -180.0;

#[derive(Debug, Error, Clone, Copy, PartialEq)]
#[error("Coordinate out of range: lat = {lat}, lng = {lng}")]
pub struct OutOfRange {
    pub lat: f64,
    pub lng: f64,
}

/// A geographical position in WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapPoint {
    lat: f64,
    lng: f64,
}

impl MapPoint {
    pub fn lat(self) -> f64 {
        self.lat
    }

    pub fn lng(self) -> f64 {
        self.lng
    }

    pub fn is_valid(self) -> bool {
        is_valid_lat_deg(self.lat) && is_valid_lng_deg(self.lng)
    }

    pub fn to_lat_lng_deg(self) -> (f64, f64) {
        (self.lat, self.lng)
    }

    pub fn from_lat_lng_deg<LAT: Into<f64>, LNG: Into<f64>>(lat: LAT, lng: LNG) -> Self {
        let res = Self {
            lat: lat.into(),
            lng: lng.into(),
        };
        debug_assert!(res.is_valid());
        res
    }

    pub fn try_from_lat_lng_deg<LAT, LNG>(lat: LAT, lng: LNG) -> Option<Self>
    where
        LAT: Into<f64>,
        LNG: Into<f64>,
    {
        let (lat, lng) = (lat.into(), lng.into());
        if is_valid_lat_deg(lat) && is_valid_lng_deg(lng) {
            Some(Self { lat, lng })
        } else {
            None
        }
    }
}

impl TryFrom<(f64, f64)> for MapPoint {
    type Error = OutOfRange;
    fn try_from((lat, lng): (f64, f64)) -> Result<Self, Self::Error> {
        Self::try_from_lat_lng_deg(lat, lng).ok_or(OutOfRange { lat, lng })
    }
}

impl fmt::Display for MapPoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

// NaN fails both comparisons
fn is_valid_lat_deg(deg: f64) -> bool {
    (LAT_DEG_MIN..=LAT_DEG_MAX).contains(&deg)
}

fn is_valid_lng_deg(deg: f64) -> bool {
    (LNG_DEG_MIN..=LNG_DEG_MAX).contains(&deg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accept_boundary_values() {
        assert!(MapPoint::try_from_lat_lng_deg(90.0, 180.0).is_some());
        assert!(MapPoint::try_from_lat_lng_deg(-90.0, -180.0).is_some());
    }

    #[test]
    fn reject_out_of_range_and_nan() {
        assert!(MapPoint::try_from_lat_lng_deg(90.1, 0.0).is_none());
        assert!(MapPoint::try_from_lat_lng_deg(0.0, -180.5).is_none());
        assert!(MapPoint::try_from_lat_lng_deg(f64::NAN, 0.0).is_none());
        assert_eq!(
            MapPoint::try_from((100.0, 1.0)),
            Err(OutOfRange { lat: 100.0, lng: 1.0 })
        );
    }

    #[test]
    fn display_as_lat_lng() {
        let pos = MapPoint::from_lat_lng_deg(-23.5505, -46.6333);
        assert_eq!("-23.5505,-46.6333", pos.to_string());
    }
}
