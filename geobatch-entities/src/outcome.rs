use crate::geo::MapPoint;

/// The externally observable result of resolving a single address.
///
/// Every kind of failure collapses into [`CoordinateOutcome::Unresolved`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CoordinateOutcome {
    Resolved(MapPoint),
    Unresolved,
}

impl CoordinateOutcome {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }

    pub fn map_point(&self) -> Option<MapPoint> {
        match self {
            Self::Resolved(pos) => Some(*pos),
            Self::Unresolved => None,
        }
    }

    pub fn to_lat_lng_deg(&self) -> Option<(f64, f64)> {
        self.map_point().map(MapPoint::to_lat_lng_deg)
    }
}

impl From<Option<MapPoint>> for CoordinateOutcome {
    fn from(from: Option<MapPoint>) -> Self {
        from.map(Self::Resolved).unwrap_or(Self::Unresolved)
    }
}
