use crate::entities::MapPoint;
use std::path::Path;

pub trait MapRenderer {
    /// Draws all points onto a map image and writes it to `path`.
    ///
    /// Callers never pass an empty slice.
    fn render(&self, points: &[MapPoint], path: &Path) -> anyhow::Result<()>;
}
