use super::prelude::*;
use crate::gateways::map::MapRenderer;
use itertools::Itertools;
use std::path::Path;

/// Resolved points without duplicates in first-seen order.
pub fn collect_map_points<'a, I>(outcomes: I) -> Vec<MapPoint>
where
    I: IntoIterator<Item = &'a CoordinateOutcome>,
{
    outcomes
        .into_iter()
        .filter_map(CoordinateOutcome::map_point)
        .unique_by(|pos| (pos.lat().to_bits(), pos.lng().to_bits()))
        .collect()
}

/// Renders all resolved points of a batch.
///
/// Returns `false` without writing anything if there is nothing to draw.
pub fn render_map<R>(
    renderer: &R,
    outcomes: &[CoordinateOutcome],
    path: &Path,
) -> anyhow::Result<bool>
where
    R: MapRenderer + ?Sized,
{
    let points = collect_map_points(outcomes);
    if points.is_empty() {
        log::warn!("No coordinates available, skip rendering the map");
        return Ok(false);
    }
    log::info!(
        "Rendering {} distinct locations into {}",
        points.len(),
        path.display()
    );
    renderer.render(&points, path)?;
    Ok(true)
}
