//! Spherical Web Mercator (EPSG:3857) as used by slippy map tiles.

use crate::entities::MapPoint;
use std::f64::consts::PI;

/// Equatorial radius of the WGS84 ellipsoid in meters.
pub const EARTH_RADIUS: f64 = 6_378_137.0;

/// Latitudes beyond this limit are clamped.
pub const MAX_LATITUDE: f64 = 85.051_128_78;

pub const TILE_SIZE: u32 = 256;

/// Planar coordinates in meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mercator {
    pub x: f64,
    pub y: f64,
}

pub fn project(pos: MapPoint) -> Mercator {
    let lat = pos.lat().clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    let lng = pos.lng().to_radians();
    Mercator {
        x: EARTH_RADIUS * lng,
        y: EARTH_RADIUS * (PI / 4.0 + lat / 2.0).tan().ln(),
    }
}

/// Pixel position in the world image at the given zoom level,
/// origin in the north-west corner.
pub fn world_pixel(pos: MapPoint, zoom: u8) -> (f64, f64) {
    let Mercator { x, y } = project(pos);
    let world_size = world_size(zoom);
    let half_circumference = PI * EARTH_RADIUS;
    let px = (x + half_circumference) / (2.0 * half_circumference) * world_size;
    let py = (half_circumference - y) / (2.0 * half_circumference) * world_size;
    (px, py)
}

pub fn world_size(zoom: u8) -> f64 {
    f64::from(TILE_SIZE) * 2f64.powi(i32::from(zoom))
}

/// The largest zoom level (up to `max_zoom`) at which all points fit
/// into a `width` × `height` image with `padding` pixels on each side.
pub fn fit_zoom(points: &[MapPoint], width: u32, height: u32, padding: u32, max_zoom: u8) -> u8 {
    let avail_w = f64::from(width.saturating_sub(2 * padding).max(1));
    let avail_h = f64::from(height.saturating_sub(2 * padding).max(1));
    let mut zoom = max_zoom;
    while zoom > 0 {
        let (min_x, min_y, max_x, max_y) = pixel_bounds(points, zoom);
        if max_x - min_x <= avail_w && max_y - min_y <= avail_h {
            break;
        }
        zoom -= 1;
    }
    zoom
}

/// `(min_x, min_y, max_x, max_y)` in world pixels.
pub fn pixel_bounds(points: &[MapPoint], zoom: u8) -> (f64, f64, f64, f64) {
    points.iter().map(|pos| world_pixel(*pos, zoom)).fold(
        (f64::MAX, f64::MAX, f64::MIN, f64::MIN),
        |(min_x, min_y, max_x, max_y), (x, y)| {
            (min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y))
        },
    )
}
