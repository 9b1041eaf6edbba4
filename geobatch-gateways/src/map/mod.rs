use anyhow::Result;
use geobatch_core::{
    entities::MapPoint,
    gateways::map::MapRenderer,
    util::projection::{fit_zoom, pixel_bounds, world_pixel, TILE_SIZE},
};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use std::path::Path;

mod tiles;

pub use self::tiles::{TileServer, OSM_TILE_URL};

const BACKGROUND: Rgba<u8> = Rgba([242, 239, 233, 255]);
const MARKER_FILL: Rgba<u8> = Rgba([220, 20, 20, 255]);
const MARKER_OUTLINE: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Renders points as markers on a Web Mercator raster image.
#[derive(Debug, Clone)]
pub struct RasterMap {
    pub width: u32,
    pub height: u32,
    /// Minimum distance of markers to the image border in pixels.
    pub padding: u32,
    pub max_zoom: u8,
    pub marker_radius: f64,
    pub basemap: Option<TileServer>,
}

impl Default for RasterMap {
    fn default() -> Self {
        Self {
            width: 800,
            height: 800,
            padding: 40,
            max_zoom: 17,
            marker_radius: 6.0,
            basemap: None,
        }
    }
}

impl MapRenderer for RasterMap {
    fn render(&self, points: &[MapPoint], path: &Path) -> Result<()> {
        let zoom = fit_zoom(points, self.width, self.height, self.padding, self.max_zoom);
        let (min_x, min_y, max_x, max_y) = pixel_bounds(points, zoom);
        let origin_x = ((min_x + max_x) / 2.0 - f64::from(self.width) / 2.0).round();
        let origin_y = ((min_y + max_y) / 2.0 - f64::from(self.height) / 2.0).round();
        log::debug!("Rendering map at zoom level {zoom}");

        let mut canvas = RgbaImage::from_pixel(self.width, self.height, BACKGROUND);
        if let Some(tiles) = &self.basemap {
            draw_basemap(&mut canvas, tiles, zoom, origin_x as i64, origin_y as i64);
        }
        for pos in points {
            let (x, y) = world_pixel(*pos, zoom);
            draw_marker(&mut canvas, x - origin_x, y - origin_y, self.marker_radius);
        }
        save(canvas, path)
    }
}

fn draw_basemap(
    canvas: &mut RgbaImage,
    tiles: &TileServer,
    zoom: u8,
    origin_x: i64,
    origin_y: i64,
) {
    let tile_size = i64::from(TILE_SIZE);
    let tile_count = 1_i64 << zoom;
    let first_x = origin_x.div_euclid(tile_size);
    let last_x = (origin_x + i64::from(canvas.width()) - 1).div_euclid(tile_size);
    let first_y = origin_y.div_euclid(tile_size).max(0);
    let last_y = (origin_y + i64::from(canvas.height()) - 1)
        .div_euclid(tile_size)
        .min(tile_count - 1);

    let mut failed = 0;
    for ty in first_y..=last_y {
        for tx in first_x..=last_x {
            let wrapped_x = tx.rem_euclid(tile_count);
            match tiles.fetch(zoom, wrapped_x as u32, ty as u32) {
                Ok(tile) => {
                    let left = tx * tile_size - origin_x;
                    let top = ty * tile_size - origin_y;
                    image::imageops::overlay(canvas, &tile, left, top);
                }
                Err(err) => {
                    if failed == 0 {
                        log::warn!("Failed to load basemap tile {zoom}/{wrapped_x}/{ty}: {err}");
                    }
                    failed += 1;
                }
            }
        }
    }
    if failed > 0 {
        log::warn!("{failed} basemap tile(s) are missing on the map");
    }
}

fn draw_marker(canvas: &mut RgbaImage, cx: f64, cy: f64, radius: f64) {
    let outline = radius + 1.5;
    let reach = outline.ceil() as i64;
    let (cx_px, cy_px) = (cx.round() as i64, cy.round() as i64);
    for dy in -reach..=reach {
        for dx in -reach..=reach {
            let (x, y) = (cx_px + dx, cy_px + dy);
            if x < 0 || y < 0 || x >= i64::from(canvas.width()) || y >= i64::from(canvas.height()) {
                continue;
            }
            let dist = ((dx * dx + dy * dy) as f64).sqrt();
            let color = if dist <= radius {
                MARKER_FILL
            } else if dist <= outline {
                MARKER_OUTLINE
            } else {
                continue;
            };
            canvas.put_pixel(x as u32, y as u32, color);
        }
    }
}

// Paths without a known image extension are written as PNG.
fn save(canvas: RgbaImage, path: &Path) -> Result<()> {
    let format = ImageFormat::from_path(path).unwrap_or(ImageFormat::Png);
    let image = DynamicImage::ImageRgba8(canvas);
    match format {
        ImageFormat::Jpeg => {
            DynamicImage::ImageRgb8(image.to_rgb8()).save_with_format(path, format)?
        }
        _ => image.save_with_format(path, format)?,
    }
    log::info!("Map written to {}", path.display());
    Ok(())
}
