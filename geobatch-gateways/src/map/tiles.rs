use anyhow::{anyhow, Result};
use image::RgbaImage;
use reqwest::blocking::Client;
use std::time::Duration;

pub const OSM_TILE_URL: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";

/// A slippy map tile server, e.g. OpenStreetMap.
#[derive(Debug, Clone)]
pub struct TileServer {
    url_template: String,
    client: Client,
}

impl TileServer {
    pub fn try_new(url_template: impl Into<String>, timeout: Duration) -> Result<Self> {
        let url_template = url_template.into();
        for placeholder in ["{z}", "{x}", "{y}"] {
            if !url_template.contains(placeholder) {
                return Err(anyhow!(
                    "Tile URL template '{url_template}' lacks the placeholder {placeholder}"
                ));
            }
        }
        // The OSM tile usage policy requires an identifying user agent.
        let client = Client::builder()
            .user_agent(concat!("geobatch/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            url_template,
            client,
        })
    }

    pub fn tile_url(&self, zoom: u8, x: u32, y: u32) -> String {
        self.url_template
            .replace("{z}", &zoom.to_string())
            .replace("{x}", &x.to_string())
            .replace("{y}", &y.to_string())
    }

    pub fn fetch(&self, zoom: u8, x: u32, y: u32) -> Result<RgbaImage> {
        let url = self.tile_url(zoom, x, y);
        log::debug!("Fetching tile {url}");
        let bytes = self.client.get(&url).send()?.error_for_status()?.bytes()?;
        Ok(image::load_from_memory(&bytes)?.to_rgba8())
    }
}
