use anyhow::{anyhow, Result};
use geobatch_gateways::map::OSM_TILE_URL;
use std::{env, fs, io::ErrorKind, path::Path, path::PathBuf, time::Duration};

mod raw;

const DEFAULT_CONFIG_FILE_NAME: &str = "geobatch.toml";

const ENV_NAME_OPENCAGE_API_KEY: &str = "OPENCAGE_API_KEY";

pub struct Config {
    pub geocoding: Geocoding,
    pub batch: Batch,
    pub map: Map,
}

impl Config {
    pub fn try_load_from_file_or_default<P: AsRef<Path>>(file_path: Option<P>) -> Result<Self> {
        let file_path: &Path = file_path.as_ref().map(|p| p.as_ref()).unwrap_or_else(|| {
            log::info!("No configuration file specified. load {DEFAULT_CONFIG_FILE_NAME}");
            Path::new(DEFAULT_CONFIG_FILE_NAME)
        });

        let raw_config = match fs::read_to_string(file_path) {
            Ok(cfg_string) => toml::from_str(&cfg_string)?,
            Err(err) => match err.kind() {
                ErrorKind::NotFound => {
                    log::info!(
                        "{} not found => load default configuration.",
                        file_path.display()
                    );
                    Ok(raw::Config::default())
                }
                _ => Err(err),
            }?,
        };
        let mut cfg = Self::try_from(raw_config)?;
        if let Ok(api_key) = env::var(ENV_NAME_OPENCAGE_API_KEY) {
            cfg.geocoding.override_opencage_api_key(api_key);
        }
        Ok(cfg)
    }
}

pub struct Geocoding {
    pub gateway: Option<GeocodingGateway>,
}

impl Geocoding {
    fn override_opencage_api_key(&mut self, new_key: String) {
        if let Some(GeocodingGateway::OpenCage { api_key }) = &mut self.gateway {
            log::debug!("Use OpenCage API key from {ENV_NAME_OPENCAGE_API_KEY}");
            *api_key = new_key;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeocodingGateway {
    OpenCage { api_key: String },
    OpenStreetMap { endpoint: Option<String> },
}

pub struct Batch {
    /// Name of the CSV column that contains the addresses.
    pub column: String,
    pub workers: usize,
}

pub struct Map {
    /// `None` if map rendering is disabled.
    pub output: Option<PathBuf>,
    pub width: u32,
    pub height: u32,
    pub basemap: Option<Basemap>,
}

pub struct Basemap {
    pub tile_url: String,
    pub timeout: Duration,
}

impl TryFrom<raw::Config> for Config {
    type Error = anyhow::Error;
    fn try_from(from: raw::Config) -> Result<Self> {
        let raw::Config {
            geocoding,
            gateway,
            batch,
            map,
        } = from;

        let geocoding = geocoding.unwrap_or_default();
        if geocoding.gateway.is_none() {
            log::warn!("No geocoding gateway selected in [geocoding]");
        }
        let geo_gateway = match geocoding.gateway {
            Some(gw_name) => {
                let toml_name = gw_name.toml_name();
                let gateway = gateway.unwrap_or_default();
                let gw = match gw_name {
                    raw::GeocodingGateway::Opencage => {
                        let raw::OpenCage { api_key } = gateway.opencage.ok_or_else(|| {
                            anyhow!("Missing '{toml_name}' gateway configuration")
                        })?;
                        GeocodingGateway::OpenCage {
                            api_key: api_key.unwrap_or_default(),
                        }
                    }
                    raw::GeocodingGateway::Openstreetmap => {
                        let raw::OpenStreetMap { endpoint } =
                            gateway.openstreetmap.unwrap_or_default();
                        GeocodingGateway::OpenStreetMap { endpoint }
                    }
                };
                Some(gw)
            }
            None => None,
        };
        let geocoding = Geocoding {
            gateway: geo_gateway,
        };

        let default_batch = raw::Batch::default();
        let raw::Batch { column, workers } = batch.unwrap_or_default();
        let column = column
            .or(default_batch.column)
            .ok_or_else(|| anyhow!("No address column defined"))?;
        let workers = workers.or(default_batch.workers).unwrap_or(1);
        if workers == 0 {
            return Err(anyhow!("The number of workers must be at least 1"));
        }
        let batch = Batch { column, workers };

        let default_map = raw::Map::default();
        let raw::Map {
            enabled,
            output,
            width,
            height,
            basemap,
            tile_url,
            tile_timeout,
        } = map.unwrap_or_default();

        let enabled = enabled.or(default_map.enabled).unwrap_or(false);
        let output = if enabled {
            output.or(default_map.output)
        } else {
            None
        };
        let width = width.or(default_map.width).unwrap_or(800);
        let height = height.or(default_map.height).unwrap_or(800);
        if width == 0 || height == 0 {
            return Err(anyhow!("Invalid map size {width}x{height}"));
        }
        let basemap = if basemap.or(default_map.basemap).unwrap_or(false) {
            let tile_url = tile_url
                .or(default_map.tile_url)
                .unwrap_or_else(|| OSM_TILE_URL.to_owned());
            let timeout = tile_timeout
                .or(default_map.tile_timeout)
                .unwrap_or(Duration::from_secs(10));
            Some(Basemap { tile_url, timeout })
        } else {
            None
        };
        let map = Map {
            output,
            width,
            height,
            basemap,
        };

        Ok(Self {
            geocoding,
            batch,
            map,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml: &str) -> Result<Config> {
        Config::try_from(toml::from_str::<raw::Config>(toml)?)
    }

    #[test]
    fn load_default_config() {
        let file: Option<&Path> = None;
        let _: Config = Config::try_load_from_file_or_default(file).unwrap();
    }

    #[test]
    fn default_values() {
        let cfg = Config::try_from(raw::Config::default()).unwrap();
        assert_eq!(
            Some(GeocodingGateway::OpenCage {
                api_key: String::new()
            }),
            cfg.geocoding.gateway
        );
        assert_eq!("ENDERECO", cfg.batch.column);
        assert_eq!(1, cfg.batch.workers);
        assert_eq!(Some(PathBuf::from("map.png")), cfg.map.output);
        let basemap = cfg.map.basemap.unwrap();
        assert_eq!(Duration::from_secs(10), basemap.timeout);
    }

    #[test]
    fn empty_file_falls_back_to_defaults_per_section() {
        let cfg = parse("").unwrap();
        assert_eq!(
            Some(GeocodingGateway::OpenCage {
                api_key: String::new()
            }),
            cfg.geocoding.gateway
        );
        assert_eq!("ENDERECO", cfg.batch.column);
        assert!(cfg.map.output.is_some());
    }

    #[test]
    fn select_openstreetmap() {
        let cfg = parse(
            r#"
            [geocoding]
            gateway = "openstreetmap"

            [gateway.openstreetmap]
            endpoint = "https://nominatim.example.org/"
            "#,
        )
        .unwrap();
        assert_eq!(
            Some(GeocodingGateway::OpenStreetMap {
                endpoint: Some("https://nominatim.example.org/".into())
            }),
            cfg.geocoding.gateway
        );
    }

    #[test]
    fn override_api_key() {
        let mut cfg = Config::try_from(raw::Config::default()).unwrap();
        cfg.geocoding.override_opencage_api_key("secret".into());
        assert_eq!(
            Some(GeocodingGateway::OpenCage {
                api_key: "secret".into()
            }),
            cfg.geocoding.gateway
        );
    }

    #[test]
    fn missing_geocoding_section_keeps_api_key_override() {
        let mut cfg = parse("[batch]\ncolumn = \"ADDRESS\"").unwrap();
        cfg.geocoding.override_opencage_api_key("secret".into());
        assert_eq!(
            Some(GeocodingGateway::OpenCage {
                api_key: "secret".into()
            }),
            cfg.geocoding.gateway
        );
    }

    #[test]
    fn empty_geocoding_section_disables_the_client() {
        let cfg = parse("[geocoding]").unwrap();
        assert!(cfg.geocoding.gateway.is_none());
    }

    #[test]
    fn default_basemap_uses_openstreetmap_tiles() {
        let cfg = Config::try_from(raw::Config::default()).unwrap();
        assert_eq!(OSM_TILE_URL, cfg.map.basemap.unwrap().tile_url);
        let cfg = parse("[map]\ntile-url = \"https://tiles.example.org/{z}/{x}/{y}.png\"").unwrap();
        assert_eq!(
            "https://tiles.example.org/{z}/{x}/{y}.png",
            cfg.map.basemap.unwrap().tile_url
        );
    }

    #[test]
    fn disable_map() {
        let cfg = parse("[map]\nenabled = false").unwrap();
        assert!(cfg.map.output.is_none());
    }

    #[test]
    fn disable_basemap() {
        let cfg = parse("[map]\nbasemap = false").unwrap();
        assert!(cfg.map.basemap.is_none());
    }

    #[test]
    fn reject_zero_workers() {
        assert!(parse("[batch]\nworkers = 0").is_err());
    }

    #[test]
    fn reject_invalid_map_size() {
        assert!(parse("[map]\nwidth = 0").is_err());
    }
}
