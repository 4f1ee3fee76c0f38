pub mod credentials;

use crate::error::{PlacesError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub use credentials::read_api_key;

pub const CONFIG_FILE_NAME: &str = "nearby-places.toml";

/// Built-in defaults for a run with no config file and no flags.
pub mod defaults {
    pub const KEY_FILE: &str = "google_api_key.txt";
    pub const LATITUDE: f64 = 47.685141048898465;
    pub const LONGITUDE: f64 = -122.35545207468901;
    pub const RADIUS_METERS: f64 = 807.72;
    pub const COLLECT_OUTPUT: &str = "nearby_places.json";
    pub const MAX_PAGES: u32 = 1;
    pub const PREVIEW_LIMIT: usize = 10;

    pub const TIMEOUT_SECS: u64 = 30;

    pub const EXPORT_INPUT_DIR: &str = ".";
    pub const EXPORT_OUTPUT: &str = "combined_data.xlsx";
}

fn default_key_file() -> PathBuf {
    PathBuf::from(defaults::KEY_FILE)
}
fn default_latitude() -> f64 {
    defaults::LATITUDE
}
fn default_longitude() -> f64 {
    defaults::LONGITUDE
}
fn default_radius() -> f64 {
    defaults::RADIUS_METERS
}
fn default_collect_output() -> PathBuf {
    PathBuf::from(defaults::COLLECT_OUTPUT)
}
fn default_max_pages() -> u32 {
    defaults::MAX_PAGES
}
fn default_preview_limit() -> usize {
    defaults::PREVIEW_LIMIT
}
fn default_base_url() -> String {
    crate::api::places::DEFAULT_BASE_URL.to_string()
}
fn default_timeout_secs() -> u64 {
    defaults::TIMEOUT_SECS
}
fn default_input_dir() -> PathBuf {
    PathBuf::from(defaults::EXPORT_INPUT_DIR)
}
fn default_export_output() -> PathBuf {
    PathBuf::from(defaults::EXPORT_OUTPUT)
}
fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize, Default)]
pub struct FileConfig {
    #[serde(default)]
    pub verbose: bool,
    #[serde(default)]
    pub collect: CollectConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CollectConfig {
    #[serde(default = "default_key_file")]
    pub key_file: PathBuf,
    #[serde(default = "default_latitude")]
    pub latitude: f64,
    #[serde(default = "default_longitude")]
    pub longitude: f64,
    #[serde(default = "default_radius")]
    pub radius_meters: f64,
    #[serde(default)]
    pub place_type: Option<String>,
    #[serde(default)]
    pub keyword: Option<String>,
    #[serde(default)]
    pub min_price: Option<u8>,
    #[serde(default)]
    pub max_price: Option<u8>,
    #[serde(default)]
    pub open_now: bool,
    #[serde(default = "default_collect_output")]
    pub output: PathBuf,
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
    #[serde(default = "default_preview_limit")]
    pub preview_limit: usize,
}

impl Default for CollectConfig {
    fn default() -> Self {
        Self {
            key_file: default_key_file(),
            latitude: default_latitude(),
            longitude: default_longitude(),
            radius_meters: default_radius(),
            place_type: None,
            keyword: None,
            min_price: None,
            max_price: None,
            open_now: false,
            output: default_collect_output(),
            max_pages: default_max_pages(),
            preview_limit: default_preview_limit(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ExportConfig {
    #[serde(default = "default_input_dir")]
    pub input_dir: PathBuf,
    #[serde(default = "default_export_output")]
    pub output: PathBuf,
    #[serde(default = "default_true")]
    pub source_column: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            input_dir: default_input_dir(),
            output: default_export_output(),
            source_column: true,
        }
    }
}

impl FileConfig {
    /// Load an explicitly named config file. A missing or malformed file is an error.
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(PlacesError::config(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        let contents = std::fs::read_to_string(path).map_err(|e| PlacesError::io(path, e))?;
        Self::from_toml(&contents).map_err(|e| match e {
            PlacesError::Config(msg) => {
                PlacesError::config(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents)
            .map_err(|e| PlacesError::config(format!("failed to parse config: {}", e)))
    }

    /// Search the usual locations and load the first config file that exists.
    ///
    /// A discovered file that cannot be read or parsed is an error, not skipped.
    pub fn load() -> Result<Option<Self>> {
        Self::load_from_paths(&get_config_paths())
    }

    pub fn load_from_paths(paths: &[PathBuf]) -> Result<Option<Self>> {
        match paths.iter().find(|p| p.is_file()) {
            Some(path) => {
                let config = Self::from_path(path)?;
                log::debug!("Loaded config from {}", path.display());
                Ok(Some(config))
            }
            None => Ok(None),
        }
    }

    /// Explicit path if given, otherwise the first discovered file, otherwise defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_path(path),
            None => Ok(Self::load()?.unwrap_or_default()),
        }
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from(CONFIG_FILE_NAME));
    paths.push(PathBuf::from(format!(".{}", CONFIG_FILE_NAME)));

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("nearby-places").join("config.toml"));
        paths.push(config_dir.join(CONFIG_FILE_NAME));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(format!(".{}", CONFIG_FILE_NAME)));
        paths.push(home.join(".config").join("nearby-places").join("config.toml"));
    }

    paths
}
