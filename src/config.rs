use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::fs;
use anyhow::{Context, Result};

/// Environment variable that overrides the configured project root.
pub const ROOT_ENV_VAR: &str = "PARK_TRACKER_ROOT";

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub data: DataConfig,
    pub map: MapConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DataConfig {
    pub project_root: Option<PathBuf>,
    pub stamps_csv: PathBuf,
    pub visits_csv: PathBuf,
    pub region_colors: PathBuf,
    pub visit_colors: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        DataConfig {
            project_root: None,
            stamps_csv: PathBuf::from("data/manual_tracking/national_park_passport_stamp_series.csv"),
            visits_csv: PathBuf::from("data/manual_tracking/national_park_visited_records.csv"),
            region_colors: PathBuf::from("config/region_colors.json"),
            visit_colors: PathBuf::from("config/visit_colors.json"),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MapConfig {
    pub zoom_start: u8,
    /// [latitude, longitude] used when no rows survive the filters.
    pub default_center: [f64; 2],
    pub height: u32,
    pub width: u32,
}

impl Default for MapConfig {
    fn default() -> Self {
        MapConfig {
            zoom_start: 5,
            default_center: [39.8283, -98.5795],
            height: 750,
            width: 1000,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8501,
        }
    }
}

impl AppConfig {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: AppConfig = toml::from_str(&content)
            .with_context(|| "Failed to parse TOML configuration")?;
        Ok(config)
    }

    /// Like `load_from_file`, but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            tracing::info!("No config file at {:?}, using defaults", path);
            Ok(AppConfig::default())
        }
    }
}

/// Input file locations, already resolved against the project root.
#[derive(Debug, Clone, PartialEq)]
pub struct DataPaths {
    pub root: PathBuf,
    pub stamps_csv: PathBuf,
    pub visits_csv: PathBuf,
    pub region_colors: PathBuf,
    pub visit_colors: PathBuf,
}

impl DataPaths {
    /// Precedence: explicit flag, then `PARK_TRACKER_ROOT`, then the config
    /// file's `project_root`, then the working directory.
    pub fn resolve(config: &DataConfig, cli_root: Option<&Path>) -> Result<Self> {
        let env_root = std::env::var_os(ROOT_ENV_VAR).map(PathBuf::from);
        let root = match (cli_root, env_root, &config.project_root) {
            (Some(root), _, _) => root.to_path_buf(),
            (None, Some(root), _) => root,
            (None, None, Some(root)) => root.clone(),
            (None, None, None) => std::env::current_dir()
                .context("Failed to determine the working directory")?,
        };
        Ok(Self::under(root, config))
    }

    pub fn under(root: PathBuf, config: &DataConfig) -> Self {
        DataPaths {
            stamps_csv: root.join(&config.stamps_csv),
            visits_csv: root.join(&config.visits_csv),
            region_colors: root.join(&config.region_colors),
            visit_colors: root.join(&config.visit_colors),
            root,
        }
    }
}
