use crate::api::DEFAULT_BASE_URL;
use crate::dashboard::gesture::{ResizeMetrics, GRID_COLUMNS, ROW_HEIGHT_PX};
use crate::dashboard::layout::GridMetrics;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_SETTINGS_PATH: &str = "settings.json";
/// Environment variable that overrides where settings are read from.
pub const SETTINGS_ENV: &str = "VIEWERSHIP_SETTINGS";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Settings {
    /// Base URL of the statistics backend.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    /// When enabled the application initialises the logger at debug level.
    /// Defaults to `false` when the field is missing in the settings file.
    #[serde(default)]
    pub debug_logging: bool,
    /// Optional file that receives a copy of the log output.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
    /// Directory CSV exports are written to. Created on first export.
    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,
    #[serde(default = "default_grid_columns")]
    pub grid_columns: usize,
    /// Pixel height of one resize step.
    #[serde(default = "default_row_height")]
    pub row_height: f32,
    /// Last known window size. If absent, a default size is used.
    #[serde(default = "default_window_size")]
    pub window_size: Option<(i32, i32)>,
    /// Extra font loaded at startup, e.g. a CJK font for Korean titles.
    #[serde(default)]
    pub font_path: Option<PathBuf>,
}

fn default_api_base_url() -> String {
    DEFAULT_BASE_URL.into()
}

fn default_request_timeout() -> u64 {
    10
}

fn default_export_dir() -> PathBuf {
    PathBuf::from("exports")
}

fn default_grid_columns() -> usize {
    GRID_COLUMNS
}

fn default_row_height() -> f32 {
    ROW_HEIGHT_PX
}

fn default_window_size() -> Option<(i32, i32)> {
    Some((1440, 900))
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            request_timeout_secs: default_request_timeout(),
            debug_logging: false,
            log_file: None,
            export_dir: default_export_dir(),
            grid_columns: default_grid_columns(),
            row_height: default_row_height(),
            window_size: default_window_size(),
            font_path: None,
        }
    }
}

impl Settings {
    /// Settings path, honouring the `VIEWERSHIP_SETTINGS` override.
    pub fn path_from_env() -> String {
        std::env::var(SETTINGS_ENV)
            .ok()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SETTINGS_PATH.into())
    }

    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &str) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn grid_metrics(&self) -> GridMetrics {
        let defaults = GridMetrics::default();
        GridMetrics {
            max_columns: if self.grid_columns == 0 {
                defaults.max_columns
            } else {
                self.grid_columns
            },
            ..defaults
        }
    }

    pub fn resize_metrics(&self) -> ResizeMetrics {
        let defaults = ResizeMetrics::default();
        ResizeMetrics {
            columns: if self.grid_columns == 0 {
                defaults.columns
            } else {
                self.grid_columns
            },
            row_height: if self.row_height > 0.0 {
                self.row_height
            } else {
                defaults.row_height
            },
        }
    }
}
