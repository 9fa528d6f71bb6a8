//! Application settings, read from `config.toml` and overridable from the
//! command line.

use std::path::{Path, PathBuf};

use anyhow::Context;
use log::{debug, info};
use serde::{Deserialize, Serialize};

pub const APP_NAME: &str = "crop_web";
pub const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Fallback fetch address; `{url}` is replaced by the encoded image URL.
    pub proxy_template: String,
    /// JPEG quality of exported crops, 1-100.
    pub jpeg_quality: u8,
    /// Tallest the image is drawn on screen, in points.
    pub max_display_height: f32,
    /// Where exported crops are written.
    pub output_dir: PathBuf,
    pub dark_mode: bool,
    /// Initial state of the rule-of-thirds grid.
    pub rule_of_thirds: bool,
    /// How long a toast stays on screen.
    pub toast_seconds: f32,
    pub window_size: [f32; 2],
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            proxy_template: "https://corsproxy.io/?url={url}".to_string(),
            jpeg_quality: 92,
            max_display_height: 500.0,
            output_dir: dirs::download_dir()
                .or_else(dirs::home_dir)
                .unwrap_or_else(|| PathBuf::from(".")),
            dark_mode: true,
            rule_of_thirds: true,
            toast_seconds: 4.0,
            window_size: [900.0, 760.0],
        }
    }
}

impl AppConfig {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Read `path`, or the default location when `None`. A missing file at
    /// the default location yields the defaults; an explicit path must exist.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let (path, explicit) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => match Self::default_path() {
                Some(path) => (path, false),
                None => return Ok(Self::default()),
            },
        };

        if !explicit && !path.exists() {
            debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = Self::from_toml(&text)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        info!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(text)?;
        Ok(config.normalized())
    }

    /// Clamp values into their usable ranges.
    pub fn normalized(mut self) -> Self {
        self.jpeg_quality = self.jpeg_quality.clamp(1, 100);
        self.max_display_height = self.max_display_height.max(50.0);
        self.toast_seconds = self.toast_seconds.max(0.5);
        self
    }
}
