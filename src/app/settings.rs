use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::error::Result;

pub const MIN_OPACITY: f64 = 0.1;
pub const MAX_OPACITY: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    Dark,
    Light,
}

/// User preferences, overlaid key-by-key onto the defaults below when a
/// settings file exists on disk. Loaded once at startup, saved once at exit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default = "default_theme")]
    pub theme: ThemeName,

    #[serde(default = "default_font_size")]
    pub font_size: u32,

    /// Window size as "WxH".
    #[serde(default = "default_geometry")]
    pub geometry: String,

    #[serde(default = "default_opacity")]
    pub opacity: f64,
}

fn default_theme() -> ThemeName {
    ThemeName::Dark
}

fn default_font_size() -> u32 {
    14
}

fn default_geometry() -> String {
    "700x500".to_string()
}

fn default_opacity() -> f64 {
    0.87
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            font_size: default_font_size(),
            geometry: default_geometry(),
            opacity: default_opacity(),
        }
    }
}

impl Preferences {
    /// Load preferences from the default config path, or defaults if the
    /// file is missing or unreadable.
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load preferences from an explicit path. Missing file, unparsable
    /// content or I/O failure all fall back to the defaults silently.
    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str::<Preferences>(&contents) {
                Ok(prefs) => prefs.normalized(),
                Err(_) => Self::default(),
            },
            Err(_) => Self::default(),
        }
    }

    /// Save preferences to the default config path.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    /// Save preferences to an explicit path, creating the parent directory.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Get config file path (cross-platform)
    pub fn config_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("jotpad");
        path.push("settings.json");
        path
    }

    fn normalized(mut self) -> Self {
        self.opacity = self.opacity.clamp(MIN_OPACITY, MAX_OPACITY);
        self.font_size = self.font_size.max(1);
        self
    }
}

/// Parse a "WxH" geometry string. Anything malformed falls back to 700x500.
pub fn parse_geometry(geometry: &str) -> (i32, i32) {
    let parsed = geometry
        .split_once('x')
        .and_then(|(w, h)| Some((w.trim().parse::<i32>().ok()?, h.trim().parse::<i32>().ok()?)))
        .filter(|&(w, h)| w > 0 && h > 0);
    parsed.unwrap_or((700, 500))
}
