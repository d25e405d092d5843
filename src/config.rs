//! Application Configuration
//! Loads dashboard settings from a JSON file, falling back to defaults.

use crate::catalog::Region;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "TPQA_CONFIG";
/// Config file looked up in the working directory when the env var is unset.
pub const DEFAULT_CONFIG_FILE: &str = "tpqa.json";

/// Brand palette used by every chart unless overridden.
pub const DEFAULT_PALETTE: [&str; 4] = ["#F36E2C", "#01895C", "#035539", "#B74106"];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Invalid palette color '{0}' (expected #RRGGBB)")]
    InvalidColor(String),
    #[error("Palette must contain at least one color")]
    EmptyPalette,
    #[error("Chart size must be non-zero, got {0}x{1}")]
    InvalidChartSize(u32, u32),
}

/// User settings for the dashboard.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding one sub-directory per county (or the files directly).
    pub data_root: PathBuf,
    /// File name of the declined consent workbook.
    pub consent_file: String,
    pub default_region: Region,
    pub chart_width: u32,
    pub chart_height: u32,
    /// Hex colors, `#RRGGBB`.
    pub palette: Vec<String>,
    pub about_text: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_root: PathBuf::from("data"),
            consent_file: "Declined Consent.xlsx".to_string(),
            default_region: Region::Kisii,
            chart_width: 1400,
            chart_height: 900,
            palette: DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
            about_text: "Third Party Quality Assurance for Phase II for Households' Registration \
                         Under the Enhanced Single Registry for the Kenya Social Inclusion Project (KSEIP)"
                .to_string(),
        }
    }
}

impl AppConfig {
    /// Resolve the config location from the environment and load it.
    pub fn load_from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load(Path::new(&path)),
            None => Self::load_or_default(Path::new(DEFAULT_CONFIG_FILE)),
        }
    }

    /// Load a config file that must exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text, path)
    }

    /// Load a config file, or defaults when it does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    fn from_json(text: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: AppConfig = serde_json::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check the values that serde cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chart_width == 0 || self.chart_height == 0 {
            return Err(ConfigError::InvalidChartSize(
                self.chart_width,
                self.chart_height,
            ));
        }
        self.palette_rgb().map(|_| ())
    }

    /// Parsed palette colors.
    pub fn palette_rgb(&self) -> Result<Vec<(u8, u8, u8)>, ConfigError> {
        if self.palette.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        self.palette.iter().map(|c| parse_hex_color(c)).collect()
    }
}

/// Parse `#RRGGBB` (leading `#` optional).
pub fn parse_hex_color(text: &str) -> Result<(u8, u8, u8), ConfigError> {
    let hex = text.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(ConfigError::InvalidColor(text.to_string()));
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&hex[range], 16).map_err(|_| ConfigError::InvalidColor(text.to_string()))
    };
    Ok((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.palette_rgb().unwrap()[0], (0xF3, 0x6E, 0x2C));
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "data_root": "/srv/tpqa", "default_region": "TanaRiver", "chart_width": 800 }}"#
        )
        .unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.data_root, PathBuf::from("/srv/tpqa"));
        assert_eq!(config.default_region, Region::TanaRiver);
        assert_eq!(config.chart_width, 800);
        assert_eq!(config.chart_height, 900);
        assert_eq!(config.consent_file, "Declined Consent.xlsx");
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_or_default(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config.chart_width, 1400);
    }

    #[test]
    fn malformed_json_is_reported_with_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = AppConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn bad_palette_is_rejected() {
        let config = AppConfig {
            palette: vec!["#12345".to_string()],
            ..AppConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidColor(_))
        ));

        let config = AppConfig {
            palette: Vec::new(),
            ..AppConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::EmptyPalette)));
    }

    #[test]
    fn hex_parsing_accepts_missing_hash() {
        assert_eq!(parse_hex_color("01895C").unwrap(), (0x01, 0x89, 0x5C));
        assert!(parse_hex_color("#GG0000").is_err());
    }
}
