/// Application configuration
///
/// Loaded once at startup from the user's config directory:
/// - Linux: ~/.config/photo-filter/config.toml
/// - macOS: ~/Library/Application Support/photo-filter/config.toml
/// - Windows: %APPDATA%\photo-filter\config.toml
///
/// A missing file means "use the defaults". Every field is optional.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::error::ConfigError;

/// Directory name used under the platform config/data directories
pub const APP_DIR: &str = "photo-filter";

/// File format for saved photos
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    Jpeg,
}

impl OutputFormat {
    /// File extension for this format
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpg",
        }
    }

    pub fn image_format(self) -> image::ImageFormat {
        match self {
            OutputFormat::Png => image::ImageFormat::Png,
            OutputFormat::Jpeg => image::ImageFormat::Jpeg,
        }
    }
}

/// A catalog entry declared in the config file
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ItemConfig {
    /// Display name; also selects the default filter
    pub name: String,
    /// `http(s)://` URL or local file path
    pub source: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Slider position when a detail view opens (0.0 to 1.0)
    pub default_intensity: f32,

    /// Longest edge of the interactive preview, in pixels
    pub preview_max_edge: u32,

    /// Edge length of list thumbnails, in pixels
    pub thumbnail_size: u32,

    /// Timeout for fetching remote sample images
    pub http_timeout_secs: u64,

    /// Where saved photos go (defaults to the platform data directory)
    pub album_dir: Option<PathBuf>,

    pub output_format: OutputFormat,

    /// Optional folder whose images are appended to the catalog
    pub sample_dir: Option<PathBuf>,

    /// Replaces the built-in samples when non-empty
    pub items: Vec<ItemConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_intensity: 0.5,
            preview_max_edge: 480,
            thumbnail_size: 100,
            http_timeout_secs: 20,
            album_dir: None,
            output_format: OutputFormat::default(),
            sample_dir: None,
            items: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Load the config file, falling back to defaults when it is absent
    pub fn load() -> Result<Self, ConfigError> {
        let Some(path) = Self::config_path() else {
            log::warn!("⚠️  No config directory available, using defaults");
            return Ok(Self::default());
        };

        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let text = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;

        let config = Self::from_toml_str(&text)?;
        log::info!("⚙️  Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Path of the config file, if a config or home directory exists
    pub fn config_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir().or_else(dirs::home_dir)?;
        path.push(APP_DIR);
        path.push("config.toml");
        Some(path)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.default_intensity) {
            return Err(ConfigError::Invalid {
                field: "default_intensity",
                reason: format!("{} is outside 0.0..=1.0", self.default_intensity),
            });
        }
        if self.preview_max_edge == 0 {
            return Err(ConfigError::Invalid {
                field: "preview_max_edge",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.thumbnail_size == 0 {
            return Err(ConfigError::Invalid {
                field: "thumbnail_size",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.http_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "http_timeout_secs",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_default() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.default_intensity, 0.5);
    }

    #[test]
    fn test_partial_document() {
        let config = AppConfig::from_toml_str(
            r#"
            default_intensity = 0.25
            output_format = "jpeg"

            [[items]]
            name = "Sepia Tone"
            source = "/tmp/paris.jpg"
            "#,
        )
        .unwrap();

        assert_eq!(config.default_intensity, 0.25);
        assert_eq!(config.output_format, OutputFormat::Jpeg);
        assert_eq!(config.preview_max_edge, 480);
        assert_eq!(config.items.len(), 1);
        assert_eq!(config.items[0].name, "Sepia Tone");
    }

    #[test]
    fn test_rejects_out_of_range_intensity() {
        let err = AppConfig::from_toml_str("default_intensity = 1.5").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "default_intensity", .. }));
    }

    #[test]
    fn test_rejects_zero_preview() {
        let err = AppConfig::from_toml_str("preview_max_edge = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "preview_max_edge", .. }));
    }

    #[test]
    fn test_rejects_malformed_toml() {
        let err = AppConfig::from_toml_str("default_intensity = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
