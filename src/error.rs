/// Error types for the application
///
/// Each collaborator has its own error enum. Errors that cross into UI
/// messages are flattened to strings there, since messages must be `Clone`.

use std::path::PathBuf;

/// Failure to resolve or decode a source image
#[derive(thiserror::Error, Debug)]
pub enum SourceError {
    /// The local file does not exist.
    #[error("Image not found: {0}")]
    NotFound(PathBuf),

    /// Reading the local file failed.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The remote request failed or returned an error status.
    #[error("Failed to fetch {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The bytes could not be decoded as an image.
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    /// The background task was cancelled or panicked.
    #[error("Task join error: {0}")]
    Join(String),
}

/// Failure to persist a rendered image to the album
#[derive(thiserror::Error, Debug)]
pub enum SaveError {
    /// Album database error.
    #[error("Album database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The album directory could not be created or written.
    #[error("Album storage error: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding the output file failed.
    #[error("Failed to encode image: {0}")]
    Encode(#[from] image::ImageError),

    /// The filter state could not be serialized.
    #[error("Failed to serialize filter state: {0}")]
    Settings(#[from] serde_json::Error),

    /// No filter is selected, so there is nothing to save.
    #[error("Nothing to save: no filter is applied")]
    NothingToSave,

    /// No data or home directory could be determined.
    #[error("Could not determine the album directory")]
    NoAlbumDir,

    /// The background task was cancelled or panicked.
    #[error("Task join error: {0}")]
    Join(String),
}

/// Failure to build the catalog
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum CatalogError {
    /// Two items share the same identifier.
    #[error("Duplicate catalog id: {0}")]
    DuplicateId(u32),

    /// An item has an empty display name.
    #[error("Catalog item {0} has an empty name")]
    EmptyName(u32),
}

/// Failure to load the configuration file
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The configuration file exists but could not be read.
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for [`crate::config::AppConfig`].
    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is outside its allowed range.
    #[error("Invalid config value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}
