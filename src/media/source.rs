/// Image source: resolve a catalog reference to decoded pixels
///
/// References are either remote URLs (fetched over HTTP) or local files.
/// Fetching is blocking, so the UI goes through [`fetch_image`], which moves
/// the work onto tokio's blocking pool.

use image::DynamicImage;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::task;

use crate::error::SourceError;

/// Where a catalog image lives
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SourceRef {
    /// `http://` or `https://` URL
    Url(String),
    /// Local file
    Path(PathBuf),
}

impl SourceRef {
    /// Interpret a config string: URLs by scheme, anything else as a path
    pub fn parse(reference: &str) -> Self {
        let trimmed = reference.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            SourceRef::Url(trimmed.to_string())
        } else {
            SourceRef::Path(PathBuf::from(trimmed))
        }
    }
}

impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceRef::Url(url) => f.write_str(url),
            SourceRef::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Anything that can turn a [`SourceRef`] into an image
pub trait ImageSource: Send + Sync {
    fn fetch(&self, reference: &SourceRef) -> Result<DynamicImage, SourceError>;
}

/// Default source: HTTP for URLs, the filesystem for paths
#[derive(Debug, Clone)]
pub struct DefaultSource {
    timeout: Duration,
}

impl DefaultSource {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    fn fetch_url(&self, url: &str) -> Result<DynamicImage, SourceError> {
        let http = |source: reqwest::Error| SourceError::Http {
            url: url.to_string(),
            source,
        };

        // The blocking client owns a runtime, so it is built per request
        // on the calling (blocking) thread
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(http)?;

        let bytes = client
            .get(url)
            .send()
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.bytes())
            .map_err(http)?;

        log::debug!("🌐 Downloaded {}KB from {}", bytes.len() / 1024, url);

        Ok(image::load_from_memory(&bytes)?)
    }
}

impl Default for DefaultSource {
    fn default() -> Self {
        Self::new(Duration::from_secs(20))
    }
}

impl ImageSource for DefaultSource {
    fn fetch(&self, reference: &SourceRef) -> Result<DynamicImage, SourceError> {
        match reference {
            SourceRef::Url(url) => self.fetch_url(url),
            SourceRef::Path(path) => load_file(path),
        }
    }
}

/// Decode a local image file
pub fn load_file(path: &Path) -> Result<DynamicImage, SourceError> {
    if !path.exists() {
        return Err(SourceError::NotFound(path.to_path_buf()));
    }

    let bytes = fs::read(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(image::load_from_memory(&bytes)?)
}

/// Fetch an image on the blocking pool
pub async fn fetch_image(
    source: Arc<dyn ImageSource>,
    reference: SourceRef,
) -> Result<DynamicImage, SourceError> {
    task::spawn_blocking(move || {
        let img = source.fetch(&reference)?;
        log::info!("📷 Loaded {}: {}x{}", reference, img.width(), img.height());
        Ok(img)
    })
    .await
    .map_err(|e| SourceError::Join(e.to_string()))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn write_png(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        RgbaImage::from_pixel(3, 2, Rgba([10, 20, 30, 255]))
            .save(&path)
            .unwrap();
        path
    }

    #[test]
    fn test_parse_reference() {
        assert_eq!(
            SourceRef::parse("https://i.stack.imgur.com/k9zOF.png"),
            SourceRef::Url("https://i.stack.imgur.com/k9zOF.png".to_string())
        );
        assert_eq!(
            SourceRef::parse(" /tmp/a.png "),
            SourceRef::Path(PathBuf::from("/tmp/a.png"))
        );
    }

    #[test]
    fn test_missing_file_is_recoverable_error() {
        let result = DefaultSource::default().fetch(&SourceRef::Path("/nonexistent/path.png".into()));
        assert!(matches!(result, Err(SourceError::NotFound(_))));
    }

    #[test]
    fn test_undecodable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        fs::write(&path, b"definitely not a png").unwrap();

        let result = load_file(&path);
        assert!(matches!(result, Err(SourceError::Decode(_))));
    }

    #[test]
    fn test_load_local_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "sample.png");

        let img = DefaultSource::default().fetch(&SourceRef::Path(path)).unwrap();
        assert_eq!((img.width(), img.height()), (3, 2));
    }

    #[tokio::test]
    async fn test_fetch_image_on_blocking_pool() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "async.png");

        let source: Arc<dyn ImageSource> = Arc::new(DefaultSource::default());
        let img = fetch_image(source.clone(), SourceRef::Path(path)).await.unwrap();
        assert_eq!(img.width(), 3);

        let missing = fetch_image(source, SourceRef::Path("/nonexistent.png".into())).await;
        assert!(missing.is_err());
    }
}
