/// Downscaled copies of source images
///
/// Two sizes are produced:
/// - List thumbnails (square, cropped to fill)
/// - Working previews used while the slider moves (aspect preserved)

use image::{imageops::FilterType, DynamicImage};
use std::sync::Arc;

use super::source::{ImageSource, SourceRef};
use crate::error::SourceError;

/// Square thumbnail of `size` pixels, cropped to fill
pub fn thumbnail(img: &DynamicImage, size: u32) -> DynamicImage {
    img.resize_to_fill(size, size, FilterType::Triangle)
}

/// Downscale so the longest edge is at most `max_edge`
///
/// Images that already fit are returned as-is.
pub fn working_preview(img: &DynamicImage, max_edge: u32) -> DynamicImage {
    if img.width() <= max_edge && img.height() <= max_edge {
        return img.clone();
    }
    img.resize(max_edge, max_edge, FilterType::Triangle)
}

/// Fetch a catalog image and shrink it to a list thumbnail
pub async fn generate_thumbnail(
    source: Arc<dyn ImageSource>,
    reference: SourceRef,
    size: u32,
) -> Result<DynamicImage, SourceError> {
    tokio::task::spawn_blocking(move || {
        let img = source.fetch(&reference)?;
        log::debug!("📸 Generated {}px thumbnail for {}", size, reference);
        Ok(thumbnail(&img, size))
    })
    .await
    .map_err(|e| SourceError::Join(e.to_string()))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    #[test]
    fn test_thumbnail_is_square() {
        let img = DynamicImage::ImageRgba8(RgbaImage::new(300, 120));
        let thumb = thumbnail(&img, 100);
        assert_eq!((thumb.width(), thumb.height()), (100, 100));
    }

    #[test]
    fn test_working_preview_keeps_aspect() {
        let img = DynamicImage::ImageRgba8(RgbaImage::new(960, 480));
        let preview = working_preview(&img, 480);
        assert_eq!((preview.width(), preview.height()), (480, 240));
    }

    #[test]
    fn test_small_images_are_untouched() {
        let img = DynamicImage::ImageRgba8(RgbaImage::new(64, 32));
        let preview = working_preview(&img, 480);
        assert_eq!((preview.width(), preview.height()), (64, 32));
    }
}
