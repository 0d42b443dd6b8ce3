/// Screens of the application
///
/// - `list.rs` - the catalog with thumbnails
/// - `detail.rs` - preview, filter picker, intensity slider and save

pub mod list;
pub mod detail;

use iced::widget::image::Handle;
use image::DynamicImage;

/// Convert a decoded image into an iced image handle
pub fn to_handle(img: &DynamicImage) -> Handle {
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Handle::from_rgba(width, height, rgba.into_raw())
}
