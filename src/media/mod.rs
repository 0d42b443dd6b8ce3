/// Image loading module
///
/// This module handles:
/// - Resolving catalog references to decoded images (source.rs)
/// - Generating list thumbnails and working previews (preview.rs)

pub mod source;
pub mod preview;

pub use source::{DefaultSource, ImageSource, SourceRef};
