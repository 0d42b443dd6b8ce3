/// State management module
///
/// This module handles all application state, including:
/// - The immutable sample catalog (catalog.rs)
/// - The per-detail-view filter session (session.rs)
/// - The saved photo album on disk (album.rs)

pub mod catalog;
pub mod session;
pub mod album;
