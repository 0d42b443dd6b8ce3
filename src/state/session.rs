/// Per-detail-view filter session
///
/// A `DetailSession` owns everything the detail screen shows: the selected
/// filter, the slider intensity, the loaded image, and the rendered output.
/// The output is always recomputed from the input, never patched in place.
///
/// Lifecycle: `Unconfigured -> Configured(kind) -> Rendered(kind)`.

use image::DynamicImage;
use serde::{Deserialize, Serialize};

use super::catalog::CatalogItem;
use crate::filter::{self, adapter::clamp_intensity, FilterKind};
use crate::media::preview;

/// Which filter is applied and how strongly
///
/// Serialized to JSON alongside each saved photo.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct FilterState {
    /// Selected filter, `None` when nothing is selected
    pub kind: Option<FilterKind>,
    /// Normalized strength (0.0 to 1.0)
    pub intensity: f32,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            kind: None,
            intensity: 0.5,
        }
    }
}

impl FilterState {
    pub fn new(kind: Option<FilterKind>, intensity: f32) -> Self {
        Self {
            kind,
            intensity: clamp_intensity(intensity),
        }
    }

    /// Convert to JSON string for database storage
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse from JSON string (from database)
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Where a session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No filter applied yet (image may still be loading)
    Unconfigured,
    /// A filter is selected but has not produced output
    Configured(FilterKind),
    /// The current output reflects this filter
    Rendered(FilterKind),
}

pub struct DetailSession {
    item: CatalogItem,
    state: FilterState,
    phase: Phase,
    /// Full-resolution source, used when saving
    input: Option<DynamicImage>,
    /// Downscaled source, used while the slider moves
    preview_input: Option<DynamicImage>,
    rendered: Option<DynamicImage>,
    /// Preview width over input width
    pixel_scale: f32,
    /// Why the last load failed, if it did
    load_error: Option<String>,
    preview_max_edge: u32,
}

impl DetailSession {
    /// Start a session for `item`; the image arrives later via [`Self::load`]
    pub fn new(item: CatalogItem, default_intensity: f32, preview_max_edge: u32) -> Self {
        Self {
            item,
            state: FilterState::new(None, default_intensity),
            phase: Phase::Unconfigured,
            input: None,
            preview_input: None,
            rendered: None,
            pixel_scale: 1.0,
            load_error: None,
            preview_max_edge,
        }
    }

    /// Attach the decoded image and select the item's default filter
    pub fn load(&mut self, image: DynamicImage) {
        let working = preview::working_preview(&image, self.preview_max_edge);
        self.pixel_scale = if image.width() == 0 {
            1.0
        } else {
            working.width() as f32 / image.width() as f32
        };
        self.preview_input = Some(working);
        self.input = Some(image);
        self.rendered = None;
        self.load_error = None;

        // The item's display name doubles as its default filter
        let name = self.item.name.clone();
        if !self.select_by_name(&name) {
            log::info!("No filter is selected for {}", name);
        }
    }

    /// Record that the image could not be fetched or decoded
    ///
    /// The session drops any image it had and goes back to `Unconfigured`;
    /// the filter choice and intensity are kept.
    pub fn load_failed(&mut self, reason: impl Into<String>) {
        let reason = reason.into();
        log::error!("⚠️  Could not load {}: {}", self.item.name, reason);

        self.input = None;
        self.preview_input = None;
        self.rendered = None;
        self.pixel_scale = 1.0;
        self.phase = Phase::Unconfigured;
        self.load_error = Some(reason);
    }

    /// Switch to `kind` and re-render
    pub fn select_filter(&mut self, kind: FilterKind) {
        self.state.kind = Some(kind);
        self.phase = Phase::Configured(kind);
        self.recompute();
    }

    /// Switch filters by display name
    ///
    /// Names outside the supported set are ignored and the previous render
    /// stays in place. Returns whether a filter was selected.
    pub fn select_by_name(&mut self, name: &str) -> bool {
        match FilterKind::from_display_name(name) {
            Some(kind) => {
                log::info!("🎨 {} filter", kind);
                self.select_filter(kind);
                true
            }
            None => {
                log::debug!("Unknown filter {:?}, keeping current render", name);
                false
            }
        }
    }

    /// Move the slider and re-render
    pub fn set_intensity(&mut self, intensity: f32) {
        self.state.intensity = clamp_intensity(intensity);
        self.recompute();
    }

    /// Render the preview from scratch for the current state
    ///
    /// Pixel distances are shrunk with the preview, so the result matches a
    /// downscaled full-resolution render. If the filter yields nothing, the
    /// previous render is kept.
    fn recompute(&mut self) {
        let (Some(kind), Some(input)) = (self.state.kind, self.preview_input.as_ref()) else {
            return;
        };

        let output = filter::render_scaled(Some(kind), self.state.intensity, input, self.pixel_scale);
        if let Some(output) = output {
            self.rendered = Some(output);
            self.phase = Phase::Rendered(kind);
        }
    }

    /// Full-resolution source image, once loaded
    pub fn input(&self) -> Option<&DynamicImage> {
        self.input.as_ref()
    }

    pub fn item(&self) -> &CatalogItem {
        &self.item
    }

    pub fn state(&self) -> FilterState {
        self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_loaded(&self) -> bool {
        self.input.is_some()
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub fn rendered(&self) -> Option<&DynamicImage> {
        self.rendered.as_ref()
    }

    /// What the preview pane should show: the render, else the plain source
    pub fn display_image(&self) -> Option<&DynamicImage> {
        self.rendered.as_ref().or(self.preview_input.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::SourceRef;
    use image::{Rgba, RgbaImage};

    fn item(name: &str) -> CatalogItem {
        CatalogItem {
            id: 0,
            name: name.to_string(),
            source: SourceRef::Path("unused.png".into()),
        }
    }

    fn gradient() -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_fn(16, 12, |x, y| {
            Rgba([(x * 15) as u8, (y * 20) as u8, 90, 255])
        }))
    }

    #[test]
    fn test_filter_state_serialization() {
        let state = FilterState::new(Some(FilterKind::UnsharpMask), 0.75);
        let json = state.to_json().unwrap();
        assert_eq!(json, r#"{"kind":"unsharp_mask","intensity":0.75}"#);
        assert_eq!(FilterState::from_json(&json).unwrap(), state);
    }

    #[test]
    fn test_lifecycle() {
        let mut session = DetailSession::new(item("Sepia Tone"), 0.5, 480);
        assert_eq!(session.phase(), Phase::Unconfigured);
        assert!(session.display_image().is_none());

        session.load(gradient());
        assert_eq!(session.phase(), Phase::Rendered(FilterKind::SepiaTone));
        assert_eq!(session.state(), FilterState::new(Some(FilterKind::SepiaTone), 0.5));
        assert!(session.rendered().is_some());
    }

    #[test]
    fn test_load_failure_leaves_session_unconfigured() {
        let mut session = DetailSession::new(item("Gaussian Blur"), 0.5, 480);
        session.load_failed("decode error: not a png");

        assert_eq!(session.phase(), Phase::Unconfigured);
        assert!(!session.is_loaded());
        assert!(session.display_image().is_none());
        assert_eq!(session.load_error(), Some("decode error: not a png"));

        // Moving the slider without an image renders nothing
        session.set_intensity(0.8);
        assert!(session.rendered().is_none());
    }

    #[test]
    fn test_load_failure_after_load_drops_image() {
        let mut session = DetailSession::new(item("Sepia Tone"), 0.5, 480);
        session.load(gradient());
        assert!(session.rendered().is_some());

        session.load_failed("timed out");
        assert_eq!(session.phase(), Phase::Unconfigured);
        assert!(session.rendered().is_none());
        assert!(session.input().is_none());

        // A later successful load clears the error
        session.load(gradient());
        assert_eq!(session.load_error(), None);
        assert_eq!(session.phase(), Phase::Rendered(FilterKind::SepiaTone));
    }

    #[test]
    fn test_unknown_item_name_leaves_session_unconfigured() {
        let mut session = DetailSession::new(item("holiday"), 0.5, 480);
        session.load(gradient());

        assert_eq!(session.phase(), Phase::Unconfigured);
        assert!(session.rendered().is_none());
        // The plain source is still shown
        assert_eq!(session.display_image().unwrap().width(), 16);
    }

    #[test]
    fn test_unsupported_selection_keeps_render() {
        let mut session = DetailSession::new(item("Edges"), 0.5, 480);
        session.load(gradient());
        let before = session.rendered().cloned();

        assert!(!session.select_by_name("Posterize"));
        assert_eq!(session.rendered().cloned(), before);
        assert_eq!(session.phase(), Phase::Rendered(FilterKind::Edges));
    }

    #[test]
    fn test_intensity_change_recomputes_from_scratch() {
        let mut session = DetailSession::new(item("Sepia Tone"), 0.3, 480);
        session.load(gradient());
        session.set_intensity(0.9);

        let fresh = filter::render(Some(FilterKind::SepiaTone), 0.9, &gradient()).unwrap();
        assert_eq!(session.rendered().unwrap().to_rgba8(), fresh.to_rgba8());
        assert_eq!(session.state().intensity, 0.9);
    }

    #[test]
    fn test_intensity_is_clamped() {
        let mut session = DetailSession::new(item("Vignette"), 0.5, 480);
        session.set_intensity(3.0);
        assert_eq!(session.state().intensity, 1.0);
        // Not loaded yet, so nothing rendered
        assert!(session.rendered().is_none());
    }

    #[test]
    fn test_switching_filters() {
        let mut session = DetailSession::new(item("Sepia Tone"), 0.05, 480);
        session.load(gradient());

        assert!(session.select_by_name("Pixellate"));
        assert_eq!(session.phase(), Phase::Rendered(FilterKind::Pixellate));
        assert_eq!(session.state().kind, Some(FilterKind::Pixellate));
    }

    #[test]
    fn test_preview_is_downscaled_but_input_is_full_size() {
        let mut session = DetailSession::new(item("Sepia Tone"), 0.5, 8);
        session.load(gradient());

        let preview = session.rendered().unwrap();
        assert_eq!((preview.width(), preview.height()), (8, 6));

        let state = session.state();
        let full = filter::render(state.kind, state.intensity, session.input().unwrap()).unwrap();
        assert_eq!((full.width(), full.height()), (16, 12));
    }

    #[test]
    fn test_preview_blur_is_scaled_to_preview_pixels() {
        let source = DynamicImage::ImageRgba8(RgbaImage::from_fn(64, 64, |x, _| {
            if (x / 16) % 2 == 0 { Rgba([0, 0, 0, 255]) } else { Rgba([255, 255, 255, 255]) }
        }));
        let mut session = DetailSession::new(item("Gaussian Blur"), 0.02, 16);
        session.load(source.clone());

        // radius 4 on the 64px source is radius 1 on the 16px preview
        let working = preview::working_preview(&source, 16);
        let expected = filter::ops::gaussian_blur(&working, 1.0);
        assert_eq!(session.rendered().unwrap().to_rgba8(), expected.to_rgba8());
    }
}
