/// Intensity-to-parameter adapter
///
/// The UI exposes a single 0-1 slider, but every filter measures its
/// parameters differently. `configure` forwards the slider value into each
/// parameter the chosen filter exposes, and `ConfiguredFilter::apply_scaled` runs
/// the filter on an input image.
///
/// Radius and scale are pixel distances at the source resolution. A
/// downscaled working copy is rendered with `pixel_scale` < 1 so that it
/// looks like a shrunk version of the full-resolution render.

use image::DynamicImage;

use super::{ops, FilterKind, Parameter};

/// Concrete parameter values assigned to a filter
///
/// A `None` field means the filter does not expose that parameter and the
/// adapter left it untouched.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FilterSettings {
    /// Intensity-like parameter (0.0 to 1.0)
    pub intensity: Option<f32>,
    /// Radius-like parameter (0.0 to 200.0)
    pub radius: Option<f32>,
    /// Scale-like parameter (0.0 to 10.0)
    pub scale: Option<f32>,
}

impl FilterSettings {
    /// Value assigned to `parameter`, if any
    pub fn get(&self, parameter: Parameter) -> Option<f32> {
        match parameter {
            Parameter::Intensity => self.intensity,
            Parameter::Radius => self.radius,
            Parameter::Scale => self.scale,
        }
    }

    fn set(&mut self, parameter: Parameter, value: f32) {
        match parameter {
            Parameter::Intensity => self.intensity = Some(value),
            Parameter::Radius => self.radius = Some(value),
            Parameter::Scale => self.scale = Some(value),
        }
    }
}

/// A filter with all of its exposed parameters assigned
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfiguredFilter {
    pub kind: FilterKind,
    pub settings: FilterSettings,
}

/// Parameterize `kind` from a normalized intensity
///
/// The intensity is clamped to [0, 1] before scaling. Each parameter is
/// assigned independently:
/// - intensity-like ← `intensity`
/// - radius-like ← `intensity * 200`
/// - scale-like ← `intensity * 10`
pub fn configure(kind: FilterKind, intensity: f32) -> ConfiguredFilter {
    let intensity = clamp_intensity(intensity);
    let mut settings = FilterSettings::default();

    for &parameter in kind.parameters() {
        settings.set(parameter, parameter.scaled(intensity));
    }

    ConfiguredFilter { kind, settings }
}

/// Configure and apply in one step
///
/// Returns `None` when there is nothing to show: no filter selected, or the
/// filter produced no output. Callers keep their previous render in that case.
pub fn render(kind: Option<FilterKind>, intensity: f32, input: &DynamicImage) -> Option<DynamicImage> {
    render_scaled(kind, intensity, input, 1.0)
}

/// Like [`render`], for an `input` that is `pixel_scale` times the size of
/// the image the intensity was chosen for
pub fn render_scaled(
    kind: Option<FilterKind>,
    intensity: f32,
    input: &DynamicImage,
    pixel_scale: f32,
) -> Option<DynamicImage> {
    configure(kind?, intensity).apply_scaled(input, pixel_scale)
}

/// Clamp a slider value into [0, 1]; NaN collapses to 0
pub fn clamp_intensity(intensity: f32) -> f32 {
    if intensity.is_nan() {
        0.0
    } else {
        intensity.clamp(0.0, 1.0)
    }
}

impl ConfiguredFilter {
    /// Run the filter on `input`, a copy of the source resized by `pixel_scale`
    ///
    /// An empty input (zero width or height) yields no output. Pixel
    /// distances (blur radius, block size) are multiplied by `pixel_scale`;
    /// the vignette radius is relative to the image size and stays as is.
    pub fn apply_scaled(&self, input: &DynamicImage, pixel_scale: f32) -> Option<DynamicImage> {
        if input.width() == 0 || input.height() == 0 {
            return None;
        }

        let pixel_scale = if pixel_scale.is_finite() && pixel_scale > 0.0 {
            pixel_scale
        } else {
            1.0
        };
        let s = &self.settings;
        let radius_px = s.radius.unwrap_or_default() * pixel_scale;

        let output = match self.kind {
            FilterKind::Pixellate => {
                ops::pixellate(input, s.scale.unwrap_or_default() * pixel_scale)
            }
            FilterKind::Vignette => ops::vignette(
                input,
                s.intensity.unwrap_or_default(),
                s.radius.unwrap_or_default(),
            ),
            FilterKind::Edges => ops::edges(input, s.intensity.unwrap_or_default()),
            FilterKind::GaussianBlur => ops::gaussian_blur(input, radius_px),
            FilterKind::UnsharpMask => {
                ops::unsharp_mask(input, radius_px, s.intensity.unwrap_or_default())
            }
            FilterKind::SepiaTone => ops::sepia_tone(input, s.intensity.unwrap_or_default()),
        };

        Some(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use image::{Rgba, RgbaImage};

    fn gradient(width: u32, height: u32) -> DynamicImage {
        let img = RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x * 16) as u8, (y * 16) as u8, ((x + y) * 8) as u8, 255])
        });
        DynamicImage::ImageRgba8(img)
    }

    #[test]
    fn test_gaussian_blur_half_intensity() {
        let filter = configure(FilterKind::GaussianBlur, 0.5);
        assert_eq!(filter.settings.radius, Some(100.0));
        assert_eq!(filter.settings.intensity, None);
        assert_eq!(filter.settings.scale, None);
    }

    #[test]
    fn test_sepia_touches_only_intensity() {
        let filter = configure(FilterKind::SepiaTone, 0.2);
        assert_eq!(filter.settings.intensity, Some(0.2));
        assert_eq!(filter.settings.radius, None);
        assert_eq!(filter.settings.scale, None);
    }

    #[test]
    fn test_scalings_for_every_kind() {
        for kind in FilterKind::ALL {
            for step in 0..=10 {
                let intensity = step as f32 / 10.0;
                let filter = configure(kind, intensity);

                for parameter in Parameter::ALL {
                    match filter.settings.get(parameter) {
                        Some(value) => {
                            assert!(kind.supports(parameter));
                            assert_relative_eq!(value, intensity * parameter.factor());
                        }
                        None => assert!(!kind.supports(parameter)),
                    }
                }
            }
        }
    }

    #[test]
    fn test_unsharp_mask_gets_both_parameters() {
        let filter = configure(FilterKind::UnsharpMask, 0.25);
        assert_eq!(filter.settings.radius, Some(50.0));
        assert_eq!(filter.settings.intensity, Some(0.25));
        assert_eq!(filter.settings.scale, None);
    }

    #[test]
    fn test_pixellate_scale() {
        let filter = configure(FilterKind::Pixellate, 0.3);
        assert_relative_eq!(filter.settings.scale.unwrap(), 3.0, epsilon = 1e-5);
    }

    #[test]
    fn test_out_of_range_intensity_is_clamped() {
        assert_eq!(configure(FilterKind::GaussianBlur, 1.7).settings.radius, Some(200.0));
        assert_eq!(configure(FilterKind::SepiaTone, -0.4).settings.intensity, Some(0.0));
        assert_eq!(configure(FilterKind::Pixellate, f32::NAN).settings.scale, Some(0.0));
    }

    #[test]
    fn test_render_is_deterministic() {
        let input = gradient(12, 9);
        for kind in FilterKind::ALL {
            let a = render(Some(kind), 0.02, &input).unwrap();
            let b = render(Some(kind), 0.02, &input).unwrap();
            assert_eq!(a.to_rgba8(), b.to_rgba8(), "{kind} is not deterministic");
        }
    }

    #[test]
    fn test_render_preserves_dimensions() {
        let input = gradient(10, 7);
        for kind in FilterKind::ALL {
            let out = render(Some(kind), 0.03, &input).unwrap();
            assert_eq!((out.width(), out.height()), (10, 7));
        }
    }

    #[test]
    fn test_render_without_filter_yields_nothing() {
        assert!(render(None, 0.5, &gradient(4, 4)).is_none());
    }

    #[test]
    fn test_empty_input_yields_nothing() {
        let empty = DynamicImage::ImageRgba8(RgbaImage::new(0, 0));
        assert!(render(Some(FilterKind::SepiaTone), 0.5, &empty).is_none());
    }

    #[test]
    fn test_unit_pixel_scale_matches_render() {
        let input = gradient(12, 12);
        for kind in FilterKind::ALL {
            let plain = render(Some(kind), 0.4, &input).unwrap();
            let scaled = render_scaled(Some(kind), 0.4, &input, 1.0).unwrap();
            assert_eq!(plain.to_rgba8(), scaled.to_rgba8());
        }
    }

    #[test]
    fn test_pixel_scale_shrinks_pixellate_blocks() {
        // scale 4.0 at full size, 2.0 on a half-size copy
        let input = gradient(8, 8);
        let half = render_scaled(Some(FilterKind::Pixellate), 0.4, &input, 0.5).unwrap();
        let direct = ops::pixellate(&input, 2.0);
        assert_eq!(half.to_rgba8(), direct.to_rgba8());
    }

    #[test]
    fn test_invalid_pixel_scale_falls_back_to_one() {
        let input = gradient(8, 8);
        let plain = render(Some(FilterKind::GaussianBlur), 0.01, &input).unwrap();
        for bad in [0.0, -2.0, f32::NAN] {
            let out = render_scaled(Some(FilterKind::GaussianBlur), 0.01, &input, bad).unwrap();
            assert_eq!(out.to_rgba8(), plain.to_rgba8());
        }
    }

    #[test]
    fn test_recompute_matches_fresh_render() {
        let input = gradient(8, 8);
        let _ = render(Some(FilterKind::SepiaTone), 0.3, &input);
        let moved = render(Some(FilterKind::SepiaTone), 0.9, &input).unwrap();
        let fresh = configure(FilterKind::SepiaTone, 0.9).apply_scaled(&input, 1.0).unwrap();
        assert_eq!(moved.to_rgba8(), fresh.to_rgba8());
    }
}
