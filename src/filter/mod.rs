/// Built-in image filters
///
/// This module handles:
/// - The closed set of filter kinds and which tunable parameters each one has
/// - Mapping one normalized intensity onto those parameters (adapter.rs)
/// - The pixel operations behind each kind (ops.rs)

pub mod adapter;
pub mod ops;

pub use adapter::{configure, render, render_scaled};

use serde::{Deserialize, Serialize};
use std::fmt;

/// A tunable parameter a filter may expose
///
/// Each parameter has its own natural domain, so the same slider value
/// lands on a different scale depending on which parameter it drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parameter {
    /// Strength of the effect (0.0 to 1.0)
    Intensity,
    /// Spatial extent in pixels (0.0 to 200.0)
    Radius,
    /// Block size or similar multiplier (0.0 to 10.0)
    Scale,
}

impl Parameter {
    pub const ALL: [Parameter; 3] = [Parameter::Intensity, Parameter::Radius, Parameter::Scale];

    pub fn name(self) -> &'static str {
        match self {
            Parameter::Intensity => "intensity",
            Parameter::Radius => "radius",
            Parameter::Scale => "scale",
        }
    }

    /// Multiplier applied to the normalized intensity for this parameter
    pub fn factor(self) -> f32 {
        match self {
            Parameter::Intensity => 1.0,
            Parameter::Radius => 200.0,
            Parameter::Scale => 10.0,
        }
    }

    /// Scale a normalized intensity into this parameter's domain
    pub fn scaled(self, intensity: f32) -> f32 {
        intensity * self.factor()
    }
}

/// The six supported built-in filters
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    Pixellate,
    Vignette,
    Edges,
    GaussianBlur,
    UnsharpMask,
    SepiaTone,
}

impl FilterKind {
    /// Every kind, in catalog order
    pub const ALL: [FilterKind; 6] = [
        FilterKind::Pixellate,
        FilterKind::Vignette,
        FilterKind::Edges,
        FilterKind::GaussianBlur,
        FilterKind::UnsharpMask,
        FilterKind::SepiaTone,
    ];

    /// Parameters this filter exposes
    pub fn parameters(self) -> &'static [Parameter] {
        match self {
            FilterKind::Pixellate => &[Parameter::Scale],
            FilterKind::Vignette => &[Parameter::Intensity, Parameter::Radius],
            FilterKind::Edges => &[Parameter::Intensity],
            FilterKind::GaussianBlur => &[Parameter::Radius],
            FilterKind::UnsharpMask => &[Parameter::Radius, Parameter::Intensity],
            FilterKind::SepiaTone => &[Parameter::Intensity],
        }
    }

    /// Check whether this filter exposes `parameter`
    pub fn supports(self, parameter: Parameter) -> bool {
        self.parameters().contains(&parameter)
    }

    /// Human-readable name, as shown in the catalog
    pub fn display_name(self) -> &'static str {
        match self {
            FilterKind::Pixellate => "Pixellate",
            FilterKind::Vignette => "Vignette",
            FilterKind::Edges => "Edges",
            FilterKind::GaussianBlur => "Gaussian Blur",
            FilterKind::UnsharpMask => "Unsharp Mask",
            FilterKind::SepiaTone => "Sepia Tone",
        }
    }

    /// Resolve the default filter for a catalog item from its display name
    ///
    /// Returns `None` for names outside the closed set; callers treat that
    /// as "no filter selected".
    pub fn from_display_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.display_name() == name.trim())
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_round_trip() {
        for kind in FilterKind::ALL {
            assert_eq!(FilterKind::from_display_name(kind.display_name()), Some(kind));
        }
    }

    #[test]
    fn test_unknown_name_selects_nothing() {
        assert_eq!(FilterKind::from_display_name("Posterize"), None);
        assert_eq!(FilterKind::from_display_name(""), None);
        // Names are matched exactly, not case-folded
        assert_eq!(FilterKind::from_display_name("sepia tone"), None);
    }

    #[test]
    fn test_parameter_applicability() {
        assert!(FilterKind::Pixellate.supports(Parameter::Scale));
        assert!(!FilterKind::Pixellate.supports(Parameter::Radius));

        assert!(FilterKind::GaussianBlur.supports(Parameter::Radius));
        assert!(!FilterKind::GaussianBlur.supports(Parameter::Intensity));

        assert!(FilterKind::SepiaTone.supports(Parameter::Intensity));
        assert!(!FilterKind::SepiaTone.supports(Parameter::Radius));
        assert!(!FilterKind::SepiaTone.supports(Parameter::Scale));

        assert!(FilterKind::UnsharpMask.supports(Parameter::Radius));
        assert!(FilterKind::UnsharpMask.supports(Parameter::Intensity));
    }

    #[test]
    fn test_parameter_scaling() {
        assert_eq!(Parameter::Intensity.scaled(0.25), 0.25);
        assert_eq!(Parameter::Radius.scaled(0.5), 100.0);
        assert_eq!(Parameter::Scale.scaled(1.0), 10.0);
        assert_eq!(Parameter::Radius.scaled(0.0), 0.0);
    }
}
