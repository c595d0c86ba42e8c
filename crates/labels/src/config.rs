//! Placement configuration
//!
//! The footprint of a label is a pure function of its character count and
//! class. This is layout policy, not an estimate of real font metrics: the
//! same string always reserves the same box on every machine.

use crate::candidate::PriorityClass;

/// Footprint constants for one label class
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LabelMetrics {
    /// Width reserved per character, in pixels
    pub char_width: f64,

    /// Horizontal padding added to the text width, in pixels
    pub padding: f64,

    /// Box height in pixels
    pub height: f64,
}

impl LabelMetrics {
    /// Footprint `(width, height)` of `text`
    pub fn footprint(&self, text: &str) -> (f64, f64) {
        let chars = text.chars().count() as f64;
        (chars * self.char_width + self.padding, self.height)
    }
}

/// Configuration for label placement
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Metrics for area labels
    pub primary: LabelMetrics,

    /// Metrics for edge dimension labels
    pub secondary: LabelMetrics,

    /// Distance of the inner ring of candidate offsets, in pixels
    pub near_radius: f64,

    /// Distance of the outer cardinal offsets, in pixels
    pub far_radius: f64,

    /// Clearance kept around every placed label, in pixels
    pub margin: f64,

    /// Maximum jitter on each axis when no offset is free, in pixels
    ///
    /// Zero, negative or non-finite values place fallbacks on the anchor.
    pub jitter_radius: f64,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            primary: LabelMetrics {
                char_width: 7.5,
                padding: 12.0,
                height: 26.0,
            },
            secondary: LabelMetrics {
                char_width: 6.0,
                padding: 8.0,
                height: 18.0,
            },
            near_radius: 28.0,
            far_radius: 56.0,
            margin: 4.0,
            jitter_radius: 24.0,
        }
    }
}

impl PlacementConfig {
    /// Metrics for a label class
    pub fn metrics(&self, class: PriorityClass) -> &LabelMetrics {
        match class {
            PriorityClass::Primary => &self.primary,
            PriorityClass::Secondary => &self.secondary,
        }
    }

    /// Footprint `(width, height)` of `text` rendered in `class`
    pub fn footprint(&self, text: &str, class: PriorityClass) -> (f64, f64) {
        self.metrics(class).footprint(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_footprints() {
        let config = PlacementConfig::default();
        assert_eq!(config.footprint("4 K - 18.84 M", PriorityClass::Primary), (109.5, 26.0));
        assert_eq!(config.footprint("29k - 4.5ft", PriorityClass::Secondary), (74.0, 18.0));
        assert_eq!(config.footprint("", PriorityClass::Secondary), (8.0, 18.0));
    }

    #[test]
    fn test_footprint_counts_characters_not_bytes() {
        let config = PlacementConfig::default();
        let (width, _) = config.footprint("۱۲ مرلہ", PriorityClass::Secondary);
        assert_eq!(width, 7.0 * 6.0 + 8.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: PlacementConfig =
            serde_json::from_str(r#"{ "margin": 6.0, "jitter_radius": 10.0 }"#).unwrap();
        assert_eq!(config.margin, 6.0);
        assert_eq!(config.jitter_radius, 10.0);
        assert_eq!(config.primary, PlacementConfig::default().primary);
        assert_eq!(config.near_radius, 28.0);
    }
}
