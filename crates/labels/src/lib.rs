//! Khasra Label Placement Library
//!
//! Greedy screen-space de-confliction of map labels.
//!
//! Each pass takes the full candidate list and a transform for the current
//! viewport and returns exactly one position per candidate. Nothing is kept
//! between passes; hosts re-run the pass on every pan, zoom or selection
//! change.
//!
//! # Example
//!
//! ```
//! use khasra_labels::{LabelCandidate, LabelPlacer, ScreenPoint, ScreenTransform};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! struct Pixels;
//!
//! impl ScreenTransform for Pixels {
//!     type Geo = ScreenPoint;
//!     fn to_screen(&self, geo: ScreenPoint) -> ScreenPoint {
//!         geo
//!     }
//!     fn to_geographic(&self, screen: ScreenPoint) -> ScreenPoint {
//!         screen
//!     }
//! }
//!
//! let anchor = ScreenPoint::new(200.0, 150.0);
//! let candidates = vec![
//!     LabelCandidate::primary("12/area", anchor, "4 K - 18.84 M"),
//!     LabelCandidate::secondary("12/edge/0", anchor, "29k - 4.5ft"),
//! ];
//!
//! let placer = LabelPlacer::new();
//! let placed = placer.place(&candidates, &Pixels, &mut StdRng::seed_from_u64(7));
//!
//! assert_eq!(placed.len(), 2);
//! assert_eq!(placed[0].screen_position, anchor);
//! assert!(!placed[0].occupied_box.overlaps(&placed[1].occupied_box));
//! ```

mod candidate;
mod config;
mod placement;
mod screen;
mod transform;

pub use candidate::{is_priority_ordered, order_candidates, LabelCandidate, PriorityClass};
pub use config::{LabelMetrics, PlacementConfig};
pub use placement::{
    candidate_offsets, place_labels, place_labels_around, LabelPlacer, PlacementResult,
};
pub use screen::{CollisionBox, ScreenPoint};
pub use transform::ScreenTransform;
