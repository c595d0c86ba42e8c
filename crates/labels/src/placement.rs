//! Greedy label de-confliction
//!
//! Candidates are placed strictly in input order. For each one, 13 fixed
//! offsets around the projected anchor are tried first-fit against the boxes
//! already occupied in this pass. When all of them collide the label is
//! jittered around its anchor and accepted anyway, so every candidate always
//! gets exactly one result.

use crate::candidate::{is_priority_ordered, LabelCandidate};
use crate::config::PlacementConfig;
use crate::screen::{CollisionBox, ScreenPoint};
use crate::transform::ScreenTransform;
use rand::Rng;

/// Final position of one candidate
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PlacementResult<G> {
    pub candidate_id: String,

    /// Label center in screen pixels
    pub screen_position: ScreenPoint,

    /// Label footprint at `screen_position`, without the margin
    pub occupied_box: CollisionBox,

    /// `screen_position` mapped back through the viewport transform
    pub geographic_position: G,

    /// True when no offset was free and the position was jittered
    pub fallback: bool,
}

/// Offsets tried for every candidate, in order
///
/// Center, then up / right / down / left at the near radius, then the four
/// diagonals at the near radius, then up / right / down / left at the far
/// radius. Screen y grows downward.
pub fn candidate_offsets(config: &PlacementConfig) -> [ScreenPoint; 13] {
    let r = config.near_radius;
    let far = config.far_radius;
    [
        ScreenPoint::new(0.0, 0.0),
        ScreenPoint::new(0.0, -r),
        ScreenPoint::new(r, 0.0),
        ScreenPoint::new(0.0, r),
        ScreenPoint::new(-r, 0.0),
        ScreenPoint::new(r, -r),
        ScreenPoint::new(r, r),
        ScreenPoint::new(-r, r),
        ScreenPoint::new(-r, -r),
        ScreenPoint::new(0.0, -far),
        ScreenPoint::new(far, 0.0),
        ScreenPoint::new(0.0, far),
        ScreenPoint::new(-far, 0.0),
    ]
}

/// Run one placement pass over an empty screen
pub fn place_labels<T, R>(
    candidates: &[LabelCandidate<T::Geo>],
    transform: &T,
    config: &PlacementConfig,
    rng: &mut R,
) -> Vec<PlacementResult<T::Geo>>
where
    T: ScreenTransform + ?Sized,
    R: Rng,
{
    place_labels_around(candidates, transform, config, Vec::new(), rng)
}

/// Run one placement pass, avoiding `occupied` boxes as well as each other
///
/// `occupied` is consumed as the pass's arena of taken rectangles; boxes the
/// host already draws (legends, controls) can be passed in to keep labels
/// clear of them.
pub fn place_labels_around<T, R>(
    candidates: &[LabelCandidate<T::Geo>],
    transform: &T,
    config: &PlacementConfig,
    mut occupied: Vec<CollisionBox>,
    rng: &mut R,
) -> Vec<PlacementResult<T::Geo>>
where
    T: ScreenTransform + ?Sized,
    R: Rng,
{
    if !is_priority_ordered(candidates) {
        log::warn!("label candidates are not ordered primary-first; placing in input order");
    }

    let offsets = candidate_offsets(config);
    occupied.reserve(candidates.len());
    let mut results = Vec::with_capacity(candidates.len());
    let mut fallbacks = 0usize;

    for candidate in candidates {
        let anchor = transform.to_screen(candidate.anchor);
        let (width, height) = config.footprint(&candidate.text, candidate.priority);

        let slot = offsets.iter().find_map(|offset| {
            let position = anchor + *offset;
            let label_box = CollisionBox::centered(position, width, height);
            let free = label_box_is_finite(&label_box)
                && !occupied.iter().any(|taken| taken.overlaps(&label_box));
            free.then_some((position, label_box))
        });

        let (position, label_box, fallback) = match slot {
            Some((position, label_box)) => (position, label_box, false),
            None => {
                fallbacks += 1;
                let position = anchor + jitter(rng, config.jitter_radius);
                log::debug!("label {} has no free slot, jittered to {:?}", candidate.id, position);
                (position, CollisionBox::centered(position, width, height), true)
            }
        };

        occupied.push(label_box.padded(config.margin));
        results.push(PlacementResult {
            candidate_id: candidate.id.clone(),
            screen_position: position,
            occupied_box: label_box,
            geographic_position: transform.to_geographic(position),
            fallback,
        });
    }

    log::debug!("placed {} labels ({} by fallback)", results.len(), fallbacks);
    results
}

fn label_box_is_finite(label_box: &CollisionBox) -> bool {
    label_box.x1.is_finite()
        && label_box.y1.is_finite()
        && label_box.x2.is_finite()
        && label_box.y2.is_finite()
}

/// Uniform offset in `[-radius, radius]` on each axis
///
/// Sampled on the unit interval and scaled, so any finite radius is valid.
fn jitter<R: Rng>(rng: &mut R, radius: f64) -> ScreenPoint {
    if !radius.is_finite() || radius <= 0.0 {
        return ScreenPoint::default();
    }
    ScreenPoint::new(
        radius * rng.gen_range(-1.0f64..=1.0),
        radius * rng.gen_range(-1.0f64..=1.0),
    )
}

/// Label placement engine
///
/// Holds only configuration; every call to [`LabelPlacer::place`] is an
/// independent pass.
#[derive(Debug, Clone, Default)]
pub struct LabelPlacer {
    config: PlacementConfig,
}

impl LabelPlacer {
    /// Create a placer with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a placer with custom configuration
    pub fn with_config(config: PlacementConfig) -> Self {
        Self { config }
    }

    /// Get current configuration
    pub fn config(&self) -> &PlacementConfig {
        &self.config
    }

    /// Update configuration
    pub fn set_config(&mut self, config: PlacementConfig) {
        self.config = config;
    }

    /// Run one placement pass
    pub fn place<T, R>(
        &self,
        candidates: &[LabelCandidate<T::Geo>],
        transform: &T,
        rng: &mut R,
    ) -> Vec<PlacementResult<T::Geo>>
    where
        T: ScreenTransform + ?Sized,
        R: Rng,
    {
        place_labels(candidates, transform, &self.config, rng)
    }

    /// Run one placement pass around boxes the host already occupies
    pub fn place_around<T, R>(
        &self,
        candidates: &[LabelCandidate<T::Geo>],
        transform: &T,
        occupied: Vec<CollisionBox>,
        rng: &mut R,
    ) -> Vec<PlacementResult<T::Geo>>
    where
        T: ScreenTransform + ?Sized,
        R: Rng,
    {
        place_labels_around(candidates, transform, &self.config, occupied, rng)
    }
}
