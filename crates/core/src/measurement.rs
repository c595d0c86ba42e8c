//! Parcel measurement engine
//!
//! Projects a vertex ring into a reference frame and derives area, edge
//! lengths and their local-unit labels. Every function here is pure: the same
//! ring and frame always give bit-identical results, so hosts may memoize on
//! `(feature, frame)` if they want to.

use crate::error::SurveyResult;
use crate::geometry::{
    validate_ring, vertex_centroid, GeoCoordinate, ProjectedRing, VertexRing,
};
use crate::projection::ReferenceFrame;
use crate::units::{convert_area_to_local_units, format_length_label, SurveyStats};
use std::collections::BTreeMap;

/// Host-side identifier of a parcel feature (usually the Khasra number)
pub type FeatureId = String;

/// Length of one ring edge
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EdgeDimension {
    /// Geographic midpoint of the unprojected edge, used as label anchor
    pub midpoint: GeoCoordinate,
    /// Planar length in meters
    pub length_meters: f64,
    /// Length in Karams and feet
    pub display_label: String,
}

/// Project every vertex of the ring, dropping a repeated closing vertex
///
/// The frame is already resolved, so no configuration error can occur here.
/// The ring is validated first: fewer than 3 distinct vertices or a
/// non-finite coordinate is a [`SurveyError::Geometry`].
///
/// [`SurveyError::Geometry`]: crate::error::SurveyError::Geometry
pub fn project(ring: &VertexRing, frame: ReferenceFrame) -> SurveyResult<ProjectedRing> {
    let open = validate_ring(ring)?;
    Ok(ProjectedRing::new(open.iter().map(|v| frame.project(*v)).collect()))
}

/// Planar area of the ring in square meters
///
/// Shoelace formula over the implicitly closed projected ring; the result does
/// not depend on winding direction.
pub fn compute_area(ring: &VertexRing, frame: ReferenceFrame) -> SurveyResult<f64> {
    Ok(project(ring, frame)?.area())
}

/// One dimension per consecutive pair of input vertices
///
/// No wraparound edge is added: an n-vertex ring yields n-1 dimensions, and a
/// ring closed by repeating its first vertex closes the loop by itself.
pub fn compute_edge_lengths(
    ring: &VertexRing,
    frame: ReferenceFrame,
) -> SurveyResult<Vec<EdgeDimension>> {
    validate_ring(ring)?;

    let edges = ring
        .windows(2)
        .map(|pair| {
            let length_meters = frame.project(pair[0]).distance_to(&frame.project(pair[1]));
            EdgeDimension {
                midpoint: pair[0].midpoint(&pair[1]),
                length_meters,
                display_label: format_length_label(length_meters),
            }
        })
        .collect();

    Ok(edges)
}

/// Kind of label a measurement produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelKind {
    /// Parcel area, shown at the ring centroid
    Area,
    /// Edge length, shown at the edge midpoint
    Edge,
}

/// Text annotation derived from a measurement, ready to become a placement candidate
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LabelSpec {
    /// Stable id: `<feature>/area` or `<feature>/edge/<index>`
    pub id: String,
    pub kind: LabelKind,
    pub anchor: GeoCoordinate,
    pub text: String,
}

/// Complete measurement of one parcel under one reference frame
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FeatureMeasurement {
    pub frame: ReferenceFrame,
    pub stats: SurveyStats,
    pub edges: Vec<EdgeDimension>,
    /// Anchor for the area label
    pub label_position: GeoCoordinate,
}

impl FeatureMeasurement {
    /// Sum of all edge lengths in meters
    pub fn perimeter_meters(&self) -> f64 {
        self.edges.iter().map(|e| e.length_meters).sum()
    }

    /// Labels for this parcel, area label first, then edges in ring order
    ///
    /// Ids depend only on `feature_id` and the edge index, so they are stable
    /// across recomputations.
    pub fn label_specs(&self, feature_id: &str) -> Vec<LabelSpec> {
        let mut specs = Vec::with_capacity(self.edges.len() + 1);
        specs.push(LabelSpec {
            id: area_label_id(feature_id),
            kind: LabelKind::Area,
            anchor: self.label_position,
            text: self.stats.display_label.clone(),
        });
        specs.extend(self.edges.iter().enumerate().map(|(index, edge)| LabelSpec {
            id: edge_label_id(feature_id, index),
            kind: LabelKind::Edge,
            anchor: edge.midpoint,
            text: edge.display_label.clone(),
        }));
        specs
    }
}

/// Label id of a parcel's area label
pub fn area_label_id(feature_id: &str) -> String {
    format!("{feature_id}/area")
}

/// Label id of a parcel's edge label
pub fn edge_label_id(feature_id: &str, edge_index: usize) -> String {
    format!("{feature_id}/edge/{edge_index}")
}

/// Measure area and edges of one parcel
pub fn measure_feature(
    ring: &VertexRing,
    frame: ReferenceFrame,
) -> SurveyResult<FeatureMeasurement> {
    let area = compute_area(ring, frame)?;
    let edges = compute_edge_lengths(ring, frame)?;
    // validate_ring guarantees at least three vertices
    let label_position = vertex_centroid(ring).unwrap_or(ring[0]);

    Ok(FeatureMeasurement {
        frame,
        stats: convert_area_to_local_units(area),
        edges,
        label_position,
    })
}

/// Feature that could not be measured
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SkippedFeature {
    pub feature_id: FeatureId,
    pub reason: String,
}

/// Result of measuring many parcels at once
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct BatchMeasurement {
    /// Measured parcels in input order
    pub measured: Vec<(FeatureId, FeatureMeasurement)>,
    /// Parcels skipped because of a geometry or configuration error
    pub skipped: Vec<SkippedFeature>,
}

impl BatchMeasurement {
    /// Labels of every measured parcel, all area labels before any edge label
    pub fn label_specs(&self) -> Vec<LabelSpec> {
        let (mut areas, edges): (Vec<LabelSpec>, Vec<LabelSpec>) = self
            .measured
            .iter()
            .flat_map(|(id, measurement)| measurement.label_specs(id))
            .partition(|spec| spec.kind == LabelKind::Area);
        areas.extend(edges);
        areas
    }
}

/// Measure every feature, skipping the ones that fail
///
/// A bad ring never aborts the batch; it is reported in
/// [`BatchMeasurement::skipped`].
pub fn measure_batch<'a, I>(features: I, frame: ReferenceFrame) -> BatchMeasurement
where
    I: IntoIterator<Item = (&'a str, &'a VertexRing)>,
{
    let mut batch = BatchMeasurement::default();
    for (feature_id, ring) in features {
        match measure_feature(ring, frame) {
            Ok(measurement) => batch.measured.push((feature_id.to_string(), measurement)),
            Err(err) => {
                log::warn!("skipping feature {feature_id}: {err}");
                batch.skipped.push(SkippedFeature {
                    feature_id: feature_id.to_string(),
                    reason: err.to_string(),
                });
            }
        }
    }
    log::debug!(
        "measured {} features in {} ({} skipped)",
        batch.measured.len(),
        frame,
        batch.skipped.len()
    );
    batch
}

/// Selected parcels and their current measurements
///
/// Mirrors the host's selection: selecting measures a parcel, changing the
/// reference frame replaces every measurement, deselecting discards it.
#[derive(Debug, Clone)]
pub struct MeasurementCollection {
    frame: ReferenceFrame,
    rings: BTreeMap<FeatureId, Vec<GeoCoordinate>>,
    results: BTreeMap<FeatureId, SurveyResult<FeatureMeasurement>>,
}

impl MeasurementCollection {
    /// Create an empty collection measuring in `frame`
    pub fn new(frame: ReferenceFrame) -> Self {
        Self {
            frame,
            rings: BTreeMap::new(),
            results: BTreeMap::new(),
        }
    }

    /// Current reference frame
    pub fn frame(&self) -> ReferenceFrame {
        self.frame
    }

    /// Select a parcel and measure it, replacing any earlier ring for the id
    pub fn select(
        &mut self,
        feature_id: impl Into<FeatureId>,
        ring: Vec<GeoCoordinate>,
    ) -> &SurveyResult<FeatureMeasurement> {
        let feature_id = feature_id.into();
        let result = measure_feature(&ring, self.frame);
        if let Err(err) = &result {
            log::warn!("feature {feature_id} not measured: {err}");
        }
        self.rings.insert(feature_id.clone(), ring);
        self.results.insert(feature_id.clone(), result);
        &self.results[feature_id.as_str()]
    }

    /// Deselect a parcel, discarding its measurement
    pub fn deselect(&mut self, feature_id: &str) -> bool {
        self.results.remove(feature_id);
        self.rings.remove(feature_id).is_some()
    }

    /// Switch reference frame and remeasure every selected parcel
    pub fn set_frame(&mut self, frame: ReferenceFrame) {
        if frame == self.frame {
            return;
        }
        self.frame = frame;
        self.results = self
            .rings
            .iter()
            .map(|(id, ring)| (id.clone(), measure_feature(ring, frame)))
            .collect();
    }

    /// Measurement result for a selected parcel
    pub fn get(&self, feature_id: &str) -> Option<&SurveyResult<FeatureMeasurement>> {
        self.results.get(feature_id)
    }

    /// Successfully measured parcels, ordered by id
    pub fn measured(&self) -> impl Iterator<Item = (&str, &FeatureMeasurement)> {
        self.results
            .iter()
            .filter_map(|(id, result)| result.as_ref().ok().map(|m| (id.as_str(), m)))
    }

    /// Snapshot of the selection as a batch result
    pub fn to_batch(&self) -> BatchMeasurement {
        let mut batch = BatchMeasurement::default();
        for (id, result) in &self.results {
            match result {
                Ok(measurement) => batch.measured.push((id.clone(), measurement.clone())),
                Err(err) => batch.skipped.push(SkippedFeature {
                    feature_id: id.clone(),
                    reason: err.to_string(),
                }),
            }
        }
        batch
    }

    /// Number of selected parcels
    pub fn count(&self) -> usize {
        self.rings.len()
    }

    /// Check if nothing is selected
    pub fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }
}
