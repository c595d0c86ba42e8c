//! Khasra Survey Core Library
//!
//! Parcel geometry, reference-frame projection and Kanal / Marla / Karam unit
//! conversion for land-record measurement.

pub mod error;
pub mod geometry;
pub mod measurement;
pub mod projection;
pub mod report;
pub mod units;

pub use error::{SurveyError, SurveyResult};
pub use geometry::{GeoCoordinate, PlanarPoint, ProjectedRing, VertexRing};
pub use measurement::{
    compute_area, compute_edge_lengths, measure_batch, measure_feature, project,
    BatchMeasurement, EdgeDimension, FeatureId, FeatureMeasurement, LabelKind, LabelSpec,
    MeasurementCollection, SkippedFeature,
};
pub use projection::ReferenceFrame;
pub use report::{export_edges_csv, export_survey_csv, CsvExportConfig, ReportError};
pub use units::{convert_area_to_local_units, format_length_label, SurveyStats};
