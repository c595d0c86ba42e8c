//! Error types for survey measurement

/// Errors raised while measuring a single parcel
///
/// Either variant skips the offending feature only; batch callers keep
/// measuring the rest.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SurveyError {
    /// The ring cannot form a polygon
    #[error("geometry error: {0}")]
    Geometry(String),

    /// The requested reference frame is not one of the supported projections
    #[error("configuration error: unknown reference frame `{0}`")]
    Configuration(String),
}

impl SurveyError {
    pub(crate) fn degenerate(distinct: usize) -> Self {
        SurveyError::Geometry(format!(
            "ring has {distinct} distinct vertices, at least 3 are required"
        ))
    }

    /// True for ring-shape problems
    pub fn is_geometry(&self) -> bool {
        matches!(self, SurveyError::Geometry(_))
    }

    /// True for an unrecognised reference frame
    pub fn is_configuration(&self) -> bool {
        matches!(self, SurveyError::Configuration(_))
    }
}

pub type SurveyResult<T> = Result<T, SurveyError>;
