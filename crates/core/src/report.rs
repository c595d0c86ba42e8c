//! CSV export for parcel measurements
//!
//! Produces revenue-record style reports: one row per parcel with its area in
//! metric, imperial and local units, or one row per boundary edge.

use crate::measurement::BatchMeasurement;
use std::io::Write;

/// Error types for CSV export
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),
}

pub type ReportResult<T> = Result<T, ReportError>;

/// Configuration for CSV export
#[derive(Debug, Clone)]
pub struct CsvExportConfig {
    /// Include column headers in the output
    pub include_headers: bool,

    /// CSV delimiter character
    pub delimiter: u8,

    /// Append a row per skipped parcel with its reason
    pub include_skipped: bool,
}

impl Default for CsvExportConfig {
    fn default() -> Self {
        Self {
            include_headers: true,
            delimiter: b',',
            include_skipped: false,
        }
    }
}

/// Export parcel areas to CSV
///
/// Columns: Feature, Frame, Square Meters, Square Feet, Marla Total, Kanal,
/// Marla, Area, Edges, Perimeter Meters, Note
pub fn export_survey_csv<W: Write>(
    writer: W,
    batch: &BatchMeasurement,
    config: &CsvExportConfig,
) -> ReportResult<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(config.delimiter)
        .has_headers(false)
        .from_writer(writer);

    if config.include_headers {
        csv_writer.write_record([
            "Feature",
            "Frame",
            "Square Meters",
            "Square Feet",
            "Marla Total",
            "Kanal",
            "Marla",
            "Area",
            "Edges",
            "Perimeter Meters",
            "Note",
        ])?;
    }

    for (feature_id, measurement) in &batch.measured {
        let stats = &measurement.stats;
        csv_writer.write_record(&[
            feature_id.clone(),
            measurement.frame.name().to_string(),
            format!("{:.2}", stats.area_square_meters),
            format!("{:.2}", stats.area_square_feet),
            format!("{:.4}", stats.total_local_units),
            stats.whole_unit_count.to_string(),
            format!("{:.2}", stats.remainder_unit),
            stats.display_label.clone(),
            measurement.edges.len().to_string(),
            format!("{:.2}", measurement.perimeter_meters()),
            String::new(),
        ])?;
    }

    if config.include_skipped {
        for skipped in &batch.skipped {
            let mut row = vec![String::new(); 11];
            row[0] = skipped.feature_id.clone();
            row[10] = skipped.reason.clone();
            csv_writer.write_record(&row)?;
        }
    }

    csv_writer.flush()?;
    Ok(())
}

/// Export every boundary edge to CSV
///
/// Columns: Feature, Edge, Midpoint Lon, Midpoint Lat, Meters, Dimension
pub fn export_edges_csv<W: Write>(
    writer: W,
    batch: &BatchMeasurement,
    config: &CsvExportConfig,
) -> ReportResult<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(config.delimiter)
        .has_headers(false)
        .from_writer(writer);

    if config.include_headers {
        csv_writer.write_record([
            "Feature",
            "Edge",
            "Midpoint Lon",
            "Midpoint Lat",
            "Meters",
            "Dimension",
        ])?;
    }

    for (feature_id, measurement) in &batch.measured {
        for (index, edge) in measurement.edges.iter().enumerate() {
            csv_writer.write_record(&[
                feature_id.clone(),
                index.to_string(),
                format!("{:.7}", edge.midpoint.lon),
                format!("{:.7}", edge.midpoint.lat),
                format!("{:.2}", edge.length_meters),
                edge.display_label.clone(),
            ])?;
        }
    }

    csv_writer.flush()?;
    Ok(())
}
