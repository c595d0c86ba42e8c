//! Kanal / Marla / Karam unit system
//!
//! Revenue records express parcels in traditional units:
//! - 1 Karam = 5.5 international feet
//! - 1 Marla = 9 square Karams
//! - 1 Kanal = 20 Marlas
//!
//! Every conversion here is a pure function of its input.

/// Meters per international foot
pub const METERS_PER_FOOT: f64 = 0.3048;

/// Feet per Karam
pub const FEET_PER_KARAM: f64 = 5.5;

/// Meters per Karam (1.6764)
pub const METERS_PER_KARAM: f64 = FEET_PER_KARAM * METERS_PER_FOOT;

/// Square Karams per Marla
pub const SQUARE_KARAMS_PER_MARLA: f64 = 9.0;

/// Marlas per Kanal
pub const MARLAS_PER_KANAL: f64 = 20.0;

/// Square meters per Marla (25.29285264)
pub const SQUARE_METERS_PER_MARLA: f64 =
    SQUARE_KARAMS_PER_MARLA * METERS_PER_KARAM * METERS_PER_KARAM;

/// Slack applied before flooring, keeps values sitting on a unit boundary
/// from flickering to the unit below
const BOUNDARY_EPSILON: f64 = 1e-4;

/// Area of a parcel in local and imperial units
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SurveyStats {
    /// Input area in square meters
    pub area_square_meters: f64,
    /// Area in square international feet
    pub area_square_feet: f64,
    /// Area expressed in Marlas
    pub total_local_units: f64,
    /// Whole Kanals
    pub whole_unit_count: u64,
    /// Marlas left over after whole Kanals, rounded to 2 decimals, in `[0, 20)`
    pub remainder_unit: f64,
    /// Human-readable area, e.g. `"4 K - 18.84 M"`
    pub display_label: String,
}

/// Convert an area in square meters to Kanal / Marla
///
/// Negative or non-finite input is treated as zero area.
pub fn convert_area_to_local_units(area_sq_meters: f64) -> SurveyStats {
    let area = non_negative(area_sq_meters);
    let total_local_units = area / SQUARE_METERS_PER_MARLA;

    let mut whole = (total_local_units / MARLAS_PER_KANAL + BOUNDARY_EPSILON).floor();
    let mut remainder = non_negative(round_to(total_local_units - MARLAS_PER_KANAL * whole, 2));
    if remainder >= MARLAS_PER_KANAL {
        whole += 1.0;
        remainder = 0.0;
    }

    let whole_unit_count = whole as u64;
    let display_label = area_label(whole_unit_count, remainder);

    SurveyStats {
        area_square_meters: area,
        area_square_feet: area / (METERS_PER_FOOT * METERS_PER_FOOT),
        total_local_units,
        whole_unit_count,
        remainder_unit: remainder,
        display_label,
    }
}

fn area_label(kanals: u64, marlas: f64) -> String {
    if kanals > 0 && marlas >= 0.01 {
        format!("{kanals} K - {marlas:.2} M")
    } else if kanals > 0 {
        format!("{kanals} Kanal")
    } else {
        format!("{marlas:.2} Marla")
    }
}

/// Split a length into whole Karams and leftover feet
///
/// Feet are rounded to one decimal. A leftover that rounds up to a full
/// Karam is carried over.
pub fn length_in_karams(meters: f64) -> (u64, f64) {
    let meters = non_negative(meters);
    let mut karams = (meters / METERS_PER_KARAM + BOUNDARY_EPSILON).floor();
    let leftover_feet = (meters - karams * METERS_PER_KARAM) / METERS_PER_FOOT;
    let mut feet = non_negative(round_to(leftover_feet, 1));
    if feet >= FEET_PER_KARAM {
        karams += 1.0;
        feet = 0.0;
    }
    (karams as u64, feet)
}

/// Format a length in meters as Karams and feet, e.g. `"29k - 4.5ft"`
pub fn format_length_label(meters: f64) -> String {
    let (karams, feet) = length_in_karams(meters);
    if karams == 0 {
        format!("{feet:.1}ft")
    } else if feet == 0.0 {
        format!("{karams}k")
    } else {
        format!("{karams}k - {feet:.1}ft")
    }
}

/// Clamp to `[0, inf)`, mapping NaN and negative zero to `0.0`
fn non_negative(value: f64) -> f64 {
    if value > 0.0 && value.is_finite() {
        value
    } else {
        0.0
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
