//! Reference frames for planar measurement
//!
//! Each frame is a total function from WGS 84 longitude/latitude to planar
//! meters over the parcels it is meant for. Frame names come from the host as
//! strings and are resolved here; anything unrecognised is a configuration
//! error.

use crate::error::{SurveyError, SurveyResult};
use crate::geometry::{GeoCoordinate, PlanarPoint};
use std::fmt;
use std::str::FromStr;

/// WGS 84 semi-major axis in meters
const WGS84_A: f64 = 6_378_137.0;
/// WGS 84 flattening
const WGS84_F: f64 = 1.0 / 298.257_223_563;
/// UTM scale factor on the central meridian
const UTM_K0: f64 = 0.9996;
/// UTM false easting in meters
const UTM_FALSE_EASTING: f64 = 500_000.0;
/// Latitude limit of the square Web Mercator world
const WEB_MERCATOR_MAX_LAT: f64 = 85.051_128_78;

/// Named planar projection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ReferenceFrame {
    /// WGS 84 / UTM zone 42N (EPSG:32642)
    Utm42N,
    /// WGS 84 / UTM zone 43N (EPSG:32643)
    Utm43N,
    /// WGS 84 / Pseudo-Mercator (EPSG:3857)
    WebMercator,
}

impl ReferenceFrame {
    /// Every supported frame, in display order
    pub const ALL: [ReferenceFrame; 3] = [
        ReferenceFrame::Utm42N,
        ReferenceFrame::Utm43N,
        ReferenceFrame::WebMercator,
    ];

    /// Resolve a frame from its canonical name, compact name or EPSG code
    ///
    /// Matching ignores case, spaces, dashes and underscores, so `"UTM 43N"`,
    /// `"utm43n"` and `"EPSG:32643"` all resolve to [`ReferenceFrame::Utm43N`].
    pub fn from_name(name: &str) -> SurveyResult<Self> {
        let key: String = name
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();

        Self::ALL
            .into_iter()
            .find(|frame| {
                key == frame.compact_name() || key == format!("epsg:{}", frame.epsg())
            })
            .ok_or_else(|| SurveyError::Configuration(name.to_string()))
    }

    /// Canonical display name
    pub fn name(&self) -> &'static str {
        match self {
            ReferenceFrame::Utm42N => "UTM 42N",
            ReferenceFrame::Utm43N => "UTM 43N",
            ReferenceFrame::WebMercator => "Web Mercator",
        }
    }

    /// Lower-case name without spaces, as accepted on command lines
    pub fn compact_name(&self) -> &'static str {
        match self {
            ReferenceFrame::Utm42N => "utm42n",
            ReferenceFrame::Utm43N => "utm43n",
            ReferenceFrame::WebMercator => "webmercator",
        }
    }

    /// EPSG registry code
    pub fn epsg(&self) -> u32 {
        match self {
            ReferenceFrame::Utm42N => 32642,
            ReferenceFrame::Utm43N => 32643,
            ReferenceFrame::WebMercator => 3857,
        }
    }

    /// Project a geographic coordinate to planar meters
    pub fn project(&self, coordinate: GeoCoordinate) -> PlanarPoint {
        match self {
            ReferenceFrame::Utm42N => transverse_mercator(coordinate, utm_central_meridian(42)),
            ReferenceFrame::Utm43N => transverse_mercator(coordinate, utm_central_meridian(43)),
            ReferenceFrame::WebMercator => web_mercator(coordinate),
        }
    }
}

impl fmt::Display for ReferenceFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ReferenceFrame {
    type Err = SurveyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

impl TryFrom<String> for ReferenceFrame {
    type Error = SurveyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_name(&value)
    }
}

impl From<ReferenceFrame> for String {
    fn from(frame: ReferenceFrame) -> Self {
        frame.name().to_string()
    }
}

fn utm_central_meridian(zone: u8) -> f64 {
    f64::from(zone) * 6.0 - 183.0
}

/// Forward transverse Mercator on the WGS 84 ellipsoid (Snyder, 8-9 to 8-10)
fn transverse_mercator(coordinate: GeoCoordinate, central_meridian: f64) -> PlanarPoint {
    let e2 = WGS84_F * (2.0 - WGS84_F);
    let e4 = e2 * e2;
    let e6 = e4 * e2;
    let ep2 = e2 / (1.0 - e2);

    let phi = coordinate.lat.to_radians();
    let (sin_phi, cos_phi) = phi.sin_cos();
    let tan_phi = phi.tan();

    let n = WGS84_A / (1.0 - e2 * sin_phi * sin_phi).sqrt();
    let t = tan_phi * tan_phi;
    let c = ep2 * cos_phi * cos_phi;
    let a = (coordinate.lon - central_meridian).to_radians() * cos_phi;

    let m = WGS84_A
        * ((1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * phi
            - (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * phi).sin()
            + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * phi).sin()
            - (35.0 * e6 / 3072.0) * (6.0 * phi).sin());

    let a2 = a * a;
    let a3 = a2 * a;
    let a4 = a3 * a;
    let a5 = a4 * a;
    let a6 = a5 * a;

    let x = UTM_K0
        * n
        * (a + (1.0 - t + c) * a3 / 6.0
            + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * ep2) * a5 / 120.0)
        + UTM_FALSE_EASTING;

    let y = UTM_K0
        * (m + n
            * tan_phi
            * (a2 / 2.0
                + (5.0 - t + 9.0 * c + 4.0 * c * c) * a4 / 24.0
                + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * ep2) * a6 / 720.0));

    PlanarPoint::new(x, y)
}

fn web_mercator(coordinate: GeoCoordinate) -> PlanarPoint {
    let lat = coordinate
        .lat
        .clamp(-WEB_MERCATOR_MAX_LAT, WEB_MERCATOR_MAX_LAT)
        .to_radians();
    let x = WGS84_A * coordinate.lon.to_radians();
    let y = WGS84_A * (std::f64::consts::FRAC_PI_4 + lat / 2.0).tan().ln();
    PlanarPoint::new(x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_variants() {
        assert_eq!(ReferenceFrame::from_name("UTM 43N").unwrap(), ReferenceFrame::Utm43N);
        assert_eq!(ReferenceFrame::from_name("utm42n").unwrap(), ReferenceFrame::Utm42N);
        assert_eq!(ReferenceFrame::from_name("EPSG:32643").unwrap(), ReferenceFrame::Utm43N);
        assert_eq!(ReferenceFrame::from_name("epsg:3857").unwrap(), ReferenceFrame::WebMercator);
        assert_eq!(
            "web-mercator".parse::<ReferenceFrame>().unwrap(),
            ReferenceFrame::WebMercator
        );
    }

    #[test]
    fn test_unknown_frame_is_configuration_error() {
        let err = ReferenceFrame::from_name("UTM 99Z").unwrap_err();
        assert!(err.is_configuration());
        assert_eq!(err, SurveyError::Configuration("UTM 99Z".to_string()));
    }

    #[test]
    fn test_utm_central_meridian_on_equator() {
        let p = ReferenceFrame::Utm43N.project(GeoCoordinate::new(75.0, 0.0));
        assert!((p.x - 500_000.0).abs() < 1e-6);
        assert!(p.y.abs() < 1e-6);
    }

    #[test]
    fn test_utm_known_point() {
        // Lahore, Minar-e-Pakistan: 74.3095 E, 31.5925 N
        let p = ReferenceFrame::Utm43N.project(GeoCoordinate::new(74.3095, 31.5925));
        assert!((p.x - 434_491.06).abs() < 1.0, "easting {}", p.x);
        assert!((p.y - 3_495_475.64).abs() < 1.0, "northing {}", p.y);
    }

    #[test]
    fn test_web_mercator_origin_and_clamp() {
        let origin = ReferenceFrame::WebMercator.project(GeoCoordinate::new(0.0, 0.0));
        assert!(origin.x.abs() < 1e-9 && origin.y.abs() < 1e-9);

        let pole = ReferenceFrame::WebMercator.project(GeoCoordinate::new(0.0, 90.0));
        assert!(pole.y.is_finite());
        let limit = ReferenceFrame::WebMercator.project(GeoCoordinate::new(180.0, 0.0));
        assert!((limit.x - 20_037_508.342_789_244).abs() < 1e-3);
    }

    #[test]
    fn test_frame_serde_uses_names() {
        let json = serde_json::to_string(&ReferenceFrame::Utm42N).unwrap();
        assert_eq!(json, "\"UTM 42N\"");
        let frame: ReferenceFrame = serde_json::from_str("\"EPSG:3857\"").unwrap();
        assert_eq!(frame, ReferenceFrame::WebMercator);
        assert!(serde_json::from_str::<ReferenceFrame>("\"Lambert\"").is_err());
    }

    #[test]
    fn test_display_and_epsg() {
        for frame in ReferenceFrame::ALL {
            assert_eq!(ReferenceFrame::from_name(frame.name()).unwrap(), frame);
            assert_eq!(
                ReferenceFrame::from_name(&format!("EPSG:{}", frame.epsg())).unwrap(),
                frame
            );
            assert_eq!(frame.to_string(), frame.name());
        }
    }
}
