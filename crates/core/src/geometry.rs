//! Parcel geometry data model
//!
//! Rings arrive from the host in geographic coordinates and are only ever read.
//! Planar points exist for the duration of a single measurement call.

use crate::error::{SurveyError, SurveyResult};

/// Geographic coordinate in decimal degrees (WGS 84)
///
/// - `lon` increases eastward
/// - `lat` increases northward
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GeoCoordinate {
    pub lon: f64,
    pub lat: f64,
}

impl GeoCoordinate {
    /// Create a new geographic coordinate
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Arithmetic midpoint of two coordinates
    ///
    /// Parcel edges are a few hundred meters at most, so the planar average
    /// is what labels are anchored to.
    pub fn midpoint(&self, other: &GeoCoordinate) -> GeoCoordinate {
        GeoCoordinate::new((self.lon + other.lon) / 2.0, (self.lat + other.lat) / 2.0)
    }

    fn is_finite(&self) -> bool {
        self.lon.is_finite() && self.lat.is_finite()
    }
}

impl From<(f64, f64)> for GeoCoordinate {
    fn from((lon, lat): (f64, f64)) -> Self {
        Self::new(lon, lat)
    }
}

/// Point in a planar reference frame, in meters
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PlanarPoint {
    pub x: f64,
    pub y: f64,
}

impl PlanarPoint {
    /// Create a new planar point
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance_to(&self, other: &PlanarPoint) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Ordered boundary of a parcel, optionally closed by repeating the first vertex
pub type VertexRing = [GeoCoordinate];

/// Ring vertices projected to meters, closing duplicate removed
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedRing {
    points: Vec<PlanarPoint>,
}

impl ProjectedRing {
    pub(crate) fn new(points: Vec<PlanarPoint>) -> Self {
        Self { points }
    }

    /// Projected vertices in ring order
    pub fn points(&self) -> &[PlanarPoint] {
        &self.points
    }

    /// Number of vertices
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the ring has no vertices
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Absolute shoelace area, winding independent
    pub fn area(&self) -> f64 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }
        // Shift to the first vertex; raw UTM products are ~1e12 and lose precision
        let origin = self.points[0];
        let mut area = 0.0;
        for i in 0..n {
            let j = (i + 1) % n;
            let (xi, yi) = (self.points[i].x - origin.x, self.points[i].y - origin.y);
            let (xj, yj) = (self.points[j].x - origin.x, self.points[j].y - origin.y);
            area += xi * yj;
            area -= xj * yi;
        }
        (area / 2.0).abs()
    }
}

/// Strip a repeated closing vertex, if present
pub fn open_ring(ring: &VertexRing) -> &VertexRing {
    match ring {
        [first, .., last] if first == last => &ring[..ring.len() - 1],
        _ => ring,
    }
}

/// Number of distinct vertices in the ring
pub fn distinct_vertex_count(ring: &VertexRing) -> usize {
    let mut seen: Vec<GeoCoordinate> = Vec::with_capacity(ring.len());
    for vertex in ring {
        if !seen.contains(vertex) {
            seen.push(*vertex);
        }
    }
    seen.len()
}

/// Reject rings that cannot bound an area
///
/// Returns the open form of the ring on success.
pub fn validate_ring(ring: &VertexRing) -> SurveyResult<&VertexRing> {
    if let Some(bad) = ring.iter().find(|v| !v.is_finite()) {
        return Err(SurveyError::Geometry(format!(
            "non-finite vertex ({}, {})",
            bad.lon, bad.lat
        )));
    }

    let open = open_ring(ring);
    let distinct = distinct_vertex_count(open);
    if distinct < 3 {
        return Err(SurveyError::degenerate(distinct));
    }
    Ok(open)
}

/// Vertex centroid of the open ring
///
/// Used as the anchor for area labels. Returns `None` for an empty ring.
pub fn vertex_centroid(ring: &VertexRing) -> Option<GeoCoordinate> {
    let open = open_ring(ring);
    if open.is_empty() {
        return None;
    }
    let n = open.len() as f64;
    let sum_lon: f64 = open.iter().map(|v| v.lon).sum();
    let sum_lat: f64 = open.iter().map(|v| v.lat).sum();
    Some(GeoCoordinate::new(sum_lon / n, sum_lat / n))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<GeoCoordinate> {
        vec![
            GeoCoordinate::new(74.0, 31.0),
            GeoCoordinate::new(74.001, 31.0),
            GeoCoordinate::new(74.001, 31.001),
            GeoCoordinate::new(74.0, 31.001),
        ]
    }

    #[test]
    fn test_open_ring_strips_closing_vertex() {
        let mut closed = square();
        closed.push(closed[0]);
        assert_eq!(open_ring(&closed).len(), 4);
        assert_eq!(open_ring(&square()).len(), 4);
    }

    #[test]
    fn test_open_ring_single_vertex() {
        let ring = [GeoCoordinate::new(1.0, 1.0)];
        assert_eq!(open_ring(&ring).len(), 1);
    }

    #[test]
    fn test_distinct_vertex_count() {
        let a = GeoCoordinate::new(0.0, 0.0);
        let b = GeoCoordinate::new(1.0, 0.0);
        assert_eq!(distinct_vertex_count(&[a, b, a, b]), 2);
        assert_eq!(distinct_vertex_count(&square()), 4);
    }

    #[test]
    fn test_validate_ring_rejects_two_distinct_vertices() {
        let a = GeoCoordinate::new(0.0, 0.0);
        let b = GeoCoordinate::new(1.0, 0.0);
        let err = validate_ring(&[a, b, a]).unwrap_err();
        assert!(err.is_geometry());
    }

    #[test]
    fn test_validate_ring_rejects_nan() {
        let mut ring = square();
        ring[2].lat = f64::NAN;
        assert!(validate_ring(&ring).unwrap_err().is_geometry());
    }

    #[test]
    fn test_projected_ring_area() {
        let ring = ProjectedRing::new(vec![
            PlanarPoint::new(0.0, 0.0),
            PlanarPoint::new(10.0, 0.0),
            PlanarPoint::new(5.0, 10.0),
        ]);
        assert!((ring.area() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_vertex_centroid_ignores_closing_vertex() {
        let mut ring = square();
        ring.push(ring[0]);
        let centroid = vertex_centroid(&ring).unwrap();
        assert!((centroid.lon - 74.0005).abs() < 1e-12);
        assert!((centroid.lat - 31.0005).abs() < 1e-12);
        assert!(vertex_centroid(&[]).is_none());
    }

    #[test]
    fn test_midpoint() {
        let m = GeoCoordinate::new(74.0, 31.0).midpoint(&GeoCoordinate::new(74.002, 31.004));
        assert!((m.lon - 74.001).abs() < 1e-12);
        assert!((m.lat - 31.002).abs() < 1e-12);
    }
}
