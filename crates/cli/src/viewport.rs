//! Web-Mercator map viewport
//!
//! Maps longitude / latitude to screen pixels the way slippy-map hosts do: the
//! world is a `256 * 2^zoom` pixel square and the viewport center sits in the
//! middle of the screen.

use khasra_core::GeoCoordinate;
use khasra_labels::{ScreenPoint, ScreenTransform};
use std::f64::consts::PI;

/// Size of one map tile in pixels
const TILE_SIZE: f64 = 256.0;

/// Latitude limit of the square Web-Mercator world
const MAX_LATITUDE: f64 = 85.051_128_78;

/// Viewport state for one placement pass
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct MapViewport {
    /// Geographic point at the center of the screen
    pub center: GeoCoordinate,

    /// Zoom level, fractional zooms allowed
    pub zoom: f64,

    /// Screen width in pixels
    pub width: f64,

    /// Screen height in pixels
    pub height: f64,
}

impl MapViewport {
    /// Create a new viewport
    pub fn new(center: GeoCoordinate, zoom: f64, width: f64, height: f64) -> Self {
        Self {
            center,
            zoom,
            width,
            height,
        }
    }

    fn world_size(&self) -> f64 {
        TILE_SIZE * 2f64.powf(self.zoom)
    }

    /// Position in world pixels, origin at the north-west corner
    fn world_pixel(&self, geo: GeoCoordinate) -> (f64, f64) {
        let size = self.world_size();
        let lat = geo.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
        let x = (geo.lon + 180.0) / 360.0 * size;
        let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * size;
        (x, y)
    }

    /// Check if a screen point lies on screen
    pub fn contains(&self, point: ScreenPoint) -> bool {
        (0.0..=self.width).contains(&point.x) && (0.0..=self.height).contains(&point.y)
    }
}

impl ScreenTransform for MapViewport {
    type Geo = GeoCoordinate;

    fn to_screen(&self, geo: GeoCoordinate) -> ScreenPoint {
        let (x, y) = self.world_pixel(geo);
        let (cx, cy) = self.world_pixel(self.center);
        ScreenPoint::new(x - cx + self.width / 2.0, y - cy + self.height / 2.0)
    }

    fn to_geographic(&self, screen: ScreenPoint) -> GeoCoordinate {
        let size = self.world_size();
        let (cx, cy) = self.world_pixel(self.center);
        let x = screen.x - self.width / 2.0 + cx;
        let y = screen.y - self.height / 2.0 + cy;

        let lon = x / size * 360.0 - 180.0;
        let lat = (PI * (1.0 - 2.0 * y / size)).sinh().atan().to_degrees();
        GeoCoordinate::new(lon, lat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lahore() -> MapViewport {
        MapViewport::new(GeoCoordinate::new(74.3, 31.5), 18.0, 1024.0, 768.0)
    }

    #[test]
    fn test_center_maps_to_screen_middle() {
        let viewport = lahore();
        let point = viewport.to_screen(viewport.center);
        assert!((point.x - 512.0).abs() < 1e-6);
        assert!((point.y - 384.0).abs() < 1e-6);
        assert!(viewport.contains(point));
    }

    #[test]
    fn test_north_east_is_up_and_right() {
        let viewport = lahore();
        let point = viewport.to_screen(GeoCoordinate::new(74.3005, 31.5005));
        assert!(point.x > 512.0);
        assert!(point.y < 384.0);
    }

    #[test]
    fn test_round_trip() {
        let viewport = lahore();
        let geo = GeoCoordinate::new(74.300_527, 31.500_451);
        let back = viewport.to_geographic(viewport.to_screen(geo));
        assert!((back.lon - geo.lon).abs() < 1e-9);
        assert!((back.lat - geo.lat).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_doubles_distances() {
        let near = MapViewport::new(GeoCoordinate::new(74.3, 31.5), 17.0, 800.0, 600.0);
        let far = MapViewport { zoom: 18.0, ..near };
        let geo = GeoCoordinate::new(74.301, 31.5);
        let dx_near = near.to_screen(geo).x - 400.0;
        let dx_far = far.to_screen(geo).x - 400.0;
        assert!((dx_far - 2.0 * dx_near).abs() < 1e-6);
    }

    #[test]
    fn test_polar_latitude_is_clamped() {
        let viewport = MapViewport::new(GeoCoordinate::new(0.0, 0.0), 0.0, 256.0, 256.0);
        let point = viewport.to_screen(GeoCoordinate::new(0.0, 90.0));
        assert!(point.is_finite());
        assert!(point.y.abs() < 1e-3);
    }
}
