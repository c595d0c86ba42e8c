//! Viewport transform supplied by the host

use crate::screen::ScreenPoint;

/// Mapping between the host's geographic coordinates and screen pixels
///
/// Valid for one viewport state only; hosts build a new one on every pan or
/// zoom and run a fresh placement pass with it.
pub trait ScreenTransform {
    /// Geographic coordinate type used by the host
    type Geo: Copy;

    /// Project a geographic coordinate to screen pixels
    fn to_screen(&self, geo: Self::Geo) -> ScreenPoint;

    /// Inverse of [`ScreenTransform::to_screen`]
    fn to_geographic(&self, screen: ScreenPoint) -> Self::Geo;
}

impl<T: ScreenTransform + ?Sized> ScreenTransform for &T {
    type Geo = T::Geo;

    fn to_screen(&self, geo: Self::Geo) -> ScreenPoint {
        (**self).to_screen(geo)
    }

    fn to_geographic(&self, screen: ScreenPoint) -> Self::Geo {
        (**self).to_geographic(screen)
    }
}
