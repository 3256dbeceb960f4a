pub mod mapping;

pub use mapping::{SurfaceBounds, to_normalized, to_surface};

use egui::{Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Default distance (in surface pixels) within which a click on the first
/// polygon vertex closes the polygon
pub const POLYGON_SNAP_RADIUS: f32 = 25.0;

/// Pixel dimensions of the drawing surface.
///
/// The surface tracks the box the camera image is displayed in, so this is
/// the coordinate space every stored point lives in.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SurfaceSize {
    pub width: f32,
    pub height: f32,
}

impl SurfaceSize {
    pub const ZERO: Self = Self { width: 0.0, height: 0.0 };

    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// A surface is only usable once it has been laid out with a non-zero area
    pub fn is_valid(&self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// The surface as a rect anchored at the origin
    pub fn rect(&self) -> Rect {
        Rect::from_min_size(Pos2::ZERO, self.to_vec2())
    }

    pub fn to_vec2(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Clamp a surface point into `[0, width] x [0, height]`
    pub fn clamp(&self, pos: Pos2) -> Pos2 {
        Pos2::new(pos.x.clamp(0.0, self.width), pos.y.clamp(0.0, self.height))
    }
}

impl From<Vec2> for SurfaceSize {
    fn from(size: Vec2) -> Self {
        Self::new(size.x, size.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_validity() {
        assert!(SurfaceSize::new(400.0, 300.0).is_valid());
        assert!(!SurfaceSize::ZERO.is_valid());
        assert!(!SurfaceSize::new(400.0, 0.0).is_valid());
        assert!(!SurfaceSize::new(f32::NAN, 10.0).is_valid());
    }

    #[test]
    fn test_clamp_into_surface() {
        let surface = SurfaceSize::new(400.0, 300.0);
        assert_eq!(surface.clamp(Pos2::new(-5.0, 20.0)), Pos2::new(0.0, 20.0));
        assert_eq!(surface.clamp(Pos2::new(500.0, 301.0)), Pos2::new(400.0, 300.0));
    }
}
