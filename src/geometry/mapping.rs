//! Conversions between the three coordinate spaces the editor deals with:
//! display space (where pointer events arrive), drawing-surface space (where
//! shapes are stored) and normalized space (what the backend receives).
//!
//! Everything here is a pure function.

use egui::{Pos2, Rect};

use super::SurfaceSize;
use crate::error::MappingError;
use crate::payload::RoiPoints;
use crate::shape::Shape;

/// Where the drawing surface currently sits on screen, and its intrinsic pixel size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceBounds {
    /// The rect the surface is displayed in, in screen coordinates
    pub display: Rect,
    /// The surface's own pixel dimensions
    pub intrinsic: SurfaceSize,
}

impl SurfaceBounds {
    pub fn new(display: Rect, intrinsic: SurfaceSize) -> Self {
        Self { display, intrinsic }
    }

    fn is_laid_out(&self) -> bool {
        self.intrinsic.is_valid() && self.display.width() > 0.0 && self.display.height() > 0.0
    }
}

/// Map a pointer position in display space into drawing-surface pixels.
///
/// The surface may be displayed larger or smaller than its intrinsic size, so
/// the offset from the display origin is scaled by `intrinsic / displayed`
/// before being clamped to the surface.
pub fn to_surface(pos: Pos2, bounds: &SurfaceBounds) -> Result<Pos2, MappingError> {
    if !bounds.is_laid_out() {
        return Err(MappingError::SurfaceNotLaidOut);
    }

    let scale_x = bounds.intrinsic.width / bounds.display.width();
    let scale_y = bounds.intrinsic.height / bounds.display.height();
    let offset = pos - bounds.display.min;

    Ok(bounds
        .intrinsic
        .clamp(Pos2::new(offset.x * scale_x, offset.y * scale_y)))
}

/// Normalize a finalized shape against the surface size it was finalized on.
///
/// Circle radii are normalized by surface width. On non-square surfaces that
/// distorts the circle the backend sees; the radius is capped at 1.0.
pub fn to_normalized(shape: &Shape, surface: SurfaceSize) -> Result<RoiPoints, MappingError> {
    if !surface.is_valid() {
        return Err(MappingError::SurfaceNotLaidOut);
    }

    let w = surface.width;
    let h = surface.height;

    let points = match shape {
        Shape::Rectangle { origin, size } => {
            let rect = Rect::from_two_pos(*origin, *origin + *size);
            RoiPoints::Flat(vec![
                unit(rect.min.x / w),
                unit(rect.min.y / h),
                unit(rect.width() / w),
                unit(rect.height() / h),
            ])
        }
        Shape::Circle { center, radius } => RoiPoints::Flat(vec![
            unit(center.x / w),
            unit(center.y / h),
            unit(radius / w),
        ]),
        Shape::Polygon { vertices: points } | Shape::Freehand { points } => RoiPoints::Pairs(
            points
                .iter()
                .map(|p| [unit(p.x / w), unit(p.y / h)])
                .collect(),
        ),
    };

    Ok(points)
}

fn unit(value: f32) -> f32 {
    value.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{pos2, vec2};

    fn bounds(display: Rect, w: f32, h: f32) -> SurfaceBounds {
        SurfaceBounds::new(display, SurfaceSize::new(w, h))
    }

    #[test]
    fn test_to_surface_identity_scale() {
        let b = bounds(Rect::from_min_size(pos2(10.0, 20.0), vec2(400.0, 300.0)), 400.0, 300.0);
        let p = to_surface(pos2(110.0, 70.0), &b).unwrap();
        assert_eq!(p, pos2(100.0, 50.0));
    }

    #[test]
    fn test_to_surface_scales_display_to_intrinsic() {
        // Surface of 800x600 displayed at half size
        let b = bounds(Rect::from_min_size(pos2(0.0, 0.0), vec2(400.0, 300.0)), 800.0, 600.0);
        let p = to_surface(pos2(100.0, 150.0), &b).unwrap();
        assert_eq!(p, pos2(200.0, 300.0));
    }

    #[test]
    fn test_to_surface_clamps_outside_points() {
        let b = bounds(Rect::from_min_size(pos2(10.0, 10.0), vec2(400.0, 300.0)), 400.0, 300.0);
        assert_eq!(to_surface(pos2(0.0, 0.0), &b).unwrap(), pos2(0.0, 0.0));
        assert_eq!(to_surface(pos2(1000.0, 1000.0), &b).unwrap(), pos2(400.0, 300.0));
    }

    #[test]
    fn test_to_surface_requires_layout() {
        let zero_display = bounds(Rect::from_min_size(pos2(0.0, 0.0), vec2(0.0, 0.0)), 400.0, 300.0);
        assert_eq!(
            to_surface(pos2(1.0, 1.0), &zero_display),
            Err(MappingError::SurfaceNotLaidOut)
        );

        let zero_surface = bounds(Rect::from_min_size(pos2(0.0, 0.0), vec2(400.0, 300.0)), 0.0, 0.0);
        assert_eq!(
            to_surface(pos2(1.0, 1.0), &zero_surface),
            Err(MappingError::SurfaceNotLaidOut)
        );
    }

    #[test]
    fn test_normalize_negative_rectangle() {
        let shape = Shape::Rectangle {
            origin: pos2(300.0, 200.0),
            size: vec2(-200.0, -150.0),
        };
        let points = to_normalized(&shape, SurfaceSize::new(400.0, 300.0)).unwrap();
        let RoiPoints::Flat(values) = points else {
            panic!("rectangle should normalize to a flat list");
        };
        let expected = [0.25, 50.0 / 300.0, 0.5, 0.5];
        for (got, want) in values.iter().zip(expected) {
            assert!((got - want).abs() < 1e-5, "{got} != {want}");
        }
    }

    #[test]
    fn test_normalize_circle_radius_uses_width() {
        let shape = Shape::Circle {
            center: pos2(200.0, 150.0),
            radius: 50.0,
        };
        let points = to_normalized(&shape, SurfaceSize::new(400.0, 300.0)).unwrap();
        assert_eq!(points, RoiPoints::Flat(vec![0.5, 0.5, 0.125]));
    }

    #[test]
    fn test_normalize_circle_radius_capped() {
        let shape = Shape::Circle {
            center: pos2(0.0, 0.0),
            radius: 500.0,
        };
        let points = to_normalized(&shape, SurfaceSize::new(400.0, 300.0)).unwrap();
        assert_eq!(points, RoiPoints::Flat(vec![0.0, 0.0, 1.0]));
    }

    #[test]
    fn test_normalize_rejects_zero_surface() {
        let shape = Shape::Freehand {
            points: vec![pos2(1.0, 1.0)],
        };
        assert_eq!(
            to_normalized(&shape, SurfaceSize::ZERO),
            Err(MappingError::SurfaceNotLaidOut)
        );
    }
}
