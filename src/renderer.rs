// src/renderer.rs
use eframe::egui::{self, Color32, Pos2, Shape, Stroke, emath::RectTransform, epaint::PathShape};

use crate::config::EditorConfig;
use crate::shape::ShapeView;

/// Paints the region overlay.
///
/// The renderer keeps no drawing state: every frame it is handed the current
/// view of the shape and redraws it from scratch.
#[derive(Debug, Clone)]
pub struct SurfaceRenderer {
    stroke: Stroke,
    fill: Color32,
}

impl Default for SurfaceRenderer {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}

impl SurfaceRenderer {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            stroke: Stroke::new(config.stroke_width, config.stroke_color()),
            fill: config.fill_color(),
        }
    }

    /// Build the overlay shapes for `view`.
    ///
    /// Args:
    ///     view: the shape to draw, in drawing-surface space
    ///     to_screen: maps drawing-surface space onto the displayed image rect
    pub fn shapes(&self, view: &ShapeView<'_>, to_screen: &RectTransform) -> Vec<Shape> {
        match *view {
            ShapeView::Rectangle { corner, opposite } => {
                // Negative drags are fine, the rect is built from both corners
                let rect = egui::Rect::from_two_pos(
                    to_screen.transform_pos(corner),
                    to_screen.transform_pos(opposite),
                );
                vec![
                    Shape::rect_filled(rect, 0.0, self.fill),
                    Shape::rect_stroke(rect, 0.0, self.stroke),
                ]
            }
            ShapeView::Circle { center, radius } => {
                let center = to_screen.transform_pos(center);
                let radius = radius * to_screen.scale().x;
                vec![
                    Shape::circle_filled(center, radius, self.fill),
                    Shape::circle_stroke(center, radius, self.stroke),
                ]
            }
            ShapeView::Path {
                points,
                cursor,
                closed,
            } => self.path_shapes(points, cursor, closed, to_screen),
        }
    }

    fn path_shapes(
        &self,
        points: &[Pos2],
        cursor: Option<Pos2>,
        closed: bool,
        to_screen: &RectTransform,
    ) -> Vec<Shape> {
        let screen: Vec<Pos2> = points.iter().map(|p| to_screen.transform_pos(*p)).collect();
        let mut shapes = Vec::new();

        match screen.len() {
            0 => return shapes,
            1 => shapes.push(Shape::circle_filled(
                screen[0],
                self.stroke.width * 0.5,
                self.stroke.color,
            )),
            _ if closed => shapes.push(Shape::Path(PathShape {
                points: screen.clone(),
                closed: true,
                fill: self.fill,
                stroke: self.stroke.into(),
            })),
            _ => shapes.push(Shape::line(screen.clone(), self.stroke)),
        }

        // Preview edge to the live cursor; not part of the shape yet
        if let (false, Some(cursor), Some(last)) = (closed, cursor, screen.last()) {
            shapes.push(Shape::line_segment(
                [*last, to_screen.transform_pos(cursor)],
                self.stroke,
            ));
        }

        shapes
    }

    /// Paint `view` (if any) with `painter`
    pub fn paint(&self, painter: &egui::Painter, view: Option<ShapeView<'_>>, to_screen: &RectTransform) {
        if let Some(view) = view {
            painter.extend(self.shapes(&view, to_screen));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{Rect, pos2, vec2};

    fn identity() -> RectTransform {
        let rect = Rect::from_min_size(Pos2::ZERO, vec2(400.0, 300.0));
        RectTransform::from_to(rect, rect)
    }

    #[test]
    fn test_negative_rectangle_renders_from_lower_corner() {
        let renderer = SurfaceRenderer::default();
        let view = ShapeView::Rectangle {
            corner: pos2(300.0, 200.0),
            opposite: pos2(100.0, 50.0),
        };
        let shapes = renderer.shapes(&view, &identity());
        assert_eq!(shapes.len(), 2);
        let Shape::Rect(rect) = &shapes[0] else {
            panic!("expected a filled rect");
        };
        assert_eq!(rect.rect.min, pos2(100.0, 50.0));
        assert_eq!(rect.rect.max, pos2(300.0, 200.0));
    }

    #[test]
    fn test_circle_radius_follows_display_scale() {
        let renderer = SurfaceRenderer::default();
        let surface = Rect::from_min_size(Pos2::ZERO, vec2(400.0, 300.0));
        let display = Rect::from_min_size(pos2(10.0, 10.0), vec2(800.0, 600.0));
        let to_screen = RectTransform::from_to(surface, display);

        let shapes = renderer.shapes(
            &ShapeView::Circle {
                center: pos2(200.0, 150.0),
                radius: 50.0,
            },
            &to_screen,
        );
        let Shape::Circle(circle) = &shapes[0] else {
            panic!("expected a circle");
        };
        assert_eq!(circle.center, pos2(410.0, 310.0));
        assert_eq!(circle.radius, 100.0);
    }

    #[test]
    fn test_open_polygon_has_preview_edge() {
        let renderer = SurfaceRenderer::default();
        let points = [pos2(10.0, 10.0), pos2(100.0, 10.0)];
        let shapes = renderer.shapes(
            &ShapeView::Path {
                points: &points,
                cursor: Some(pos2(50.0, 80.0)),
                closed: false,
            },
            &identity(),
        );
        assert_eq!(shapes.len(), 2);
        assert!(matches!(&shapes[0], Shape::Path(path) if !path.closed));
        assert!(matches!(&shapes[1], Shape::LineSegment { points, .. } if points[1] == pos2(50.0, 80.0)));
    }

    #[test]
    fn test_closed_path_is_filled_and_closed() {
        let renderer = SurfaceRenderer::default();
        let points = [pos2(10.0, 10.0), pos2(100.0, 10.0), pos2(100.0, 100.0)];
        let shapes = renderer.shapes(
            &ShapeView::Path {
                points: &points,
                cursor: Some(pos2(50.0, 80.0)),
                closed: true,
            },
            &identity(),
        );
        assert_eq!(shapes.len(), 1);
        let Shape::Path(path) = &shapes[0] else {
            panic!("expected a path");
        };
        assert!(path.closed);
        assert_eq!(path.points.len(), 3);
        assert_ne!(path.fill, Color32::TRANSPARENT);
    }

    #[test]
    fn test_empty_path_draws_nothing() {
        let renderer = SurfaceRenderer::default();
        let shapes = renderer.shapes(
            &ShapeView::Path {
                points: &[],
                cursor: None,
                closed: false,
            },
            &identity(),
        );
        assert!(shapes.is_empty());
    }
}
