use egui::{Pos2, Vec2};
use serde::{Deserialize, Serialize};

use crate::error::GeometryError;
use crate::payload::ShapeType;

/// The drawing tools offered by the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    #[default]
    #[serde(rename = "rect")]
    Rectangle,
    Circle,
    #[serde(rename = "poly")]
    Polygon,
    Freehand,
}

impl Tool {
    pub const ALL: [Tool; 4] = [Tool::Rectangle, Tool::Circle, Tool::Polygon, Tool::Freehand];

    pub fn name(&self) -> &'static str {
        match self {
            Tool::Rectangle => "rect",
            Tool::Circle => "circle",
            Tool::Polygon => "poly",
            Tool::Freehand => "freehand",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tool::Rectangle => "Rectangle",
            Tool::Circle => "Circle",
            Tool::Polygon => "Polygon",
            Tool::Freehand => "Freehand",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Tool::Rectangle => "⬜",
            Tool::Circle => "⭕",
            Tool::Polygon => "⬟",
            Tool::Freehand => "✏",
        }
    }

    /// Freehand regions travel as polygons
    pub fn shape_type(&self) -> ShapeType {
        match self {
            Tool::Rectangle => ShapeType::Rect,
            Tool::Circle => ShapeType::Circle,
            Tool::Polygon | Tool::Freehand => ShapeType::Poly,
        }
    }
}

/// A finalized region in drawing-surface space
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Anchor corner plus signed extent; the drag may go in any direction
    Rectangle { origin: Pos2, size: Vec2 },
    Circle { center: Pos2, radius: f32 },
    /// Closed polygon; the closing edge is implicit
    Polygon { vertices: Vec<Pos2> },
    /// Traced outline, closed like a polygon; the closing edge is implicit
    Freehand { points: Vec<Pos2> },
}

impl Shape {
    pub fn tool(&self) -> Tool {
        match self {
            Shape::Rectangle { .. } => Tool::Rectangle,
            Shape::Circle { .. } => Tool::Circle,
            Shape::Polygon { .. } => Tool::Polygon,
            Shape::Freehand { .. } => Tool::Freehand,
        }
    }

    /// Check the shape describes an actual area
    pub fn validate(&self) -> Result<(), GeometryError> {
        match self {
            Shape::Rectangle { size, .. } => {
                if size.x == 0.0 || size.y == 0.0 {
                    return Err(GeometryError::ZeroArea);
                }
            }
            Shape::Circle { radius, .. } => {
                if *radius <= 0.0 {
                    return Err(GeometryError::ZeroRadius);
                }
            }
            Shape::Polygon { vertices: points } | Shape::Freehand { points } => {
                if points.len() < 3 {
                    return Err(GeometryError::TooFewVertices(points.len()));
                }
            }
        }
        Ok(())
    }
}

/// What the renderer needs to know about the shape currently on the surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeView<'a> {
    Rectangle {
        corner: Pos2,
        opposite: Pos2,
    },
    Circle {
        center: Pos2,
        radius: f32,
    },
    Path {
        points: &'a [Pos2],
        /// Live cursor position for the uncommitted polygon edge
        cursor: Option<Pos2>,
        /// Closed paths get the implicit last-to-first edge and a fill
        closed: bool,
    },
}

impl<'a> ShapeView<'a> {
    pub fn of(shape: &'a Shape) -> Self {
        match shape {
            Shape::Rectangle { origin, size } => ShapeView::Rectangle {
                corner: *origin,
                opposite: *origin + *size,
            },
            Shape::Circle { center, radius } => ShapeView::Circle {
                center: *center,
                radius: *radius,
            },
            Shape::Polygon { vertices: points } | Shape::Freehand { points } => ShapeView::Path {
                points,
                cursor: None,
                closed: true,
            },
        }
    }
}
