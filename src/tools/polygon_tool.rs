use egui::Pos2;
use log::debug;

use super::{RoiTool, ToolAction};
use crate::shape::{Shape, ShapeView, Tool};

/// Vertex collection state of the polygon tool
#[derive(Debug, Clone, PartialEq)]
pub enum PolygonState {
    Idle,
    Collecting {
        vertices: Vec<Pos2>,
        /// Last known cursor position, for the preview edge
        cursor: Option<Pos2>,
    },
}

/// Click to place vertices. Clicking back near the first vertex once at
/// least three are placed closes the polygon and asks for it to be saved.
///
/// The closing click is never added as a vertex.
#[derive(Debug, Clone)]
pub struct PolygonTool {
    pub state: PolygonState,
    snap_radius: f32,
    finished: Option<Shape>,
}

impl PolygonTool {
    pub fn new(snap_radius: f32) -> Self {
        Self {
            state: PolygonState::Idle,
            snap_radius,
            finished: None,
        }
    }

    /// Committed vertices of the polygon being collected
    pub fn vertices(&self) -> &[Pos2] {
        match &self.state {
            PolygonState::Collecting { vertices, .. } => vertices,
            PolygonState::Idle => &[],
        }
    }
}

impl RoiTool for PolygonTool {
    fn tool(&self) -> Tool {
        Tool::Polygon
    }

    fn state_name(&self) -> &'static str {
        match (&self.state, &self.finished) {
            (PolygonState::Collecting { .. }, _) => "Collecting",
            (PolygonState::Idle, Some(_)) => "Closed",
            (PolygonState::Idle, None) => "Idle",
        }
    }

    fn on_start(&mut self, pos: Pos2) -> Option<ToolAction> {
        match &mut self.state {
            PolygonState::Collecting { vertices, cursor } => {
                let closes = vertices.len() >= 3 && pos.distance(vertices[0]) < self.snap_radius;
                if closes {
                    let vertices = std::mem::take(vertices);
                    debug!("Polygon closed with {} vertices", vertices.len());
                    self.state = PolygonState::Idle;
                    self.finished = Some(Shape::Polygon { vertices });
                    return Some(ToolAction::Finalized { request_save: true });
                }

                vertices.push(pos);
                *cursor = Some(pos);
            }
            PolygonState::Idle => {
                // Clicking after a closed polygon starts over
                self.finished = None;
                self.state = PolygonState::Collecting {
                    vertices: vec![pos],
                    cursor: Some(pos),
                };
            }
        }
        Some(ToolAction::Updated)
    }

    fn on_move(&mut self, pos: Pos2) -> Option<ToolAction> {
        match &mut self.state {
            PolygonState::Collecting { cursor, .. } => {
                *cursor = Some(pos);
                Some(ToolAction::Updated)
            }
            PolygonState::Idle => None,
        }
    }

    fn on_end(&mut self, _pos: Pos2) -> Option<ToolAction> {
        // Vertices are placed on press; release carries no meaning here
        None
    }

    fn reset(&mut self) {
        self.state = PolygonState::Idle;
        self.finished = None;
    }

    fn is_active(&self) -> bool {
        matches!(self.state, PolygonState::Collecting { .. })
    }

    fn finalized(&self) -> Option<&Shape> {
        self.finished.as_ref()
    }

    fn view(&self) -> Option<ShapeView<'_>> {
        match &self.state {
            PolygonState::Collecting { vertices, cursor } => Some(ShapeView::Path {
                points: vertices,
                cursor: *cursor,
                closed: false,
            }),
            PolygonState::Idle => self.finished.as_ref().map(ShapeView::of),
        }
    }
}
