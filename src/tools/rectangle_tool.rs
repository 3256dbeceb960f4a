use egui::Pos2;

use super::{RoiTool, ToolAction};
use crate::shape::{Shape, ShapeView, Tool};

/// Drag state of the rectangle tool
#[derive(Debug, Clone, PartialEq)]
pub enum RectangleState {
    Idle,
    Dragging { anchor: Pos2, current: Pos2 },
}

/// Drag from one corner to the opposite one. Any drag direction is allowed;
/// the extent is stored signed.
#[derive(Debug, Clone)]
pub struct RectangleTool {
    pub state: RectangleState,
    finished: Option<Shape>,
}

impl RectangleTool {
    pub fn new() -> Self {
        Self {
            state: RectangleState::Idle,
            finished: None,
        }
    }
}

impl Default for RectangleTool {
    fn default() -> Self {
        Self::new()
    }
}

impl RoiTool for RectangleTool {
    fn tool(&self) -> Tool {
        Tool::Rectangle
    }

    fn state_name(&self) -> &'static str {
        match self.state {
            RectangleState::Idle => "Idle",
            RectangleState::Dragging { .. } => "Dragging",
        }
    }

    fn on_start(&mut self, pos: Pos2) -> Option<ToolAction> {
        // A new drag replaces whatever was drawn before
        self.finished = None;
        self.state = RectangleState::Dragging {
            anchor: pos,
            current: pos,
        };
        Some(ToolAction::Updated)
    }

    fn on_move(&mut self, pos: Pos2) -> Option<ToolAction> {
        match &mut self.state {
            RectangleState::Dragging { current, .. } => {
                *current = pos;
                Some(ToolAction::Updated)
            }
            RectangleState::Idle => None,
        }
    }

    fn on_end(&mut self, pos: Pos2) -> Option<ToolAction> {
        let RectangleState::Dragging { anchor, .. } = self.state else {
            return None;
        };

        self.state = RectangleState::Idle;
        self.finished = Some(Shape::Rectangle {
            origin: anchor,
            size: pos - anchor,
        });
        Some(ToolAction::Finalized {
            request_save: false,
        })
    }

    fn reset(&mut self) {
        self.state = RectangleState::Idle;
        self.finished = None;
    }

    fn is_active(&self) -> bool {
        matches!(self.state, RectangleState::Dragging { .. })
    }

    fn finalized(&self) -> Option<&Shape> {
        self.finished.as_ref()
    }

    fn view(&self) -> Option<ShapeView<'_>> {
        match &self.state {
            RectangleState::Dragging { anchor, current } => Some(ShapeView::Rectangle {
                corner: *anchor,
                opposite: *current,
            }),
            RectangleState::Idle => self.finished.as_ref().map(ShapeView::of),
        }
    }
}
