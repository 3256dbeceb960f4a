use egui::Pos2;

use super::{RoiTool, ToolAction};
use crate::shape::{Shape, ShapeView, Tool};

#[derive(Debug, Clone, PartialEq)]
pub enum FreehandState {
    Idle,
    Tracing { points: Vec<Pos2> },
}

/// Trace an outline while the pointer is held. Every move event is recorded.
/// The outline is closed implicitly when the pointer is released.
#[derive(Debug, Clone)]
pub struct FreehandTool {
    pub state: FreehandState,
    finished: Option<Shape>,
}

impl FreehandTool {
    pub fn new() -> Self {
        Self {
            state: FreehandState::Idle,
            finished: None,
        }
    }

    pub fn point_count(&self) -> usize {
        match &self.state {
            FreehandState::Tracing { points } => points.len(),
            FreehandState::Idle => 0,
        }
    }
}

impl Default for FreehandTool {
    fn default() -> Self {
        Self::new()
    }
}

impl RoiTool for FreehandTool {
    fn tool(&self) -> Tool {
        Tool::Freehand
    }

    fn state_name(&self) -> &'static str {
        match self.state {
            FreehandState::Idle => "Idle",
            FreehandState::Tracing { .. } => "Tracing",
        }
    }

    fn on_start(&mut self, pos: Pos2) -> Option<ToolAction> {
        self.finished = None;
        self.state = FreehandState::Tracing { points: vec![pos] };
        Some(ToolAction::Updated)
    }

    fn on_move(&mut self, pos: Pos2) -> Option<ToolAction> {
        match &mut self.state {
            FreehandState::Tracing { points } => {
                points.push(pos);
                Some(ToolAction::Updated)
            }
            FreehandState::Idle => None,
        }
    }

    fn on_end(&mut self, _pos: Pos2) -> Option<ToolAction> {
        let FreehandState::Tracing { points } = std::mem::replace(&mut self.state, FreehandState::Idle)
        else {
            return None;
        };

        self.finished = Some(Shape::Freehand { points });
        Some(ToolAction::Finalized {
            request_save: false,
        })
    }

    fn reset(&mut self) {
        self.state = FreehandState::Idle;
        self.finished = None;
    }

    fn is_active(&self) -> bool {
        matches!(self.state, FreehandState::Tracing { .. })
    }

    fn finalized(&self) -> Option<&Shape> {
        self.finished.as_ref()
    }

    fn view(&self) -> Option<ShapeView<'_>> {
        match &self.state {
            FreehandState::Tracing { points } => Some(ShapeView::Path {
                points,
                cursor: None,
                closed: false,
            }),
            FreehandState::Idle => self.finished.as_ref().map(ShapeView::of),
        }
    }
}
