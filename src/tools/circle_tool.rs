use egui::Pos2;

use super::{RoiTool, ToolAction};
use crate::shape::{Shape, ShapeView, Tool};

#[derive(Debug, Clone, PartialEq)]
pub enum CircleState {
    Idle,
    /// `center` is where the drag began
    Dragging { center: Pos2, radius: f32 },
}

/// Drag outwards from the center; the radius is the distance dragged
#[derive(Debug, Clone)]
pub struct CircleTool {
    pub state: CircleState,
    finished: Option<Shape>,
}

impl CircleTool {
    pub fn new() -> Self {
        Self {
            state: CircleState::Idle,
            finished: None,
        }
    }
}

impl Default for CircleTool {
    fn default() -> Self {
        Self::new()
    }
}

impl RoiTool for CircleTool {
    fn tool(&self) -> Tool {
        Tool::Circle
    }

    fn state_name(&self) -> &'static str {
        match self.state {
            CircleState::Idle => "Idle",
            CircleState::Dragging { .. } => "Dragging",
        }
    }

    fn on_start(&mut self, pos: Pos2) -> Option<ToolAction> {
        self.finished = None;
        self.state = CircleState::Dragging {
            center: pos,
            radius: 0.0,
        };
        Some(ToolAction::Updated)
    }

    fn on_move(&mut self, pos: Pos2) -> Option<ToolAction> {
        match &mut self.state {
            CircleState::Dragging { center, radius } => {
                *radius = center.distance(pos);
                Some(ToolAction::Updated)
            }
            CircleState::Idle => None,
        }
    }

    fn on_end(&mut self, pos: Pos2) -> Option<ToolAction> {
        let CircleState::Dragging { center, .. } = self.state else {
            return None;
        };

        self.state = CircleState::Idle;
        self.finished = Some(Shape::Circle {
            center,
            radius: center.distance(pos),
        });
        Some(ToolAction::Finalized {
            request_save: false,
        })
    }

    fn reset(&mut self) {
        self.state = CircleState::Idle;
        self.finished = None;
    }

    fn is_active(&self) -> bool {
        matches!(self.state, CircleState::Dragging { .. })
    }

    fn finalized(&self) -> Option<&Shape> {
        self.finished.as_ref()
    }

    fn view(&self) -> Option<ShapeView<'_>> {
        match &self.state {
            CircleState::Dragging { center, radius } => Some(ShapeView::Circle {
                center: *center,
                radius: *radius,
            }),
            CircleState::Idle => self.finished.as_ref().map(ShapeView::of),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    #[test]
    fn test_radius_tracks_drag_distance() {
        let mut tool = CircleTool::new();
        tool.on_start(pos2(200.0, 150.0));
        tool.on_move(pos2(230.0, 190.0));
        assert_eq!(
            tool.state,
            CircleState::Dragging {
                center: pos2(200.0, 150.0),
                radius: 50.0
            }
        );

        tool.on_end(pos2(250.0, 150.0));
        assert_eq!(
            tool.finalized(),
            Some(&Shape::Circle {
                center: pos2(200.0, 150.0),
                radius: 50.0,
            })
        );
        assert_eq!(tool.state_name(), "Idle");
    }

    #[test]
    fn test_reset_discards_everything() {
        let mut tool = CircleTool::new();
        tool.on_start(pos2(1.0, 1.0));
        tool.reset();
        assert_eq!(tool.state, CircleState::Idle);
        assert_eq!(tool.on_end(pos2(5.0, 5.0)), None);
        assert!(tool.finalized().is_none());
    }
}
