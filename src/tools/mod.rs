use egui::Pos2;

use crate::error::SaveError;
use crate::geometry::{SurfaceSize, to_normalized};
use crate::payload::Roi;
use crate::shape::{Shape, ShapeView, Tool};

/// What a tool did with an input event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolAction {
    /// The candidate shape changed and the overlay should be redrawn
    Updated,
    /// The candidate became a finalized shape
    Finalized {
        /// The finishing gesture also asks for the region to be saved
        request_save: bool,
    },
}

/// Shared interface of the ROI drawing tools.
///
/// Each tool is a small state machine driven by pointer gestures in
/// drawing-surface space. Positions handed to a tool are already clamped to
/// the surface.
pub trait RoiTool {
    /// Which tool this is
    fn tool(&self) -> Tool;

    /// Name of the current state, for the status line and logs
    fn state_name(&self) -> &'static str;

    /// Pointer pressed (or clicked, for the polygon tool)
    fn on_start(&mut self, pos: Pos2) -> Option<ToolAction>;

    /// Pointer moved, with or without a button held
    fn on_move(&mut self, pos: Pos2) -> Option<ToolAction>;

    /// Pointer released
    fn on_end(&mut self, pos: Pos2) -> Option<ToolAction>;

    /// Drop any in-progress or finalized shape and return to idle
    fn reset(&mut self);

    /// True while a gesture is in progress
    fn is_active(&self) -> bool;

    /// The finalized shape, if the last gesture completed one
    fn finalized(&self) -> Option<&Shape>;

    /// The shape to draw on the overlay right now
    fn view(&self) -> Option<ShapeView<'_>>;

    /// Normalize the finalized shape against `surface`.
    ///
    /// `surface` must be the size the shape was finalized on.
    fn to_normalized_payload(&self, surface: SurfaceSize) -> Result<Roi, SaveError> {
        let shape = self.finalized().ok_or(SaveError::NoShape)?;
        shape.validate()?;
        let points = to_normalized(shape, surface).map_err(|_| SaveError::SurfaceNotReady)?;
        Ok(Roi::new(shape.tool().shape_type(), points))
    }
}

mod rectangle_tool;
pub use rectangle_tool::{RectangleState, RectangleTool};

mod circle_tool;
pub use circle_tool::{CircleState, CircleTool};

mod polygon_tool;
pub use polygon_tool::{PolygonState, PolygonTool};

mod freehand_tool;
pub use freehand_tool::{FreehandState, FreehandTool};

/// Enum representing all available tool types
/// This allows us to avoid using Box<dyn RoiTool> and keeps the set of tools closed
#[derive(Debug, Clone)]
pub enum ToolType {
    Rectangle(RectangleTool),
    Circle(CircleTool),
    Polygon(PolygonTool),
    Freehand(FreehandTool),
}

impl RoiTool for ToolType {
    fn tool(&self) -> Tool {
        match self {
            Self::Rectangle(tool) => tool.tool(),
            Self::Circle(tool) => tool.tool(),
            Self::Polygon(tool) => tool.tool(),
            Self::Freehand(tool) => tool.tool(),
        }
    }

    fn state_name(&self) -> &'static str {
        match self {
            Self::Rectangle(tool) => tool.state_name(),
            Self::Circle(tool) => tool.state_name(),
            Self::Polygon(tool) => tool.state_name(),
            Self::Freehand(tool) => tool.state_name(),
        }
    }

    fn on_start(&mut self, pos: Pos2) -> Option<ToolAction> {
        match self {
            Self::Rectangle(tool) => tool.on_start(pos),
            Self::Circle(tool) => tool.on_start(pos),
            Self::Polygon(tool) => tool.on_start(pos),
            Self::Freehand(tool) => tool.on_start(pos),
        }
    }

    fn on_move(&mut self, pos: Pos2) -> Option<ToolAction> {
        match self {
            Self::Rectangle(tool) => tool.on_move(pos),
            Self::Circle(tool) => tool.on_move(pos),
            Self::Polygon(tool) => tool.on_move(pos),
            Self::Freehand(tool) => tool.on_move(pos),
        }
    }

    fn on_end(&mut self, pos: Pos2) -> Option<ToolAction> {
        match self {
            Self::Rectangle(tool) => tool.on_end(pos),
            Self::Circle(tool) => tool.on_end(pos),
            Self::Polygon(tool) => tool.on_end(pos),
            Self::Freehand(tool) => tool.on_end(pos),
        }
    }

    fn reset(&mut self) {
        match self {
            Self::Rectangle(tool) => tool.reset(),
            Self::Circle(tool) => tool.reset(),
            Self::Polygon(tool) => tool.reset(),
            Self::Freehand(tool) => tool.reset(),
        }
    }

    fn is_active(&self) -> bool {
        match self {
            Self::Rectangle(tool) => tool.is_active(),
            Self::Circle(tool) => tool.is_active(),
            Self::Polygon(tool) => tool.is_active(),
            Self::Freehand(tool) => tool.is_active(),
        }
    }

    fn finalized(&self) -> Option<&Shape> {
        match self {
            Self::Rectangle(tool) => tool.finalized(),
            Self::Circle(tool) => tool.finalized(),
            Self::Polygon(tool) => tool.finalized(),
            Self::Freehand(tool) => tool.finalized(),
        }
    }

    fn view(&self) -> Option<ShapeView<'_>> {
        match self {
            Self::Rectangle(tool) => tool.view(),
            Self::Circle(tool) => tool.view(),
            Self::Polygon(tool) => tool.view(),
            Self::Freehand(tool) => tool.view(),
        }
    }
}

/// Factory function to create a fresh, idle tool of the given kind
pub fn new_tool(tool: Tool, snap_radius: f32) -> ToolType {
    match tool {
        Tool::Rectangle => ToolType::Rectangle(RectangleTool::new()),
        Tool::Circle => ToolType::Circle(CircleTool::new()),
        Tool::Polygon => ToolType::Polygon(PolygonTool::new(snap_radius)),
        Tool::Freehand => ToolType::Freehand(FreehandTool::new()),
    }
}
