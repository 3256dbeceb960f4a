use eframe::egui::{self, emath::RectTransform};

use crate::editor::{EditorResponse, RoiEditor};
use crate::geometry::SurfaceSize;
use crate::input::InputHandler;
use crate::renderer::SurfaceRenderer;
use crate::resize::SurfaceResizeFeed;

/// Size of the placeholder shown when there is no camera frame
const NO_FEED_SIZE: egui::Vec2 = egui::vec2(640.0, 360.0);

/// Per-session state of the image + overlay canvas
pub struct CanvasState {
    pub input: InputHandler,
    pub resize_feed: SurfaceResizeFeed,
    /// The camera frame under the overlay, if it could be loaded
    pub frame: Option<egui::TextureHandle>,
}

impl CanvasState {
    pub fn new(frame: Option<egui::TextureHandle>) -> Self {
        Self {
            input: InputHandler::new(egui::Rect::NOTHING),
            resize_feed: SurfaceResizeFeed::new(),
            frame,
        }
    }
}

/// Show the camera frame with the region overlay on top, and route pointer
/// input to the editor.
pub fn roi_canvas(
    ui: &mut egui::Ui,
    canvas: &mut CanvasState,
    editor: &mut RoiEditor,
    renderer: &SurfaceRenderer,
) -> EditorResponse {
    let max_size = egui::vec2(
        ui.available_width(),
        ui.ctx().screen_rect().height() * 0.8,
    );

    let Some(frame) = &canvas.frame else {
        let (rect, _) = ui.allocate_exact_size(NO_FEED_SIZE.min(max_size), egui::Sense::hover());
        ui.painter().rect_filled(rect, 0.0, egui::Color32::BLACK);
        ui.painter().text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            "Camera feed unavailable",
            egui::FontId::proportional(18.0),
            egui::Color32::GRAY,
        );
        return EditorResponse::Ignored;
    };

    // Fit the frame into the available space, keeping its aspect ratio
    let frame_size = frame.size_vec2();
    let scale = (max_size.x / frame_size.x).min(max_size.y / frame_size.y).min(1.0);
    let (response, painter) = ui.allocate_painter(frame_size * scale, egui::Sense::click_and_drag());
    let rect = response.rect;

    painter.image(
        frame.id(),
        rect,
        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
        egui::Color32::WHITE,
    );

    // The drawing surface tracks the displayed image box
    canvas.resize_feed.publish(SurfaceSize::from(rect.size()));
    editor.sync_surface();

    if response.hovered() && editor.can_draw() {
        ui.ctx().set_cursor_icon(egui::CursorIcon::Crosshair);
    }

    canvas.input.set_canvas_rect(rect);
    let mut outcome = EditorResponse::Ignored;
    for event in canvas.input.process_input(ui.ctx()) {
        let response = editor.handle_input(&event, rect);
        outcome = strongest(outcome, response);
    }

    let surface = editor.surface();
    if surface.is_valid() {
        let to_screen = RectTransform::from_to(surface.rect(), rect);
        renderer.paint(&painter.with_clip_rect(rect), editor.view(), &to_screen);
    }

    outcome
}

fn strongest(a: EditorResponse, b: EditorResponse) -> EditorResponse {
    fn rank(r: EditorResponse) -> u8 {
        match r {
            EditorResponse::Ignored => 0,
            EditorResponse::Redraw => 1,
            EditorResponse::Finalized => 2,
            EditorResponse::SaveRequested => 3,
        }
    }
    if rank(b) > rank(a) { b } else { a }
}
