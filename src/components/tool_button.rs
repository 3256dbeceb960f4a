use eframe::egui;
use crate::shape::Tool;

pub struct ToolButton {
    pub tool: Tool,
    pub selected: bool,
    pub enabled: bool,
}

impl ToolButton {
    pub fn new(tool: Tool, selected: bool) -> Self {
        Self {
            tool,
            selected,
            enabled: true,
        }
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn show(&self, ui: &mut egui::Ui) -> egui::Response {
        let button_size = egui::vec2(36.0, 32.0);
        let sense = if self.enabled {
            egui::Sense::click()
        } else {
            egui::Sense::hover()
        };
        let (rect, response) = ui.allocate_exact_size(button_size, sense);
        let response = response.on_hover_text(self.tool.label());

        if ui.is_rect_visible(rect) {
            let bg_color = if self.selected {
                egui::Color32::from_rgb(46, 204, 113)
            } else if response.hovered() && self.enabled {
                egui::Color32::from_gray(60)
            } else {
                egui::Color32::from_gray(40)
            };
            ui.painter().rect_filled(rect, 4.0, bg_color);

            let text_color = match (self.selected, self.enabled) {
                (true, _) => egui::Color32::BLACK,
                (false, true) => egui::Color32::WHITE,
                (false, false) => egui::Color32::from_gray(110),
            };
            ui.painter().text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                self.tool.icon(),
                egui::FontId::proportional(20.0),
                text_color,
            );
        }

        response
    }
}
