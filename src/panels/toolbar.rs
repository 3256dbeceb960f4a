use eframe::egui;

use crate::components::ToolButton;
use crate::editor::RoiEditor;
use crate::shape::Tool;
use crate::tools::RoiTool;

/// Tool selection and the clear button, above the canvas
pub fn toolbar(ui: &mut egui::Ui, editor: &mut RoiEditor) {
    let enabled = editor.is_open() && !editor.is_saving();

    ui.horizontal(|ui| {
        let active = editor.tool();
        for tool in Tool::ALL {
            let button = ToolButton::new(tool, tool == active).enabled(enabled);
            if button.show(ui).clicked() && enabled {
                // Reselecting the active tool also starts over, like switching
                editor.select_tool(tool);
            }
        }

        ui.separator();

        if ui
            .add(egui::Button::new(egui::RichText::new("Clear").color(egui::Color32::LIGHT_RED)))
            .clicked()
        {
            editor.clear();
        }

        ui.separator();
        ui.label(format!(
            "{} · {}",
            editor.tool().label(),
            editor.active_tool().state_name()
        ));
    });
}
