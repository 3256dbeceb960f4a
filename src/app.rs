use std::sync::Arc;

use crate::client::{JsonFileRoiStore, RoiClient};
use crate::config::EditorConfig;
use crate::editor::{EditorResponse, RoiEditor, SaveOutcome};
use crate::feed::{DirectoryFrameSource, FeedRequest, FrameSource, to_color_image};
use crate::mask;
use crate::panels::{CanvasState, roi_canvas, toolbar};
use crate::payload::{CameraId, Roi};
use crate::renderer::SurfaceRenderer;

/// Frames are rasterized at this width when reporting coverage
const COVERAGE_SAMPLE_WIDTH: f32 = 320.0;

/// An open "Setup ROI" dialog
struct RoiSession {
    editor: RoiEditor,
    canvas: CanvasState,
    feed_error: Option<String>,
}

fn load_frame(
    ctx: &egui::Context,
    camera: CameraId,
    config: &EditorConfig,
    source: &dyn FrameSource,
) -> (Option<egui::TextureHandle>, Option<String>) {
    let request = FeedRequest::new(camera);
    let url = request.url(&config.api_base);
    log::debug!("Loading frame {}", url);

    match source.fetch(&request) {
        Ok(frame) => {
            let texture = ctx.load_texture(&url, to_color_image(&frame), egui::TextureOptions::LINEAR);
            (Some(texture), None)
        }
        Err(err) => {
            log::error!("Failed to load {}: {}", url, err);
            (None, Some(err.to_string()))
        }
    }
}

impl RoiSession {
    fn open(ctx: &egui::Context, camera: CameraId, config: &EditorConfig, source: &dyn FrameSource) -> Self {
        let (frame, feed_error) = load_frame(ctx, camera, config, source);

        let mut canvas = CanvasState::new(frame);
        let mut editor = RoiEditor::new(camera, config)
            .with_resize_subscription(canvas.resize_feed.subscribe());
        editor.set_backing_image(canvas.frame.is_some());

        Self {
            editor,
            canvas,
            feed_error,
        }
    }

    /// Points the dialog at another camera, dropping anything drawn for the previous one
    fn switch_camera(&mut self, ctx: &egui::Context, camera: CameraId, config: &EditorConfig, source: &dyn FrameSource) {
        if camera == self.editor.camera() || self.editor.is_saving() {
            return;
        }
        let (frame, feed_error) = load_frame(ctx, camera, config, source);
        self.canvas.frame = frame;
        self.feed_error = feed_error;
        self.editor.set_camera(camera);
        self.editor.set_backing_image(self.canvas.frame.is_some());
    }

    /// Share of the camera frame covered by the finalized region
    fn coverage(&self) -> Option<f32> {
        let payload = self.editor.payload().ok()?;
        let surface = self.editor.surface();
        let height = COVERAGE_SAMPLE_WIDTH * surface.height / surface.width;
        let mask = mask::rasterize(&payload.roi, COVERAGE_SAMPLE_WIDTH as u32, height.max(1.0) as u32).ok()?;
        Some(mask::coverage(&mask))
    }
}

/// The dashboard shell around the ROI editor: a camera list and the ROI dialog.
pub struct RoiApp {
    config: EditorConfig,
    renderer: SurfaceRenderer,
    store: Arc<JsonFileRoiStore>,
    frames: DirectoryFrameSource,
    selected_camera: Option<CameraId>,
    session: Option<RoiSession>,
    status: Option<String>,
}

impl RoiApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>, config: EditorConfig, store: JsonFileRoiStore) -> Self {
        // A config saved by a previous run wins over the built-in defaults only
        let config = match cc.storage {
            Some(storage) if config == EditorConfig::default() => {
                eframe::get_value(storage, eframe::APP_KEY).unwrap_or(config)
            }
            _ => config,
        };

        Self {
            renderer: SurfaceRenderer::new(&config),
            frames: DirectoryFrameSource::new(&config.frames_dir),
            store: Arc::new(store),
            selected_camera: config.cameras.first().map(|c| c.id),
            session: None,
            status: None,
            config,
        }
    }

    fn open_session(&mut self, ctx: &egui::Context, camera: CameraId) {
        self.session = Some(RoiSession::open(ctx, camera, &self.config, &self.frames));
        self.status = None;
    }

    fn camera_panel(&mut self, ctx: &egui::Context) {
        let stored: Vec<(CameraId, String, Option<Roi>)> = self
            .config
            .cameras
            .iter()
            .map(|camera| (camera.id, camera.label.clone(), self.store.get(camera.id)))
            .collect();

        let mut selected = self.selected_camera;
        let saving = self.session.as_ref().is_some_and(|s| s.editor.is_saving());
        let mut open = None;

        egui::SidePanel::left("camera_panel")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.heading("Cameras");
                ui.separator();

                for (id, label, roi) in &stored {
                    ui.horizontal(|ui| {
                        let item = egui::SelectableLabel::new(selected == Some(*id), label.as_str());
                        if ui.add_enabled(!saving, item).clicked() {
                            selected = Some(*id);
                        }
                        match roi {
                            Some(roi) => ui.weak(format!("{:?}", roi.shape_type).to_lowercase()),
                            None => ui.weak("no ROI"),
                        };
                    });
                }

                ui.separator();
                if let Some(camera) = selected {
                    if ui.add_enabled(!saving, egui::Button::new("Setup ROI")).clicked() {
                        open = Some(camera);
                    }
                }
                if let Some(status) = &self.status {
                    ui.label(status);
                }
            });

        self.selected_camera = selected;
        if let Some(camera) = open {
            self.open_session(ctx, camera);
        }
    }

    fn roi_dialog(&mut self, ctx: &egui::Context) {
        let Some(session) = &mut self.session else {
            return;
        };

        if let Some(camera) = self.selected_camera {
            session.switch_camera(ctx, camera, &self.config, &self.frames);
        }

        let mut close = false;
        let mut save = false;
        let title = format!("Setup ROI · {}", self.config.camera_label(session.editor.camera()));

        egui::Window::new(title)
            .id(egui::Id::new("roi_dialog"))
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                toolbar(ui, &mut session.editor);
                ui.separator();

                let response = roi_canvas(ui, &mut session.canvas, &mut session.editor, &self.renderer);
                if response == EditorResponse::SaveRequested {
                    save = true;
                }

                if let Some(err) = &session.feed_error {
                    ui.colored_label(egui::Color32::LIGHT_RED, err);
                }
                if let Some(err) = session.editor.last_error() {
                    ui.colored_label(egui::Color32::LIGHT_RED, err);
                }
                if let Some(coverage) = session.coverage() {
                    ui.label(format!("Region covers {:.1}% of the frame", coverage * 100.0));
                }

                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button("Skip / Close").clicked() {
                        close = true;
                    }
                    let label = if session.editor.is_saving() { "Saving…" } else { "Save ROI" };
                    if ui
                        .add_enabled(session.editor.can_save(), egui::Button::new(label))
                        .clicked()
                    {
                        save = true;
                    }
                });
            });

        if save {
            let client: &dyn RoiClient = self.store.as_ref();
            if let Err(err) = session.editor.save(client) {
                log::warn!("ROI not saved: {}", err);
            }
        }

        if session.editor.is_saving() {
            ctx.request_repaint_after(std::time::Duration::from_millis(50));
        }

        match session.editor.poll_save() {
            Some(SaveOutcome::Saved) => {
                self.status = Some(format!(
                    "ROI saved for {}",
                    self.config.camera_label(session.editor.camera())
                ));
                self.session = None;
            }
            Some(SaveOutcome::Failed(_)) | None if close => {
                session.editor.close();
                self.session = None;
            }
            _ => {}
        }
    }
}

impl eframe::App for RoiApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        // Only settings are kept; drawing state never outlives a session
        eframe::set_value(storage, eframe::APP_KEY, &self.config);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.camera_panel(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Region of interest");
            ui.label("Pick a camera and open Setup ROI to draw the zone detection runs in.");
        });

        self.roi_dialog(ctx);
    }
}
