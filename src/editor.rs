//! The ROI editor session.
//!
//! A `RoiEditor` lives for one opening of the ROI dialog. It owns the active
//! tool, the surface dimensions, the finalized-shape snapshot and the save in
//! flight, and it is the only thing that moves the tools between states.

use std::task::{Context, Poll};

use egui::{PointerButton, Pos2, Rect};
use futures::FutureExt;
use futures::future::BoxFuture;
use log::{debug, error, info, warn};
use uuid::Uuid;

use crate::client::RoiClient;
use crate::config::EditorConfig;
use crate::error::{SaveError, TransportError};
use crate::geometry::{SurfaceBounds, SurfaceSize, to_surface};
use crate::input::InputEvent;
use crate::payload::{Ack, CameraId, RoiPayload};
use crate::resize::ResizeSubscription;
use crate::shape::{ShapeView, Tool};
use crate::tools::{RoiTool, ToolAction, ToolType, new_tool};

/// What the caller should do after feeding the editor an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorResponse {
    /// Nothing changed
    Ignored,
    /// The overlay needs a redraw
    Redraw,
    /// A shape was finalized
    Finalized,
    /// A shape was finalized by a gesture that also asks for it to be saved
    SaveRequested,
}

/// Result of a completed save
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    Failed(TransportError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Open,
    Closed,
}

enum SaveState {
    Idle,
    InFlight(BoxFuture<'static, Result<Ack, TransportError>>),
}

pub struct RoiEditor {
    session_id: Uuid,
    camera: CameraId,
    snap_radius: f32,
    tool: ToolType,
    /// Current drawing-surface size, tracking the displayed image
    surface: SurfaceSize,
    /// Surface size when the current shape was finalized
    finalized_on: Option<SurfaceSize>,
    has_backing_image: bool,
    resize: Option<ResizeSubscription>,
    save: SaveState,
    last_error: Option<String>,
    status: SessionStatus,
}

impl std::fmt::Debug for RoiEditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoiEditor")
            .field("session_id", &self.session_id)
            .field("camera", &self.camera)
            .field("tool", &self.tool.tool())
            .field("state", &self.tool.state_name())
            .field("surface", &self.surface)
            .field("finalized_on", &self.finalized_on)
            .field("saving", &self.is_saving())
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

impl RoiEditor {
    pub fn new(camera: CameraId, config: &EditorConfig) -> Self {
        let session_id = Uuid::new_v4();
        info!("Opening ROI editor {} for camera {}", session_id, camera);
        Self {
            session_id,
            camera,
            snap_radius: config.snap_radius,
            tool: new_tool(config.default_tool, config.snap_radius),
            surface: SurfaceSize::ZERO,
            finalized_on: None,
            has_backing_image: false,
            resize: None,
            save: SaveState::Idle,
            last_error: None,
            status: SessionStatus::Open,
        }
    }

    /// Hold `subscription` for the rest of the session
    pub fn with_resize_subscription(mut self, subscription: ResizeSubscription) -> Self {
        self.resize = Some(subscription);
        self
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn camera(&self) -> CameraId {
        self.camera
    }

    pub fn active_tool(&self) -> &ToolType {
        &self.tool
    }

    pub fn tool(&self) -> Tool {
        self.tool.tool()
    }

    pub fn surface(&self) -> SurfaceSize {
        self.surface
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_open(&self) -> bool {
        self.status == SessionStatus::Open
    }

    pub fn is_saving(&self) -> bool {
        matches!(self.save, SaveState::InFlight(_))
    }

    /// The last save failure, as reported by the store
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn view(&self) -> Option<ShapeView<'_>> {
        self.tool.view()
    }

    /// Drawing needs an open session, a loaded image and a laid-out surface
    pub fn can_draw(&self) -> bool {
        self.is_open() && !self.is_saving() && self.has_backing_image && self.surface.is_valid()
    }

    /// Record whether a camera frame is backing the surface
    pub fn set_backing_image(&mut self, available: bool) {
        if !available && self.has_backing_image {
            warn!("Camera {} feed unavailable, drawing disabled", self.camera);
        }
        self.has_backing_image = available;
    }

    // --- resets -----------------------------------------------------------

    /// Switch tools. Anything drawn with the previous tool is discarded.
    pub fn select_tool(&mut self, tool: Tool) {
        info!("Tool selected: {}", tool.name());
        self.tool = new_tool(tool, self.snap_radius);
        self.discard_shape();
    }

    /// Point the session at another camera. Shapes never carry over.
    ///
    /// Ignored while a save is in flight; the save stays bound to the camera it
    /// was started for.
    pub fn set_camera(&mut self, camera: CameraId) {
        if camera == self.camera {
            return;
        }
        if self.is_saving() {
            warn!("Camera switch to {} ignored while saving camera {}", camera, self.camera);
            return;
        }
        info!("ROI editor {} switched to camera {}", self.session_id, camera);
        self.camera = camera;
        self.tool.reset();
        self.discard_shape();
    }

    /// Discard the current shape without contacting the store
    pub fn clear(&mut self) {
        debug!("Clearing ROI surface");
        self.tool.reset();
        self.discard_shape();
    }

    fn discard_shape(&mut self) {
        self.finalized_on = None;
        self.last_error = None;
    }

    // --- surface ------------------------------------------------------------

    /// Adopt a new surface size. Stored points are kept as they are, so a shape
    /// drawn before a resize keeps its old pixel coordinates.
    ///
    /// Returns true if the size changed.
    pub fn observe_surface(&mut self, size: SurfaceSize) -> bool {
        if size == self.surface {
            return false;
        }
        debug!(
            "Surface {}x{} -> {}x{}",
            self.surface.width, self.surface.height, size.width, size.height
        );
        self.surface = size;
        true
    }

    /// Apply the latest size from the resize subscription, if there is one
    pub fn sync_surface(&mut self) -> bool {
        match self.resize.as_mut().and_then(ResizeSubscription::latest) {
            Some(size) => self.observe_surface(size),
            None => false,
        }
    }

    // --- input --------------------------------------------------------------

    /// Feed one input event. `display` is where the surface is shown on screen.
    pub fn handle_input(&mut self, event: &InputEvent, display: Rect) -> EditorResponse {
        match event {
            InputEvent::PointerDown {
                location,
                button: PointerButton::Primary,
            } if location.is_in_canvas => self.pointer_down(location.position, display),
            InputEvent::PointerMove { location, .. } => self.pointer_move(location.position, display),
            InputEvent::PointerUp {
                location,
                button: PointerButton::Primary,
            } => self.pointer_up(location.position, display),
            InputEvent::KeyDown {
                key: egui::Key::Escape,
                ..
            } => {
                self.clear();
                EditorResponse::Redraw
            }
            _ => EditorResponse::Ignored,
        }
    }

    pub fn pointer_down(&mut self, pos: Pos2, display: Rect) -> EditorResponse {
        match self.map(pos, display) {
            Some(p) => {
                let action = self.tool.on_start(p);
                self.apply(action)
            }
            None => EditorResponse::Ignored,
        }
    }

    pub fn pointer_move(&mut self, pos: Pos2, display: Rect) -> EditorResponse {
        match self.map(pos, display) {
            Some(p) => {
                let action = self.tool.on_move(p);
                self.apply(action)
            }
            None => EditorResponse::Ignored,
        }
    }

    pub fn pointer_up(&mut self, pos: Pos2, display: Rect) -> EditorResponse {
        match self.map(pos, display) {
            Some(p) => {
                let action = self.tool.on_end(p);
                self.apply(action)
            }
            None => EditorResponse::Ignored,
        }
    }

    fn map(&self, pos: Pos2, display: Rect) -> Option<Pos2> {
        if !self.can_draw() {
            return None;
        }
        match to_surface(pos, &SurfaceBounds::new(display, self.surface)) {
            Ok(p) => Some(p),
            Err(err) => {
                debug!("Skipping pointer event: {err}");
                None
            }
        }
    }

    fn apply(&mut self, action: Option<ToolAction>) -> EditorResponse {
        // A new gesture may have dropped the previously finalized shape
        if self.tool.finalized().is_none() {
            self.finalized_on = None;
        }

        match action {
            None => EditorResponse::Ignored,
            Some(ToolAction::Updated) => EditorResponse::Redraw,
            Some(ToolAction::Finalized { request_save }) => {
                self.finalized_on = Some(self.surface);
                info!(
                    "{} finalized on {}x{} surface",
                    self.tool.tool().label(),
                    self.surface.width,
                    self.surface.height
                );
                if request_save {
                    EditorResponse::SaveRequested
                } else {
                    EditorResponse::Finalized
                }
            }
        }
    }

    // --- save ---------------------------------------------------------------

    /// The normalized payload for the finalized shape.
    ///
    /// Calling this repeatedly without drawing in between gives the same payload.
    pub fn payload(&self) -> Result<RoiPayload, SaveError> {
        if !self.surface.is_valid() {
            return Err(SaveError::SurfaceNotReady);
        }
        let finalized_on = self.finalized_on.ok_or(SaveError::NoShape)?;
        let roi = self.tool.to_normalized_payload(finalized_on)?;
        Ok(RoiPayload {
            camera_id: self.camera,
            roi,
        })
    }

    pub fn can_save(&self) -> bool {
        self.is_open() && !self.is_saving() && self.payload().is_ok()
    }

    /// Start saving the finalized shape through `client`.
    ///
    /// The save completes through `poll_save`.
    pub fn save(&mut self, client: &dyn RoiClient) -> Result<(), SaveError> {
        if !self.is_open() {
            return Err(SaveError::SessionClosed);
        }
        if self.is_saving() {
            warn!("Save requested while another save is in flight");
            return Err(SaveError::SaveInFlight);
        }

        let payload = self.payload().inspect_err(|err| {
            warn!("Refusing to save ROI for camera {}: {}", self.camera, err);
        })?;

        info!(
            "Saving {:?} ROI for camera {} (session {})",
            payload.shape_type(),
            self.camera,
            self.session_id
        );
        self.last_error = None;
        self.save = SaveState::InFlight(client.set_roi(payload));
        Ok(())
    }

    /// Drive the save in flight. Returns the outcome once it has completed.
    pub fn poll_save(&mut self) -> Option<SaveOutcome> {
        let SaveState::InFlight(future) = &mut self.save else {
            return None;
        };

        let mut cx = Context::from_waker(futures::task::noop_waker_ref());
        let result = match future.poll_unpin(&mut cx) {
            Poll::Pending => return None,
            Poll::Ready(result) => result,
        };
        self.save = SaveState::Idle;

        let result = result.and_then(|ack| match ack.success {
            true => Ok(()),
            false => Err(TransportError::Rejected(
                ack.message.unwrap_or_else(|| "ROI store rejected the region".to_owned()),
            )),
        });

        match result {
            Ok(()) => {
                info!("ROI for camera {} saved", self.camera);
                self.close();
                Some(SaveOutcome::Saved)
            }
            Err(err) => {
                error!("Failed to save ROI for camera {}: {}", self.camera, err);
                self.last_error = Some(err.to_string());
                Some(SaveOutcome::Failed(err))
            }
        }
    }

    /// End the session, discarding anything not saved
    pub fn close(&mut self) {
        if self.status == SessionStatus::Closed {
            return;
        }
        debug!("Closing ROI editor {}", self.session_id);
        self.tool.reset();
        self.finalized_on = None;
        self.save = SaveState::Idle;
        self.resize = None;
        self.status = SessionStatus::Closed;
    }
}
