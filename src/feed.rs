//! Camera frames backing the drawing surface.
//!
//! The editor treats a frame as opaque pixels; all it takes from it is the
//! resolution and the texture shown under the overlay.

use std::path::PathBuf;

use crate::error::FeedError;
use crate::payload::CameraId;
use crate::util::time;

/// One fetch of a camera's feed.
///
/// `cache_bust` is fixed per editor session so repeated fetches within a
/// session hit the same resource, while a new session gets a fresh frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedRequest {
    pub camera: CameraId,
    pub cache_bust: u64,
}

impl FeedRequest {
    pub fn new(camera: CameraId) -> Self {
        Self {
            camera,
            cache_bust: time::timestamp_millis(),
        }
    }

    /// The feed URL, e.g. `/video_feed/3?t=1718000000000`
    pub fn url(&self, api_base: &str) -> String {
        format!(
            "{}/video_feed/{}?t={}",
            api_base.trim_end_matches('/'),
            self.camera,
            self.cache_bust
        )
    }
}

/// Something that can produce the current frame of a camera
pub trait FrameSource {
    fn fetch(&self, request: &FeedRequest) -> Result<image::DynamicImage, FeedError>;
}

/// Reads the frame for camera `N` from `N.png`, `N.jpg` or `N.jpeg` in a directory
#[derive(Debug, Clone)]
pub struct DirectoryFrameSource {
    root: PathBuf,
}

impl DirectoryFrameSource {
    const EXTENSIONS: [&'static str; 3] = ["png", "jpg", "jpeg"];

    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn frame_path(&self, camera: CameraId) -> Option<PathBuf> {
        Self::EXTENSIONS
            .iter()
            .map(|ext| self.root.join(format!("{camera}.{ext}")))
            .find(|path| path.is_file())
    }
}

impl FrameSource for DirectoryFrameSource {
    fn fetch(&self, request: &FeedRequest) -> Result<image::DynamicImage, FeedError> {
        let path = self
            .frame_path(request.camera)
            .ok_or(FeedError::NotFound(request.camera.0))?;

        let bytes = std::fs::read(&path)?;
        let frame = image::load_from_memory(&bytes)?;
        log::debug!(
            "Loaded frame for camera {} from {}: {}x{}",
            request.camera,
            path.display(),
            frame.width(),
            frame.height()
        );
        Ok(frame)
    }
}

/// Convert a decoded frame into something egui can upload as a texture
pub fn to_color_image(frame: &image::DynamicImage) -> egui::ColorImage {
    let rgba = frame.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw())
}
