use std::path::{Path, PathBuf};

use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::geometry::POLYGON_SNAP_RADIUS;
use crate::payload::CameraId;
use crate::shape::Tool;

/// A camera the operator can set a region for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraEntry {
    pub id: CameraId,
    pub label: String,
}

/// Editor settings.
///
/// Every field has a default so a partial (or absent) config file works.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct EditorConfig {
    /// Distance from the first polygon vertex that closes the polygon, in surface pixels
    pub snap_radius: f32,
    /// RGB outline color of the region
    pub stroke_color: [u8; 3],
    pub stroke_width: f32,
    /// Opacity of the region fill, 0..=1
    pub fill_alpha: f32,
    /// Tool selected when an editor opens
    pub default_tool: Tool,
    /// Base of the dashboard API, used to build feed URLs
    pub api_base: String,
    /// Directory holding one still frame per camera (`<id>.png` / `<id>.jpg`)
    pub frames_dir: PathBuf,
    /// JSON file regions are stored in
    pub store_path: PathBuf,
    pub cameras: Vec<CameraEntry>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            snap_radius: POLYGON_SNAP_RADIUS,
            stroke_color: [46, 204, 113],
            stroke_width: 3.0,
            fill_alpha: 0.2,
            default_tool: Tool::Rectangle,
            api_base: String::new(),
            frames_dir: PathBuf::from("frames"),
            store_path: PathBuf::from("roi_store.json"),
            cameras: vec![
                CameraEntry {
                    id: CameraId(0),
                    label: "Camera 0".to_owned(),
                },
                CameraEntry {
                    id: CameraId(1),
                    label: "Camera 1".to_owned(),
                },
            ],
        }
    }
}

impl EditorConfig {
    /// Load the config from a JSON file. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&text)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn stroke_color(&self) -> Color32 {
        let [r, g, b] = self.stroke_color;
        Color32::from_rgb(r, g, b)
    }

    pub fn fill_color(&self) -> Color32 {
        let [r, g, b] = self.stroke_color;
        let alpha = (self.fill_alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
        Color32::from_rgba_unmultiplied(r, g, b, alpha)
    }

    pub fn camera_label(&self, id: CameraId) -> String {
        self.cameras
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.label.clone())
            .unwrap_or_else(|| format!("Camera {id}"))
    }
}
