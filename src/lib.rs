#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod client;
pub mod components;
pub mod config;
pub mod editor;
pub mod error;
pub mod feed;
pub mod geometry;
pub mod input;
pub mod mask;
pub mod panels;
pub mod payload;
pub mod renderer;
pub mod resize;
pub mod shape;
pub mod tools;
pub mod util;

pub use app::RoiApp;
pub use client::{JsonFileRoiStore, MemoryRoiStore, RoiClient};
pub use config::EditorConfig;
pub use editor::{EditorResponse, RoiEditor, SaveOutcome, SessionStatus};
pub use error::{SaveError, TransportError};
pub use geometry::{SurfaceBounds, SurfaceSize, to_normalized, to_surface};
pub use input::{InputEvent, InputLocation};
pub use payload::{Ack, CameraId, Roi, RoiPayload, RoiPoints, ShapeType};
pub use renderer::SurfaceRenderer;
pub use resize::{ResizeSubscription, SurfaceResizeFeed};
pub use shape::{Shape, ShapeView, Tool};
pub use tools::{RoiTool, ToolAction, ToolType};
