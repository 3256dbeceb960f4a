use thiserror::Error;

/// Errors raised while mapping between display and surface space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MappingError {
    /// The surface (or the element displaying it) has no area yet
    #[error("drawing surface is not laid out yet")]
    SurfaceNotLaidOut,
}

/// Reasons a finalized shape cannot be saved as a region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("rectangle has zero area")]
    ZeroArea,

    #[error("circle has zero radius")]
    ZeroRadius,

    #[error("polygon needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),
}

/// Failures reported by the persistence endpoint
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The endpoint answered but refused the region; the message is shown verbatim
    #[error("{0}")]
    Rejected(String),

    #[error("failed to reach ROI store: {0}")]
    Io(String),

    #[error("ROI store went away before answering")]
    Disconnected,
}

/// Errors returned by `RoiEditor::save`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SaveError {
    #[error("editor session is closed")]
    SessionClosed,

    #[error("no finalized shape to save")]
    NoShape,

    #[error("invalid region: {0}")]
    InvalidGeometry(#[from] GeometryError),

    #[error("drawing surface has no valid size")]
    SurfaceNotReady,

    #[error("a save is already in progress")]
    SaveInFlight,

    #[error("failed to save ROI: {0}")]
    Transport(#[from] TransportError),
}

/// Errors loading a camera frame
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("no frame available for camera {0}")]
    NotFound(u32),

    #[error("failed to read frame: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to decode frame: {0}")]
    Decode(#[from] image::ImageError),
}

/// Errors loading the editor configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A normalized region that does not match the wire contract
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum PayloadError {
    #[error("{shape_type:?} region has the wrong number of points ({found})")]
    Layout {
        shape_type: crate::payload::ShapeType,
        found: usize,
    },

    #[error("normalized coordinate {0} is outside [0, 1]")]
    OutOfRange(f32),
}
