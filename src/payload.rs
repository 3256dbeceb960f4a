//! Wire format for regions of interest.
//!
//! ```json
//! { "id": 3, "roi": { "type": "rect", "points": [0.25, 0.1667, 0.5, 0.5] } }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::PayloadError;

/// Identifier of a camera in the dashboard's camera registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CameraId(pub u32);

impl fmt::Display for CameraId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeType {
    Rect,
    Circle,
    /// Polygons and freehand outlines
    #[serde(alias = "freehand")]
    Poly,
}

/// Normalized coordinates, laid out according to the shape type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RoiPoints {
    /// `[[x0, y0], [x1, y1], ...]` for polygons
    Pairs(Vec<[f32; 2]>),
    /// `[x, y, w, h]` for rectangles, `[x, y, r]` for circles
    Flat(Vec<f32>),
}

impl RoiPoints {
    fn values(&self) -> Box<dyn Iterator<Item = f32> + '_> {
        match self {
            RoiPoints::Pairs(pairs) => Box::new(pairs.iter().flatten().copied()),
            RoiPoints::Flat(values) => Box::new(values.iter().copied()),
        }
    }
}

/// A region in normalized space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roi {
    #[serde(rename = "type")]
    pub shape_type: ShapeType,
    pub points: RoiPoints,
}

impl Roi {
    pub fn new(shape_type: ShapeType, points: RoiPoints) -> Self {
        Self { shape_type, points }
    }

    /// Check the point layout matches the shape type and every value is in [0, 1]
    pub fn validate(&self) -> Result<(), PayloadError> {
        match (&self.shape_type, &self.points) {
            (ShapeType::Rect, RoiPoints::Flat(values)) if values.len() == 4 => {}
            (ShapeType::Circle, RoiPoints::Flat(values)) if values.len() == 3 => {}
            (ShapeType::Poly, RoiPoints::Pairs(pairs)) if pairs.len() >= 3 => {}
            (shape_type, points) => {
                return Err(PayloadError::Layout {
                    shape_type: *shape_type,
                    found: match points {
                        RoiPoints::Pairs(pairs) => pairs.len(),
                        RoiPoints::Flat(values) => values.len(),
                    },
                });
            }
        }

        if let Some(value) = self.points.values().find(|v| !(0.0..=1.0).contains(v)) {
            return Err(PayloadError::OutOfRange(value));
        }
        Ok(())
    }
}

/// The request sent to the ROI persistence endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoiPayload {
    #[serde(rename = "id")]
    pub camera_id: CameraId,
    pub roi: Roi,
}

impl RoiPayload {
    pub fn shape_type(&self) -> ShapeType {
        self.roi.shape_type
    }

    pub fn points(&self) -> &RoiPoints {
        &self.roi.points
    }
}

/// Acknowledgement returned by the persistence endpoint
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Ack {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Ack {
    pub fn ok() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}
