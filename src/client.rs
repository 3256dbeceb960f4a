//! The ROI persistence endpoint, seen from the editor.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::FutureExt;
use futures::channel::oneshot;
use futures::future::{self, BoxFuture};
use log::{error, info, warn};
use parking_lot::Mutex;

use crate::error::TransportError;
use crate::payload::{Ack, CameraId, Roi, RoiPayload};

/// Stores the region of interest for a camera
pub trait RoiClient: Send + Sync {
    /// Submit one region. The future resolves with the endpoint's acknowledgement.
    fn set_roi(&self, payload: RoiPayload) -> BoxFuture<'static, Result<Ack, TransportError>>;
}

/// In-process store. Keeps every request it receives and can be told to fail.
#[derive(Debug, Clone, Default)]
pub struct MemoryRoiStore {
    inner: Arc<Mutex<MemoryInner>>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    requests: Vec<RoiPayload>,
    fail_with: Option<TransportError>,
}

impl MemoryRoiStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following request fail with `err` (or succeed again with `None`)
    pub fn fail_with(&self, err: Option<TransportError>) {
        self.inner.lock().fail_with = err;
    }

    pub fn requests(&self) -> Vec<RoiPayload> {
        self.inner.lock().requests.clone()
    }

    /// The latest region stored for `camera`
    pub fn get(&self, camera: CameraId) -> Option<Roi> {
        self.inner
            .lock()
            .requests
            .iter()
            .rev()
            .find(|p| p.camera_id == camera)
            .map(|p| p.roi.clone())
    }
}

impl RoiClient for MemoryRoiStore {
    fn set_roi(&self, payload: RoiPayload) -> BoxFuture<'static, Result<Ack, TransportError>> {
        let mut inner = self.inner.lock();
        if let Some(err) = inner.fail_with.clone() {
            return future::ready(Err(err)).boxed();
        }
        inner.requests.push(payload);
        future::ready(Ok(Ack::ok())).boxed()
    }
}

/// Keeps the latest region per camera in a JSON file.
///
/// Writes happen on a worker thread so the UI keeps running while the file
/// is written.
#[derive(Debug, Clone)]
pub struct JsonFileRoiStore {
    path: PathBuf,
    regions: Arc<Mutex<BTreeMap<CameraId, Roi>>>,
    /// When set, regions for any other camera are refused
    cameras: Option<BTreeSet<CameraId>>,
}

impl JsonFileRoiStore {
    /// Open the store at `path`, loading previously saved regions if the file exists
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, TransportError> {
        let path = path.into();
        let regions = if path.exists() {
            let text = std::fs::read_to_string(&path).map_err(|e| TransportError::Io(e.to_string()))?;
            serde_json::from_str(&text).map_err(|e| TransportError::Io(e.to_string()))?
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            path,
            regions: Arc::new(Mutex::new(regions)),
            cameras: None,
        })
    }

    /// Only accept regions for `cameras`
    pub fn with_cameras(mut self, cameras: impl IntoIterator<Item = CameraId>) -> Self {
        self.cameras = Some(cameras.into_iter().collect());
        self
    }

    pub fn get(&self, camera: CameraId) -> Option<Roi> {
        self.regions.lock().get(&camera).cloned()
    }

    fn write(path: &Path, regions: &BTreeMap<CameraId, Roi>) -> Result<(), TransportError> {
        let json = serde_json::to_string_pretty(regions).map_err(|e| TransportError::Io(e.to_string()))?;
        std::fs::write(path, json).map_err(|e| TransportError::Io(e.to_string()))
    }
}

impl RoiClient for JsonFileRoiStore {
    fn set_roi(&self, payload: RoiPayload) -> BoxFuture<'static, Result<Ack, TransportError>> {
        if let Err(err) = payload.roi.validate() {
            return future::ready(Ok(Ack::rejected(err.to_string()))).boxed();
        }
        if let Some(cameras) = &self.cameras {
            if !cameras.contains(&payload.camera_id) {
                warn!("Refusing ROI for unknown camera {}", payload.camera_id);
                return future::ready(Ok(Ack::rejected("Camera not found"))).boxed();
            }
        }

        let (tx, rx) = oneshot::channel();
        let path = self.path.clone();
        let regions = Arc::clone(&self.regions);

        std::thread::spawn(move || {
            let mut regions = regions.lock();
            let previous = regions.insert(payload.camera_id, payload.roi.clone());
            let result = match Self::write(&path, &regions) {
                Ok(()) => {
                    info!("Stored ROI for camera {} in {}", payload.camera_id, path.display());
                    Ok(Ack::ok())
                }
                Err(err) => {
                    error!("Failed to store ROI for camera {}: {}", payload.camera_id, err);
                    // Keep the in-memory view in line with the file
                    match previous {
                        Some(roi) => regions.insert(payload.camera_id, roi),
                        None => regions.remove(&payload.camera_id),
                    };
                    Err(err)
                }
            };
            let _ = tx.send(result);
        });

        rx.map(|answer| answer.unwrap_or(Err(TransportError::Disconnected)))
            .boxed()
    }
}
