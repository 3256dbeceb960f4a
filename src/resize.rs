//! Observation of the displayed image box.
//!
//! The UI publishes the size the camera image is displayed at every frame; an
//! editor session subscribes once and drains new sizes when it needs them.
//! Dropping the subscription ends it, and the feed forgets the subscriber on
//! its next publish.

use futures::channel::mpsc::{UnboundedReceiver, UnboundedSender, unbounded};
use log::debug;

use crate::geometry::SurfaceSize;

/// Publishes surface size changes to its subscribers
#[derive(Debug, Default)]
pub struct SurfaceResizeFeed {
    last: Option<SurfaceSize>,
    subscribers: Vec<UnboundedSender<SurfaceSize>>,
}

impl SurfaceResizeFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start observing. The current size, if one was published, is delivered immediately.
    pub fn subscribe(&mut self) -> ResizeSubscription {
        let (tx, rx) = unbounded();
        if let Some(size) = self.last {
            let _ = tx.unbounded_send(size);
        }
        self.subscribers.push(tx);
        ResizeSubscription { rx }
    }

    /// Report the current size. Returns true if it differed from the previous one.
    pub fn publish(&mut self, size: SurfaceSize) -> bool {
        if self.last == Some(size) {
            return false;
        }

        debug!("Surface resized to {}x{}", size.width, size.height);
        self.last = Some(size);
        self.subscribers
            .retain(|tx| tx.unbounded_send(size).is_ok());
        true
    }

    pub fn subscriber_count(&mut self) -> usize {
        self.subscribers.retain(|tx| !tx.is_closed());
        self.subscribers.len()
    }
}

/// A live subscription to surface size changes
#[derive(Debug)]
pub struct ResizeSubscription {
    rx: UnboundedReceiver<SurfaceSize>,
}

impl ResizeSubscription {
    /// The most recent size published since the last call, if any
    pub fn latest(&mut self) -> Option<SurfaceSize> {
        let mut latest = None;
        while let Ok(Some(size)) = self.rx.try_next() {
            latest = Some(size);
        }
        latest
    }
}
