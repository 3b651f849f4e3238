use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};

use zonemark_core::{CameraId, ImageHandle};

use super::provider::FrameProvider;
use super::store::{DecodedImage, ImageStore, StoredImage};
use super::{Frame, SnapshotError};

#[derive(Debug, Clone, PartialEq)]
pub enum SnapshotStatus {
    Idle,
    Loading,
    Ready,
    Failed { message: String, unavailable: bool },
}

pub(crate) struct FetchOutcome {
    pub(crate) generation: u64,
    pub(crate) result: Result<Frame, SnapshotError>,
}

/// Fetches the backdrop snapshot for one camera and owns the decoded image.
///
/// Fetches run on a worker thread; their results are applied only when
/// the owner calls [`pump`](Self::pump) or [`wait`](Self::wait), so all
/// state changes happen on the owning thread. A newer request supersedes
/// any fetch still in flight.
pub struct SnapshotLoader {
    provider: Arc<dyn FrameProvider>,
    store: Box<dyn ImageStore>,
    camera: CameraId,
    status: SnapshotStatus,
    image: Option<StoredImage>,
    generation: u64,
    sender: Sender<FetchOutcome>,
    receiver: Receiver<FetchOutcome>,
    torn_down: bool,
}

impl SnapshotLoader {
    pub fn new(
        camera: CameraId,
        provider: Arc<dyn FrameProvider>,
        store: Box<dyn ImageStore>,
    ) -> Self {
        let (sender, receiver) = crossbeam_channel::unbounded();
        Self {
            provider,
            store,
            camera,
            status: SnapshotStatus::Idle,
            image: None,
            generation: 0,
            sender,
            receiver,
            torn_down: false,
        }
    }

    pub fn camera(&self) -> &CameraId {
        &self.camera
    }

    pub fn status(&self) -> &SnapshotStatus {
        &self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == SnapshotStatus::Loading
    }

    /// User-facing error text when the last fetch failed.
    pub fn error_message(&self) -> Option<&str> {
        match &self.status {
            SnapshotStatus::Failed { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn image(&self) -> Option<StoredImage> {
        self.image
    }

    pub fn handle(&self) -> Option<ImageHandle> {
        self.image.map(|img| img.handle)
    }

    pub fn decoded(&self) -> Option<&DecodedImage> {
        self.image.and_then(|img| self.store.image(img.handle))
    }

    /// Start a fetch. Returns the request's generation number.
    pub fn request(&mut self) -> u64 {
        if self.torn_down {
            log::warn!("Snapshot request for {} after teardown ignored", self.camera);
            return self.generation;
        }

        self.generation += 1;
        let generation = self.generation;
        self.status = SnapshotStatus::Loading;
        log::info!(
            "Requesting snapshot for camera {} (request {})",
            self.camera,
            generation
        );

        let provider = Arc::clone(&self.provider);
        let camera = self.camera.clone();
        let sender = self.sender.clone();
        let spawned = thread::Builder::new()
            .name("snapshot-fetch".to_string())
            .spawn(move || {
                let result = provider.fetch(&camera);
                // Receiver is gone once the loader is dropped
                let _ = sender.send(FetchOutcome { generation, result });
            });

        if let Err(e) = spawned {
            self.accept(FetchOutcome {
                generation,
                result: Err(SnapshotError::Io(format!("failed to start fetch: {}", e))),
            });
        }
        generation
    }

    /// Same as `request`; the previous image stays visible until replaced.
    pub fn refresh(&mut self) -> u64 {
        self.request()
    }

    /// Apply every completed fetch. Returns true if state changed.
    pub fn pump(&mut self) -> bool {
        let mut changed = false;
        while let Ok(outcome) = self.receiver.try_recv() {
            changed |= self.accept(outcome);
        }
        changed
    }

    /// Block until the current request settles or `timeout` elapses.
    /// Returns false on timeout.
    pub fn wait(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.is_loading() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.receiver.recv_timeout(remaining) {
                Ok(outcome) => {
                    self.accept(outcome);
                }
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                    log::warn!("Timed out waiting for snapshot of {}", self.camera);
                    return false;
                }
            }
        }
        true
    }

    pub(crate) fn accept(&mut self, outcome: FetchOutcome) -> bool {
        if self.torn_down {
            log::debug!(
                "Dropping snapshot result {} for {}: loader torn down",
                outcome.generation,
                self.camera
            );
            return false;
        }
        if outcome.generation != self.generation {
            log::debug!(
                "Dropping stale snapshot result {} for {} (current {})",
                outcome.generation,
                self.camera,
                self.generation
            );
            return false;
        }

        let created = outcome
            .result
            .and_then(|frame| self.store.create(&frame));
        match created {
            Ok(stored) => {
                if let Some(previous) = self.image.replace(stored) {
                    self.store.release(previous.handle);
                }
                self.status = SnapshotStatus::Ready;
                log::info!(
                    "Snapshot ready for camera {} ({}x{})",
                    self.camera,
                    stored.width,
                    stored.height
                );
            }
            Err(error) => {
                if error.is_unavailable() {
                    log::info!("{}", error);
                } else {
                    log::warn!("Snapshot for camera {} failed: {}", self.camera, error);
                }
                if let Some(previous) = self.image.take() {
                    self.store.release(previous.handle);
                }
                self.status = SnapshotStatus::Failed {
                    message: error.user_message(),
                    unavailable: error.is_unavailable(),
                };
            }
        }
        true
    }

    /// Release the owned image and ignore any later results.
    /// Returns false if already torn down.
    pub fn teardown(&mut self) -> bool {
        if self.torn_down {
            return false;
        }
        self.torn_down = true;
        if let Some(image) = self.image.take() {
            self.store.release(image.handle);
        }
        self.status = SnapshotStatus::Idle;
        log::debug!("Snapshot loader for {} torn down", self.camera);
        true
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }
}

impl Drop for SnapshotLoader {
    fn drop(&mut self) {
        self.teardown();
    }
}
