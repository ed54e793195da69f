// src/core/recording.rs — Device capture lifecycle
//
// Capture is a scoped resource: a handle is acquired only for an active
// recording and is released on stop, on error and when the recorder drops.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::types::DeviceConstraints;
use crate::infra::errors::DeviceError;

/// Grants access to capture devices.
#[async_trait]
pub trait CaptureBackend: Send + Sync {
    fn name(&self) -> &str;

    async fn request_access(
        &self,
        constraints: DeviceConstraints,
    ) -> Result<CaptureHandle, DeviceError>;
}

/// Access to the requested devices. Dropping it releases them.
#[derive(Debug)]
pub struct CaptureHandle {
    pub id: String,
    pub constraints: DeviceConstraints,
    release_counter: Option<Arc<AtomicUsize>>,
}

impl CaptureHandle {
    pub fn new(constraints: DeviceConstraints) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            constraints,
            release_counter: None,
        }
    }

    /// Count releases into `counter` (lets backends and tests observe cleanup).
    pub fn with_release_counter(mut self, counter: Arc<AtomicUsize>) -> Self {
        self.release_counter = Some(counter);
        self
    }
}

impl Drop for CaptureHandle {
    fn drop(&mut self) {
        if let Some(ref counter) = self.release_counter {
            counter.fetch_add(1, Ordering::SeqCst);
        }
        tracing::debug!("Capture {} released", self.id);
    }
}

/// Raw captured data. Nothing downstream transcribes it.
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedChunk {
    pub sequence: u32,
    pub captured_at: DateTime<Utc>,
    pub video: bool,
    pub audio: bool,
}

/// A capture in progress.
#[derive(Debug)]
pub struct ActiveCapture {
    handle: CaptureHandle,
    started_at: DateTime<Utc>,
    chunks: Vec<CapturedChunk>,
}

impl ActiveCapture {
    pub fn id(&self) -> &str {
        &self.handle.id
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }
}

/// Owns at most one capture at a time.
pub struct Recorder {
    backend: Arc<dyn CaptureBackend>,
    active: Option<ActiveCapture>,
}

impl Recorder {
    pub fn new(backend: Arc<dyn CaptureBackend>) -> Self {
        Self {
            backend,
            active: None,
        }
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    pub async fn acquire(
        &self,
        constraints: DeviceConstraints,
    ) -> Result<CaptureHandle, DeviceError> {
        if !constraints.video && !constraints.audio {
            return Err(DeviceError::Other(
                "at least one of camera or microphone must be enabled".into(),
            ));
        }
        self.backend.request_access(constraints).await
    }

    /// Begin capturing with `handle`. Any previous capture is released first.
    pub fn start(&mut self, handle: CaptureHandle) -> &ActiveCapture {
        if let Some(previous) = self.active.take() {
            tracing::warn!("Replacing capture {} that was never stopped", previous.id());
        }
        tracing::info!(
            "Capture {} started (video={}, audio={})",
            handle.id,
            handle.constraints.video,
            handle.constraints.audio
        );
        self.active.insert(ActiveCapture {
            handle,
            started_at: Utc::now(),
            chunks: Vec::new(),
        })
    }

    /// Append a data chunk to the active capture, if any.
    pub fn record_chunk(&mut self) {
        if let Some(ref mut active) = self.active {
            let constraints = active.handle.constraints;
            let sequence = active.chunks.len() as u32;
            active.chunks.push(CapturedChunk {
                sequence,
                captured_at: Utc::now(),
                video: constraints.video,
                audio: constraints.audio,
            });
        }
    }

    /// Stop and release the capture, returning whatever was collected.
    pub fn stop(&mut self) -> Vec<CapturedChunk> {
        match self.active.take() {
            Some(active) => {
                tracing::info!(
                    "Capture {} stopped after {}s with {} chunk(s)",
                    active.id(),
                    (Utc::now() - active.started_at).num_seconds(),
                    active.chunks.len()
                );
                active.chunks
            }
            None => Vec::new(),
        }
    }

    pub fn active(&self) -> Option<&ActiveCapture> {
        self.active.as_ref()
    }

    pub fn is_capturing(&self) -> bool {
        self.active.is_some()
    }
}

/// Backend that grants access without touching hardware, or fails on demand.
#[derive(Debug, Default)]
pub struct SimulatedCapture {
    failure: Option<DeviceError>,
    requests: AtomicUsize,
    releases: Arc<AtomicUsize>,
}

impl SimulatedCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every request fails with `error`.
    pub fn failing(error: DeviceError) -> Self {
        Self {
            failure: Some(error),
            ..Self::default()
        }
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn releases(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CaptureBackend for SimulatedCapture {
    fn name(&self) -> &str {
        "simulated"
    }

    async fn request_access(
        &self,
        constraints: DeviceConstraints,
    ) -> Result<CaptureHandle, DeviceError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if let Some(ref err) = self.failure {
            tracing::warn!("Simulated device failure: {}", err);
            return Err(err.clone());
        }
        Ok(CaptureHandle::new(constraints).with_release_counter(self.releases.clone()))
    }
}
