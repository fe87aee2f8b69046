//! Frame ingestion: three independent per-stream handlers.
//!
//! The driver guarantees at most one in-flight callback per stream, but the
//! three streams (and the command path) run concurrently with respect to one
//! another. Each handler copies what it needs out of the transient frame,
//! updates its display buffer, and consults the session controller for a
//! persistence decision under the controller's lock.
//!
//! Persistence policy: depth and skeleton writes happen synchronously inside
//! their callbacks; color frames arrive fastest and carry the largest
//! payload, so their binary write can be taken off the callback path with
//! [`ColorWritePolicy::Background`]. The asymmetry is a backpressure
//! trade-off the caller chooses explicitly.

use std::{
    sync::{
        Arc, Mutex, MutexGuard,
        atomic::{AtomicU64, Ordering},
    },
    time::{Duration, Instant},
};

use tokio::runtime::Handle;
use tracing::{debug, error, instrument, trace};

use crate::{
    CoreResult,
    pipeline::{color, depth, skeleton, status::StatusMonitor},
    recording::{SessionController, writer},
    sensor::{
        BodyFrameView, ColorFrameView, CoordinateMapper, DepthFrameView, DisplaySink,
        FrameDescription, TrackedBody,
    },
};

/// How persisted color frames reach the disk.
#[derive(Debug, Clone)]
pub enum ColorWritePolicy {
    /// Write within the color callback, like depth and skeleton. The color
    /// stream then blocks for the duration of each disk write.
    Inline,
    /// Fire-and-forget the write onto the runtime's blocking pool. The
    /// callback only pays for one buffer copy; a stop may let at most one
    /// already dispatched write land afterwards.
    Background(Handle),
}

/// Per-stream counters of handler failures.
///
/// Transient frame unavailability is expected and not counted; only true
/// faults (conversion or storage errors) land here.
#[derive(Debug, Default)]
pub struct FaultCounters {
    color: AtomicU64,
    depth: AtomicU64,
    body: AtomicU64,
}

impl FaultCounters {
    /// Faults observed on the color stream.
    pub fn color(&self) -> u64 {
        self.color.load(Ordering::Relaxed)
    }

    /// Faults observed on the depth stream.
    pub fn depth(&self) -> u64 {
        self.depth.load(Ordering::Relaxed)
    }

    /// Faults observed on the body stream.
    pub fn body(&self) -> u64 {
        self.body.load(Ordering::Relaxed)
    }
}

/// Receives the three frame streams and drives conversion, display and
/// recording.
pub struct FramePipeline {
    controller: Arc<SessionController>,
    mapper: Arc<dyn CoordinateMapper>,
    display: Arc<dyn DisplaySink>,
    color_description: FrameDescription,
    depth_description: FrameDescription,
    color_write: ColorWritePolicy,
    color_pixels: Mutex<Vec<u8>>,
    depth_pixels: Mutex<Vec<u8>>,
    status: Mutex<StatusMonitor>,
    faults: FaultCounters,
}

impl FramePipeline {
    /// Status refresh interval: at most one frame-rate report per second.
    pub const STATUS_REFRESH: Duration = Duration::from_secs(1);

    /// Create a pipeline for the given stream geometries.
    pub fn new(
        controller: Arc<SessionController>,
        mapper: Arc<dyn CoordinateMapper>,
        display: Arc<dyn DisplaySink>,
        color_description: FrameDescription,
        depth_description: FrameDescription,
        color_write: ColorWritePolicy,
    ) -> Self {
        Self {
            controller,
            mapper,
            display,
            color_description,
            depth_description,
            color_write,
            color_pixels: Mutex::new(vec![0; color_description.pixel_count() * 4]),
            depth_pixels: Mutex::new(vec![0; depth_description.pixel_count() * 4]),
            status: Mutex::new(StatusMonitor::new(Self::STATUS_REFRESH)),
            faults: FaultCounters::default(),
        }
    }

    /// Per-stream fault counters.
    pub fn faults(&self) -> &FaultCounters {
        &self.faults
    }

    /// Handle one color frame arrival. `None` means the frame was dropped by
    /// the driver before acquisition; the tick is skipped.
    #[instrument(skip(self, frame))]
    pub fn on_color_frame(&self, frame: Option<ColorFrameView<'_>>) {
        let Some(frame) = frame else {
            trace!("Color frame no longer available");
            return;
        };

        if let Err(e) = self.handle_color(&frame) {
            self.faults.color.fetch_add(1, Ordering::Relaxed);
            error!(error = %e, "Color frame handler failed");
        }
    }

    /// Handle one depth frame arrival. `None` means the frame was dropped by
    /// the driver before acquisition; the tick is skipped.
    #[instrument(skip(self, frame))]
    pub fn on_depth_frame(&self, frame: Option<DepthFrameView<'_>>) {
        let Some(frame) = frame else {
            trace!("Depth frame no longer available");
            return;
        };

        if let Err(e) = self.handle_depth(&frame) {
            self.faults.depth.fetch_add(1, Ordering::Relaxed);
            error!(error = %e, "Depth frame handler failed");
        }
    }

    /// Handle one body frame arrival. `None` means the frame was dropped by
    /// the driver before acquisition; the tick is skipped.
    #[instrument(skip(self, frame))]
    pub fn on_body_frame(&self, frame: Option<BodyFrameView<'_>>) {
        let Some(frame) = frame else {
            trace!("Body frame no longer available");
            return;
        };

        if let Err(e) = self.handle_body(&frame) {
            self.faults.body.fetch_add(1, Ordering::Relaxed);
            error!(error = %e, "Body frame handler failed");
        }
    }

    fn handle_color(&self, frame: &ColorFrameView<'_>) -> CoreResult<()> {
        if frame.description != self.color_description {
            debug!(
                expected = ?self.color_description,
                actual = ?frame.description,
                "Discarding color frame with unexpected dimensions"
            );
            return Ok(());
        }

        let mut pixels = lock_buffer(&self.color_pixels);
        color::convert_to_bgra(frame, &mut pixels)?;
        self.display.present_color(frame.description, &pixels);

        if let Some(report) = lock_buffer(&self.status).record_frame(Instant::now()) {
            self.display.status(report);
        }

        let Some(job) = self.controller.next_color_frame() else {
            return Ok(());
        };

        let epoch_ms = writer::epoch_millis();
        writer::append_timestamp(&job.log_path, epoch_ms)?;

        match &self.color_write {
            ColorWritePolicy::Inline => {
                writer::persist_binary(&job.rgb_dir, "image", epoch_ms, &pixels)?;
            }
            ColorWritePolicy::Background(handle) => {
                // The display buffer is reused by the next arrival, so the
                // background task gets its own copy.
                let bytes = pixels.clone();
                handle.spawn_blocking(move || {
                    if let Err(e) = writer::persist_binary(&job.rgb_dir, "image", epoch_ms, &bytes)
                    {
                        error!(error = %e, "Background color write failed");
                    }
                });
            }
        }

        Ok(())
    }

    fn handle_depth(&self, frame: &DepthFrameView<'_>) -> CoreResult<()> {
        if frame.description != self.depth_description
            || frame.samples.len() != self.depth_description.pixel_count()
        {
            debug!(
                expected = ?self.depth_description,
                actual = ?frame.description,
                samples = frame.samples.len(),
                "Discarding depth frame with unexpected dimensions"
            );
            return Ok(());
        }

        let mut pixels = lock_buffer(&self.depth_pixels);
        depth::quantize_depth(
            frame.samples,
            frame.min_reliable_distance,
            frame.max_reliable_distance,
            &mut pixels,
        )?;
        self.display.present_depth(frame.description, &pixels);

        if let Some(job) = self.controller.depth_persist() {
            let epoch_ms = writer::epoch_millis();
            writer::persist_binary(&job.depth_dir, "depth", epoch_ms, &pixels)?;
            writer::append_timestamp(&job.log_path, epoch_ms)?;
        }

        Ok(())
    }

    fn handle_body(&self, frame: &BodyFrameView<'_>) -> CoreResult<()> {
        // Copy tracked slots out of the driver-owned array; the slots are
        // refreshed in place on the next frame.
        let bodies: Vec<TrackedBody> = frame
            .bodies
            .iter()
            .filter(|body| body.is_tracked)
            .map(|body| skeleton::extract_body(body, self.mapper.as_ref()))
            .collect();

        self.display.present_bodies(&bodies);

        if let Some(job) = self.controller.skeleton_persist() {
            for body in &bodies {
                let epoch_ms = writer::epoch_millis();
                writer::persist_skeleton(&job.skel_dir, epoch_ms, body, job.hand_detail)?;
                writer::append_timestamp(&job.log_path, epoch_ms)?;
            }
        }

        Ok(())
    }
}

fn lock_buffer<T>(buffer: &Mutex<T>) -> MutexGuard<'_, T> {
    // A poisoned buffer lock still holds valid pixel data; recover it.
    buffer.lock().unwrap_or_else(|e| {
        error!("Pipeline buffer lock poisoned, recovering");
        e.into_inner()
    })
}
