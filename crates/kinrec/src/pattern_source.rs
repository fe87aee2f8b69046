//! Built-in test-pattern frame source.
//!
//! Drives the three pipeline handlers from independently clocked tasks the
//! way the vendor driver would, so the full capture path can run without
//! camera hardware. Each task awaits its own handler call, which preserves
//! the driver's guarantee of at most one in-flight callback per stream.

use crate::config::SensorConfig;

use std::{sync::Arc, time::Duration};

use kinrec_core::{
    BodyFrameView, CameraPoint, ColorFrameView, CoordinateMapper, DepthFrameView,
    FrameDescription, FramePipeline, HandState, PixelFormat, ProjectedPoint, RawBody,
    TrackingState,
};
use tokio::{sync::watch, task::JoinHandle, time};
use tracing::info;

const FRAME_INTERVAL: Duration = Duration::from_millis(33);
const BODY_SLOT_COUNT: usize = 6;
const MIN_RELIABLE_MM: u16 = 500;
const MAX_RELIABLE_MM: u16 = 4500;

/// Pinhole projection onto the color image plane.
pub struct PinholeMapper {
    focal: f32,
    center_x: f32,
    center_y: f32,
}

impl PinholeMapper {
    /// A mapper centered on the given color geometry.
    pub fn new(color: FrameDescription) -> Self {
        Self {
            focal: 1050.0,
            center_x: color.width as f32 / 2.0,
            center_y: color.height as f32 / 2.0,
        }
    }
}

impl CoordinateMapper for PinholeMapper {
    fn map_camera_point_to_color_space(&self, point: CameraPoint) -> ProjectedPoint {
        // Guard the divide; a zero-depth point projects to the center.
        let depth = if point.z.abs() > f32::EPSILON {
            point.z
        } else {
            1.0
        };
        ProjectedPoint {
            x: self.focal * point.x / depth + self.center_x,
            y: -self.focal * point.y / depth + self.center_y,
        }
    }
}

/// Synthetic three-stream frame generator.
pub struct PatternSource {
    pipeline: Arc<FramePipeline>,
    color: FrameDescription,
    depth: FrameDescription,
}

impl PatternSource {
    /// Create a source matching the configured stream geometries.
    pub fn new(pipeline: Arc<FramePipeline>, sensor: &SensorConfig) -> Self {
        Self {
            pipeline,
            color: sensor.color_description(),
            depth: sensor.depth_description(),
        }
    }

    /// Spawn the three stream tasks. Each ends when the shutdown signal
    /// fires.
    pub fn spawn(self, shutdown_rx: watch::Receiver<bool>) -> Vec<JoinHandle<()>> {
        info!(
            color = ?self.color,
            depth = ?self.depth,
            "Pattern frame source starting"
        );

        vec![
            tokio::spawn(run_color(
                Arc::clone(&self.pipeline),
                self.color,
                shutdown_rx.clone(),
            )),
            tokio::spawn(run_depth(
                Arc::clone(&self.pipeline),
                self.depth,
                shutdown_rx.clone(),
            )),
            tokio::spawn(run_body(Arc::clone(&self.pipeline), shutdown_rx)),
        ]
    }
}

async fn run_color(
    pipeline: Arc<FramePipeline>,
    description: FrameDescription,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let mut interval = time::interval(FRAME_INTERVAL);
    let mut buffer = vec![0u8; description.pixel_count() * 4];
    let mut phase = 0u32;

    loop {
        tokio::select! {
            _ = shutdown_rx.changed() => break,
            _ = interval.tick() => {}
        }

        fill_color_pattern(&mut buffer, description, phase);
        pipeline.on_color_frame(Some(ColorFrameView {
            description,
            format: PixelFormat::Bgra,
            data: &buffer,
        }));
        phase = phase.wrapping_add(1);
    }
}

async fn run_depth(
    pipeline: Arc<FramePipeline>,
    description: FrameDescription,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let mut interval = time::interval(FRAME_INTERVAL);
    let mut samples = vec![0u16; description.pixel_count()];
    let mut phase = 0u32;

    loop {
        tokio::select! {
            _ = shutdown_rx.changed() => break,
            _ = interval.tick() => {}
        }

        fill_depth_pattern(&mut samples, description, phase);
        pipeline.on_depth_frame(Some(DepthFrameView {
            description,
            min_reliable_distance: MIN_RELIABLE_MM,
            max_reliable_distance: MAX_RELIABLE_MM,
            samples: &samples,
        }));
        phase = phase.wrapping_add(1);
    }
}

async fn run_body(pipeline: Arc<FramePipeline>, mut shutdown_rx: watch::Receiver<bool>) {
    let mut interval = time::interval(FRAME_INTERVAL);
    // The driver reuses its slot array across frames; so does the pattern.
    let mut slots = vec![RawBody::default(); BODY_SLOT_COUNT];
    let mut phase = 0u32;

    loop {
        tokio::select! {
            _ = shutdown_rx.changed() => break,
            _ = interval.tick() => {}
        }

        refresh_body_slots(&mut slots, phase);
        pipeline.on_body_frame(Some(BodyFrameView { bodies: &slots }));
        phase = phase.wrapping_add(1);
    }
}

fn fill_color_pattern(buffer: &mut [u8], description: FrameDescription, phase: u32) {
    let width = description.width as usize;
    for (index, pixel) in buffer.chunks_exact_mut(4).enumerate() {
        let x = (index % width) as u32;
        let y = (index / width) as u32;
        pixel[0] = (x.wrapping_add(phase)) as u8;
        pixel[1] = y as u8;
        pixel[2] = (x.wrapping_add(y).wrapping_add(phase)) as u8;
        pixel[3] = 0;
    }
}

fn fill_depth_pattern(samples: &mut [u16], description: FrameDescription, phase: u32) {
    let width = description.width as usize;
    // A plane sweeping back and forth through the reliable range, with the
    // left edge held out of range to exercise the black sentinel.
    let span = u32::from(MAX_RELIABLE_MM - MIN_RELIABLE_MM);
    let offset = phase.wrapping_mul(16) % (span * 2);
    let base = if offset < span {
        u32::from(MIN_RELIABLE_MM) + offset
    } else {
        u32::from(MIN_RELIABLE_MM) + (span * 2 - offset)
    };

    for (index, sample) in samples.iter_mut().enumerate() {
        let x = index % width;
        *sample = if x < width / 16 {
            MIN_RELIABLE_MM.saturating_sub(100)
        } else {
            base.min(u32::from(u16::MAX)) as u16
        };
    }
}

fn refresh_body_slots(slots: &mut [RawBody], phase: u32) {
    let t = phase as f32 * FRAME_INTERVAL.as_secs_f32();
    let sway = (t * 1.3).sin() * 0.25;

    let body = &mut slots[0];
    body.is_tracked = true;
    for (index, joint) in body.joints.iter_mut().enumerate() {
        let spread = index as f32 * 0.04 - 0.5;
        joint.position = CameraPoint {
            x: sway + spread * 0.3,
            y: 0.6 - index as f32 * 0.05,
            z: 2.0 + (t + spread).cos() * 0.1,
        };
        // The lower joints drop to inferred while the body sways left, so
        // the overlay policy sees mixed tracking states.
        joint.tracking_state = if index >= 17 && sway < 0.0 {
            TrackingState::Inferred
        } else {
            TrackingState::Tracked
        };
    }

    body.left_hand_state = match (phase / 60) % 3 {
        0 => HandState::Open,
        1 => HandState::Closed,
        _ => HandState::Lasso,
    };
    body.right_hand_state = match ((phase / 60) + 1) % 3 {
        0 => HandState::Open,
        1 => HandState::Closed,
        _ => HandState::Lasso,
    };
}
