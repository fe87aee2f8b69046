//! Shared test doubles: a deterministic coordinate mapper, a counting
//! display sink, and raw-body builders.

use std::sync::Mutex;

use crate::{
    CameraPoint, CoordinateMapper, DisplaySink, FrameDescription, HandState, JointType,
    ProjectedPoint, RawBody, StatusReport, TrackedBody, TrackingState,
};

/// Deterministic affine projection: `(100x + 960, -100y + 540)`.
pub(crate) struct AffineMapper;

impl CoordinateMapper for AffineMapper {
    fn map_camera_point_to_color_space(&self, point: CameraPoint) -> ProjectedPoint {
        ProjectedPoint {
            x: 100.0 * point.x + 960.0,
            y: -100.0 * point.y + 540.0,
        }
    }
}

/// Display sink that counts presentations.
#[derive(Default)]
pub(crate) struct CountingSink {
    pub color_frames: Mutex<u32>,
    pub depth_frames: Mutex<u32>,
    pub body_batches: Mutex<Vec<usize>>,
}

impl DisplaySink for CountingSink {
    fn present_color(&self, _description: FrameDescription, _pixels: &[u8]) {
        *self.color_frames.lock().unwrap_or_else(|e| e.into_inner()) += 1;
    }

    fn present_depth(&self, _description: FrameDescription, _pixels: &[u8]) {
        *self.depth_frames.lock().unwrap_or_else(|e| e.into_inner()) += 1;
    }

    fn present_bodies(&self, bodies: &[TrackedBody]) {
        self.body_batches
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(bodies.len());
    }

    fn status(&self, _report: StatusReport) {}

    fn countdown(&self, _remaining_secs: u32) {}
}

/// A fully tracked body with distinct per-joint positions and known hand
/// states.
pub(crate) fn tracked_raw_body() -> RawBody {
    let mut body = RawBody {
        is_tracked: true,
        left_hand_state: HandState::Open,
        right_hand_state: HandState::Closed,
        ..RawBody::default()
    };

    for (index, joint) in body.joints.iter_mut().enumerate() {
        joint.tracking_state = TrackingState::Tracked;
        joint.position = CameraPoint {
            x: 0.1 * index as f32,
            y: -0.05 * index as f32,
            z: 1.5 + 0.01 * index as f32,
        };
    }

    body
}

/// Sanity anchor: the joint enumeration and a body's joint array stay in
/// lockstep.
pub(crate) fn assert_full_skeleton(body: &TrackedBody) {
    let types: Vec<JointType> = body.joints().map(|joint| joint.joint_type).collect();
    assert_eq!(types, JointType::ALL.to_vec());
}
