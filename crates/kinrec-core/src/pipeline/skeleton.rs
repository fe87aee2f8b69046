//! Skeleton extraction and the overlay policies derived from joint tracking
//! states.
//!
//! The extractor copies a driver-owned body slot into an owned
//! [`TrackedBody`], projecting every joint through the coordinate mapper
//! exactly once. The bone table and the bone/joint visual policies are
//! consumed by the external overlay renderer.

use crate::sensor::{
    CoordinateMapper, Joint, JointType, RawBody, TrackedBody, TrackingState,
};

/// Visual weight the overlay renderer applies to a bone or joint marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayWeight {
    /// Both endpoints (or the joint) are directly observed.
    Tracked,
    /// At least one endpoint is an estimate.
    Inferred,
}

/// Joint-type pairs forming the skeleton's bones: torso, then right arm,
/// left arm, right leg, left leg.
pub const BONES: [(JointType, JointType); 24] = [
    // Torso
    (JointType::Head, JointType::Neck),
    (JointType::Neck, JointType::SpineShoulder),
    (JointType::SpineShoulder, JointType::SpineMid),
    (JointType::SpineMid, JointType::SpineBase),
    (JointType::SpineShoulder, JointType::ShoulderRight),
    (JointType::SpineShoulder, JointType::ShoulderLeft),
    (JointType::SpineBase, JointType::HipRight),
    (JointType::SpineBase, JointType::HipLeft),
    // Right arm
    (JointType::ShoulderRight, JointType::ElbowRight),
    (JointType::ElbowRight, JointType::WristRight),
    (JointType::WristRight, JointType::HandRight),
    (JointType::HandRight, JointType::HandTipRight),
    (JointType::WristRight, JointType::ThumbRight),
    // Left arm
    (JointType::ShoulderLeft, JointType::ElbowLeft),
    (JointType::ElbowLeft, JointType::WristLeft),
    (JointType::WristLeft, JointType::HandLeft),
    (JointType::HandLeft, JointType::HandTipLeft),
    (JointType::WristLeft, JointType::ThumbLeft),
    // Right leg
    (JointType::HipRight, JointType::KneeRight),
    (JointType::KneeRight, JointType::AnkleRight),
    (JointType::AnkleRight, JointType::FootRight),
    // Left leg
    (JointType::HipLeft, JointType::KneeLeft),
    (JointType::KneeLeft, JointType::AnkleLeft),
    (JointType::AnkleLeft, JointType::FootLeft),
];

/// Decide how a bone between two joints is drawn, if at all.
///
/// A bone is skipped when either endpoint is `NotTracked`, and also when both
/// endpoints are merely `Inferred`. It gets the tracked weight only when both
/// endpoints are `Tracked`; any remaining combination draws inferred.
pub fn bone_weight(a: TrackingState, b: TrackingState) -> Option<OverlayWeight> {
    if a == TrackingState::NotTracked || b == TrackingState::NotTracked {
        return None;
    }
    if a == TrackingState::Inferred && b == TrackingState::Inferred {
        return None;
    }
    if a == TrackingState::Tracked && b == TrackingState::Tracked {
        Some(OverlayWeight::Tracked)
    } else {
        Some(OverlayWeight::Inferred)
    }
}

/// Decide how a joint marker is drawn, if at all.
pub fn joint_weight(state: TrackingState) -> Option<OverlayWeight> {
    match state {
        TrackingState::Tracked => Some(OverlayWeight::Tracked),
        TrackingState::Inferred => Some(OverlayWeight::Inferred),
        TrackingState::NotTracked => None,
    }
}

/// Copy a driver-owned body slot into an owned record, projecting each joint
/// into 2D color-aligned space.
///
/// The mapper is called once per joint type. Off-frustum projections are
/// recorded as-is; clipping is the consumer's decision. Hand states pass
/// through unchanged.
pub fn extract_body(raw: &RawBody, mapper: &dyn CoordinateMapper) -> TrackedBody {
    let joints = JointType::ALL.map(|joint_type| {
        let raw_joint = raw.joints[joint_type as usize];
        Joint {
            joint_type,
            tracking_state: raw_joint.tracking_state,
            position: raw_joint.position,
            projected: mapper.map_camera_point_to_color_space(raw_joint.position),
        }
    });

    TrackedBody::new(joints, raw.left_hand_state, raw.right_hand_state)
}
