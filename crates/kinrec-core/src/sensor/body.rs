//! Body-tracking data model: joint types, tracking states, hand states, and
//! the owned per-body record produced by the skeleton extractor.

use std::fmt;

/// A point in 3D camera space, in meters.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CameraPoint {
    /// Horizontal offset from the sensor axis.
    pub x: f32,
    /// Vertical offset from the sensor axis.
    pub y: f32,
    /// Distance from the sensor plane.
    pub z: f32,
}

/// A point in 2D projected (color-image-aligned) space, in pixels.
///
/// The coordinate mapper is a total function: off-frustum results are still
/// valid values (possibly off-canvas), and consumers decide whether to clip.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProjectedPoint {
    /// Horizontal pixel coordinate.
    pub x: f32,
    /// Vertical pixel coordinate.
    pub y: f32,
}

/// Per-joint confidence classification reported by the tracking hardware.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TrackingState {
    /// The joint was not observed at all.
    #[default]
    NotTracked,
    /// The joint position is an estimate derived from neighboring joints.
    Inferred,
    /// The joint was directly observed.
    Tracked,
}

impl TrackingState {
    /// Stable name used in the skeleton text format.
    pub fn as_str(self) -> &'static str {
        match self {
            TrackingState::NotTracked => "NotTracked",
            TrackingState::Inferred => "Inferred",
            TrackingState::Tracked => "Tracked",
        }
    }
}

impl fmt::Display for TrackingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hand gesture classification reported by the tracking hardware.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HandState {
    /// The hand state could not be determined.
    #[default]
    Unknown,
    /// The hand is not tracked.
    NotTracked,
    /// Open palm.
    Open,
    /// Closed fist.
    Closed,
    /// Lasso (pointer) gesture.
    Lasso,
}

impl HandState {
    /// Stable name used in the skeleton text format.
    pub fn as_str(self) -> &'static str {
        match self {
            HandState::Unknown => "Unknown",
            HandState::NotTracked => "NotTracked",
            HandState::Open => "Open",
            HandState::Closed => "Closed",
            HandState::Lasso => "Lasso",
        }
    }
}

impl fmt::Display for HandState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The fixed joint enumeration. Every tracked body carries exactly one joint
/// per variant; discriminants double as indices into per-body joint arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(usize)]
#[allow(missing_docs)]
pub enum JointType {
    SpineBase = 0,
    SpineMid = 1,
    Neck = 2,
    Head = 3,
    ShoulderLeft = 4,
    ElbowLeft = 5,
    WristLeft = 6,
    HandLeft = 7,
    ShoulderRight = 8,
    ElbowRight = 9,
    WristRight = 10,
    HandRight = 11,
    HipLeft = 12,
    KneeLeft = 13,
    AnkleLeft = 14,
    FootLeft = 15,
    HipRight = 16,
    KneeRight = 17,
    AnkleRight = 18,
    FootRight = 19,
    SpineShoulder = 20,
    HandTipLeft = 21,
    ThumbLeft = 22,
    HandTipRight = 23,
    ThumbRight = 24,
}

impl JointType {
    /// Number of joint types per body.
    pub const COUNT: usize = 25;

    /// Every joint type, in discriminant order. This is also the line order
    /// of the skeleton text format.
    pub const ALL: [JointType; JointType::COUNT] = [
        JointType::SpineBase,
        JointType::SpineMid,
        JointType::Neck,
        JointType::Head,
        JointType::ShoulderLeft,
        JointType::ElbowLeft,
        JointType::WristLeft,
        JointType::HandLeft,
        JointType::ShoulderRight,
        JointType::ElbowRight,
        JointType::WristRight,
        JointType::HandRight,
        JointType::HipLeft,
        JointType::KneeLeft,
        JointType::AnkleLeft,
        JointType::FootLeft,
        JointType::HipRight,
        JointType::KneeRight,
        JointType::AnkleRight,
        JointType::FootRight,
        JointType::SpineShoulder,
        JointType::HandTipLeft,
        JointType::ThumbLeft,
        JointType::HandTipRight,
        JointType::ThumbRight,
    ];

    /// Stable name used in the skeleton text format.
    pub fn as_str(self) -> &'static str {
        match self {
            JointType::SpineBase => "SpineBase",
            JointType::SpineMid => "SpineMid",
            JointType::Neck => "Neck",
            JointType::Head => "Head",
            JointType::ShoulderLeft => "ShoulderLeft",
            JointType::ElbowLeft => "ElbowLeft",
            JointType::WristLeft => "WristLeft",
            JointType::HandLeft => "HandLeft",
            JointType::ShoulderRight => "ShoulderRight",
            JointType::ElbowRight => "ElbowRight",
            JointType::WristRight => "WristRight",
            JointType::HandRight => "HandRight",
            JointType::HipLeft => "HipLeft",
            JointType::KneeLeft => "KneeLeft",
            JointType::AnkleLeft => "AnkleLeft",
            JointType::FootLeft => "FootLeft",
            JointType::HipRight => "HipRight",
            JointType::KneeRight => "KneeRight",
            JointType::AnkleRight => "AnkleRight",
            JointType::FootRight => "FootRight",
            JointType::SpineShoulder => "SpineShoulder",
            JointType::HandTipLeft => "HandTipLeft",
            JointType::ThumbLeft => "ThumbLeft",
            JointType::HandTipRight => "HandTipRight",
            JointType::ThumbRight => "ThumbRight",
        }
    }
}

impl fmt::Display for JointType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw per-joint data as delivered by the driver.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawJoint {
    /// Tracking confidence for this joint.
    pub tracking_state: TrackingState,
    /// Position in 3D camera space.
    pub position: CameraPoint,
}

/// One slot of the driver's fixed-size body array.
///
/// The driver refreshes these slots in place on every body frame; anything
/// needed beyond the callback must be copied into an owned [`TrackedBody`]
/// via the skeleton extractor.
#[derive(Debug, Clone)]
pub struct RawBody {
    /// Whether this slot currently holds a tracked body.
    pub is_tracked: bool,
    /// One entry per [`JointType`], indexed by discriminant.
    pub joints: [RawJoint; JointType::COUNT],
    /// Gesture state of the left hand.
    pub left_hand_state: HandState,
    /// Gesture state of the right hand.
    pub right_hand_state: HandState,
}

impl Default for RawBody {
    fn default() -> Self {
        Self {
            is_tracked: false,
            joints: [RawJoint::default(); JointType::COUNT],
            left_hand_state: HandState::Unknown,
            right_hand_state: HandState::Unknown,
        }
    }
}

/// One joint of an extracted body: raw tracking data plus the projected
/// 2D position obtained from the coordinate mapper.
#[derive(Debug, Clone, Copy)]
pub struct Joint {
    /// Which joint this is.
    pub joint_type: JointType,
    /// Tracking confidence for this joint.
    pub tracking_state: TrackingState,
    /// Position in 3D camera space.
    pub position: CameraPoint,
    /// Position mapped into 2D projected space.
    pub projected: ProjectedPoint,
}

/// An owned, frame-scoped copy of one tracked body.
///
/// Holds exactly one joint per [`JointType`]; partial skeletons cannot be
/// constructed.
#[derive(Debug, Clone)]
pub struct TrackedBody {
    joints: [Joint; JointType::COUNT],
    /// Gesture state of the left hand, passed through from the driver.
    pub left_hand_state: HandState,
    /// Gesture state of the right hand, passed through from the driver.
    pub right_hand_state: HandState,
}

impl TrackedBody {
    pub(crate) fn new(
        joints: [Joint; JointType::COUNT],
        left_hand_state: HandState,
        right_hand_state: HandState,
    ) -> Self {
        Self {
            joints,
            left_hand_state,
            right_hand_state,
        }
    }

    /// The joint of the given type.
    pub fn joint(&self, joint_type: JointType) -> &Joint {
        &self.joints[joint_type as usize]
    }

    /// All joints in [`JointType::ALL`] order.
    pub fn joints(&self) -> impl Iterator<Item = &Joint> {
        self.joints.iter()
    }
}
