mod body;
mod display;
mod frame;
mod mapper;

pub use {
    body::{
        CameraPoint, HandState, Joint, JointType, ProjectedPoint, RawBody, RawJoint, TrackedBody,
        TrackingState,
    },
    display::DisplaySink,
    frame::{BodyFrameView, ColorFrameView, DepthFrameView, FrameDescription, PixelFormat},
    mapper::CoordinateMapper,
};
