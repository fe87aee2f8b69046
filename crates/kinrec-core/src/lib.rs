//! KinRec Core Library
//!
//! Multi-stream depth-camera capture pipeline: depth quantization, skeleton
//! extraction, and synchronized recording with per-frame timestamp logs.
//!
//! Three independently clocked streams (color, depth, body) feed a
//! [`FramePipeline`]; a [`SessionController`] owns all recording state behind
//! a single lock so concurrent frame callbacks always observe a consistent
//! session.
//!
//! # Example
//!
//! ```no_run
//! use kinrec_core::{CoreResult, SessionController, SessionOptions};
//!
//! use std::path::PathBuf;
//!
//! fn main() -> CoreResult<()> {
//!     let controller = SessionController::new(PathBuf::from("captures"), "recording", 5);
//!
//!     let armed = controller.start(&SessionOptions {
//!         name: Some("trial1".to_string()),
//!         record_depth: true,
//!         ..SessionOptions::default()
//!     })?;
//!     println!("recording into {}", armed.root_dir.display());
//!
//!     // ... drive frames through a FramePipeline, then:
//!     controller.stop();
//!     Ok(())
//! }
//! ```

mod error;
mod pipeline;
mod recording;
mod sensor;

pub use {
    error::{CaptureError, Result as CoreResult},
    pipeline::{
        BONES, ColorWritePolicy, FaultCounters, FramePipeline, OverlayWeight, StatusMonitor,
        StatusReport, bone_weight, extract_body, joint_weight, quantize_depth,
    },
    recording::{
        ArmedSession, ColorPersistJob, CountdownTick, DepthPersistJob, SessionController,
        SessionOptions, SkeletonPersistJob, writer,
    },
    sensor::{
        BodyFrameView, CameraPoint, ColorFrameView, CoordinateMapper, DepthFrameView, DisplaySink,
        FrameDescription, HandState, Joint, JointType, PixelFormat, ProjectedPoint, RawBody,
        RawJoint, TrackedBody, TrackingState,
    },
};

#[cfg(test)]
mod tests;
