pub(crate) mod color;
mod depth;
mod ingest;
mod skeleton;
mod status;

pub use {
    depth::quantize_depth,
    ingest::{ColorWritePolicy, FaultCounters, FramePipeline},
    skeleton::{BONES, OverlayWeight, bone_weight, extract_body, joint_weight},
    status::{StatusMonitor, StatusReport},
};
