use kinrec_core::{
    BONES, DisplaySink, FrameDescription, OverlayWeight, StatusReport, TrackedBody, bone_weight,
    joint_weight,
};

use tracing::{debug, info, trace};

/// Headless display sink: frame presentations become trace events, status
/// and countdown updates become log lines.
///
/// Body overlays are reduced to the bone/joint draw policy so the counts a
/// real renderer would draw are visible in the logs.
pub struct ConsoleDisplay;

impl DisplaySink for ConsoleDisplay {
    fn present_color(&self, description: FrameDescription, pixels: &[u8]) {
        trace!(
            width = description.width,
            height = description.height,
            bytes = pixels.len(),
            "Color frame presented"
        );
    }

    fn present_depth(&self, description: FrameDescription, pixels: &[u8]) {
        trace!(
            width = description.width,
            height = description.height,
            bytes = pixels.len(),
            "Depth frame presented"
        );
    }

    fn present_bodies(&self, bodies: &[TrackedBody]) {
        for body in bodies {
            let mut tracked_bones = 0u32;
            let mut inferred_bones = 0u32;
            for (a, b) in BONES {
                match bone_weight(body.joint(a).tracking_state, body.joint(b).tracking_state) {
                    Some(OverlayWeight::Tracked) => tracked_bones += 1,
                    Some(OverlayWeight::Inferred) => inferred_bones += 1,
                    None => {}
                }
            }
            let joint_markers = body
                .joints()
                .filter(|joint| joint_weight(joint.tracking_state).is_some())
                .count();

            debug!(
                tracked_bones,
                inferred_bones,
                joint_markers,
                left_hand = %body.left_hand_state,
                right_hand = %body.right_hand_state,
                "Body overlay"
            );
        }
    }

    fn status(&self, report: StatusReport) {
        info!(fps = report.fps, frames = report.frames, "Status refresh");
    }

    fn countdown(&self, remaining_secs: u32) {
        info!(remaining_secs, "Recording countdown");
    }
}
