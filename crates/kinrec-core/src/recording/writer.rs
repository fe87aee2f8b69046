//! Timestamped persistence writers.
//!
//! Binary frames are written verbatim to `<dir>/<prefix><epochMillis>.bin`,
//! skeleton records to `<dir>/<epochMillis>.txt`, and every persisted frame
//! appends its epoch-millisecond to the stream's timestamp log. Writers
//! flush on every exit path; the file handle closes on drop even when a
//! write fails mid-way.

use std::{
    fs::{File, OpenOptions},
    io::{self, BufWriter, Write},
    panic::Location,
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

use error_location::ErrorLocation;
use tracing::trace;

use crate::{CaptureError, CoreResult, sensor::TrackedBody};

/// Milliseconds since the Unix epoch, used to key frame files and timestamp
/// log lines. A clock before the epoch reports 0.
pub fn epoch_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}

/// Write `bytes` verbatim to `dir/<prefix><epoch_ms>.bin`, creating or
/// truncating the file.
///
/// The file length alone encodes the frame geometry (width × height × 4 for
/// BGRA streams); there is no header and no compression.
///
/// # Errors
///
/// [`CaptureError::Storage`] when the file cannot be created or written.
#[track_caller]
pub fn persist_binary(dir: &Path, prefix: &str, epoch_ms: u64, bytes: &[u8]) -> CoreResult<PathBuf> {
    let path = dir.join(format!("{prefix}{epoch_ms}.bin"));

    let result = File::create(&path).and_then(|mut file| {
        file.write_all(bytes)?;
        file.flush()
    });
    result.map_err(|source| CaptureError::Storage {
        path: path.clone(),
        source,
        location: ErrorLocation::from(Location::caller()),
    })?;

    trace!(path = ?path, bytes = bytes.len(), "Persisted binary frame");

    Ok(path)
}

/// Write one skeleton text record to `dir/<epoch_ms>.txt`, truncating any
/// existing file of that name.
///
/// One line per joint in [`JointType::ALL`](crate::sensor::JointType::ALL)
/// order: `<jointType> <trackingState> <x> <y> <z> <projectedX> <projectedY>`,
/// with coordinates in `f32` shortest round-trip form, so a reparse
/// reproduces the values bit-for-bit. With `hand_detail`, a final
/// `LeftHand <state> RightHand <state>` line follows.
///
/// # Errors
///
/// [`CaptureError::Storage`] when the file cannot be created or written.
#[track_caller]
pub fn persist_skeleton(
    dir: &Path,
    epoch_ms: u64,
    body: &TrackedBody,
    hand_detail: bool,
) -> CoreResult<PathBuf> {
    let path = dir.join(format!("{epoch_ms}.txt"));

    let result = File::create(&path).and_then(|file| {
        let mut writer = BufWriter::new(file);
        write_skeleton_record(&mut writer, body, hand_detail)?;
        writer.flush()
    });
    result.map_err(|source| CaptureError::Storage {
        path: path.clone(),
        source,
        location: ErrorLocation::from(Location::caller()),
    })?;

    trace!(path = ?path, "Persisted skeleton record");

    Ok(path)
}

fn write_skeleton_record<W: Write>(
    writer: &mut W,
    body: &TrackedBody,
    hand_detail: bool,
) -> io::Result<()> {
    for joint in body.joints() {
        writeln!(
            writer,
            "{} {} {} {} {} {} {}",
            joint.joint_type,
            joint.tracking_state,
            joint.position.x,
            joint.position.y,
            joint.position.z,
            joint.projected.x,
            joint.projected.y,
        )?;
    }

    if hand_detail {
        writeln!(
            writer,
            "LeftHand {} RightHand {}",
            body.left_hand_state, body.right_hand_state,
        )?;
    }

    Ok(())
}

/// Append one epoch-millisecond line to a stream's timestamp log.
///
/// Never truncates; lines are chronological by construction, so the log is
/// monotonic non-decreasing (ties are possible within one millisecond).
///
/// # Errors
///
/// [`CaptureError::Storage`] when the log cannot be opened or appended.
#[track_caller]
pub fn append_timestamp(log_path: &Path, epoch_ms: u64) -> CoreResult<()> {
    let result = OpenOptions::new()
        .append(true)
        .create(true)
        .open(log_path)
        .and_then(|mut file| {
            writeln!(file, "{epoch_ms}")?;
            file.flush()
        });
    result.map_err(|source| CaptureError::Storage {
        path: log_path.to_path_buf(),
        source,
        location: ErrorLocation::from(Location::caller()),
    })
}
