use crate::{
    HandState, JointType, TrackingState, extract_body,
    tests::support::{AffineMapper, tracked_raw_body},
    writer,
};

use std::fs;

/// WHAT: Binary persistence writes the buffer verbatim under the keyed name
/// WHY: The file length alone encodes the frame geometry for replay
#[test]
fn given_buffer_when_persisting_binary_then_bytes_verbatim() {
    // Given: A distinct byte pattern
    let tmp = tempfile::tempdir().unwrap();
    let bytes: Vec<u8> = (0..64).collect();

    // When: Persisting under prefix "image" at epoch 1700000000123
    let path = writer::persist_binary(tmp.path(), "image", 1_700_000_000_123, &bytes).unwrap();

    // Then: The name is image<ms>.bin and the content is byte-identical
    assert_eq!(
        path.file_name().unwrap().to_string_lossy(),
        "image1700000000123.bin"
    );
    assert_eq!(fs::read(&path).unwrap(), bytes);
}

/// WHAT: Re-persisting the same key truncates the previous file
/// WHY: A retried frame must not leave trailing stale bytes
#[test]
fn given_existing_file_when_persisting_binary_then_truncated() {
    let tmp = tempfile::tempdir().unwrap();
    writer::persist_binary(tmp.path(), "depth", 42, &[1u8; 100]).unwrap();

    let path = writer::persist_binary(tmp.path(), "depth", 42, &[2u8; 8]).unwrap();

    assert_eq!(fs::read(&path).unwrap(), vec![2u8; 8]);
}

/// WHAT: Timestamp appends accumulate without truncation
/// WHY: The log is the replay index; losing lines desynchronizes streams
#[test]
fn given_three_appends_when_reading_log_then_three_lines_in_order() {
    // Given: A log path that does not exist yet
    let tmp = tempfile::tempdir().unwrap();
    let log = tmp.path().join("time_depth.txt");

    // When: Appending three chronological stamps
    for stamp in [100u64, 100, 250] {
        writer::append_timestamp(&log, stamp).unwrap();
    }

    // Then: All three lines survive, in order, ties preserved
    let stamps: Vec<u64> = fs::read_to_string(&log)
        .unwrap()
        .lines()
        .map(|line| line.parse().unwrap())
        .collect();
    assert_eq!(stamps, vec![100, 100, 250]);
}

/// WHAT: A skeleton record round-trips every coordinate bit-for-bit
/// WHY: Offline analysis reparses the text; formatting must be lossless
#[test]
fn given_skeleton_record_when_reparsing_then_coordinates_identical() {
    // Given: An extracted body with distinct per-joint positions
    let tmp = tempfile::tempdir().unwrap();
    let body = extract_body(&tracked_raw_body(), &AffineMapper);

    // When: Persisting with hand detail and reading the file back
    let path = writer::persist_skeleton(tmp.path(), 7, &body, true).unwrap();
    assert_eq!(path.file_name().unwrap().to_string_lossy(), "7.txt");
    let text = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    // Then: 25 joint lines plus the hand line
    assert_eq!(lines.len(), 26);

    for (line, joint) in lines.iter().zip(body.joints()) {
        let fields: Vec<&str> = line.split(' ').collect();
        assert_eq!(fields.len(), 7);
        assert_eq!(fields[0], joint.joint_type.as_str());
        assert_eq!(fields[1], TrackingState::Tracked.as_str());

        // Bit-for-bit round trip through the text form
        assert_eq!(fields[2].parse::<f32>().unwrap(), joint.position.x);
        assert_eq!(fields[3].parse::<f32>().unwrap(), joint.position.y);
        assert_eq!(fields[4].parse::<f32>().unwrap(), joint.position.z);
        assert_eq!(fields[5].parse::<f32>().unwrap(), joint.projected.x);
        assert_eq!(fields[6].parse::<f32>().unwrap(), joint.projected.y);
    }

    assert_eq!(
        lines[25],
        format!(
            "LeftHand {} RightHand {}",
            HandState::Open,
            HandState::Closed
        )
    );
}

/// WHAT: Without hand detail the record holds exactly the joint lines
/// WHY: The trailing line is opt-in; parsers key on line count
#[test]
fn given_no_hand_detail_when_persisting_skeleton_then_25_lines() {
    let tmp = tempfile::tempdir().unwrap();
    let body = extract_body(&tracked_raw_body(), &AffineMapper);

    let path = writer::persist_skeleton(tmp.path(), 8, &body, false).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().count(), JointType::COUNT);
}

/// WHAT: epoch_millis yields a plausible, non-decreasing wall-clock stamp
/// WHY: Frame files and log lines are keyed by it
#[test]
fn given_successive_calls_when_reading_epoch_then_monotonic_non_decreasing() {
    let first = writer::epoch_millis();
    let second = writer::epoch_millis();

    // 2020-01-01 in epoch milliseconds
    assert!(first > 1_577_836_800_000);
    assert!(second >= first);
}
