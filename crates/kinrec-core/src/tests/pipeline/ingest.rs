use crate::{
    BodyFrameView, ColorFrameView, ColorWritePolicy, DepthFrameView, DisplaySink,
    FrameDescription, FramePipeline, PixelFormat, RawBody, SessionController, SessionOptions,
    tests::support::{AffineMapper, CountingSink, tracked_raw_body},
};

use std::{fs, path::Path, sync::Arc, thread, time::Duration};

const COLOR_DESC: FrameDescription = FrameDescription {
    width: 4,
    height: 2,
};
const DEPTH_DESC: FrameDescription = FrameDescription {
    width: 3,
    height: 2,
};

fn pipeline_under(
    root: &Path,
    downsample_factor: u32,
) -> (Arc<SessionController>, Arc<CountingSink>, FramePipeline) {
    let controller = Arc::new(SessionController::new(
        root.to_path_buf(),
        "recording",
        downsample_factor,
    ));
    let sink = Arc::new(CountingSink::default());
    let pipeline = FramePipeline::new(
        Arc::clone(&controller),
        Arc::new(AffineMapper),
        Arc::clone(&sink) as Arc<dyn DisplaySink>,
        COLOR_DESC,
        DEPTH_DESC,
        ColorWritePolicy::Inline,
    );
    (controller, sink, pipeline)
}

fn feed_color(pipeline: &FramePipeline) {
    let data = vec![7u8; COLOR_DESC.pixel_count() * 4];
    pipeline.on_color_frame(Some(ColorFrameView {
        description: COLOR_DESC,
        format: PixelFormat::Bgra,
        data: &data,
    }));
    // Distinct epoch-millisecond keys for consecutive persisted frames
    thread::sleep(Duration::from_millis(2));
}

fn feed_depth(pipeline: &FramePipeline) {
    let samples = vec![800u16; DEPTH_DESC.pixel_count()];
    pipeline.on_depth_frame(Some(DepthFrameView {
        description: DEPTH_DESC,
        min_reliable_distance: 500,
        max_reliable_distance: 4500,
        samples: &samples,
    }));
    thread::sleep(Duration::from_millis(2));
}

fn count_files(dir: &Path) -> usize {
    fs::read_dir(dir).unwrap().count()
}

fn log_lines(path: &Path) -> Vec<u64> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|line| line.parse().unwrap())
        .collect()
}

/// WHAT: N color arrivals with factor F persist exactly floor(N/F) frames
/// WHY: The downsample window must fire at arrivals F, 2F, 3F, never more
#[test]
fn given_ten_color_arrivals_factor_three_when_recording_then_three_persisted() {
    // Given: A color-enabled session with downsample factor 3
    let tmp = tempfile::tempdir().unwrap();
    let (controller, sink, pipeline) = pipeline_under(tmp.path(), 3);
    controller
        .start(&SessionOptions {
            record_color: true,
            ..SessionOptions::default()
        })
        .unwrap();

    // When: Ten color frames arrive
    for _ in 0..10 {
        feed_color(&pipeline);
    }

    // Then: Exactly three frames were persisted and logged, all ten displayed
    let session = tmp.path().join("recording");
    assert_eq!(count_files(&session.join("rgb")), 3);
    assert_eq!(log_lines(&session.join("time_rgb.txt")).len(), 3);
    assert_eq!(*sink.color_frames.lock().unwrap(), 10);
    assert_eq!(pipeline.faults().color(), 0);
}

/// WHAT: A depth-only session produces the expected layout and log
/// WHY: End-to-end check of arming, quantization and persistence together
#[test]
fn given_depth_only_session_when_five_frames_arrive_then_five_log_lines() {
    // Given: A session named trial1 with only depth enabled
    let tmp = tempfile::tempdir().unwrap();
    let (controller, _sink, pipeline) = pipeline_under(tmp.path(), 5);
    controller
        .start(&SessionOptions {
            name: Some("trial1".to_string()),
            record_depth: true,
            ..SessionOptions::default()
        })
        .unwrap();

    // When: Five depth frames arrive
    for _ in 0..5 {
        feed_depth(&pipeline);
    }

    // Then: trial1/depth holds five frames and the log five monotonic stamps
    let session = tmp.path().join("trial1");
    assert!(session.join("depth").is_dir());
    assert_eq!(count_files(&session.join("depth")), 5);

    let stamps = log_lines(&session.join("time_depth.txt"));
    assert_eq!(stamps.len(), 5);
    assert!(stamps.iter().all(|&stamp| stamp > 0));
    assert!(stamps.windows(2).all(|pair| pair[0] <= pair[1]));
}

/// WHAT: A depth frame with wrong dimensions is discarded without a trace
/// WHY: Geometry mismatches are expected during mode switches, not faults
#[test]
fn given_mismatched_depth_frame_when_ingesting_then_discarded_silently() {
    // Given: A recording depth session
    let tmp = tempfile::tempdir().unwrap();
    let (controller, sink, pipeline) = pipeline_under(tmp.path(), 5);
    controller
        .start(&SessionOptions {
            record_depth: true,
            ..SessionOptions::default()
        })
        .unwrap();

    // When: A frame with the wrong geometry arrives
    let samples = vec![800u16; 10];
    pipeline.on_depth_frame(Some(DepthFrameView {
        description: FrameDescription {
            width: 5,
            height: 2,
        },
        min_reliable_distance: 500,
        max_reliable_distance: 4500,
        samples: &samples,
    }));

    // Then: Nothing was displayed or persisted, and no fault was counted
    assert_eq!(*sink.depth_frames.lock().unwrap(), 0);
    assert_eq!(count_files(&tmp.path().join("recording").join("depth")), 0);
    assert_eq!(pipeline.faults().depth(), 0);
}

/// WHAT: An unavailable frame is a skipped tick, not a fault
/// WHY: The driver drops frames routinely; the stream must shrug it off
#[test]
fn given_unavailable_frames_when_ingesting_then_nothing_happens() {
    let tmp = tempfile::tempdir().unwrap();
    let (_controller, sink, pipeline) = pipeline_under(tmp.path(), 5);

    pipeline.on_color_frame(None);
    pipeline.on_depth_frame(None);
    pipeline.on_body_frame(None);

    assert_eq!(*sink.color_frames.lock().unwrap(), 0);
    assert_eq!(*sink.depth_frames.lock().unwrap(), 0);
    assert!(sink.body_batches.lock().unwrap().is_empty());
    assert_eq!(pipeline.faults().color(), 0);
    assert_eq!(pipeline.faults().depth(), 0);
    assert_eq!(pipeline.faults().body(), 0);
}

/// WHAT: Stopping mid-stream ends persistence for every stream at once
/// WHY: No frame arriving after a stop may land in the session directories
#[test]
fn given_stop_when_frames_keep_arriving_then_no_further_persistence() {
    // Given: A session recording color and depth, one frame persisted each
    let tmp = tempfile::tempdir().unwrap();
    let (controller, _sink, pipeline) = pipeline_under(tmp.path(), 1);
    controller
        .start(&SessionOptions {
            record_color: true,
            record_depth: true,
            ..SessionOptions::default()
        })
        .unwrap();
    feed_color(&pipeline);
    feed_depth(&pipeline);

    // When: The session stops and more frames arrive on both streams
    assert!(controller.stop());
    for _ in 0..3 {
        feed_color(&pipeline);
        feed_depth(&pipeline);
    }

    // Then: File and log counts are frozen at one per stream
    let session = tmp.path().join("recording");
    assert_eq!(count_files(&session.join("rgb")), 1);
    assert_eq!(count_files(&session.join("depth")), 1);
    assert_eq!(log_lines(&session.join("time_rgb.txt")).len(), 1);
    assert_eq!(log_lines(&session.join("time_depth.txt")).len(), 1);
}

/// WHAT: Tracked bodies persist one text record each; untracked slots skip
/// WHY: The driver's slot array always has full capacity, mostly empty
#[test]
fn given_body_frame_when_recording_skeleton_then_tracked_slots_persisted() {
    // Given: A skeleton session with hand detail and a 6-slot body array
    let tmp = tempfile::tempdir().unwrap();
    let (controller, sink, pipeline) = pipeline_under(tmp.path(), 5);
    controller
        .start(&SessionOptions {
            record_skeleton: true,
            hand_detail: true,
            ..SessionOptions::default()
        })
        .unwrap();

    let mut slots = vec![RawBody::default(); 6];
    slots[2] = tracked_raw_body();

    // When: The body frame arrives
    pipeline.on_body_frame(Some(BodyFrameView { bodies: &slots }));

    // Then: One record with 25 joint lines plus the hand line, one log line
    let session = tmp.path().join("recording");
    let skel_dir = session.join("skel");
    assert_eq!(count_files(&skel_dir), 1);

    let entry = fs::read_dir(&skel_dir).unwrap().next().unwrap().unwrap();
    let record = fs::read_to_string(entry.path()).unwrap();
    assert_eq!(record.lines().count(), 26);
    assert!(record.lines().last().unwrap().starts_with("LeftHand "));

    assert_eq!(log_lines(&session.join("time_skel.txt")).len(), 1);
    assert_eq!(*sink.body_batches.lock().unwrap(), vec![1]);
}

/// WHAT: Background color writes land even though the callback returned
/// WHY: The offloaded write is fire-and-forget but must not be lost
#[tokio::test(flavor = "multi_thread")]
async fn given_background_policy_when_color_persists_then_file_appears() {
    // Given: A pipeline with the background color-write policy
    let tmp = tempfile::tempdir().unwrap();
    let controller = Arc::new(SessionController::new(tmp.path().to_path_buf(), "recording", 1));
    let sink = Arc::new(CountingSink::default());
    let pipeline = FramePipeline::new(
        Arc::clone(&controller),
        Arc::new(AffineMapper),
        Arc::clone(&sink) as Arc<dyn DisplaySink>,
        COLOR_DESC,
        DEPTH_DESC,
        ColorWritePolicy::Background(tokio::runtime::Handle::current()),
    );
    controller
        .start(&SessionOptions {
            record_color: true,
            ..SessionOptions::default()
        })
        .unwrap();

    // When: A color frame arrives and the blocking pool drains
    let data = vec![9u8; COLOR_DESC.pixel_count() * 4];
    pipeline.on_color_frame(Some(ColorFrameView {
        description: COLOR_DESC,
        format: PixelFormat::Bgra,
        data: &data,
    }));
    tokio::time::sleep(Duration::from_millis(100)).await;

    // Then: The frame file and its log line exist, bytes verbatim
    let session = tmp.path().join("recording");
    assert_eq!(log_lines(&session.join("time_rgb.txt")).len(), 1);
    let entry = fs::read_dir(session.join("rgb"))
        .unwrap()
        .next()
        .unwrap()
        .unwrap();
    assert_eq!(fs::read(entry.path()).unwrap(), data);
}
