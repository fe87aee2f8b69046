//! Recording session state machine.
//!
//! All mutable session state (armed flag, per-stream enables, directories,
//! downsample counter, countdown) lives in one struct behind one mutex.
//! The three frame callbacks, the command path and the countdown timer all
//! go through that lock, so a callback that observes an armed session always
//! observes fully-created directories and a consistent counter.

use std::{
    fs::{self, File},
    panic::Location,
    path::{Component, Path, PathBuf},
    sync::{Mutex, MutexGuard},
};

use error_location::ErrorLocation;
use tracing::{error, info, instrument, warn};

use crate::{CaptureError, CoreResult};

pub(crate) const SKEL_DIR: &str = "skel";
pub(crate) const DEPTH_DIR: &str = "depth";
pub(crate) const RGB_DIR: &str = "rgb";
pub(crate) const TIME_RGB_LOG: &str = "time_rgb.txt";
pub(crate) const TIME_DEPTH_LOG: &str = "time_depth.txt";
pub(crate) const TIME_SKEL_LOG: &str = "time_skel.txt";

/// Stream selection and countdown for one recording attempt.
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// Session name; the controller's default name is used when `None` or
    /// blank.
    pub name: Option<String>,
    /// Persist downsampled color frames.
    pub record_color: bool,
    /// Persist quantized depth frames.
    pub record_depth: bool,
    /// Persist per-joint skeleton records.
    pub record_skeleton: bool,
    /// Append the hand-state line to each skeleton record. Only honored
    /// together with `record_skeleton`.
    pub hand_detail: bool,
    /// Stop automatically after this many seconds.
    pub duration_secs: Option<u32>,
}

/// Details of a session that just entered the recording state.
#[derive(Debug, Clone)]
pub struct ArmedSession {
    /// Resolved session name.
    pub name: String,
    /// Session directory holding the stream subdirectories and logs.
    pub root_dir: PathBuf,
    /// Generation to hand to [`SessionController::tick`]; ticks carrying a
    /// stale generation are ignored.
    pub generation: u64,
    /// Countdown seconds, when a duration was requested.
    pub countdown_secs: Option<u32>,
}

/// Result of one countdown tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownTick {
    /// Seconds left; the session is still recording.
    Remaining(u32),
    /// The countdown reached zero and the session was stopped, with the
    /// same effect as a manual stop.
    Expired,
    /// The session this tick was armed for is gone; the timer should stop.
    Stale,
}

/// A color frame is due for persistence.
#[derive(Debug, Clone)]
pub struct ColorPersistJob {
    /// Directory for the binary frame file.
    pub rgb_dir: PathBuf,
    /// The color timestamp log.
    pub log_path: PathBuf,
}

/// Depth persistence is enabled for the current session.
#[derive(Debug, Clone)]
pub struct DepthPersistJob {
    /// Directory for the binary frame file.
    pub depth_dir: PathBuf,
    /// The depth timestamp log.
    pub log_path: PathBuf,
}

/// Skeleton persistence is enabled for the current session.
#[derive(Debug, Clone)]
pub struct SkeletonPersistJob {
    /// Directory for the per-frame text records.
    pub skel_dir: PathBuf,
    /// The skeleton timestamp log.
    pub log_path: PathBuf,
    /// Whether to append the hand-state line.
    pub hand_detail: bool,
}

#[derive(Debug)]
struct ActiveSession {
    name: String,
    root_dir: PathBuf,
    skel_dir: PathBuf,
    depth_dir: PathBuf,
    rgb_dir: PathBuf,
    color_enabled: bool,
    depth_enabled: bool,
    skeleton_enabled: bool,
    hand_detail: bool,
    rgb_frame_counter: u32,
    countdown_remaining: Option<u32>,
}

#[derive(Debug, Default)]
struct ControllerState {
    /// Bumped on every start and stop; outstanding countdown ticks compare
    /// against it and become no-ops once it moves on.
    generation: u64,
    active: Option<ActiveSession>,
}

/// Owner of all recording session state.
#[derive(Debug)]
pub struct SessionController {
    output_root: PathBuf,
    default_name: String,
    downsample_factor: u32,
    state: Mutex<ControllerState>,
}

impl SessionController {
    /// Create a controller writing sessions under `output_root`.
    ///
    /// `downsample_factor` is the number of color arrivals per persisted
    /// color frame; a factor of 1 persists every frame.
    pub fn new(output_root: PathBuf, default_name: &str, downsample_factor: u32) -> Self {
        Self {
            output_root,
            default_name: default_name.to_string(),
            downsample_factor: downsample_factor.max(1),
            state: Mutex::new(ControllerState::default()),
        }
    }

    /// Arm a new recording session.
    ///
    /// Creates `<root>/<name>/{skel,depth,rgb}` and one timestamp log per
    /// enabled stream, resets the downsample counter, then sets the enable
    /// flags — all under the state lock, so no frame callback can observe a
    /// half-armed session. An already active session is replaced.
    ///
    /// # Errors
    ///
    /// [`CaptureError::InvalidSessionName`] for empty or path-escaping names;
    /// [`CaptureError::Storage`] when directory or log creation fails. In
    /// both cases the controller stays idle and no flags are set.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn start(&self, options: &SessionOptions) -> CoreResult<ArmedSession> {
        let name = match options.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => self.default_name.clone(),
        };
        validate_session_name(&name)?;

        let mut state = self.lock_state();

        if let Some(previous) = state.active.take() {
            warn!(
                previous = %previous.name,
                session = %name,
                "Replacing active recording session"
            );
        }
        state.generation += 1;

        let root_dir = self.output_root.join(&name);
        let skel_dir = root_dir.join(SKEL_DIR);
        let depth_dir = root_dir.join(DEPTH_DIR);
        let rgb_dir = root_dir.join(RGB_DIR);

        // All three subdirectories are created up front, regardless of which
        // streams are enabled.
        for dir in [&skel_dir, &depth_dir, &rgb_dir] {
            fs::create_dir_all(dir).map_err(|source| CaptureError::Storage {
                path: dir.clone(),
                source,
                location: ErrorLocation::from(Location::caller()),
            })?;
        }

        let log_streams = [
            (options.record_skeleton, TIME_SKEL_LOG),
            (options.record_depth, TIME_DEPTH_LOG),
            (options.record_color, TIME_RGB_LOG),
        ];
        for (enabled, log_name) in log_streams {
            if !enabled {
                continue;
            }
            let log_path = root_dir.join(log_name);
            File::create(&log_path).map_err(|source| CaptureError::Storage {
                path: log_path.clone(),
                source,
                location: ErrorLocation::from(Location::caller()),
            })?;
        }

        state.active = Some(ActiveSession {
            name: name.clone(),
            root_dir: root_dir.clone(),
            skel_dir,
            depth_dir,
            rgb_dir,
            color_enabled: options.record_color,
            depth_enabled: options.record_depth,
            skeleton_enabled: options.record_skeleton,
            hand_detail: options.hand_detail && options.record_skeleton,
            rgb_frame_counter: 1,
            countdown_remaining: options.duration_secs,
        });

        let generation = state.generation;

        info!(
            session = %name,
            color = options.record_color,
            depth = options.record_depth,
            skeleton = options.record_skeleton,
            countdown_secs = ?options.duration_secs,
            "Recording session armed"
        );

        Ok(ArmedSession {
            name,
            root_dir,
            generation,
            countdown_secs: options.duration_secs,
        })
    }

    /// Stop the active session, clearing all enable flags and the countdown
    /// in one critical section.
    ///
    /// Returns `false` when nothing was recording. Frames already in flight
    /// when the stop lands may persist at most once more per stream; the
    /// session directories are left in place, so a late write cannot fail on
    /// a missing directory.
    #[instrument(skip(self))]
    pub fn stop(&self) -> bool {
        let mut state = self.lock_state();
        state.generation += 1;

        match state.active.take() {
            Some(session) => {
                info!(session = %session.name, "Recording session stopped");
                true
            }
            None => false,
        }
    }

    /// Apply one countdown tick for the session armed at `generation`.
    ///
    /// At zero the session is cleared exactly as in [`stop`](Self::stop),
    /// within the same critical section, so no further tick can observe a
    /// partially reset state. Ticks for a session that was already stopped
    /// or replaced report [`CountdownTick::Stale`] and change nothing.
    #[instrument(skip(self))]
    pub fn tick(&self, generation: u64) -> CountdownTick {
        let mut state = self.lock_state();

        if state.generation != generation {
            return CountdownTick::Stale;
        }
        let Some(session) = state.active.as_mut() else {
            return CountdownTick::Stale;
        };
        let Some(remaining) = session.countdown_remaining else {
            return CountdownTick::Stale;
        };

        if remaining <= 1 {
            let name = session.name.clone();
            state.generation += 1;
            state.active = None;
            info!(session = %name, "Recording countdown expired");
            return CountdownTick::Expired;
        }

        session.countdown_remaining = Some(remaining - 1);
        CountdownTick::Remaining(remaining - 1)
    }

    /// Account for one color frame arrival and decide whether it persists.
    ///
    /// The downsample counter stays in `[1, factor]`; the frame persists
    /// exactly when the counter equals the factor (arrivals F, 2F, 3F, …
    /// since arming), after which a new window starts. Returns `None` while
    /// idle, while color recording is disabled, or between persist points.
    pub fn next_color_frame(&self) -> Option<ColorPersistJob> {
        let mut state = self.lock_state();
        let session = state.active.as_mut()?;

        if session.rgb_frame_counter == self.downsample_factor {
            session.rgb_frame_counter = 1;
            if session.color_enabled {
                return Some(ColorPersistJob {
                    rgb_dir: session.rgb_dir.clone(),
                    log_path: session.root_dir.join(TIME_RGB_LOG),
                });
            }
        } else {
            session.rgb_frame_counter += 1;
        }

        None
    }

    /// Persistence target for the current depth frame, when recording with
    /// depth enabled.
    pub fn depth_persist(&self) -> Option<DepthPersistJob> {
        let state = self.lock_state();
        let session = state.active.as_ref()?;

        session.depth_enabled.then(|| DepthPersistJob {
            depth_dir: session.depth_dir.clone(),
            log_path: session.root_dir.join(TIME_DEPTH_LOG),
        })
    }

    /// Persistence target for the current body frame, when recording with
    /// skeleton enabled.
    pub fn skeleton_persist(&self) -> Option<SkeletonPersistJob> {
        let state = self.lock_state();
        let session = state.active.as_ref()?;

        session.skeleton_enabled.then(|| SkeletonPersistJob {
            skel_dir: session.skel_dir.clone(),
            log_path: session.root_dir.join(TIME_SKEL_LOG),
            hand_detail: session.hand_detail,
        })
    }

    /// Whether a session is currently recording.
    pub fn is_recording(&self) -> bool {
        self.lock_state().active.is_some()
    }

    fn lock_state(&self) -> MutexGuard<'_, ControllerState> {
        // Recover from lock poison rather than wedging every stream. The
        // state itself is still consistent: every mutation completes before
        // the guard is released.
        self.state.lock().unwrap_or_else(|e| {
            error!("Session state lock poisoned, recovering");
            e.into_inner()
        })
    }
}

/// Session names become a single path component under the output root.
#[track_caller]
fn validate_session_name(name: &str) -> CoreResult<()> {
    let reject = |reason: &'static str| CaptureError::InvalidSessionName {
        name: name.to_string(),
        reason,
        location: ErrorLocation::from(Location::caller()),
    };

    if name.contains('\0') {
        return Err(reject("contains a null byte"));
    }

    let path = Path::new(name);
    let mut components = path.components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(reject("must be a single relative path component")),
    }
}
