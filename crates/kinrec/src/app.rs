use crate::{AppCommand, StreamKind, config::RecordingConfig};

use std::{sync::Arc, time::Duration};

use kinrec_core::{CountdownTick, DisplaySink, SessionController, SessionOptions};
use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
};
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

/// Checkbox state for the next recording session.
#[derive(Debug, Clone, Copy)]
pub struct StreamSelection {
    /// Persist downsampled color frames.
    pub color: bool,
    /// Persist quantized depth frames.
    pub depth: bool,
    /// Persist per-joint skeleton records.
    pub skeleton: bool,
    /// Append hand states to skeleton records.
    pub hand_detail: bool,
}

impl From<&RecordingConfig> for StreamSelection {
    fn from(config: &RecordingConfig) -> Self {
        Self {
            color: config.record_color,
            depth: config.record_depth,
            skeleton: config.record_skeleton,
            hand_detail: config.hand_detail,
        }
    }
}

impl StreamSelection {
    fn set(&mut self, stream: StreamKind, enabled: bool) {
        match stream {
            StreamKind::Color => self.color = enabled,
            StreamKind::Depth => self.depth = enabled,
            StreamKind::Skeleton => self.skeleton = enabled,
            StreamKind::HandDetail => self.hand_detail = enabled,
        }
    }
}

/// Main application state.
///
/// Consumes the command channel fed by the console control, owns the stream
/// selection, and schedules the countdown task for timed sessions.
pub struct App {
    pub(crate) controller: Arc<SessionController>,
    pub(crate) display: Arc<dyn DisplaySink>,
    pub(crate) selection: StreamSelection,
    pub(crate) command_rx: mpsc::Receiver<AppCommand>,
    pub(crate) shutdown_tx: watch::Sender<bool>,
    pub(crate) countdown_task: Option<JoinHandle<()>>,
}

impl App {
    /// Run the main application command loop.
    #[instrument(skip(self))]
    pub async fn run(mut self) -> crate::AppResult<()> {
        info!("KinRec starting");

        while let Some(command) = self.command_rx.recv().await {
            match command {
                AppCommand::StartRecording {
                    session_id,
                    name,
                    duration_secs,
                } => self.start_recording(session_id, name, duration_secs),
                AppCommand::StopRecording => {
                    if !self.controller.stop() {
                        debug!("Stop requested with no active recording");
                    }
                }
                AppCommand::SetStream { stream, enabled } => {
                    self.selection.set(stream, enabled);
                    info!(
                        color = self.selection.color,
                        depth = self.selection.depth,
                        skeleton = self.selection.skeleton,
                        hand_detail = self.selection.hand_detail,
                        "Stream selection updated (applies to the next session)"
                    );
                }
                AppCommand::Shutdown => {
                    info!("Shutdown requested");
                    break;
                }
            }
        }

        // An active session must not outlive the command loop.
        self.controller.stop();
        if let Some(task) = self.countdown_task.take() {
            task.abort();
        }
        let _ = self.shutdown_tx.send(true);

        info!("KinRec shut down successfully");

        Ok(())
    }

    /// Arm a recording session with the current stream selection.
    ///
    /// A storage failure is reported and leaves the controller idle; the
    /// user is never shown a recording that is not actually capturing.
    #[instrument(skip(self))]
    fn start_recording(
        &mut self,
        session_id: Uuid,
        name: Option<String>,
        duration_secs: Option<u32>,
    ) {
        let options = SessionOptions {
            name,
            record_color: self.selection.color,
            record_depth: self.selection.depth,
            record_skeleton: self.selection.skeleton,
            hand_detail: self.selection.hand_detail,
            duration_secs,
        };

        match self.controller.start(&options) {
            Ok(armed) => {
                info!(
                    session_id = %session_id,
                    session = %armed.name,
                    root = ?armed.root_dir,
                    "Recording started"
                );

                if let Some(task) = self.countdown_task.take() {
                    // The old task would exit on its next stale tick anyway.
                    task.abort();
                }
                if let Some(secs) = armed.countdown_secs {
                    self.display.countdown(secs);
                    self.countdown_task = Some(tokio::spawn(run_countdown(
                        Arc::clone(&self.controller),
                        Arc::clone(&self.display),
                        armed.generation,
                    )));
                }
            }
            Err(e) => {
                error!(session_id = %session_id, error = ?e, "Failed to start recording");
            }
        }
    }
}

/// Tick the armed session once per second until it expires or goes stale.
async fn run_countdown(
    controller: Arc<SessionController>,
    display: Arc<dyn DisplaySink>,
    generation: u64,
) {
    let mut interval = tokio::time::interval(Duration::from_secs(1));
    // The first tick completes immediately; the countdown starts one full
    // second after arming.
    interval.tick().await;

    loop {
        interval.tick().await;
        match controller.tick(generation) {
            CountdownTick::Remaining(left) => display.countdown(left),
            CountdownTick::Expired => {
                display.countdown(0);
                break;
            }
            CountdownTick::Stale => break,
        }
    }
}
