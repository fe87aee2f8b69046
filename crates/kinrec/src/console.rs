//! Console command surface.
//!
//! Stands in for the UI collaborator: reads line commands from stdin,
//! validates them, and forwards them to the main application over an async
//! channel. Malformed input is rejected here — in particular a non-numeric
//! recording length never reaches the countdown scheduler.

use crate::{AppCommand, AppError, AppResult, StreamKind};

use std::panic::Location;

use error_location::ErrorLocation;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::{mpsc, watch},
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

const USAGE: &str = "commands:\n  \
    start [name] [seconds]  arm a recording session\n  \
    stop                    stop the active session\n  \
    rgb|depth|skel on|off   select streams for the next session\n  \
    hands on|off            hand-state detail in skeleton records\n  \
    quit                    exit";

/// A parsed console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ConsoleCommand {
    /// Arm a recording session.
    Start {
        /// Optional session name.
        name: Option<String>,
        /// Optional recording length in seconds.
        duration_secs: Option<u32>,
    },
    /// Stop the active session.
    Stop,
    /// Toggle one stream for the next session.
    Stream {
        /// Which stream.
        stream: StreamKind,
        /// New enable state.
        enabled: bool,
    },
    /// Print usage.
    Help,
    /// Exit the application.
    Quit,
}

/// Reads console commands and drives the application command channel.
pub struct ConsoleControl {
    command_tx: mpsc::Sender<AppCommand>,
}

impl ConsoleControl {
    /// Create a control forwarding into `command_tx`.
    pub fn new(command_tx: mpsc::Sender<AppCommand>) -> Self {
        Self { command_tx }
    }

    /// Run the console read loop until shutdown or end of input.
    ///
    /// Parse failures are reported and swallowed; a bad line never ends the
    /// loop. End of input (closed stdin) requests application shutdown.
    #[instrument(skip(self))]
    pub async fn run(&self, mut shutdown_rx: watch::Receiver<bool>) -> AppResult<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        info!("Console control ready; type 'help' for commands");

        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    info!("Console control shutting down");
                    break;
                }
                line = lines.next_line() => {
                    match line {
                        Ok(Some(line)) => {
                            if !self.handle_line(line.trim()).await? {
                                break;
                            }
                        }
                        Ok(None) => {
                            info!("Console input closed, requesting shutdown");
                            self.send(AppCommand::Shutdown).await?;
                            break;
                        }
                        Err(e) => {
                            warn!(error = %e, "Failed to read console input");
                            self.send(AppCommand::Shutdown).await?;
                            break;
                        }
                    }
                }
            }
        }

        Ok(())
    }

    /// Returns `false` when the loop should end.
    async fn handle_line(&self, line: &str) -> AppResult<bool> {
        let command = match parse_line(line) {
            Ok(Some(command)) => command,
            Ok(None) => return Ok(true),
            Err(e) => {
                warn!(error = %e, "Rejected console command");
                return Ok(true);
            }
        };

        match command {
            ConsoleCommand::Start {
                name,
                duration_secs,
            } => {
                self.send(AppCommand::StartRecording {
                    session_id: Uuid::new_v4(),
                    name,
                    duration_secs,
                })
                .await?;
            }
            ConsoleCommand::Stop => self.send(AppCommand::StopRecording).await?,
            ConsoleCommand::Stream { stream, enabled } => {
                self.send(AppCommand::SetStream { stream, enabled }).await?;
            }
            ConsoleCommand::Help => println!("{USAGE}"),
            ConsoleCommand::Quit => {
                self.send(AppCommand::Shutdown).await?;
                return Ok(false);
            }
        }

        Ok(true)
    }

    async fn send(&self, command: AppCommand) -> AppResult<()> {
        self.command_tx
            .send(command)
            .await
            .map_err(|e| AppError::ChannelSendFailed {
                message: format!("Failed to send console command: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })
    }
}

/// Parse one console line. `Ok(None)` means an empty line.
#[track_caller]
pub(crate) fn parse_line(line: &str) -> AppResult<Option<ConsoleCommand>> {
    let mut tokens = line.split_whitespace();
    let Some(head) = tokens.next() else {
        return Ok(None);
    };

    let command = match head.to_ascii_lowercase().as_str() {
        "start" => {
            let rest: Vec<&str> = tokens.collect();
            let (name, duration_secs) = match rest.as_slice() {
                [] => (None, None),
                [single] if single.chars().all(|c| c.is_ascii_digit()) => {
                    (None, Some(parse_duration(single)?))
                }
                [single] => (Some((*single).to_string()), None),
                [name, duration] => (Some((*name).to_string()), Some(parse_duration(duration)?)),
                _ => return Err(invalid("usage: start [name] [seconds]")),
            };
            ConsoleCommand::Start {
                name,
                duration_secs,
            }
        }
        "stop" => ConsoleCommand::Stop,
        "rgb" | "color" => parse_toggle(StreamKind::Color, tokens.next())?,
        "depth" => parse_toggle(StreamKind::Depth, tokens.next())?,
        "skel" | "skeleton" => parse_toggle(StreamKind::Skeleton, tokens.next())?,
        "hands" => parse_toggle(StreamKind::HandDetail, tokens.next())?,
        "help" => ConsoleCommand::Help,
        "quit" | "exit" => ConsoleCommand::Quit,
        other => {
            return Err(AppError::InvalidCommand {
                reason: format!("unknown command {other:?}, type 'help'"),
                location: ErrorLocation::from(Location::caller()),
            });
        }
    };

    Ok(Some(command))
}

#[track_caller]
fn parse_toggle(stream: StreamKind, state: Option<&str>) -> AppResult<ConsoleCommand> {
    let enabled = match state {
        Some("on") => true,
        Some("off") => false,
        _ => return Err(invalid("stream commands take 'on' or 'off'")),
    };
    Ok(ConsoleCommand::Stream { stream, enabled })
}

#[track_caller]
fn parse_duration(text: &str) -> AppResult<u32> {
    text.parse().map_err(|_| AppError::InvalidCommand {
        reason: format!("recording length must be a whole number of seconds, got {text:?}"),
        location: ErrorLocation::from(Location::caller()),
    })
}

#[track_caller]
fn invalid(reason: &str) -> AppError {
    AppError::InvalidCommand {
        reason: reason.to_string(),
        location: ErrorLocation::from(Location::caller()),
    }
}
