//! KinRec: synchronized multi-stream recording for depth-sensing cameras.

mod app;
mod app_command;
mod config;
mod console;
mod display;
mod error;
mod pattern_source;
#[cfg(test)]
mod tests;

pub(crate) use {
    app::{App, StreamSelection},
    app_command::{AppCommand, StreamKind},
    console::ConsoleControl,
    display::ConsoleDisplay,
    error::{AppError, Result as AppResult},
    pattern_source::{PatternSource, PinholeMapper},
};

use crate::config::{ColorWriteMode, Config};

use std::{path::PathBuf, sync::Arc};

use kinrec_core::{ColorWritePolicy, DisplaySink, FramePipeline, SessionController};
use tokio::sync::{mpsc, watch};
use tracing::error;

/// Application entry point.
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter("kinrec=debug,kinrec_core=info")
        .init();

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load config: {:?}", e);
            std::process::exit(1);
        }
    };

    let output_root = match config.storage.output_root() {
        Ok(root) => root,
        Err(e) => {
            error!("Failed to resolve output root: {:?}", e);
            std::process::exit(1);
        }
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to create tokio runtime: {:?}", e);
            std::process::exit(1);
        }
    };

    rt.block_on(run(config, output_root));
}

async fn run(config: Config, output_root: PathBuf) {
    let controller = Arc::new(SessionController::new(
        output_root,
        &config.recording.default_session_name,
        config.recording.downsample_factor,
    ));
    let display: Arc<dyn DisplaySink> = Arc::new(ConsoleDisplay);

    let color_write = match config.recording.color_write {
        ColorWriteMode::Background => ColorWritePolicy::Background(tokio::runtime::Handle::current()),
        ColorWriteMode::Inline => ColorWritePolicy::Inline,
    };

    let pipeline = Arc::new(FramePipeline::new(
        Arc::clone(&controller),
        Arc::new(PinholeMapper::new(config.sensor.color_description())),
        Arc::clone(&display),
        config.sensor.color_description(),
        config.sensor.depth_description(),
        color_write,
    ));

    let (command_tx, command_rx) = mpsc::channel(32);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let source_tasks =
        PatternSource::new(Arc::clone(&pipeline), &config.sensor).spawn(shutdown_rx.clone());

    let console = ConsoleControl::new(command_tx);
    let app = App {
        controller,
        display,
        selection: StreamSelection::from(&config.recording),
        command_rx,
        shutdown_tx,
        countdown_task: None,
    };

    tokio::join!(
        async {
            if let Err(e) = console.run(shutdown_rx).await {
                error!(error = ?e, "Console control error");
            }
        },
        async {
            if let Err(e) = app.run().await {
                error!(error = ?e, "App error");
            }
        }
    );

    for task in source_tasks {
        let _ = task.await;
    }
}
