//! Scope Viewer - Main Entry Point
//!
//! Opens the oscilloscope capture viewer. An optional first argument names a
//! capture file or a folder of captures to open on startup.

use std::path::PathBuf;

use anyhow::Context;
use scope_viewer::{
    config::{self, AppState, ThemeRegistry},
    frontend::ScopeViewerApp,
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Set up console logging plus a daily log file in the app data directory.
///
/// Without a writable log directory only the console layer is installed.
/// The returned guard flushes the file writer when dropped.
fn init_logging() -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,scope_viewer=debug"));

    let logs = config::app_data_dir().and_then(|dir| match config::ensure_logs_dir(&dir) {
        Ok(logs) => Some(logs),
        Err(e) => {
            eprintln!("File logging disabled: {}", e);
            None
        }
    });

    let (file_layer, guard) = match logs {
        Some(logs) => {
            let appender = tracing_appender::rolling::daily(logs, "scope-viewer.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(guard)
}

fn main() -> anyhow::Result<()> {
    let _log_guard = init_logging()?;

    tracing::info!("Starting Scope Viewer");

    // Load application state (last folder, recent files, preferences)
    let mut app_state = AppState::load_or_default();
    app_state.cleanup_missing_files();

    let themes = match config::themes_dir() {
        Some(dir) => ThemeRegistry::load(dir),
        None => ThemeRegistry::builtin(),
    };

    let initial_path = std::env::args_os().nth(1).map(PathBuf::from);
    if let Some(path) = &initial_path {
        tracing::info!("Opening {:?} from the command line", path);
    }

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title(scope_viewer::viewer::DEFAULT_TITLE),
        ..Default::default()
    };

    eframe::run_native(
        "Scope Viewer",
        native_options,
        Box::new(move |cc| {
            Ok(Box::new(ScopeViewerApp::new(
                cc,
                app_state,
                themes,
                initial_path,
            )))
        }),
    )
    .map_err(|e| anyhow::anyhow!("eframe error: {}", e))?;

    tracing::info!("Scope Viewer exited");
    Ok(())
}
