//! # Scope Viewer: Oscilloscope CSV Capture Viewer
//!
//! A desktop viewer for waveform captures exported by bench oscilloscopes as
//! CSV. Captures are discovered under a data folder, plotted per channel, and
//! annotated with automatic measurements and two pairs of draggable cursors.
//!
//! ## Architecture
//!
//! - **Capture**: CSV parsing into a [`Waveform`] plus instrument [`Metadata`]
//! - **Analysis**: Peak, frequency, edge and duty-cycle measurements
//! - **Cursor**: Time and voltage marker pairs with per-file memory
//! - **Viewer**: UI-independent application state driven by [`ViewerAction`]s
//! - **Frontend**: eframe/egui shell with egui_plot for the waveform plot
//!
//! ## Configuration
//!
//! Application state (last folder, recent files, theme, cursor colors) and
//! user themes are stored in the platform data directory under
//! `dev.scopeviewer.scope-viewer`:
//!
//! - **Linux**: `~/.local/share/dev.scopeviewer.scope-viewer/`
//! - **macOS**: `~/Library/Application Support/dev.scopeviewer.scope-viewer/`
//! - **Windows**: `%APPDATA%\dev.scopeviewer.scope-viewer\`
//!
//! ## Example
//!
//! ```ignore
//! use scope_viewer::{
//!     capture::{CsvCaptureLoader, LoaderConfig},
//!     cursor::CursorModel,
//!     viewer::{Viewer, ViewerAction},
//! };
//!
//! let mut viewer = Viewer::new(CsvCaptureLoader::new(LoaderConfig::default()), CursorModel::default());
//! viewer.dispatch(ViewerAction::OpenFile("capture.csv".into()));
//! for channel in viewer.channels() {
//!     println!("{}: {:?}", channel.name, channel.measurements);
//! }
//! ```

pub mod analysis;
pub mod app;
pub mod capture;
pub mod config;
pub mod cursor;
pub mod error;
pub mod frontend;
pub mod types;
pub mod viewer;

// Re-export commonly used types
pub use app::ScopeViewerApp;
pub use capture::{CaptureLoader, CsvCaptureLoader, LoaderConfig};
pub use config::AppState;
pub use error::{Result, ScopeError};
pub use types::{Capture, Channel, Metadata, Waveform};
pub use viewer::{Viewer, ViewerAction};
