//! Viewer shell state
//!
//! [`Viewer`] ties the loaded capture, per-channel measurements and the
//! cursor model together. The egui frontend turns user input into
//! [`ViewerAction`]s and draws whatever the viewer holds; nothing in here
//! depends on the UI toolkit.

use std::path::{Path, PathBuf};

use crate::analysis::{measure, measure_region, Measurements, RegionStats};
use crate::capture::{discover_captures, CaptureLoader, CaptureTree};
use crate::cursor::{
    Axis, CursorColor, CursorId, CursorModel, CursorReadout, PlotViewport, PointerEvent,
};
use crate::types::Capture;

/// Title used when no capture is loaded
pub const DEFAULT_TITLE: &str = "Oscilloscope Data Viewer";

/// Display state of one channel
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelView {
    pub name: String,
    pub visible: bool,
    /// Measurements, present while the channel is visible
    pub measurements: Option<Measurements>,
    /// Peak statistics between the two time markers
    pub region: Option<RegionStats>,
}

/// Actions the frontend asks the viewer to perform
#[derive(Debug, Clone, PartialEq)]
pub enum ViewerAction {
    /// Load and display a capture file
    OpenFile(PathBuf),
    /// Scan a folder for capture files
    OpenFolder(PathBuf),
    /// Rescan the current folder
    RefreshFolder,
    /// Show or hide a channel
    SetChannelVisible { channel: String, visible: bool },
    /// Toggle a marker pair
    SetPairEnabled { axis: Axis, enabled: bool },
    /// Change a marker pair's color
    SetPairColor { axis: Axis, color: CursorColor },
    /// Remove a pair's markers
    ClearPair(Axis),
    /// Pointer input over the plot
    Pointer {
        event: PointerEvent,
        viewport: PlotViewport,
    },
    /// Close the error dialog
    DismissError,
}

/// Shell state for one viewer window
pub struct Viewer<L: CaptureLoader> {
    loader: L,
    capture: Option<Capture>,
    channels: Vec<ChannelView>,
    cursors: CursorModel,
    readout: CursorReadout,
    tree: Option<CaptureTree>,
    status: String,
    last_error: Option<String>,
}

impl<L: CaptureLoader> Viewer<L> {
    /// Create an empty viewer
    pub fn new(loader: L, cursors: CursorModel) -> Self {
        Self {
            loader,
            capture: None,
            channels: Vec::new(),
            cursors,
            readout: CursorReadout::default(),
            tree: None,
            status: "Ready".to_string(),
            last_error: None,
        }
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// The displayed capture
    pub fn capture(&self) -> Option<&Capture> {
        self.capture.as_ref()
    }

    /// Path of the displayed capture
    pub fn current_path(&self) -> Option<&Path> {
        self.capture.as_ref().map(Capture::path)
    }

    /// All channels in header order
    pub fn channels(&self) -> &[ChannelView] {
        &self.channels
    }

    /// Channels currently drawn
    pub fn visible_channels(&self) -> impl Iterator<Item = &ChannelView> {
        self.channels.iter().filter(|c| c.visible)
    }

    pub fn cursors(&self) -> &CursorModel {
        &self.cursors
    }

    /// Cursor readout as of the last cursor change
    pub fn readout(&self) -> &CursorReadout {
        &self.readout
    }

    /// Result of the last folder scan
    pub fn tree(&self) -> Option<&CaptureTree> {
        self.tree.as_ref()
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Error waiting to be shown in the dialog
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Report a failure from outside the viewer (theme store, dialogs)
    pub fn show_error(&mut self, status: impl Into<String>, error: impl Into<String>) {
        self.status = status.into();
        self.last_error = Some(error.into());
    }

    /// Replace the status message
    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    /// Window title: file name and instrument model
    pub fn window_title(&self) -> String {
        match &self.capture {
            Some(capture) => format!(
                "Oscilloscope Data - {} - {}",
                capture.file_name(),
                capture.metadata.model()
            ),
            None => DEFAULT_TITLE.to_string(),
        }
    }

    /// Plot title from the horizontal scale, if the capture has one
    pub fn plot_title(&self) -> Option<String> {
        let scale = self.capture.as_ref()?.metadata.get("Horizontal Scale")?;
        Some(format!("Time Scale: {}s/div", scale))
    }

    /// Apply an action; returns true when anything the plot shows changed
    pub fn dispatch(&mut self, action: ViewerAction) -> bool {
        match action {
            ViewerAction::OpenFile(path) => self.open_file(&path),
            ViewerAction::OpenFolder(path) => {
                self.scan_folder(&path);
                false
            }
            ViewerAction::RefreshFolder => {
                if let Some(root) = self.tree.as_ref().map(|t| t.root.clone()) {
                    self.scan_folder(&root);
                }
                false
            }
            ViewerAction::SetChannelVisible { channel, visible } => {
                let Some(view) = self.channels.iter_mut().find(|c| c.name == channel) else {
                    return false;
                };
                if view.visible == visible {
                    return false;
                }
                view.visible = visible;
                self.recompute();
                true
            }
            ViewerAction::SetPairEnabled { axis, enabled } => {
                self.cursors.set_enabled(axis, enabled);
                self.refresh_cursors();
                true
            }
            ViewerAction::SetPairColor { axis, color } => {
                self.cursors.set_color(axis, color);
                true
            }
            ViewerAction::ClearPair(axis) => {
                self.cursors.clear(axis);
                self.refresh_cursors();
                true
            }
            ViewerAction::Pointer { event, viewport } => {
                let changed = self.cursors.handle_pointer(event, &viewport);
                if changed {
                    self.refresh_cursors();
                }
                changed
            }
            ViewerAction::DismissError => {
                self.last_error = None;
                false
            }
        }
    }

    fn open_file(&mut self, path: &Path) -> bool {
        match self.loader.load(path) {
            Ok(capture) => {
                self.status = format!(
                    "Loaded {} ({} samples, {} channels)",
                    capture.file_name(),
                    capture.waveform.len(),
                    capture.waveform.channels().len()
                );

                let previous = std::mem::take(&mut self.channels);
                self.channels = capture
                    .waveform
                    .channel_names()
                    .map(|name| ChannelView {
                        name: name.to_string(),
                        visible: previous
                            .iter()
                            .find(|c| c.name == name)
                            .map(|c| c.visible)
                            .unwrap_or(true),
                        measurements: None,
                        region: None,
                    })
                    .collect();

                self.cursors.on_file_loaded(capture.path());
                self.capture = Some(capture);
                self.readout = self.cursors.readout();
                self.recompute();
                true
            }
            Err(e) => {
                tracing::warn!("Failed to load {:?}: {}", path, e);
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                self.status = format!("Error loading {}", name);
                self.last_error = Some(e.to_string());
                false
            }
        }
    }

    fn scan_folder(&mut self, root: &Path) {
        match discover_captures(root) {
            Ok(tree) => {
                self.status = format!(
                    "Found {} capture files in {}",
                    tree.file_count(),
                    root.display()
                );
                self.tree = Some(tree);
            }
            Err(e) => {
                tracing::warn!("Failed to scan {:?}: {}", root, e);
                self.status = format!("Could not open folder {}", root.display());
                self.last_error = Some(e.to_string());
            }
        }
    }

    fn refresh_cursors(&mut self) {
        self.readout = self.cursors.readout();
        self.recompute_regions();
    }

    /// Recompute measurements for all visible channels
    fn recompute(&mut self) {
        let Some(capture) = &self.capture else {
            return;
        };
        let time = capture.waveform.time();
        for view in &mut self.channels {
            view.measurements = if view.visible {
                capture
                    .waveform
                    .channel(&view.name)
                    .map(|channel| measure(time, &channel.samples))
            } else {
                None
            };
        }
        self.recompute_regions();
    }

    fn recompute_regions(&mut self) {
        let Some(capture) = &self.capture else {
            return;
        };
        let window = self.readout.delta_t.and_then(|_| {
            let t1 = self.readout.position(CursorId::TIME1)?;
            let t2 = self.readout.position(CursorId::TIME2)?;
            Some((t1, t2))
        });
        let time = capture.waveform.time();
        for view in &mut self.channels {
            view.region = match (window, view.visible) {
                (Some((a, b)), true) => capture
                    .waveform
                    .channel(&view.name)
                    .and_then(|channel| measure_region(time, &channel.samples, a, b)),
                _ => None,
            };
        }
    }
}
