//! Capture file loading
//!
//! This module turns oscilloscope CSV exports into [`Capture`] values and
//! finds capture files inside a data folder.
//!
//! # File Format
//!
//! ```text
//! Model,TBS1052B
//! Horizontal Scale,0.0005
//! Vertical Units,V
//! TIME,CH1,CH2
//! -4.97000e-05,-0.16,0.4
//! -4.96990e-05,-0.08,0.4
//! ```
//!
//! Leading `key,value` lines are instrument metadata. The first row that
//! contains the token `TIME` is the column header; `CH*` columns are
//! channels. Everything after the header is numeric sample data.
//!
//! # Main Types
//!
//! - [`CaptureLoader`] - Loader contract used by the viewer shell
//! - [`CsvCaptureLoader`] - The CSV implementation
//! - [`LoaderConfig`] - Metadata block size and required channels
//! - [`CaptureTree`] - CSV files found under a data folder

mod csv_loader;
mod discovery;

pub use csv_loader::{parse_capture, CsvCaptureLoader};
pub use discovery::{discover_captures, CaptureEntry, CaptureFolder, CaptureTree};

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;
use crate::types::Capture;

/// Default number of leading lines recorded as metadata
pub const DEFAULT_METADATA_LINES: usize = 13;

/// Loads a capture from a path
///
/// Implementations either return a fully decoded capture or an error that
/// names what is wrong with the input; they never return partial data.
pub trait CaptureLoader {
    /// Load and decode the capture at `path`
    fn load(&self, path: &Path) -> Result<Capture>;
}

/// Loader settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Number of leading lines that may hold `key,value` metadata
    #[serde(default = "default_metadata_lines")]
    pub metadata_lines: usize,

    /// Channel columns that must be present in every capture
    #[serde(default)]
    pub required_channels: Vec<String>,
}

fn default_metadata_lines() -> usize {
    DEFAULT_METADATA_LINES
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            metadata_lines: DEFAULT_METADATA_LINES,
            required_channels: Vec::new(),
        }
    }
}

impl LoaderConfig {
    /// Require the given channels to be present
    pub fn with_required_channels<I, S>(mut self, channels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_channels = channels.into_iter().map(Into::into).collect();
        self
    }
}
