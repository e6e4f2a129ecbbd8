//! Core data types for Scope Viewer
//!
//! This module contains the decoded form of an oscilloscope capture: the
//! shared time base, one sample sequence per channel, and the free-form
//! instrument metadata that preceded the samples in the file.
//!
//! # Main Types
//!
//! - [`Waveform`] - Time base plus equal-length channel sample arrays
//! - [`Channel`] - A named voltage sample sequence (e.g. `CH1`)
//! - [`Metadata`] - Instrument key/value pairs used for display labels
//! - [`Capture`] - A waveform and its metadata, tagged with the source path

use std::path::{Path, PathBuf};

use crate::error::{Result, ScopeError};

/// Name of the mandatory time column
pub const TIME_COLUMN: &str = "TIME";

/// Prefix identifying channel columns
pub const CHANNEL_PREFIX: &str = "CH";

/// Maximum number of points to render per line for performance
pub const MAX_RENDER_POINTS: usize = 4000;

/// One named voltage sample sequence
#[derive(Debug, Clone, PartialEq)]
pub struct Channel {
    /// Column name from the capture header
    pub name: String,
    /// Voltage samples, parallel to the waveform time base
    pub samples: Vec<f64>,
}

impl Channel {
    /// Create a new channel
    pub fn new(name: impl Into<String>, samples: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            samples,
        }
    }
}

/// Decoded sample arrays of a capture
///
/// Every channel holds exactly as many samples as the time base.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Waveform {
    time: Vec<f64>,
    channels: Vec<Channel>,
}

impl Waveform {
    /// Build a waveform, rejecting channels whose length differs from the time base
    pub fn new(time: Vec<f64>, channels: Vec<Channel>) -> Result<Self> {
        for channel in &channels {
            if channel.samples.len() != time.len() {
                return Err(ScopeError::LengthMismatch {
                    channel: channel.name.clone(),
                    expected: time.len(),
                    actual: channel.samples.len(),
                });
            }
        }
        Ok(Self { time, channels })
    }

    /// The shared time base in seconds
    pub fn time(&self) -> &[f64] {
        &self.time
    }

    /// Number of samples per channel
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// Check if the waveform holds no samples
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// All channels in header order
    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    /// Channel names in header order
    pub fn channel_names(&self) -> impl Iterator<Item = &str> {
        self.channels.iter().map(|c| c.name.as_str())
    }

    /// Look up a channel by name
    pub fn channel(&self, name: &str) -> Option<&Channel> {
        self.channels.iter().find(|c| c.name == name)
    }

    /// Time span covered by the capture, if it has samples
    pub fn time_span(&self) -> Option<(f64, f64)> {
        match (self.time.first(), self.time.last()) {
            (Some(&first), Some(&last)) => Some((first, last)),
            _ => None,
        }
    }

    /// (time, voltage) pairs of a channel, ready for plotting
    pub fn plot_points(&self, name: &str) -> Option<Vec<[f64; 2]>> {
        let channel = self.channel(name)?;
        Some(
            self.time
                .iter()
                .zip(channel.samples.iter())
                .map(|(&t, &v)| [t, v])
                .collect(),
        )
    }
}

/// Instrument metadata from the capture header
///
/// Keys and values are kept verbatim in file order; a repeated key keeps
/// its first position and the last value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Metadata {
    entries: Vec<(String, String)>,
}

impl Metadata {
    /// Create an empty metadata map
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an entry
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let (key, value) = (key.into(), value.into());
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Look up a value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Look up a value with a fallback
    pub fn get_or<'a>(&'a self, key: &str, fallback: &'a str) -> &'a str {
        self.get(key).unwrap_or(fallback)
    }

    /// Iterate entries in file order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Unit label for the time axis
    pub fn horizontal_units(&self) -> &str {
        self.get_or("Horizontal Units", "s")
    }

    /// Unit label for the voltage axis
    pub fn vertical_units(&self) -> &str {
        self.get_or("Vertical Units", "V")
    }

    /// Instrument model name
    pub fn model(&self) -> &str {
        self.get_or("Model", "Unknown")
    }
}

/// A loaded capture file
#[derive(Debug, Clone, PartialEq)]
pub struct Capture {
    /// Path the capture was loaded from
    pub path: PathBuf,
    /// Decoded samples
    pub waveform: Waveform,
    /// Instrument metadata
    pub metadata: Metadata,
}

impl Capture {
    /// Create a new capture
    pub fn new(path: impl Into<PathBuf>, waveform: Waveform, metadata: Metadata) -> Self {
        Self {
            path: path.into(),
            waveform,
            metadata,
        }
    }

    /// Source path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name for titles and status messages
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_waveform_rejects_length_mismatch() {
        let result = Waveform::new(
            vec![0.0, 1.0, 2.0],
            vec![Channel::new("CH1", vec![0.0, 1.0])],
        );
        assert!(matches!(
            result,
            Err(ScopeError::LengthMismatch {
                expected: 3,
                actual: 2,
                ..
            })
        ));
    }

    #[test]
    fn test_waveform_accessors() {
        let waveform = Waveform::new(
            vec![0.0, 0.5, 1.0],
            vec![
                Channel::new("CH1", vec![1.0, 2.0, 3.0]),
                Channel::new("CH2", vec![-1.0, -2.0, -3.0]),
            ],
        )
        .unwrap();

        assert_eq!(waveform.len(), 3);
        assert_eq!(waveform.time_span(), Some((0.0, 1.0)));
        assert_eq!(waveform.channel_names().collect::<Vec<_>>(), ["CH1", "CH2"]);
        assert_eq!(
            waveform.plot_points("CH2").unwrap(),
            vec![[0.0, -1.0], [0.5, -2.0], [1.0, -3.0]]
        );
        assert!(waveform.channel("CH3").is_none());
    }

    #[test]
    fn test_metadata_fallbacks() {
        let mut metadata = Metadata::new();
        assert_eq!(metadata.horizontal_units(), "s");
        assert_eq!(metadata.model(), "Unknown");

        metadata.insert("Model", "TBS1052B");
        metadata.insert("Vertical Units", "mV");
        assert_eq!(metadata.model(), "TBS1052B");
        assert_eq!(metadata.vertical_units(), "mV");
        assert_eq!(metadata.len(), 2);
    }

    #[test]
    fn test_metadata_keeps_file_order() {
        let mut metadata = Metadata::new();
        metadata.insert("Record Length", "2500");
        metadata.insert("Model", "TBS1052B");
        metadata.insert("Horizontal Units", "s");
        metadata.insert("Model", "TBS2000");

        let keys: Vec<&str> = metadata.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["Record Length", "Model", "Horizontal Units"]);
        assert_eq!(metadata.model(), "TBS2000");
        assert_eq!(metadata.len(), 3);
    }

    #[test]
    fn test_capture_file_name() {
        let capture = Capture::new("/data/lab3/scope_1.csv", Waveform::default(), Metadata::new());
        assert_eq!(capture.file_name(), "scope_1.csv");
    }
}
