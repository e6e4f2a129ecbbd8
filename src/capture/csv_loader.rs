//! CSV capture decoder

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};

use super::{CaptureLoader, LoaderConfig};
use crate::error::{Result, ResultExt, ScopeError};
use crate::types::{Capture, Channel, Metadata, Waveform, CHANNEL_PREFIX, TIME_COLUMN};

/// Loads oscilloscope CSV exports from disk
#[derive(Debug, Clone, Default)]
pub struct CsvCaptureLoader {
    config: LoaderConfig,
}

impl CsvCaptureLoader {
    /// Create a loader with the given settings
    pub fn new(config: LoaderConfig) -> Self {
        Self { config }
    }

    /// Current settings
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }
}

impl CaptureLoader for CsvCaptureLoader {
    fn load(&self, path: &Path) -> Result<Capture> {
        tracing::debug!("Reading capture {:?}", path);
        let file = File::open(path)
            .map_err(ScopeError::from)
            .with_context(|| format!("Failed to open {}", path.display()))?;

        let (waveform, metadata) = match parse_capture(BufReader::new(file), &self.config) {
            Ok(parsed) => parsed,
            Err(ScopeError::MissingHeader { .. }) => {
                return Err(ScopeError::MissingHeader {
                    path: path.to_path_buf(),
                })
            }
            Err(e) => return Err(e),
        };

        tracing::info!(
            "Loaded {:?}: {} samples, {} channels, {} metadata entries",
            path,
            waveform.len(),
            waveform.channels().len(),
            metadata.len()
        );
        Ok(Capture::new(path, waveform, metadata))
    }
}

/// Column layout taken from the header row
struct HeaderLayout {
    time_index: usize,
    channels: Vec<(usize, String)>,
}

impl HeaderLayout {
    fn from_record(record: &StringRecord, config: &LoaderConfig) -> Result<Self> {
        let time_index = record
            .iter()
            .position(|field| field == TIME_COLUMN)
            .ok_or_else(|| ScopeError::MissingColumn {
                columns: vec![TIME_COLUMN.to_string()],
            })?;

        let channels: Vec<(usize, String)> = record
            .iter()
            .enumerate()
            .filter(|(_, name)| name.starts_with(CHANNEL_PREFIX))
            .map(|(i, name)| (i, name.to_string()))
            .collect();

        let missing: Vec<String> = config
            .required_channels
            .iter()
            .filter(|required| !channels.iter().any(|(_, name)| name == *required))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(ScopeError::MissingColumn { columns: missing });
        }

        if channels.is_empty() {
            return Err(ScopeError::NoChannels);
        }

        Ok(Self {
            time_index,
            channels,
        })
    }
}

fn is_header_line(line: &str) -> bool {
    line.split(',').any(|field| field.trim() == TIME_COLUMN)
}

fn parse_cell(record: &StringRecord, index: usize, column: &str, line_offset: u64) -> Result<f64> {
    let line = record.position().map(|p| p.line()).unwrap_or(0) + line_offset;
    let value = record.get(index).unwrap_or("");
    value.parse::<f64>().map_err(|_| ScopeError::InvalidSample {
        line,
        column: column.to_string(),
        value: value.to_string(),
    })
}

/// Decode a capture from any reader
///
/// Returns the waveform and the metadata found before the header row.
/// Preamble lines are split at their first comma and kept verbatim; only
/// the header and the rows after it go through the CSV reader.
/// On failure nothing is returned; the caller keeps whatever it had before.
pub fn parse_capture<R: Read>(mut input: R, config: &LoaderConfig) -> Result<(Waveform, Metadata)> {
    let mut content = String::new();
    input.read_to_string(&mut content)?;

    let mut metadata = Metadata::new();
    let mut header = None;
    let mut offset = 0usize;
    for (index, line) in content.split_inclusive('\n').enumerate() {
        let trimmed = line.trim();
        if is_header_line(trimmed) {
            header = Some(index);
            break;
        }
        if index < config.metadata_lines {
            if let Some((key, value)) = trimmed.split_once(',') {
                metadata.insert(key.trim(), value.trim());
            }
        }
        offset += line.len();
    }

    let missing_header = || ScopeError::MissingHeader {
        path: Default::default(),
    };
    let header_index = header.ok_or_else(missing_header)?;
    let line_offset = header_index as u64;

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(content[offset..].as_bytes());

    let mut record = StringRecord::new();
    if !reader.read_record(&mut record)? {
        return Err(missing_header());
    }
    let layout = HeaderLayout::from_record(&record, config)?;

    let mut time = Vec::new();
    let mut samples: Vec<Vec<f64>> = vec![Vec::new(); layout.channels.len()];

    while reader.read_record(&mut record)? {
        if record.iter().all(str::is_empty) {
            continue;
        }
        time.push(parse_cell(&record, layout.time_index, TIME_COLUMN, line_offset)?);
        for ((index, name), column) in layout.channels.iter().zip(samples.iter_mut()) {
            column.push(parse_cell(&record, *index, name, line_offset)?);
        }
    }

    let channels = layout
        .channels
        .into_iter()
        .zip(samples)
        .map(|((_, name), samples)| Channel::new(name, samples))
        .collect();

    Ok((Waveform::new(time, channels)?, metadata))
}
