//! Error handling for the Scope Viewer application
//!
//! This module defines custom error types and a Result alias for use
//! throughout the application.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for Scope Viewer operations
#[derive(Error, Debug)]
pub enum ScopeError {
    /// The capture has no column header line containing `TIME`
    #[error("No header row containing 'TIME' found in {path:?}")]
    MissingHeader { path: PathBuf },

    /// A required column is absent from the header row
    #[error("Missing required columns: {}", .columns.join(", "))]
    MissingColumn { columns: Vec<String> },

    /// The header row has no `CH*` channel columns
    #[error("No channel columns (CH*) found in header")]
    NoChannels,

    /// A data cell could not be parsed as a number
    #[error("Invalid sample {value:?} in column {column} at line {line}")]
    InvalidSample {
        line: u64,
        column: String,
        value: String,
    },

    /// Sample arrays of different lengths were combined into a waveform
    #[error("Channel {channel} has {actual} samples, expected {expected}")]
    LengthMismatch {
        channel: String,
        expected: usize,
        actual: usize,
    },

    /// Errors related to theme definitions
    #[error("Theme error: {0}")]
    Theme(String),

    /// Errors related to configuration loading/saving
    #[error("Configuration error: {0}")]
    Config(String),

    /// CSV tokenizer errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<ScopeError>,
    },
}

impl ScopeError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        ScopeError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Whether the error stems from the contents of a capture file
    /// rather than from the environment.
    pub fn is_format_error(&self) -> bool {
        match self {
            ScopeError::MissingHeader { .. }
            | ScopeError::MissingColumn { .. }
            | ScopeError::NoChannels
            | ScopeError::InvalidSample { .. }
            | ScopeError::LengthMismatch { .. }
            | ScopeError::Csv(_) => true,
            ScopeError::WithContext { source, .. } => source.is_format_error(),
            _ => false,
        }
    }
}

/// Result type alias for Scope Viewer operations
pub type Result<T> = std::result::Result<T, ScopeError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.with_context(f()))
    }
}
