//! Configuration module for Scope Viewer
//!
//! This module handles application configuration including:
//! - Application state persistence (last folder, recent captures, cursor colors)
//! - Loader settings
//! - Color themes (see [`theme`])
//!
//! # App Data Location
//!
//! Application data is stored in the platform-appropriate location:
//! - **Linux**: `~/.local/share/dev.scopeviewer.scope-viewer/`
//! - **macOS**: `~/Library/Application Support/dev.scopeviewer.scope-viewer/`
//! - **Windows**: `%APPDATA%\dev.scopeviewer.scope-viewer\`
//!
//! # Files
//!
//! - `app_state.json` - Last folder, recent captures and preferences
//! - `themes/*.toml` - User color themes
//! - `logs/` - Daily rolling log files
//!
//! # Example
//!
//! ```ignore
//! use scope_viewer::config::AppState;
//!
//! let mut state = AppState::load_or_default();
//! state.add_recent_file("/data/lab3/scope_1.csv");
//! state.save()?;
//! ```

pub mod theme;

pub use theme::{Palette, ThemeRegistry, DARK_THEME, LIGHT_THEME};

use crate::capture::LoaderConfig;
use crate::cursor::{Axis, CursorColor};
use crate::error::{Result, ScopeError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Application identifier for data directories
pub const APP_ID: &str = "dev.scopeviewer.scope-viewer";

/// App state filename
pub const APP_STATE_FILE: &str = "app_state.json";

/// Directory holding user themes, relative to the app data directory
pub const THEMES_DIR: &str = "themes";

/// Directory holding log files, relative to the app data directory
pub const LOGS_DIR: &str = "logs";

/// Maximum number of recent captures to remember
pub const MAX_RECENT_FILES: usize = 10;

// ==================== App Data Directory ====================

/// Get the application data directory path
pub fn app_data_dir() -> Option<PathBuf> {
    dirs_next::data_dir().map(|p| p.join(APP_ID))
}

/// Ensure the app data directory exists
pub fn ensure_app_data_dir() -> Result<PathBuf> {
    let dir = app_data_dir().ok_or_else(|| {
        ScopeError::Config("Could not determine app data directory".to_string())
    })?;

    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| {
            ScopeError::Config(format!("Failed to create app data directory: {}", e))
        })?;
    }

    Ok(dir)
}

/// Get the path to the app state file
pub fn app_state_path() -> Option<PathBuf> {
    app_data_dir().map(|p| p.join(APP_STATE_FILE))
}

/// Get the user theme directory
pub fn themes_dir() -> Option<PathBuf> {
    app_data_dir().map(|p| p.join(THEMES_DIR))
}

/// Create the log directory under `base`
pub fn ensure_logs_dir(base: &Path) -> Result<PathBuf> {
    let dir = base.join(LOGS_DIR);
    std::fs::create_dir_all(&dir).map_err(|e| {
        ScopeError::Config(format!(
            "Failed to create log directory {}: {}",
            dir.display(),
            e
        ))
    })?;
    Ok(dir)
}

// ==================== Recent File Entry ====================

/// A recently opened capture
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentFile {
    /// Path to the capture file
    pub path: PathBuf,

    /// Last opened timestamp (Unix seconds)
    pub last_opened: u64,
}

impl RecentFile {
    /// Create a new entry stamped with the current time
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let now = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        Self {
            path: path.into(),
            last_opened: now,
        }
    }

    /// Check if the file still exists
    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

// ==================== App State ====================

/// Persistent application state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppState {
    /// Version for future migration support
    #[serde(default = "default_app_state_version")]
    pub version: u32,

    /// Folder shown in the file browser last time
    #[serde(default)]
    pub last_folder: Option<PathBuf>,

    /// Recently opened captures, most recent first
    #[serde(default)]
    pub recent_files: Vec<RecentFile>,

    /// Name of the selected theme
    #[serde(default = "default_theme")]
    pub theme: String,

    /// Color of the time markers
    #[serde(default = "default_time_color")]
    pub time_cursor_color: CursorColor,

    /// Color of the voltage markers
    #[serde(default = "default_voltage_color")]
    pub voltage_cursor_color: CursorColor,

    /// CSV loader settings
    #[serde(default)]
    pub loader: LoaderConfig,
}

fn default_app_state_version() -> u32 {
    1
}

fn default_theme() -> String {
    DARK_THEME.to_string()
}

fn default_time_color() -> CursorColor {
    CursorColor::default_for(Axis::Time)
}

fn default_voltage_color() -> CursorColor {
    CursorColor::default_for(Axis::Voltage)
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            version: 1,
            last_folder: None,
            recent_files: Vec::new(),
            theme: default_theme(),
            time_cursor_color: default_time_color(),
            voltage_cursor_color: default_voltage_color(),
            loader: LoaderConfig::default(),
        }
    }
}

impl AppState {
    /// Load app state from the default location
    pub fn load() -> Result<Self> {
        let path = app_state_path().ok_or_else(|| {
            ScopeError::Config("Could not determine app state path".to_string())
        })?;
        Self::load_from(&path)
    }

    /// Load app state from a specific file; a missing file gives defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ScopeError::Config(format!("Failed to read app state: {}", e)))?;

        serde_json::from_str(&content)
            .map_err(|e| ScopeError::Config(format!("Failed to parse app state: {}", e)))
    }

    /// Load app state, returning defaults on any error
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!("Failed to load app state, using defaults: {}", e);
            Self::default()
        })
    }

    /// Save app state to the default location
    pub fn save(&self) -> Result<()> {
        let dir = ensure_app_data_dir()?;
        self.save_to(&dir.join(APP_STATE_FILE))
    }

    /// Save app state to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ScopeError::Config(format!("Failed to serialize app state: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| ScopeError::Config(format!("Failed to write app state: {}", e)))
    }

    /// Add or move a capture to the front of the recent list
    pub fn add_recent_file(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref().to_path_buf();

        self.recent_files.retain(|f| f.path != path);
        self.recent_files.insert(0, RecentFile::new(path));
        self.recent_files.truncate(MAX_RECENT_FILES);
    }

    /// Clean up recent captures that no longer exist
    pub fn cleanup_missing_files(&mut self) {
        self.recent_files.retain(|f| f.exists());

        if let Some(ref folder) = self.last_folder {
            if !folder.is_dir() {
                self.last_folder = None;
            }
        }
    }

    /// Get the last folder if it still exists
    pub fn get_last_folder(&self) -> Option<&Path> {
        self.last_folder
            .as_ref()
            .filter(|p| p.is_dir())
            .map(|p| p.as_path())
    }

    /// Stored color of a marker pair
    pub fn cursor_color(&self, axis: Axis) -> CursorColor {
        match axis {
            Axis::Time => self.time_cursor_color,
            Axis::Voltage => self.voltage_cursor_color,
        }
    }

    /// Remember the color of a marker pair
    pub fn set_cursor_color(&mut self, axis: Axis, color: CursorColor) {
        match axis {
            Axis::Time => self.time_cursor_color = color,
            Axis::Voltage => self.voltage_cursor_color = color,
        }
    }
}
