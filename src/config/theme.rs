//! Color themes
//!
//! A [`Palette`] is an immutable set of colors handed to the UI each frame.
//! [`ThemeRegistry`] holds the built-in "Dark" and "Light" palettes plus any
//! user themes found as TOML files in the themes directory:
//!
//! ```toml
//! name = "Phosphor"
//! background = [0, 16, 0, 255]
//! foreground = [120, 255, 120, 255]
//! grid = [0, 64, 0, 255]
//! accent = [0, 200, 0, 255]
//! channel_colors = [[120, 255, 120, 255], [255, 200, 0, 255]]
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ResultExt, ScopeError};

/// Name of the built-in dark theme
pub const DARK_THEME: &str = "Dark";

/// Name of the built-in light theme
pub const LIGHT_THEME: &str = "Light";

/// Extension of user theme files
pub const THEME_EXTENSION: &str = "toml";

/// Convert a stored RGBA value for drawing
pub fn color32(rgba: [u8; 4]) -> Color32 {
    Color32::from_rgba_unmultiplied(rgba[0], rgba[1], rgba[2], rgba[3])
}

/// Colors used to draw the viewer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    /// Theme name shown in the selector
    pub name: String,
    /// Plot and window background
    pub background: [u8; 4],
    /// Text, axes and labels
    pub foreground: [u8; 4],
    /// Plot grid lines
    pub grid: [u8; 4],
    /// Selection and highlight color
    pub accent: [u8; 4],
    /// Line colors, assigned to channels in header order and cycled
    pub channel_colors: Vec<[u8; 4]>,
}

impl Palette {
    /// Built-in dark palette
    pub fn dark() -> Self {
        Self {
            name: DARK_THEME.to_string(),
            background: [43, 43, 43, 255],
            foreground: [255, 255, 255, 255],
            grid: [64, 64, 64, 255],
            accent: [0, 120, 215, 255],
            channel_colors: vec![
                [255, 255, 0, 255],
                [0, 255, 255, 255],
                [255, 0, 255, 255],
                [0, 255, 0, 255],
                [255, 0, 0, 255],
                [255, 165, 0, 255],
                [255, 255, 255, 255],
                [128, 0, 128, 255],
            ],
        }
    }

    /// Built-in light palette
    pub fn light() -> Self {
        Self {
            name: LIGHT_THEME.to_string(),
            background: [245, 245, 245, 255],
            foreground: [20, 20, 20, 255],
            grid: [200, 200, 200, 255],
            accent: [0, 95, 184, 255],
            channel_colors: vec![
                [190, 150, 0, 255],
                [0, 140, 160, 255],
                [170, 0, 170, 255],
                [0, 140, 0, 255],
                [200, 0, 0, 255],
                [220, 110, 0, 255],
                [40, 40, 40, 255],
                [110, 0, 160, 255],
            ],
        }
    }

    /// Line color for the channel at `index`
    pub fn channel_color(&self, index: usize) -> Color32 {
        if self.channel_colors.is_empty() {
            return color32(self.foreground);
        }
        color32(self.channel_colors[index % self.channel_colors.len()])
    }

    /// Whether the background is dark
    pub fn is_dark(&self) -> bool {
        let [r, g, b, _] = self.background;
        (u32::from(r) + u32::from(g) + u32::from(b)) < 3 * 128
    }

    /// egui visuals matching this palette
    pub fn visuals(&self) -> egui::Visuals {
        let mut visuals = if self.is_dark() {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        };
        let background = color32(self.background);
        visuals.panel_fill = background;
        visuals.window_fill = background;
        visuals.extreme_bg_color = background;
        visuals.override_text_color = Some(color32(self.foreground));
        visuals.selection.bg_fill = color32(self.accent);
        visuals
    }

    /// File name a user theme is saved under
    pub fn file_name(&self) -> String {
        format!(
            "{}.{}",
            self.name.to_lowercase().replace(' ', "_"),
            THEME_EXTENSION
        )
    }

    /// Parse a theme from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let palette: Palette =
            toml::from_str(content).map_err(|e| ScopeError::Theme(e.to_string()))?;
        if palette.name.trim().is_empty() {
            return Err(ScopeError::Theme("Theme must have a name".to_string()));
        }
        Ok(palette)
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::dark()
    }
}

/// Available themes by name
#[derive(Debug, Clone)]
pub struct ThemeRegistry {
    themes: BTreeMap<String, Palette>,
    dir: Option<PathBuf>,
}

impl Default for ThemeRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ThemeRegistry {
    /// Registry with only the built-in themes
    pub fn builtin() -> Self {
        let mut themes = BTreeMap::new();
        for palette in [Palette::dark(), Palette::light()] {
            themes.insert(palette.name.clone(), palette);
        }
        Self { themes, dir: None }
    }

    /// Built-in themes plus every readable theme in `dir`
    ///
    /// Files that fail to parse are logged and skipped. A user theme may
    /// replace a built-in one by using the same name.
    pub fn load(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let mut registry = Self::builtin();

        match std::fs::read_dir(&dir) {
            Ok(entries) => {
                for entry in entries.flatten() {
                    let path = entry.path();
                    let is_theme = path
                        .extension()
                        .map(|ext| ext.eq_ignore_ascii_case(THEME_EXTENSION))
                        .unwrap_or(false);
                    if !is_theme {
                        continue;
                    }
                    match Self::read_theme(&path) {
                        Ok(palette) => {
                            tracing::debug!("Loaded theme {:?} from {:?}", palette.name, path);
                            registry.themes.insert(palette.name.clone(), palette);
                        }
                        Err(e) => tracing::warn!("Skipping theme {:?}: {}", path, e),
                    }
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!("Could not read theme directory {:?}: {}", dir, e),
        }

        registry.dir = Some(dir);
        registry
    }

    fn read_theme(path: &Path) -> Result<Palette> {
        let content = std::fs::read_to_string(path)?;
        Palette::from_toml(&content)
    }

    /// Sorted theme names
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.themes.keys().map(String::as_str)
    }

    /// Look up a theme
    pub fn get(&self, name: &str) -> Option<&Palette> {
        self.themes.get(name)
    }

    /// Look up a theme, falling back to the dark palette
    pub fn get_or_default(&self, name: &str) -> Palette {
        self.get(name).cloned().unwrap_or_else(|| {
            tracing::warn!("Unknown theme {:?}, using {}", name, DARK_THEME);
            Palette::dark()
        })
    }

    /// Write a palette to the theme directory and register it
    pub fn save_theme(&mut self, palette: Palette) -> Result<PathBuf> {
        let dir = self
            .dir
            .clone()
            .ok_or_else(|| ScopeError::Theme("No theme directory configured".to_string()))?;
        std::fs::create_dir_all(&dir)
            .map_err(ScopeError::from)
            .with_context(|| format!("Failed to create {}", dir.display()))?;

        let path = dir.join(palette.file_name());
        let content =
            toml::to_string_pretty(&palette).map_err(|e| ScopeError::Theme(e.to_string()))?;
        std::fs::write(&path, content)
            .map_err(ScopeError::from)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        tracing::info!("Saved theme {:?} to {:?}", palette.name, path);
        self.themes.insert(palette.name.clone(), palette);
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_themes() {
        let registry = ThemeRegistry::builtin();
        assert_eq!(registry.names().collect::<Vec<_>>(), [DARK_THEME, LIGHT_THEME]);
        assert!(registry.get(DARK_THEME).unwrap().is_dark());
        assert!(!registry.get(LIGHT_THEME).unwrap().is_dark());
    }

    #[test]
    fn test_channel_colors_cycle() {
        let palette = Palette::dark();
        assert_eq!(palette.channel_color(0), Color32::from_rgb(255, 255, 0));
        assert_eq!(palette.channel_color(8), palette.channel_color(0));
    }

    #[test]
    fn test_load_skips_bad_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("phosphor.toml"),
            r#"
name = "Phosphor"
background = [0, 16, 0, 255]
foreground = [120, 255, 120, 255]
grid = [0, 64, 0, 255]
accent = [0, 200, 0, 255]
channel_colors = [[120, 255, 120, 255]]
"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("broken.toml"), "name = ").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let registry = ThemeRegistry::load(dir.path());
        assert_eq!(registry.names().count(), 3);
        let phosphor = registry.get("Phosphor").unwrap();
        assert_eq!(phosphor.grid, [0, 64, 0, 255]);
        assert!(phosphor.is_dark());
    }

    #[test]
    fn test_missing_directory_gives_builtins() {
        let dir = tempfile::tempdir().unwrap();
        let registry = ThemeRegistry::load(dir.path().join("absent"));
        assert_eq!(registry.names().count(), 2);
    }

    #[test]
    fn test_save_theme() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = ThemeRegistry::load(dir.path().join("themes"));

        let mut palette = Palette::light();
        palette.name = "Lab Bench".to_string();
        let path = registry.save_theme(palette.clone()).unwrap();
        assert!(path.ends_with("lab_bench.toml"));

        let reloaded = ThemeRegistry::load(dir.path().join("themes"));
        assert_eq!(reloaded.get("Lab Bench"), Some(&palette));
    }

    #[test]
    fn test_save_without_directory_fails() {
        let mut registry = ThemeRegistry::builtin();
        assert!(registry.save_theme(Palette::dark()).is_err());
    }

    #[test]
    fn test_nameless_theme_rejected() {
        let err = Palette::from_toml(
            "name = \"\"\nbackground = [0,0,0,255]\nforeground = [0,0,0,255]\ngrid = [0,0,0,255]\naccent = [0,0,0,255]\nchannel_colors = []\n",
        )
        .unwrap_err();
        assert!(matches!(err, ScopeError::Theme(_)));
    }
}
