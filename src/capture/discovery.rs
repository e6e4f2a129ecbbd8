//! Capture file discovery under a data folder

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Result, ScopeError};

/// A capture file found during a folder scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureEntry {
    /// File name shown in the tree
    pub name: String,
    /// Absolute path passed to the loader
    pub path: PathBuf,
}

/// A sub-folder holding capture files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureFolder {
    /// Path relative to the scanned root
    pub relative: PathBuf,
    /// Files directly inside this folder
    pub files: Vec<CaptureEntry>,
}

impl CaptureFolder {
    /// Label shown for the folder node
    pub fn label(&self) -> String {
        self.relative.display().to_string()
    }
}

/// Result of scanning a data folder
///
/// Sub-folders come first (shallow before deep, then by path), files in
/// the root folder come last. Files are sorted case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CaptureTree {
    /// The scanned folder
    pub root: PathBuf,
    /// Sub-folders that contain at least one capture
    pub folders: Vec<CaptureFolder>,
    /// Captures directly inside the root folder
    pub root_files: Vec<CaptureEntry>,
}

impl CaptureTree {
    /// Total number of capture files
    pub fn file_count(&self) -> usize {
        self.root_files.len() + self.folders.iter().map(|f| f.files.len()).sum::<usize>()
    }

    /// Check if no captures were found
    pub fn is_empty(&self) -> bool {
        self.file_count() == 0
    }

    /// All capture paths in display order
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.folders
            .iter()
            .flat_map(|f| f.files.iter())
            .chain(self.root_files.iter())
            .map(|e| e.path.as_path())
    }
}

fn is_capture_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false)
}

/// Recursively collect `.csv` files (any case) under `root`
pub fn discover_captures(root: &Path) -> Result<CaptureTree> {
    if !root.is_dir() {
        return Err(ScopeError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} is not a folder", root.display()),
        )));
    }

    let mut tree = CaptureTree {
        root: root.to_path_buf(),
        ..Default::default()
    };

    for entry in WalkDir::new(root).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Skipping unreadable entry while scanning {:?}: {}", root, e);
                continue;
            }
        };
        if !entry.file_type().is_file() || !is_capture_file(entry.path()) {
            continue;
        }

        let capture = CaptureEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            path: entry.path().to_path_buf(),
        };
        let relative = entry
            .path()
            .parent()
            .and_then(|parent| parent.strip_prefix(root).ok())
            .map(Path::to_path_buf)
            .unwrap_or_default();

        if relative.as_os_str().is_empty() {
            tree.root_files.push(capture);
        } else if let Some(folder) = tree.folders.iter_mut().find(|f| f.relative == relative) {
            folder.files.push(capture);
        } else {
            tree.folders.push(CaptureFolder {
                relative,
                files: vec![capture],
            });
        }
    }

    let by_name = |a: &CaptureEntry, b: &CaptureEntry| {
        a.name.to_uppercase().cmp(&b.name.to_uppercase())
    };
    tree.root_files.sort_by(by_name);
    for folder in &mut tree.folders {
        folder.files.sort_by(by_name);
    }
    tree.folders.sort_by(|a, b| {
        a.relative
            .components()
            .count()
            .cmp(&b.relative.components().count())
            .then_with(|| a.relative.cmp(&b.relative))
    });

    tracing::debug!("Found {} captures under {:?}", tree.file_count(), root);
    Ok(tree)
}
