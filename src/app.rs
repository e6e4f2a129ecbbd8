//! Application entry point for the egui frontend
//!
//! Re-exports the main application type from the frontend module.

pub use crate::frontend::ScopeViewerApp;
