//! Frontend module for egui UI
//!
//! This module provides the main window using eframe/egui. The window is
//! laid out as a menu bar and toolbar on top, a side panel with the file
//! browser, channel toggles, cursor controls and measurements, the plot in
//! the central area, and a status bar at the bottom.
//!
//! # Main Types
//!
//! - [`ScopeViewerApp`] - Main application state implementing [`eframe::App`]
//! - [`PlotSurface`] - Plot rendering and pointer translation
//! - [`AppAction`] - Actions returned by panels
//!
//! # Submodules
//!
//! - `panels` - Side panel components
//! - `plot` - Plot rendering with egui_plot
//! - `toolbar` - Reset zoom and theme controls
//! - `status_bar` - Bottom status line

mod panels;
mod plot;
pub mod state;
mod status_bar;
mod toolbar;

pub use panels::{cursor_rows, measurement_rows, UNDEFINED};
pub use plot::{decimate_points, PlotSurface};
pub use state::AppAction;

use std::path::PathBuf;

use panels::{ChannelPanel, CursorPanel, FileBrowserPanel, MeasurementPanel};
use status_bar::{render_status_bar, StatusBarContext};
use toolbar::{render_toolbar, ToolbarContext};

use crate::capture::CsvCaptureLoader;
use crate::config::{AppState, Palette, ThemeRegistry};
use crate::cursor::CursorModel;
use crate::viewer::{Viewer, ViewerAction, DEFAULT_TITLE};

/// Main application state for the scope viewer
pub struct ScopeViewerApp {
    viewer: Viewer<CsvCaptureLoader>,
    app_state: AppState,
    themes: ThemeRegistry,
    palette: Palette,
    plot: PlotSurface,
    /// Visuals need to be re-applied after a theme change
    visuals_dirty: bool,
    window_title: String,
    theme_name_input: String,
}

impl ScopeViewerApp {
    /// Create the app, optionally opening a file or folder right away
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        app_state: AppState,
        themes: ThemeRegistry,
        initial_path: Option<PathBuf>,
    ) -> Self {
        let palette = themes.get_or_default(&app_state.theme);
        cc.egui_ctx.set_visuals(palette.visuals());

        let cursors = CursorModel::new(app_state.time_cursor_color, app_state.voltage_cursor_color);
        let loader = CsvCaptureLoader::new(app_state.loader.clone());

        let mut app = Self {
            viewer: Viewer::new(loader, cursors),
            app_state,
            themes,
            palette,
            plot: PlotSurface::new(),
            visuals_dirty: false,
            window_title: DEFAULT_TITLE.to_string(),
            theme_name_input: String::new(),
        };

        match initial_path {
            Some(path) if path.is_dir() => {
                app.handle_action(ViewerAction::OpenFolder(path).into());
            }
            Some(path) => {
                if let Some(parent) = path.parent().filter(|p| p.is_dir()) {
                    app.handle_action(ViewerAction::OpenFolder(parent.to_path_buf()).into());
                }
                app.handle_action(ViewerAction::OpenFile(path).into());
            }
            None => {
                if let Some(folder) = app.app_state.get_last_folder().map(|p| p.to_path_buf()) {
                    tracing::info!("Restoring last folder {:?}", folder);
                    app.handle_action(ViewerAction::OpenFolder(folder).into());
                }
            }
        }

        app
    }

    fn handle_action(&mut self, action: AppAction) {
        match action {
            AppAction::Viewer(ViewerAction::OpenFile(path)) => {
                if self.viewer.dispatch(ViewerAction::OpenFile(path.clone())) {
                    self.app_state.add_recent_file(&path);
                }
            }
            AppAction::Viewer(ViewerAction::OpenFolder(path)) => {
                self.viewer.dispatch(ViewerAction::OpenFolder(path.clone()));
                if self.viewer.tree().map(|t| t.root == path).unwrap_or(false) {
                    self.app_state.last_folder = Some(path);
                }
            }
            AppAction::Viewer(action) => {
                self.viewer.dispatch(action);
            }
            AppAction::PickFolder => {
                let mut dialog = rfd::FileDialog::new().set_title("Select Data Folder");
                if let Some(folder) = self.app_state.get_last_folder() {
                    dialog = dialog.set_directory(folder);
                }
                if let Some(path) = dialog.pick_folder() {
                    self.handle_action(ViewerAction::OpenFolder(path).into());
                }
            }
            AppAction::PickFile => {
                let mut dialog = rfd::FileDialog::new()
                    .set_title("Open Capture")
                    .add_filter("Oscilloscope CSV", &["csv", "CSV"]);
                if let Some(folder) = self.app_state.get_last_folder() {
                    dialog = dialog.set_directory(folder);
                }
                if let Some(path) = dialog.pick_file() {
                    self.handle_action(ViewerAction::OpenFile(path).into());
                }
            }
            AppAction::SelectTheme(name) => {
                self.palette = self.themes.get_or_default(&name);
                tracing::info!("Theme changed to {}", self.palette.name);
                self.app_state.theme = self.palette.name.clone();
                self.visuals_dirty = true;
            }
            AppAction::SaveThemeAs(name) => {
                let mut palette = self.palette.clone();
                palette.name = name.clone();
                match self.themes.save_theme(palette) {
                    Ok(path) => {
                        self.viewer
                            .set_status(format!("Saved theme {} to {}", name, path.display()));
                        self.handle_action(AppAction::SelectTheme(name));
                    }
                    Err(e) => {
                        tracing::warn!("Failed to save theme {}: {}", name, e);
                        self.viewer
                            .show_error(format!("Could not save theme {}", name), e.to_string());
                    }
                }
            }
            AppAction::SetCursorColor { axis, color } => {
                self.viewer
                    .dispatch(ViewerAction::SetPairColor { axis, color });
                self.app_state.set_cursor_color(axis, color);
            }
            AppAction::ResetZoom => self.plot.reset_zoom(),
        }
    }

    fn handle_keyboard_shortcuts(&mut self, ctx: &egui::Context) -> Vec<AppAction> {
        use egui::Key;

        let mut actions = Vec::new();
        ctx.input(|i| {
            if i.key_pressed(Key::O) && i.modifiers.command_only() {
                actions.push(AppAction::PickFolder);
            }
            if i.key_pressed(Key::R) && i.modifiers.command_only() {
                actions.push(AppAction::ResetZoom);
            }
        });
        actions
    }

    fn render_menu_bar(&self, ui: &mut egui::Ui, actions: &mut Vec<AppAction>) {
        egui::MenuBar::new().ui(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui.button("Open Folder...").clicked() {
                    actions.push(AppAction::PickFolder);
                    ui.close();
                }
                if ui.button("Open File...").clicked() {
                    actions.push(AppAction::PickFile);
                    ui.close();
                }
                ui.menu_button("Recent Files", |ui| {
                    if self.app_state.recent_files.is_empty() {
                        ui.label("None");
                    }
                    for recent in &self.app_state.recent_files {
                        let label = recent
                            .path
                            .file_name()
                            .map(|n| n.to_string_lossy().into_owned())
                            .unwrap_or_else(|| recent.path.display().to_string());
                        if ui
                            .button(label)
                            .on_hover_text(recent.path.display().to_string())
                            .clicked()
                        {
                            actions.push(ViewerAction::OpenFile(recent.path.clone()).into());
                            ui.close();
                        }
                    }
                });
                ui.separator();
                if ui.button("Quit").clicked() {
                    ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });

            ui.menu_button("View", |ui| {
                if ui.button("Reset Zoom").clicked() {
                    actions.push(AppAction::ResetZoom);
                    ui.close();
                }
            });
        });
    }

    fn render_error_dialog(&mut self, ctx: &egui::Context) {
        let Some(error) = self.viewer.last_error().map(str::to_string) else {
            return;
        };

        let mut dismiss = false;
        let modal = egui::Modal::new(egui::Id::new("error_dialog")).show(ctx, |ui| {
            ui.set_max_width(420.0);
            ui.heading("Error");
            ui.add_space(4.0);
            ui.label(&error);
            ui.add_space(8.0);
            if ui.button("OK").clicked() {
                dismiss = true;
            }
        });
        if dismiss || modal.should_close() {
            self.viewer.dispatch(ViewerAction::DismissError);
        }
    }
}

impl eframe::App for ScopeViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.visuals_dirty {
            ctx.set_visuals(self.palette.visuals());
            self.visuals_dirty = false;
        }

        let mut actions = self.handle_keyboard_shortcuts(ctx);

        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            self.render_menu_bar(ui, &mut actions);
        });

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            let toolbar_ctx = ToolbarContext {
                themes: &self.themes,
                active_theme: &self.palette.name,
                has_capture: self.viewer.capture().is_some(),
            };
            actions.extend(render_toolbar(ui, &toolbar_ctx, &mut self.theme_name_input));
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            render_status_bar(
                ui,
                &StatusBarContext {
                    status: self.viewer.status(),
                    capture: self.viewer.capture(),
                    last_error: self.viewer.last_error(),
                },
            );
        });

        egui::SidePanel::left("side_panel")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    egui::CollapsingHeader::new("Files")
                        .default_open(true)
                        .show(ui, |ui| {
                            FileBrowserPanel::render(
                                ui,
                                self.viewer.tree(),
                                self.viewer.current_path(),
                                &mut actions,
                            );
                        });

                    egui::CollapsingHeader::new("Channels")
                        .default_open(true)
                        .show(ui, |ui| {
                            ChannelPanel::render(
                                ui,
                                self.viewer.channels(),
                                &self.palette,
                                &mut actions,
                            );
                        });

                    egui::CollapsingHeader::new("Cursors")
                        .default_open(true)
                        .show(ui, |ui| {
                            CursorPanel::render(
                                ui,
                                self.viewer.cursors(),
                                self.viewer.readout(),
                                &mut actions,
                            );
                        });

                    egui::CollapsingHeader::new("Measurements")
                        .default_open(true)
                        .show(ui, |ui| {
                            MeasurementPanel::render(ui, self.viewer.channels(), &self.palette);
                        });
                });
            });

        for action in actions {
            self.handle_action(action);
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            if self.plot.render(ui, &mut self.viewer, &self.palette) {
                // side panel was drawn before the change
                ctx.request_repaint();
            }
        });

        self.render_error_dialog(ctx);

        let title = self.viewer.window_title();
        if title != self.window_title {
            ctx.send_viewport_cmd(egui::ViewportCommand::Title(title.clone()));
            self.window_title = title;
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.app_state.loader = self.viewer.loader().config().clone();
        if let Err(e) = self.app_state.save() {
            tracing::warn!("Failed to save app state: {}", e);
        }
    }
}
