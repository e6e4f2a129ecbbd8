//! Panel components for the frontend UI
//!
//! Each panel renders one part of the side bar from read-only state and
//! pushes [`AppAction`]s for anything the user changed.
//!
//! # Panels
//!
//! - [`FileBrowserPanel`] - Capture files found under the data folder
//! - [`ChannelPanel`] - Channel visibility toggles
//! - [`MeasurementPanel`] - Automatic measurements per visible channel
//! - [`CursorPanel`] - Cursor toggles, colors and readouts

use std::path::Path;

use egui::{Color32, RichText, Ui};

use crate::analysis::{Measurements, RegionStats};
use crate::capture::{CaptureEntry, CaptureTree};
use crate::config::theme::{color32, Palette};
use crate::cursor::{Axis, CursorColor, CursorId, CursorModel, CursorReadout};
use crate::frontend::state::AppAction;
use crate::viewer::{ChannelView, ViewerAction};

/// Placeholder for undefined values
pub const UNDEFINED: &str = "--";

/// Measurement rows as (label, formatted value)
pub fn measurement_rows(m: &Measurements) -> Vec<(&'static str, String)> {
    let or_undefined = |defined: bool, text: String| {
        if defined {
            text
        } else {
            UNDEFINED.to_string()
        }
    };
    vec![
        ("Vpp", format!("{:.3} V", m.vpp)),
        ("Vmax", format!("{:.3} V", m.vmax)),
        ("Vmin", format!("{:.3} V", m.vmin)),
        ("Freq", or_undefined(m.has_period(), format!("{:.2e} Hz", m.freq))),
        ("Period", or_undefined(m.has_period(), format!("{:.2e} s", m.period))),
        ("Rise", or_undefined(m.has_rise_time(), format!("{:.2e} s", m.rise_time))),
        ("Fall", or_undefined(m.has_fall_time(), format!("{:.2e} s", m.fall_time))),
        ("Duty", or_undefined(m.has_duty(), format!("{:.1} %", m.duty))),
    ]
}

/// Readout lines for the cursor panel
pub fn cursor_rows(readout: &CursorReadout) -> Vec<String> {
    let mut rows: Vec<String> = CursorId::ALL
        .iter()
        .map(|id| {
            let name = id.name().to_uppercase();
            match (readout.position(*id), id.axis) {
                (Some(v), Axis::Time) => format!("{}: {:.2e} s", name, v),
                (Some(v), Axis::Voltage) => format!("{}: {:.3} V", name, v),
                (None, _) => format!("{}: {}", name, UNDEFINED),
            }
        })
        .collect();

    rows.push(match readout.delta_t {
        Some(dt) => format!("ΔT: {:.2e} s", dt),
        None => format!("ΔT: {}", UNDEFINED),
    });
    rows.push(match readout.freq {
        Some(f) => format!("1/ΔT: {:.2e} Hz", f),
        None => format!("1/ΔT: {}", UNDEFINED),
    });
    rows.push(match readout.delta_v {
        Some(dv) => format!("ΔV: {:.3} V", dv),
        None => format!("ΔV: {}", UNDEFINED),
    });
    rows
}

fn region_row(stats: &RegionStats) -> String {
    format!(
        "Region Vpp: {:.3} V ({} samples)",
        stats.vpp, stats.count
    )
}

/// Renders the capture file tree
pub struct FileBrowserPanel;

impl FileBrowserPanel {
    pub fn render(
        ui: &mut Ui,
        tree: Option<&CaptureTree>,
        current: Option<&Path>,
        actions: &mut Vec<AppAction>,
    ) {
        ui.horizontal(|ui| {
            if ui.button("📂 Open Folder").clicked() {
                actions.push(AppAction::PickFolder);
            }
            if ui.button("📄 Open File").clicked() {
                actions.push(AppAction::PickFile);
            }
            if tree.is_some() && ui.button("⟳").on_hover_text("Rescan folder").clicked() {
                actions.push(ViewerAction::RefreshFolder.into());
            }
        });

        let Some(tree) = tree else {
            ui.label(RichText::new("No folder selected").weak());
            return;
        };

        ui.label(RichText::new(tree.root.display().to_string()).small().weak());
        if tree.is_empty() {
            ui.label("No CSV files found");
            return;
        }

        egui::ScrollArea::vertical()
            .id_salt("file_browser")
            .max_height(240.0)
            .show(ui, |ui| {
                for folder in &tree.folders {
                    egui::CollapsingHeader::new(format!("📁 {}", folder.label()))
                        .default_open(folder.files.iter().any(|f| Some(f.path.as_path()) == current))
                        .show(ui, |ui| {
                            for entry in &folder.files {
                                Self::file_row(ui, entry, current, actions);
                            }
                        });
                }
                for entry in &tree.root_files {
                    Self::file_row(ui, entry, current, actions);
                }
            });
    }

    fn file_row(
        ui: &mut Ui,
        entry: &CaptureEntry,
        current: Option<&Path>,
        actions: &mut Vec<AppAction>,
    ) {
        let selected = current == Some(entry.path.as_path());
        if ui.selectable_label(selected, &entry.name).clicked() && !selected {
            actions.push(ViewerAction::OpenFile(entry.path.clone()).into());
        }
    }
}

/// Renders channel visibility toggles
pub struct ChannelPanel;

impl ChannelPanel {
    pub fn render(
        ui: &mut Ui,
        channels: &[ChannelView],
        palette: &Palette,
        actions: &mut Vec<AppAction>,
    ) {
        ui.horizontal_wrapped(|ui| {
            for (index, channel) in channels.iter().enumerate() {
                let mut visible = channel.visible;
                let text = RichText::new(&channel.name).color(palette.channel_color(index));
                if ui.checkbox(&mut visible, text).changed() {
                    actions.push(
                        ViewerAction::SetChannelVisible {
                            channel: channel.name.clone(),
                            visible,
                        }
                        .into(),
                    );
                }
            }
        });
    }
}

/// Renders the automatic measurements
pub struct MeasurementPanel;

impl MeasurementPanel {
    pub fn render(ui: &mut Ui, channels: &[ChannelView], palette: &Palette) {
        for (index, channel) in channels.iter().enumerate() {
            let Some(measurements) = &channel.measurements else {
                continue;
            };
            ui.label(
                RichText::new(&channel.name)
                    .strong()
                    .color(palette.channel_color(index)),
            );
            egui::Grid::new(("measurements", index))
                .num_columns(2)
                .spacing([12.0, 2.0])
                .show(ui, |ui| {
                    for (label, value) in measurement_rows(measurements) {
                        ui.label(format!("{}:", label));
                        ui.monospace(value);
                        ui.end_row();
                    }
                });
            if let Some(region) = &channel.region {
                ui.label(RichText::new(region_row(region)).small());
            }
            ui.add_space(4.0);
        }
    }
}

/// Renders cursor toggles and readouts
pub struct CursorPanel;

impl CursorPanel {
    pub fn render(
        ui: &mut Ui,
        cursors: &CursorModel,
        readout: &CursorReadout,
        actions: &mut Vec<AppAction>,
    ) {
        for axis in Axis::ALL {
            let pair = cursors.pair(axis);
            ui.horizontal(|ui| {
                let mut enabled = pair.state.is_enabled();
                if ui
                    .checkbox(&mut enabled, format!("{} Cursors", axis.label()))
                    .changed()
                {
                    actions.push(ViewerAction::SetPairEnabled { axis, enabled }.into());
                }

                egui::ComboBox::from_id_salt(("cursor_color", axis.label()))
                    .selected_text(
                        RichText::new(pair.color.display_name()).color(color32(pair.color.rgba())),
                    )
                    .width(80.0)
                    .show_ui(ui, |ui| {
                        for color in CursorColor::all() {
                            let text =
                                RichText::new(color.display_name()).color(color32(color.rgba()));
                            if ui.selectable_label(pair.color == *color, text).clicked() {
                                actions.push(AppAction::SetCursorColor {
                                    axis,
                                    color: *color,
                                });
                            }
                        }
                    });

                if ui
                    .add_enabled(pair.state.is_enabled(), egui::Button::new("Clear"))
                    .clicked()
                {
                    actions.push(ViewerAction::ClearPair(axis).into());
                }
            });
        }

        if let Some(axis) = cursors.placement_target() {
            ui.label(
                RichText::new(format!("Double-click to place {} cursor", axis.label().to_lowercase()))
                    .small()
                    .color(Color32::GRAY),
            );
        }

        ui.separator();
        for row in cursor_rows(readout) {
            ui.monospace(row);
        }
    }
}
