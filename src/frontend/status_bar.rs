//! Status bar panel showing the status message and capture info.

use egui::{Color32, RichText, Ui};

use crate::types::Capture;

/// Context needed to render the status bar.
pub struct StatusBarContext<'a> {
    pub status: &'a str,
    pub capture: Option<&'a Capture>,
    pub last_error: Option<&'a str>,
}

/// Render the status bar.
pub fn render_status_bar(ui: &mut Ui, ctx: &StatusBarContext<'_>) {
    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        let dot_color = if ctx.last_error.is_some() {
            Color32::RED
        } else if ctx.capture.is_some() {
            Color32::GREEN
        } else {
            Color32::GRAY
        };
        ui.colored_label(dot_color, "●");
        ui.label(RichText::new(ctx.status).small());

        if let Some(capture) = ctx.capture {
            ui.separator();
            ui.label(RichText::new(format!("Samples: {}", capture.waveform.len())).small());

            ui.separator();
            ui.label(
                RichText::new(format!("Channels: {}", capture.waveform.channels().len())).small(),
            );

            if let Some((start, end)) = capture.waveform.time_span() {
                ui.separator();
                ui.label(
                    RichText::new(format!(
                        "Span: {:.3e} {}",
                        end - start,
                        capture.metadata.horizontal_units()
                    ))
                    .small(),
                );
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(RichText::new(capture.metadata.model()).small().weak());
            });
        }
    });
}
