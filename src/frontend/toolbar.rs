//! Toolbar panel: horizontal bar with view and theme controls.
//!
//! Sits between the menu bar and the main area.

use egui::Ui;

use crate::config::ThemeRegistry;
use crate::frontend::state::AppAction;

/// Context needed to render the toolbar.
pub struct ToolbarContext<'a> {
    pub themes: &'a ThemeRegistry,
    pub active_theme: &'a str,
    pub has_capture: bool,
}

/// Render the main application toolbar.
///
/// `theme_name_input` is the text box used by "Save Theme As".
pub fn render_toolbar(
    ui: &mut Ui,
    ctx: &ToolbarContext<'_>,
    theme_name_input: &mut String,
) -> Vec<AppAction> {
    let mut actions = Vec::new();

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 4.0;

        if ui
            .add_enabled(ctx.has_capture, egui::Button::new("⟲ Reset Zoom"))
            .on_hover_text("Fit the whole capture")
            .clicked()
        {
            actions.push(AppAction::ResetZoom);
        }

        ui.separator();

        ui.label("Theme:");
        egui::ComboBox::from_id_salt("theme_selector")
            .selected_text(ctx.active_theme)
            .show_ui(ui, |ui| {
                for name in ctx.themes.names() {
                    if ui.selectable_label(name == ctx.active_theme, name).clicked() {
                        actions.push(AppAction::SelectTheme(name.to_string()));
                    }
                }
            });

        ui.add(
            egui::TextEdit::singleline(theme_name_input)
                .desired_width(110.0)
                .hint_text("New theme name"),
        );
        let name = theme_name_input.trim();
        if ui
            .add_enabled(!name.is_empty(), egui::Button::new("Save Theme As"))
            .on_hover_text("Save the current colors as a user theme")
            .clicked()
        {
            actions.push(AppAction::SaveThemeAs(name.to_string()));
            theme_name_input.clear();
        }
    });

    actions
}
