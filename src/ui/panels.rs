use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::model::{Attribute, Dimension};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

const PERMA_BLURB: &str = "PERMA+V is a model of wellbeing from positive psychology. \
It identifies six elements that contribute to flourishing:";

fn dimension_hint(dim: Dimension) -> &'static str {
    match dim {
        Dimension::P => "joy, gratitude, optimism",
        Dimension::E => "flow, absorption",
        Dimension::R => "support, connection",
        Dimension::M => "purpose, values",
        Dimension::A => "mastery, achievement",
        Dimension::V => "energy, health",
    }
}

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    egui::CollapsingHeader::new(RichText::new("About PERMA+V").strong())
        .id_salt("about")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            ui.label(RichText::new(PERMA_BLURB).small());
            for dim in Dimension::ALL {
                let text = format!("{}: {} ({})", dim.code(), dim.label(), dimension_hint(dim));
                ui.label(RichText::new(text).small());
            }
        });
    ui.separator();

    ui.heading("Data Filters");
    ui.separator();

    let Some(table) = state.table.clone() else {
        ui.label("No dataset loaded.");
        return;
    };

    ui.label(format!("✅ {} employees selected", state.selected.len()));
    if ui.small_button("Clear all filters").clicked() {
        state.clear_all_filters();
    }
    ui.separator();

    // Collect clicks first, apply after drawing.
    let mut toggled: Vec<(Attribute, String)> = Vec::new();
    let mut cleared: Vec<Attribute> = Vec::new();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for attr in Attribute::ALL {
                let options = table.options(attr);
                if options.is_empty() {
                    continue;
                }

                let n_checked = state.filters.get(&attr).map_or(0, |s| s.len());
                let header_text = if n_checked == 0 {
                    format!("{}  (all)", attr.label())
                } else {
                    format!("{}  ({n_checked}/{})", attr.label(), options.len())
                };

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(attr.column())
                    .default_open(true)
                    .show(ui, |ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            cleared.push(attr);
                        }
                        for value in options {
                            let mut checked = state.is_checked(attr, value);
                            if ui.checkbox(&mut checked, value.as_str()).changed() {
                                toggled.push((attr, value.clone()));
                            }
                        }
                    });
            }
        });

    for attr in cleared {
        state.clear_filter(attr);
    }
    for (attr, value) in toggled {
        state.toggle_filter_value(attr, &value);
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload").clicked() {
                log::info!("Reloading survey from {}", state.source());
                state.reload();
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(table) = &state.table {
            ui.label(format!(
                "{} respondents loaded, {} selected",
                table.len(),
                state.selected.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open survey data")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.open_path(path);
    }
}
