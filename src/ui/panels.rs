use std::path::PathBuf;

use eframe::egui::{self, Color32, RichText, ScrollArea, Stroke, Ui};
use egui_extras::{Column, TableBuilder};

use crate::color::color_for_level;
use crate::data::preset::{self, FilterPreset, display_threshold, wire_number};
use crate::data::request::TAB_SUFFIX;
use crate::state::{SessionController, SessionState};

/// Something the user asked for; the app decides how to carry it out.
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    OpenFile(PathBuf),
    SelectPreset(i64),
    CheckService,
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(
    ui: &mut Ui,
    state: &SessionState,
    service_status: Option<&str>,
) -> Option<UiAction> {
    let mut action = None;

    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                action = pick_tab_file().map(UiAction::OpenFile);
                ui.close_menu();
            }
        });

        ui.separator();

        if ui.button("Check service").clicked() {
            action = Some(UiAction::CheckService);
        }
        if let Some(status) = service_status {
            ui.label(status);
        }

        ui.separator();

        if state.loading {
            ui.spinner();
            ui.label("Processing file…");
        } else if let Some(spectrum) = &state.spectrum {
            ui.label(format!("{} points", spectrum.len()));
        }
    });

    action
}

// ---------------------------------------------------------------------------
// Left side panel – preset selection
// ---------------------------------------------------------------------------

/// Render the preset selector with the selected preset's parameters.
pub fn preset_panel(ui: &mut Ui, controller: &SessionController) -> Option<UiAction> {
    let mut action = None;
    let selected = controller.selected_preset();

    ui.heading("Filter level");
    ui.separator();

    for p in preset::all() {
        let accent = color_for_level(p.level);
        let is_selected = p.level == selected.level;
        let text = RichText::new(p.name).strong().color(if is_selected {
            Color32::WHITE
        } else {
            accent
        });
        let button = egui::Button::new(text)
            .min_size(egui::vec2(ui.available_width(), 28.0))
            .stroke(Stroke::new(if is_selected { 2.0 } else { 1.0 }, accent))
            .fill(if is_selected { accent } else { Color32::TRANSPARENT });

        if ui
            .add(button)
            .on_hover_text(format!(
                "MAD RTOF: {} | CPS: {}",
                wire_number(p.mad_multiplier_rtof),
                wire_number(p.cps_threshold_rtof)
            ))
            .clicked()
            && !is_selected
        {
            action = Some(UiAction::SelectPreset(i64::from(p.level)));
        }
    }

    ui.add_space(8.0);
    ui.strong(format!("Settings: {}", selected.name));
    parameter_table(ui, selected);
    ui.add_space(4.0);
    ui.label(RichText::new(selected.description).italics().weak());

    action
}

fn parameter_table(ui: &mut Ui, p: &FilterPreset) {
    let rows = [
        ("Rows dropped", p.head_drop.to_string()),
        ("MAD RTOF", wire_number(p.mad_multiplier_rtof)),
        ("CPS RTOF", wire_number(p.cps_threshold_rtof)),
        ("MAD DFMS", wire_number(p.mad_multiplier_dfms)),
        ("CPS DFMS", display_threshold(p.cps_threshold_dfms)),
    ];

    TableBuilder::new(ui)
        .id_salt("preset_parameters")
        .striped(true)
        .column(Column::auto())
        .column(Column::remainder())
        .body(|mut body| {
            for (label, value) in rows {
                body.row(18.0, |mut row| {
                    row.col(|ui: &mut Ui| {
                        ui.label(label);
                    });
                    row.col(|ui: &mut Ui| {
                        ui.monospace(value);
                    });
                });
            }
        });
}

// ---------------------------------------------------------------------------
// Error banner and conclusion
// ---------------------------------------------------------------------------

pub fn error_banner(ui: &mut Ui, state: &SessionState) {
    if let Some(msg) = &state.error {
        egui::Frame::group(ui.style())
            .fill(Color32::from_rgb(255, 235, 238))
            .stroke(Stroke::new(1.0, Color32::from_rgb(239, 83, 80)))
            .show(ui, |ui: &mut Ui| {
                ui.set_width(ui.available_width());
                ui.label(RichText::new(msg).color(Color32::from_rgb(198, 40, 40)));
            });
    }
}

pub fn conclusion_panel(ui: &mut Ui, state: &SessionState) {
    if state.conclusion.is_empty() {
        return;
    }
    ui.heading("Conclusion");
    ui.separator();
    ScrollArea::vertical()
        .id_salt("conclusion")
        .auto_shrink([false, true])
        .show(ui, |ui: &mut Ui| {
            ui.add(egui::Label::new(&state.conclusion).wrap().selectable(true));
        });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn pick_tab_file() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Open Rosetta data")
        .add_filter("Rosetta data", &[TAB_SUFFIX.trim_start_matches('.')])
        .pick_file()
}
