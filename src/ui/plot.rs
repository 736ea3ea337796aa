use eframe::egui::{Color32, Ui};
use egui_plot::{Line, Plot, PlotPoints};

use crate::state::SessionState;

const LINE_COLOR: Color32 = Color32::from_rgb(75, 192, 192);

// ---------------------------------------------------------------------------
// Spectrum plot (central panel)
// ---------------------------------------------------------------------------

/// Render the processed spectrum, or a hint when there is none.
pub fn spectrum_plot(ui: &mut Ui, state: &SessionState, height: f32) {
    let Some(spectrum) = &state.spectrum else {
        ui.allocate_ui(eframe::egui::vec2(ui.available_width(), height), |ui: &mut Ui| {
            ui.centered_and_justified(|ui: &mut Ui| {
                if state.loading {
                    ui.spinner();
                } else {
                    ui.heading("Open a .tab file to process it  (File → Open…)");
                }
            });
        });
        return;
    };

    // Points are drawn in the order received; the service owns the ordering.
    let points: PlotPoints = spectrum.iter().map(|p| [p.x, p.cps]).collect();

    Plot::new("spectrum_plot")
        .height(height)
        .legend(egui_plot::Legend::default())
        .x_axis_label("m/z (mass/charge)")
        .y_axis_label("Intensity (cps)")
        .include_y(0.0)
        .label_formatter(|_name, value| format!("m/z {:.2}\n{:.1} cps", value.x, value.y))
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            let line = Line::new(points)
                .name("Intensity (cps)")
                .color(LINE_COLOR)
                .fill(0.0)
                .width(1.5);
            plot_ui.line(line);
        });
}
