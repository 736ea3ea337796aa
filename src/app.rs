use std::path::Path;
use std::sync::Arc;

use eframe::egui;

use crate::client::Transport;
use crate::config::AppConfig;
use crate::data::model::TabFile;
use crate::state::SessionController;
use crate::ui::panels::{self, UiAction};
use crate::ui::plot;
use crate::worker::{Dispatcher, WorkerMessage};

const PLOT_HEIGHT: f32 = 400.0;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct RosettaApp {
    controller: SessionController,
    dispatcher: Dispatcher,
    /// Last answer of the status check, already formatted for display.
    service_status: Option<String>,
}

impl RosettaApp {
    pub fn new(config: &AppConfig, transport: Arc<dyn Transport>) -> anyhow::Result<Self> {
        let controller = SessionController::new(config.default_level)?;
        log::info!("Default preset: {}", controller.selected_preset());
        Ok(Self {
            controller,
            dispatcher: Dispatcher::new(transport),
            service_status: None,
        })
    }

    fn handle_action(&mut self, action: UiAction, ctx: &egui::Context) {
        match action {
            UiAction::OpenFile(path) => self.open_file(&path, ctx),
            UiAction::SelectPreset(level) => {
                if let Err(e) = self.controller.select_preset(level) {
                    log::error!("{e}");
                }
            }
            UiAction::CheckService => {
                self.service_status = Some("Checking service…".to_string());
                let ctx = ctx.clone();
                self.dispatcher.check_status(move || ctx.request_repaint());
            }
        }
    }

    fn open_file(&mut self, path: &Path, ctx: &egui::Context) {
        let file = match TabFile::read(path) {
            Ok(file) => file,
            Err(e) => {
                log::error!("Failed to read file: {e:#}");
                self.controller.reject(format!("Error reading file: {e:#}"));
                return;
            }
        };

        if file.is_empty() {
            log::warn!("{} is empty", file.name);
        }

        // Validation failures are already reflected in the session state.
        if let Ok(submission) = self.controller.select_file(file) {
            let ctx = ctx.clone();
            self.dispatcher
                .dispatch(submission, move || ctx.request_repaint());
        }
    }

    /// Apply whatever the workers have finished since the last frame.
    fn handle_messages(&mut self) {
        for msg in self.dispatcher.drain() {
            match msg {
                WorkerMessage::Completed { id, outcome } => {
                    self.controller.complete(id, outcome);
                }
                WorkerMessage::Status(Ok(status)) => {
                    log::info!("{}: {}", status.message, status.status);
                    self.service_status = Some(status.summary());
                }
                WorkerMessage::Status(Err(e)) => {
                    log::warn!("Status check failed: {e}");
                    self.service_status = Some(format!("Service unavailable: {}", e.user_message()));
                }
            }
        }
    }
}

impl eframe::App for RosettaApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_messages();

        let mut actions = Vec::new();

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            actions.extend(panels::top_bar(
                ui,
                self.controller.state(),
                self.service_status.as_deref(),
            ));
        });

        // ---- Left side panel: presets ----
        egui::SidePanel::left("preset_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                actions.extend(panels::preset_panel(ui, &self.controller));
            });

        // ---- Central panel: error, plot, conclusion ----
        egui::CentralPanel::default().show(ctx, |ui| {
            let state = self.controller.state();
            panels::error_banner(ui, state);
            plot::spectrum_plot(ui, state, PLOT_HEIGHT);
            ui.add_space(8.0);
            panels::conclusion_panel(ui, state);
        });

        // Files dropped onto the window are submitted like picked ones.
        let dropped: Vec<_> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|f| f.path.clone())
                .collect()
        });
        actions.extend(dropped.into_iter().map(UiAction::OpenFile));

        for action in actions {
            self.handle_action(action, ctx);
        }
    }
}
