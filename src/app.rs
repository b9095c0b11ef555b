use eframe::egui;
use painel_censo::PipelineConfig;
use painel_censo::state::DashboardState;

use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct PainelCensoApp {
    pub state: DashboardState,
}

impl PainelCensoApp {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            state: DashboardState::new(config),
        }
    }
}

impl eframe::App for PainelCensoApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: tabs and charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::dashboard(ui, &mut self.state);
        });
    }
}
