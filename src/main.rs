mod app;
mod color;
mod ui;

use std::path::Path;

use anyhow::{Context, Result};
use app::PainelCensoApp;
use eframe::egui;
use painel_censo::PipelineConfig;

/// Optional JSON file overriding the census column tables.
const CONFIG_ENV: &str = "PAINEL_CENSO_CONFIG";

fn main() -> Result<()> {
    env_logger::init();

    let config = match std::env::var_os(CONFIG_ENV) {
        Some(path) => {
            let path = Path::new(&path);
            log::info!("Using pipeline config from {}", path.display());
            PipelineConfig::from_json_path(path)
                .with_context(|| format!("loading {CONFIG_ENV}={}", path.display()))?
        }
        None => PipelineConfig::default(),
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Painel do Censo Escolar",
        options,
        Box::new(move |_cc| Ok(Box::new(PainelCensoApp::new(config)))),
    )
    .map_err(|e| anyhow::anyhow!("running dashboard: {e}"))
}
