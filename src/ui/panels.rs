use std::path::Path;

use anyhow::{Context, Result};
use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use painel_censo::Upload;
use painel_censo::data::model::CellValue;
use painel_censo::state::DashboardState;

use crate::color::BRAND_NAVY;

/// Checkbox label for empty cells.
const EMPTY_LABEL: &str = "(vazio)";

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut DashboardState) {
    ui.heading(RichText::new("Filtros").color(BRAND_NAVY));
    ui.separator();

    if state.is_awaiting_input() {
        ui.label("Nenhum arquivo carregado.");
        return;
    }

    // Widgets only record what changed; the state is updated after the loop.
    let mut toggled: Vec<(String, CellValue)> = Vec::new();
    let mut cleared: Vec<String> = Vec::new();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for col in &state.config.filter_columns {
                let options = state.options(col);
                if options.is_empty() {
                    continue;
                }
                let selected = state.selection.get(col);
                let n_selected = selected.map_or(0, |s| s.len());
                let header_text = format!("{col}  ({n_selected}/{})", options.len());

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(col)
                    .default_open(false)
                    .show(ui, |ui: &mut Ui| {
                        if ui.small_button("Limpar").clicked() {
                            cleared.push(col.clone());
                        }
                        for val in &options {
                            let mut checked = selected.is_some_and(|s| s.contains(val));
                            let label = if val.is_null() {
                                EMPTY_LABEL.to_string()
                            } else {
                                val.to_string()
                            };
                            if ui.checkbox(&mut checked, label).changed() {
                                toggled.push((col.clone(), val.clone()));
                            }
                        }
                    });
            }
        });

    for col in cleared {
        state.clear_selection(&col);
    }
    for (col, val) in toggled {
        state.toggle_selection(&col, &val);
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut DashboardState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("Arquivo", |ui: &mut Ui| {
            if ui.button("Abrir…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Fechar").clicked() {
                // Absence of an upload is never an error.
                let _ = state.load_upload(None);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(name) = &state.upload_name {
            ui.label(format!(
                "{name}: {} registros, {} filtrados",
                state.dataset.len(),
                state.filtered.len()
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

pub fn open_file_dialog(state: &mut DashboardState) {
    let file = rfd::FileDialog::new()
        .set_title("Envie sua base de dados (.csv)")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        if let Err(e) = load_into(state, &path) {
            log::error!("Failed to load file: {e:#}");
            state.status_message = Some(format!("Erro: {e:#}"));
        }
    }
}

fn load_into(state: &mut DashboardState, path: &Path) -> Result<()> {
    let upload = Upload::from_path(path).context("reading upload")?;
    state
        .load_upload(Some(upload))
        .with_context(|| format!("loading {}", path.display()))?;
    log::info!(
        "Loaded {} rows with columns {:?}",
        state.dataset.len(),
        state.dataset.columns
    );
    Ok(())
}
