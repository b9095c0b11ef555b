use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Bar, BarChart, Plot};
use painel_censo::data::aggregate::{SummaryTable, format_thousands};
use painel_censo::data::model::CellValue;
use painel_censo::state::{DashboardState, Tab};

use crate::color::{BRAND_GREEN, BRAND_NAVY, BRAND_TEAL, category_colors};

// ---------------------------------------------------------------------------
// Central panel: tabs
// ---------------------------------------------------------------------------

/// Render the dashboard tabs in the central panel.
pub fn dashboard(ui: &mut Ui, state: &mut DashboardState) {
    if state.is_awaiting_input() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Por favor, envie um arquivo CSV para começar.  (Arquivo → Abrir…)");
        });
        return;
    }

    ui.heading(RichText::new("Análise do Censo Escolar").color(BRAND_NAVY));
    ui.horizontal(|ui: &mut Ui| {
        for tab in Tab::ALL {
            ui.selectable_value(&mut state.active_tab, tab, tab.title());
        }
    });
    ui.separator();

    let views = &state.views;
    egui::ScrollArea::vertical().show(ui, |ui: &mut Ui| match state.active_tab {
        Tab::Schools => {
            section(ui, "Número de Escolas por Região");
            match &views.schools_by_region {
                Some(summary) => {
                    bar_chart(
                        ui,
                        "schools_by_region",
                        summary,
                        "Número de Escolas",
                        &[BRAND_NAVY],
                    );
                    summary_table(ui, "schools_by_region_table", summary);
                }
                None => missing(ui),
            }
        }
        Tab::Enrollment => {
            section(ui, "Distribuição do Alunado por Nível de Ensino");
            if let Some(total) = &views.enrollment_total {
                metric(ui, "Total de Alunos da Educação Básica", total);
            }
            let levels = &views.enrollment_by_level;
            if levels.is_empty() {
                missing(ui);
            } else {
                let colors = category_colors(levels.len());
                bar_chart(ui, "enrollment_by_level", levels, "Matrículas", &colors);
            }
            if let Some(by_state) = &views.enrollment_by_state {
                section(ui, "Total de Alunos da Educação Básica por UF");
                bar_chart(ui, "enrollment_by_state", by_state, "Total de Alunos", &[BRAND_GREEN]);
            }
        }
        Tab::Staff => {
            section(ui, "Perfil dos Docentes");
            let levels = &views.staff_by_level;
            if levels.is_empty() {
                missing(ui);
            } else {
                bar_chart(ui, "staff_by_level", levels, "Quantidade", &[BRAND_TEAL]);
                summary_table(ui, "staff_by_level_table", levels);
            }
            if let Some(total) = &views.staff_total {
                metric(ui, "Total de Docentes na Amostra", total);
            }
        }
    });
}

fn section(ui: &mut Ui, title: &str) {
    ui.add_space(8.0);
    ui.label(RichText::new(title).size(18.0).strong().color(BRAND_NAVY));
}

fn missing(ui: &mut Ui) {
    ui.label(RichText::new("Colunas necessárias ausentes no arquivo.").italics());
}

fn metric(ui: &mut Ui, label: &str, value: &CellValue) {
    ui.vertical(|ui: &mut Ui| {
        ui.label(RichText::new(label).small());
        ui.label(RichText::new(format_thousands(value)).size(26.0).color(BRAND_NAVY));
    });
}

// ---------------------------------------------------------------------------
// Charts and tables
// ---------------------------------------------------------------------------

/// One bar per summary row; colours cycle through `colors`.
fn bar_chart(ui: &mut Ui, id: &str, summary: &SummaryTable, y_label: &str, colors: &[Color32]) {
    let labels: Vec<String> = summary.rows.iter().map(|r| r.category.to_string()).collect();
    let bars: Vec<Bar> = summary
        .rows
        .iter()
        .zip(&labels)
        .enumerate()
        .map(|(i, (row, label))| {
            Bar::new(i as f64, row.value.as_f64().unwrap_or(0.0))
                .name(label)
                .fill(colors[i % colors.len()])
        })
        .collect();

    Plot::new(id)
        .height(280.0)
        .x_axis_label(summary.category_label.clone())
        .y_axis_label(y_label.to_string())
        .x_axis_formatter(move |mark, _range| {
            let i = mark.value.round();
            if i < 0.0 || (mark.value - i).abs() > 1e-6 {
                return String::new();
            }
            labels.get(i as usize).cloned().unwrap_or_default()
        })
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).width(0.6));
        });
}

fn summary_table(ui: &mut Ui, id: &str, summary: &SummaryTable) {
    ui.add_space(6.0);
    ui.push_id(id, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .column(Column::auto().at_least(160.0))
            .column(Column::remainder())
            .header(20.0, |mut header| {
                header.col(|ui| {
                    ui.strong(&summary.category_label);
                });
                header.col(|ui| {
                    ui.strong(&summary.value_label);
                });
            })
            .body(|mut body| {
                for row in &summary.rows {
                    body.row(18.0, |mut table_row| {
                        table_row.col(|ui| {
                            ui.label(row.category.to_string());
                        });
                        table_row.col(|ui| {
                            ui.label(format_thousands(&row.value));
                        });
                    });
                }
            });
    });
}
