use std::collections::BTreeSet;
use std::sync::Arc;

use crate::config::PipelineConfig;
use crate::data::aggregate::DashboardViews;
use crate::data::cache::DatasetCache;
use crate::data::filter::{FilterSelection, filter, filter_options};
use crate::data::loader::{LoadError, Upload};
use crate::data::model::{CellValue, Table};

// ---------------------------------------------------------------------------
// Dashboard state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Schools,
    Enrollment,
    Staff,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Schools, Tab::Enrollment, Tab::Staff];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Schools => "Escolas",
            Tab::Enrollment => "Alunado",
            Tab::Staff => "Docentes",
        }
    }
}

/// The full session state, independent of rendering.
pub struct DashboardState {
    pub config: PipelineConfig,
    cache: DatasetCache,

    /// Normalized table of the current upload (empty until one arrives).
    pub dataset: Arc<Table>,
    pub upload_name: Option<String>,

    /// Per-column filter selections.
    pub selection: FilterSelection,

    /// Rows passing the current selection, and what the tabs show for them.
    pub filtered: Table,
    pub views: DashboardViews,

    pub active_tab: Tab,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}

impl DashboardState {
    pub fn new(config: PipelineConfig) -> Self {
        let dataset = Arc::new(Table::empty());
        let views = DashboardViews::compute(&dataset, &config);
        Self {
            cache: DatasetCache::new(config.cache_capacity),
            config,
            filtered: Table::empty(),
            dataset,
            upload_name: None,
            selection: FilterSelection::new(),
            views,
            active_tab: Tab::default(),
            status_message: None,
        }
    }

    /// Ingest an upload (or its absence) and reset the filters.
    ///
    /// On failure the previous dataset stays in place and the error is kept
    /// as the status message.
    pub fn load_upload(&mut self, upload: Option<Upload>) -> Result<(), LoadError> {
        match self.cache.get_or_load(upload.as_ref(), &self.config) {
            Ok(table) => {
                self.dataset = table;
                self.upload_name = upload.map(|u| u.name);
                self.selection.clear();
                self.status_message = None;
                self.refilter();
                Ok(())
            }
            Err(e) => {
                self.status_message = Some(format!("Erro: {e}"));
                Err(e)
            }
        }
    }

    /// Nothing usable uploaded yet; the tabs should prompt for a file.
    /// A header-only upload has no rows to chart, so it counts too.
    pub fn is_awaiting_input(&self) -> bool {
        self.dataset.rows.is_empty()
    }

    pub fn cache(&self) -> &DatasetCache {
        &self.cache
    }

    /// Values offered for a filter column, from the unfiltered dataset.
    pub fn options(&self, column: &str) -> Vec<CellValue> {
        filter_options(&self.dataset, column)
    }

    /// Recompute the filtered table and views after a selection change.
    pub fn refilter(&mut self) {
        self.filtered = filter(&self.dataset, &self.selection);
        self.views = DashboardViews::compute(&self.filtered, &self.config);
    }

    /// Toggle a single value in a column's selection.
    pub fn toggle_selection(&mut self, column: &str, value: &CellValue) {
        let selected = self.selection.entry(column.to_string()).or_default();
        if !selected.remove(value) {
            selected.insert(value.clone());
        }
        self.refilter();
    }

    /// Replace a column's selection.
    pub fn set_selection(&mut self, column: &str, values: BTreeSet<CellValue>) {
        self.selection.insert(column.to_string(), values);
        self.refilter();
    }

    /// Drop a column's constraint (show every value).
    pub fn clear_selection(&mut self, column: &str) {
        self.selection.remove(column);
        self.refilter();
    }
}
