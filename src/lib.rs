pub mod config;
pub mod data;
pub mod state;

pub use config::PipelineConfig;
pub use data::aggregate::{DashboardViews, SummaryRow, SummaryTable};
pub use data::filter::FilterSelection;
pub use data::loader::{LoadError, Upload};
pub use data::model::{CellValue, ColumnType, Table};
