use std::collections::BTreeMap;

use super::model::Table;

/// Rename every column whose identifier is a key of `mapping`.
///
/// Each header is looked up once, so a label that happens to equal another
/// raw key is not renamed a second time.  Unmapped columns keep their name.
pub fn map_columns(mut table: Table, mapping: &BTreeMap<String, String>) -> Table {
    for name in &mut table.columns {
        if let Some(label) = mapping.get(name.as_str()) {
            *name = label.clone();
        }
    }
    table
}
