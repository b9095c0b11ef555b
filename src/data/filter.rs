use std::collections::{BTreeMap, BTreeSet};

use super::model::{CellValue, Table};

// ---------------------------------------------------------------------------
// Filter predicate: which values are selected per column
// ---------------------------------------------------------------------------

/// Per-column selection state: maps column label → set of selected values.
/// If a column is absent or its set is empty, it means "no filter" (show all).
pub type FilterSelection = BTreeMap<String, BTreeSet<CellValue>>;

/// Values offered for a column's multiselect, in order of first appearance.
/// A column with empty cells also offers [`CellValue::Null`], last, so those
/// rows stay selectable.  Unknown columns offer nothing.
pub fn filter_options(table: &Table, column: &str) -> Vec<CellValue> {
    let mut options = table.unique_values(column);
    let has_nulls = table
        .column_values(column)
        .is_some_and(|mut values| values.any(CellValue::is_null));
    if has_nulls {
        options.push(CellValue::Null);
    }
    options
}

/// Return indices of rows that pass all active constraints.
///
/// A row passes a column constraint when:
/// * The selected set for that column is empty → passes (no constraint)
/// * The column is not in the table → passes (fail-open)
/// * The row's value for that column is in the selected set → passes
pub fn filtered_indices(table: &Table, selection: &FilterSelection) -> Vec<usize> {
    let mut active: Vec<(usize, &BTreeSet<CellValue>)> = Vec::new();
    for (col, selected) in selection {
        if selected.is_empty() {
            continue;
        }
        match table.column_index(col) {
            Some(c) => active.push((c, selected)),
            None => log::debug!("filter column {col:?} not in table, ignoring"),
        }
    }

    (0..table.len())
        .filter(|&i| {
            let row = &table.rows[i];
            active.iter().all(|(c, selected)| selected.contains(&row[*c]))
        })
        .collect()
}

/// Rows of `table` matching `selection`, in their original order.
pub fn filter(table: &Table, selection: &FilterSelection) -> Table {
    let indices = filtered_indices(table, selection);
    if indices.len() == table.len() {
        return table.clone();
    }
    table.select_rows(&indices)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Table {
        Table::from_rows(
            vec!["Região".into(), "UF".into()],
            vec![
                vec!["Sul".into(), "RS".into()],
                vec!["Sudeste".into(), "SP".into()],
                vec!["Sudeste".into(), "RJ".into()],
                vec!["Sudeste".into(), "SP".into()],
                vec!["Norte".into(), "AM".into()],
            ],
        )
    }

    fn select(pairs: &[(&str, &[&str])]) -> FilterSelection {
        pairs
            .iter()
            .map(|(col, vals)| {
                (
                    col.to_string(),
                    vals.iter().map(|v| CellValue::from(*v)).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn empty_selection_is_identity() {
        let t = table();
        assert_eq!(filter(&t, &FilterSelection::new()), t);
        assert_eq!(filter(&t, &select(&[("UF", &[]), ("Região", &[])])), t);
    }

    #[test]
    fn or_within_a_column() {
        let t = filter(&table(), &select(&[("UF", &["RS", "AM"])]));
        assert_eq!(t.len(), 2);
        assert_eq!(t.value(0, "UF"), Some(&"RS".into()));
        assert_eq!(t.value(1, "UF"), Some(&"AM".into()));
    }

    #[test]
    fn and_across_columns() {
        let sel = select(&[("Região", &["Sudeste"]), ("UF", &["SP", "RS"])]);
        assert_eq!(filtered_indices(&table(), &sel), vec![1, 3]);
    }

    #[test]
    fn unknown_column_is_no_constraint() {
        let sel = select(&[("Município", &["Manaus"]), ("UF", &["SP"])]);
        assert_eq!(filtered_indices(&table(), &sel), vec![1, 3]);
    }

    #[test]
    fn value_not_present_matches_nothing() {
        let sel = select(&[("UF", &["BA"])]);
        assert!(filter(&table(), &sel).rows.is_empty());
    }

    #[test]
    fn options_in_first_appearance_order() {
        assert_eq!(
            filter_options(&table(), "Região"),
            vec!["Sul".into(), "Sudeste".into(), "Norte".into()]
        );
        assert!(filter_options(&table(), "nope").is_empty());
    }

    #[test]
    fn empty_cells_are_a_selectable_option() {
        let t = Table::from_rows(
            vec!["Categoria".into()],
            vec![
                vec!["Particular".into()],
                vec![CellValue::Null],
                vec!["Comunitária".into()],
                vec![CellValue::Null],
            ],
        );
        let options = filter_options(&t, "Categoria");
        assert_eq!(
            options,
            vec!["Particular".into(), "Comunitária".into(), CellValue::Null]
        );

        let mut sel = FilterSelection::new();
        sel.insert("Categoria".into(), BTreeSet::from([CellValue::Null]));
        assert_eq!(filtered_indices(&t, &sel), vec![1, 3]);

        sel.insert(
            "Categoria".into(),
            BTreeSet::from([CellValue::Null, "Particular".into()]),
        );
        assert_eq!(filtered_indices(&t, &sel), vec![0, 1, 3]);
    }
}
