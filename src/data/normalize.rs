use crate::config::BinaryLabels;

use super::model::{CellValue, ColumnType, Table, infer_column_type};

/// Replace 1 → `labels.yes` and 0 → `labels.no` in each listed column.
///
/// Other values (including labels from an earlier pass) are left alone, and
/// listed columns that the table lacks are skipped.
pub fn normalize_binary(mut table: Table, columns: &[String], labels: &BinaryLabels) -> Table {
    for name in columns {
        let Some(c) = table.column_index(name) else {
            log::debug!("binary column {name:?} not present, skipping");
            continue;
        };
        let mut changed = false;
        for row in &mut table.rows {
            if let Some(label) = binary_label(&row[c], labels) {
                row[c] = CellValue::String(label.to_string());
                changed = true;
            }
        }
        if changed {
            table.dtypes[c] = infer_column_type(table.rows.iter().map(|r| &r[c]));
            debug_assert_eq!(table.dtypes[c], ColumnType::String);
        }
    }
    table
}

fn binary_label<'a>(value: &CellValue, labels: &'a BinaryLabels) -> Option<&'a str> {
    match value {
        CellValue::Integer(1) => Some(labels.yes.as_str()),
        CellValue::Integer(0) => Some(labels.no.as_str()),
        CellValue::Float(f) if *f == 1.0 => Some(labels.yes.as_str()),
        CellValue::Float(f) if *f == 0.0 => Some(labels.no.as_str()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels() -> BinaryLabels {
        BinaryLabels {
            yes: "Yes".to_string(),
            no: "No".to_string(),
        }
    }

    fn table() -> Table {
        Table::from_rows(
            vec!["internet".into(), "other".into()],
            vec![
                vec![CellValue::Integer(1), CellValue::Integer(1)],
                vec![CellValue::Integer(0), CellValue::Integer(0)],
                vec![CellValue::Integer(7), CellValue::Integer(1)],
                vec![CellValue::Null, CellValue::Integer(0)],
            ],
        )
    }

    #[test]
    fn maps_listed_columns_only() {
        let t = normalize_binary(table(), &["internet".to_string()], &labels());
        let internet: Vec<_> = t.column_values("internet").unwrap().cloned().collect();
        assert_eq!(
            internet,
            vec!["Yes".into(), "No".into(), CellValue::Integer(7), CellValue::Null]
        );
        let other: Vec<_> = t.column_values("other").unwrap().cloned().collect();
        assert_eq!(
            other,
            vec![
                CellValue::Integer(1),
                CellValue::Integer(0),
                CellValue::Integer(1),
                CellValue::Integer(0)
            ]
        );
        assert_eq!(t.column_type("internet"), Some(ColumnType::String));
        assert_eq!(t.column_type("other"), Some(ColumnType::Integer));
    }

    #[test]
    fn float_ones_and_zeros_are_mapped() {
        let t = Table::from_rows(
            vec!["b".into()],
            vec![vec![CellValue::Float(1.0)], vec![CellValue::Float(0.0)]],
        );
        let t = normalize_binary(t, &["b".to_string()], &labels());
        assert_eq!(t.value(0, "b"), Some(&"Yes".into()));
        assert_eq!(t.value(1, "b"), Some(&"No".into()));
    }

    #[test]
    fn absent_columns_are_skipped() {
        let before = table();
        let after = normalize_binary(before.clone(), &["missing".to_string()], &labels());
        assert_eq!(before, after);
    }

    #[test]
    fn idempotent() {
        let cols = ["internet".to_string()];
        let once = normalize_binary(table(), &cols, &labels());
        let twice = normalize_binary(once.clone(), &cols, &labels());
        assert_eq!(once, twice);
    }
}
