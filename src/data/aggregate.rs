use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::config::{LevelColumn, PipelineConfig};

use super::model::{CellValue, ColumnType, Table};

// ---------------------------------------------------------------------------
// Summary tables
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub category: CellValue,
    pub value: CellValue,
}

/// One row per category with a single numeric aggregate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryTable {
    pub category_label: String,
    pub value_label: String,
    pub rows: Vec<SummaryRow>,
}

impl SummaryTable {
    fn new(category_label: &str, value_label: &str) -> Self {
        Self {
            category_label: category_label.to_string(),
            value_label: value_label.to_string(),
            rows: Vec::new(),
        }
    }

    /// Aggregate for a category whose label is `category`.
    pub fn get(&self, category: &str) -> Option<&CellValue> {
        self.rows
            .iter()
            .find(|r| matches!(&r.category, CellValue::String(s) if s == category))
            .map(|r| &r.value)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Sums
// ---------------------------------------------------------------------------

/// Running sum that stays integral for integer columns.
#[derive(Debug, Clone, Copy)]
enum Sum {
    Integer(i64),
    Float(f64),
}

impl Sum {
    fn zero(ty: ColumnType) -> Self {
        match ty {
            ColumnType::Integer => Sum::Integer(0),
            _ => Sum::Float(0.0),
        }
    }

    fn plus(self, value: &CellValue) -> Self {
        match (self, value) {
            (Sum::Integer(acc), CellValue::Integer(v)) => match acc.checked_add(*v) {
                Some(s) => Sum::Integer(s),
                None => Sum::Float(acc as f64 + *v as f64),
            },
            (Sum::Integer(acc), CellValue::Float(v)) => Sum::Float(acc as f64 + v),
            (Sum::Float(acc), v) => Sum::Float(acc + v.as_f64().unwrap_or(0.0)),
            (s, _) => s,
        }
    }

    fn into_cell(self) -> CellValue {
        match self {
            Sum::Integer(i) => CellValue::Integer(i),
            Sum::Float(f) => CellValue::Float(f),
        }
    }
}

/// Index and type of `column` when it exists and is numeric.
fn numeric_column(table: &Table, column: &str) -> Option<(usize, ColumnType)> {
    let c = table.column_index(column)?;
    let ty = table.dtypes[c];
    if !ty.is_numeric() {
        log::debug!("column {column:?} is {ty:?}, not summable");
        return None;
    }
    Some((c, ty))
}

/// Sum of a numeric column over every row, nulls skipped.
/// `None` when the column is missing or not numeric.
pub fn column_total(table: &Table, column: &str) -> Option<CellValue> {
    let (c, ty) = numeric_column(table, column)?;
    let sum = table
        .rows
        .iter()
        .fold(Sum::zero(ty), |acc, row| acc.plus(&row[c]));
    Some(sum.into_cell())
}

// ---------------------------------------------------------------------------
// Aggregation views
// ---------------------------------------------------------------------------

/// Distinct school identifiers per region, sorted by region.
///
/// Rows with a null region or a null identifier are not counted.  `None`
/// when either column is missing.
pub fn schools_by_region(
    table: &Table,
    region_column: &str,
    school_column: &str,
) -> Option<SummaryTable> {
    let r = table.column_index(region_column)?;
    let s = table.column_index(school_column)?;

    let mut groups: BTreeMap<&CellValue, HashSet<&CellValue>> = BTreeMap::new();
    for row in &table.rows {
        if row[r].is_null() {
            continue;
        }
        let ids = groups.entry(&row[r]).or_default();
        if !row[s].is_null() {
            ids.insert(&row[s]);
        }
    }

    let mut summary = SummaryTable::new(region_column, school_column);
    summary.rows = groups
        .into_iter()
        .map(|(region, ids)| SummaryRow {
            category: region.clone(),
            value: CellValue::Integer(ids.len() as i64),
        })
        .collect();
    Some(summary)
}

/// Each level column summed over all rows and relabeled.  Levels whose
/// column is missing or not numeric produce no row.
pub fn sum_by_level(table: &Table, levels: &[LevelColumn], value_label: &str) -> SummaryTable {
    let mut summary = SummaryTable::new("Nível", value_label);
    summary.rows = levels
        .iter()
        .filter_map(|level| {
            let total = column_total(table, &level.column)?;
            Some(SummaryRow {
                category: CellValue::String(level.label.clone()),
                value: total,
            })
        })
        .collect();
    summary
}

/// `value_column` summed per distinct `group_column` value, sorted by group.
/// `None` when either column is missing or the value column isn't numeric.
pub fn sum_by_group(
    table: &Table,
    group_column: &str,
    value_column: &str,
) -> Option<SummaryTable> {
    let g = table.column_index(group_column)?;
    let (v, ty) = numeric_column(table, value_column)?;

    let mut groups: BTreeMap<&CellValue, Sum> = BTreeMap::new();
    for row in &table.rows {
        if row[g].is_null() {
            continue;
        }
        let acc = groups.entry(&row[g]).or_insert(Sum::zero(ty));
        *acc = acc.plus(&row[v]);
    }

    let mut summary = SummaryTable::new(group_column, value_column);
    summary.rows = groups
        .into_iter()
        .map(|(group, sum)| SummaryRow {
            category: group.clone(),
            value: sum.into_cell(),
        })
        .collect();
    Some(summary)
}

// ---------------------------------------------------------------------------
// Dashboard bundle
// ---------------------------------------------------------------------------

/// Everything the three dashboard tabs show for one filtered table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardViews {
    pub schools_by_region: Option<SummaryTable>,
    pub enrollment_total: Option<CellValue>,
    pub enrollment_by_level: SummaryTable,
    pub enrollment_by_state: Option<SummaryTable>,
    pub staff_by_level: SummaryTable,
    pub staff_total: Option<CellValue>,
}

impl DashboardViews {
    pub fn compute(table: &Table, config: &PipelineConfig) -> Self {
        Self {
            schools_by_region: schools_by_region(
                table,
                &config.region_column,
                &config.school_id_column,
            ),
            enrollment_total: column_total(table, &config.enrollment_total_column),
            enrollment_by_level: sum_by_level(table, &config.enrollment_levels, "Matrículas"),
            enrollment_by_state: sum_by_group(
                table,
                &config.state_column,
                &config.enrollment_total_column,
            ),
            staff_by_level: sum_by_level(table, &config.staff_levels, "Docentes"),
            staff_total: column_total(table, &config.staff_total_column),
        }
    }
}

/// Render a metric with '.' between thousands, e.g. `1.234.567`.
/// Floats keep two decimals after a ','.
pub fn format_thousands(value: &CellValue) -> String {
    match value {
        CellValue::Integer(i) => group_digits(&i.unsigned_abs().to_string(), *i < 0),
        CellValue::Float(f) if f.is_finite() => {
            let text = format!("{:.2}", f.abs());
            let (int_part, frac) = text.split_once('.').unwrap_or((text.as_str(), "00"));
            format!("{},{frac}", group_digits(int_part, *f < 0.0))
        }
        other => other.to_string(),
    }
}

fn group_digits(digits: &str, negative: bool) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if negative {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}
