use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// CellValue – a single cell of the census table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring the dtypes a dataframe reader infers.
/// Selections live in `BTreeSet`s downstream so `CellValue` must be `Ord`.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

// -- Manual Eq/Ord so we can put CellValue in BTreeSet --

/// Equality follows `Ord`: floats compare by `total_cmp`, so NaN equals
/// itself and 0.0 differs from -0.0, matching `Hash`.
impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::String(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Bool(b) => b.hash(state),
            CellValue::Null => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Integer(i)
    }
}

impl CellValue {
    /// Try to interpret the value as an `f64`, e.g. for bar heights.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

// ---------------------------------------------------------------------------
// ColumnType – the inferred type of a whole column
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColumnType {
    Integer,
    Float,
    Bool,
    String,
}

impl ColumnType {
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::Float)
    }
}

// ---------------------------------------------------------------------------
// Table – the row-oriented in-memory dataset
// ---------------------------------------------------------------------------

/// An ordered, row-oriented table with named, typed columns.
///
/// Cells are positional: `rows[r][c]` belongs to `columns[c]`.  Every row has
/// exactly `columns.len()` cells.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub dtypes: Vec<ColumnType>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Table {
    /// Zero rows, zero columns.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a table, inferring each column type from its non-null cells.
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let dtypes = (0..columns.len())
            .map(|c| infer_column_type(rows.iter().map(|r| &r[c])))
            .collect();
        Table {
            columns,
            dtypes,
            rows,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when there are no rows and no columns.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.columns.is_empty()
    }

    /// Position of the first column named `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn column_type(&self, name: &str) -> Option<ColumnType> {
        self.column_index(name).map(|i| self.dtypes[i])
    }

    /// Cell at `row` in the named column.
    pub fn value(&self, row: usize, column: &str) -> Option<&CellValue> {
        let c = self.column_index(column)?;
        self.rows.get(row).map(|r| &r[c])
    }

    /// Iterate all cells of one column, in row order.
    pub fn column_values<'a>(
        &'a self,
        column: &str,
    ) -> Option<impl Iterator<Item = &'a CellValue> + 'a> {
        let c = self.column_index(column)?;
        Some(self.rows.iter().map(move |r| &r[c]))
    }

    /// Distinct non-null values of a column in order of first appearance.
    pub fn unique_values(&self, column: &str) -> Vec<CellValue> {
        let Some(values) = self.column_values(column) else {
            return Vec::new();
        };
        let mut seen = HashSet::new();
        values
            .filter(|v| !v.is_null())
            .filter(|v| seen.insert(*v))
            .cloned()
            .collect()
    }

    /// New table holding the rows at `indices`, in that order.
    pub fn select_rows(&self, indices: &[usize]) -> Table {
        Table {
            columns: self.columns.clone(),
            dtypes: self.dtypes.clone(),
            rows: indices.iter().map(|&i| self.rows[i].clone()).collect(),
        }
    }
}

/// Narrowest type that holds every non-null value: Integer ⊂ Float, else Bool
/// when everything is boolean, else String.  All-null columns read as Float,
/// like a dataframe reader does for an empty numeric column.
pub fn infer_column_type<'a>(values: impl Iterator<Item = &'a CellValue>) -> ColumnType {
    let mut ty: Option<ColumnType> = None;
    for v in values {
        let cell_ty = match v {
            CellValue::Null => continue,
            CellValue::Integer(_) => ColumnType::Integer,
            CellValue::Float(_) => ColumnType::Float,
            CellValue::Bool(_) => ColumnType::Bool,
            CellValue::String(_) => return ColumnType::String,
        };
        ty = Some(match (ty, cell_ty) {
            (None, t) => t,
            (Some(a), b) if a == b => a,
            (Some(ColumnType::Integer), ColumnType::Float)
            | (Some(ColumnType::Float), ColumnType::Integer) => ColumnType::Float,
            _ => return ColumnType::String,
        });
    }
    ty.unwrap_or(ColumnType::Float)
}
