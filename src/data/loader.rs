use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::PipelineConfig;

use super::mapping::map_columns;
use super::model::{CellValue, ColumnType, Table, infer_column_type};
use super::normalize::normalize_binary;

// ---------------------------------------------------------------------------
// Errors and input
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("opening {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Structurally inconsistent text, e.g. a record whose field count
    /// differs from the header.  Record 0 is the header.
    #[error("malformed CSV at record {record}: {source}")]
    Csv {
        record: usize,
        #[source]
        source: csv::Error,
    },
    #[error("delimiter {0:?} is not a single-byte character")]
    UnsupportedDelimiter(char),
}

/// A file handed over by the upload surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a whole file from disk.
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self { name, bytes })
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load an upload into a normalized table.
///
/// `None` (nothing uploaded yet) yields [`Table::empty`]; callers treat the
/// empty table as "waiting for input" and stop there.
pub fn load(upload: Option<&Upload>, config: &PipelineConfig) -> Result<Table, LoadError> {
    match upload {
        Some(upload) => load_bytes(&upload.bytes, config),
        None => Ok(Table::empty()),
    }
}

pub fn load_bytes(bytes: &[u8], config: &PipelineConfig) -> Result<Table, LoadError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Table::empty());
    }
    load_reader(bytes, config)
}

/// Load from a file on disk.  The handle is dropped before returning, on
/// success and on failure alike.
pub fn load_path(path: &Path, config: &PipelineConfig) -> Result<Table, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_reader(BufReader::new(file), config)
}

/// Parse delimited Latin-1 text, then rename and normalize the columns.
pub fn load_reader<R: Read>(reader: R, config: &PipelineConfig) -> Result<Table, LoadError> {
    let raw = parse_delimited(reader, config.delimiter)?;
    let table = map_columns(raw, &config.column_mapping);
    let table = normalize_binary(table, &config.binary_columns, &config.binary_labels);
    log::info!(
        "Loaded {} rows with {} columns",
        table.len(),
        table.columns.len()
    );
    Ok(table)
}

// ---------------------------------------------------------------------------
// CSV parsing
// ---------------------------------------------------------------------------

/// Header row plus records, every record the same width as the header.
/// Column types are decided per column once all records are read.
fn parse_delimited<R: Read>(reader: R, delimiter: char) -> Result<Table, LoadError> {
    let delimiter = u8::try_from(delimiter)
        .ok()
        .filter(u8::is_ascii)
        .ok_or(LoadError::UnsupportedDelimiter(delimiter))?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(false)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .byte_headers()
        .map_err(|source| LoadError::Csv { record: 0, source })?
        .iter()
        .map(decode_latin1)
        .collect();
    if headers.is_empty() {
        return Ok(Table::empty());
    }

    let mut raw_rows: Vec<Vec<String>> = Vec::new();
    for (i, result) in reader.byte_records().enumerate() {
        let record = result.map_err(|source| LoadError::Csv {
            record: i + 1,
            source,
        })?;
        raw_rows.push(record.iter().map(decode_latin1).collect());
    }

    let mut rows: Vec<Vec<CellValue>> = vec![Vec::with_capacity(headers.len()); raw_rows.len()];
    let mut dtypes = Vec::with_capacity(headers.len());
    for c in 0..headers.len() {
        let parsed: Vec<CellValue> = raw_rows.iter().map(|r| guess_cell_type(&r[c])).collect();
        let ty = infer_column_type(parsed.iter());
        for ((row, raw), value) in rows.iter_mut().zip(&raw_rows).zip(parsed) {
            row.push(coerce(value, &raw[c], ty));
        }
        dtypes.push(ty);
    }

    Ok(Table {
        columns: headers,
        dtypes,
        rows,
    })
}

/// Each byte is the code point of the same value, so decoding never fails.
fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Compared case-insensitively.
const NULL_MARKERS: &[&str] = &["", "na", "n/a", "nan", "null", "none"];

fn guess_cell_type(s: &str) -> CellValue {
    let t = s.trim();
    if NULL_MARKERS.iter().any(|m| t.eq_ignore_ascii_case(m)) {
        return CellValue::Null;
    }
    if let Ok(i) = t.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = t.parse::<f64>() {
        // Spellings such as "+nan" or "-NaN" get past the markers.
        if f.is_nan() {
            return CellValue::Null;
        }
        return CellValue::Float(f);
    }
    match t {
        "True" | "true" | "TRUE" => CellValue::Bool(true),
        "False" | "false" | "FALSE" => CellValue::Bool(false),
        _ => CellValue::String(s.to_string()),
    }
}

/// Bring a cell in line with its column type.  String columns keep the
/// original text of cells that happened to look numeric.
fn coerce(value: CellValue, raw: &str, ty: ColumnType) -> CellValue {
    match (ty, value) {
        (_, CellValue::Null) => CellValue::Null,
        (ColumnType::Float, CellValue::Integer(i)) => CellValue::Float(i as f64),
        (ColumnType::String, CellValue::String(s)) => CellValue::String(s),
        (ColumnType::String, _) => CellValue::String(raw.to_string()),
        (_, v) => v,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PipelineConfig {
        PipelineConfig::default()
    }

    #[test]
    fn absent_upload_is_empty_table() {
        let t = load(None, &config()).unwrap();
        assert!(t.is_empty());
        assert!(t.columns.is_empty());
    }

    #[test]
    fn empty_bytes_are_empty_table() {
        assert!(load_bytes(b"", &config()).unwrap().is_empty());
        assert!(load_bytes(b"\n  \n", &config()).unwrap().is_empty());
    }

    #[test]
    fn parses_renames_and_normalizes() {
        let csv = b"regiao;uf;co_entidade;esola_sistema_s;qt_mat_ensino_medio\n\
                    Sul;RS;1;1;10\n\
                    Norte;AM;2;0;20\n";
        let t = load_bytes(csv, &config()).unwrap();
        assert_eq!(
            t.columns,
            vec![
                "Região",
                "UF",
                "Código da Escola",
                "Escola Sistema S",
                "Matrículas Ensino Médio"
            ]
        );
        assert_eq!(t.len(), 2);
        assert_eq!(t.value(0, "Escola Sistema S"), Some(&"Sim".into()));
        assert_eq!(t.value(1, "Escola Sistema S"), Some(&"Não".into()));
        assert_eq!(t.column_type("Matrículas Ensino Médio"), Some(ColumnType::Integer));
    }

    #[test]
    fn decodes_latin1_bytes() {
        // "São Paulo" with 0xE3 for 'ã'
        let csv = b"municipio\nS\xe3o Paulo\n";
        let t = load_bytes(csv, &config()).unwrap();
        assert_eq!(t.value(0, "Município"), Some(&"São Paulo".into()));
    }

    #[test]
    fn mixed_numeric_column_becomes_float() {
        let csv = b"n\n1\n2.5\n\n";
        let t = load_bytes(csv, &config()).unwrap();
        assert_eq!(t.column_type("n"), Some(ColumnType::Float));
        assert_eq!(t.value(0, "n"), Some(&CellValue::Float(1.0)));
    }

    #[test]
    fn every_nan_spelling_is_null() {
        let csv = b"n\nNAN\n+nan\n-NaN\nNULL\nn/a\n2.5\n";
        let t = load_bytes(csv, &config()).unwrap();
        let nulls = t
            .column_values("n")
            .unwrap()
            .filter(|v| v.is_null())
            .count();
        assert_eq!(nulls, 5);
        assert_eq!(t.value(5, "n"), Some(&CellValue::Float(2.5)));
    }

    #[test]
    fn text_column_keeps_numeric_looking_cells_as_text() {
        let csv = b"code\n007\nABC\n";
        let t = load_bytes(csv, &config()).unwrap();
        assert_eq!(t.column_type("code"), Some(ColumnType::String));
        assert_eq!(t.value(0, "code"), Some(&"007".into()));
    }

    #[test]
    fn inconsistent_field_count_fails_whole_load() {
        let csv = b"a;b\n1;2\n3\n";
        let err = load_bytes(csv, &config()).unwrap_err();
        assert!(matches!(err, LoadError::Csv { record: 2, .. }));
    }

    #[test]
    fn header_only_has_columns_but_no_rows() {
        let t = load_bytes(b"uf;regiao\n", &config()).unwrap();
        assert_eq!(t.columns, vec!["UF", "Região"]);
        assert_eq!(t.len(), 0);
    }

    #[test]
    fn multibyte_delimiter_is_rejected() {
        let mut cfg = config();
        cfg.delimiter = '¦';
        let err = load_bytes(b"a\n1\n", &cfg).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedDelimiter('¦')));
    }

    #[test]
    fn missing_path_is_io_error() {
        let err = load_path(Path::new("/nonexistent/censo.csv"), &config()).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
