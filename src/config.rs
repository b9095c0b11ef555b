//! Pipeline configuration: the fixed census column tables.
//!
//! [`PipelineConfig::default`] carries the census export layout.  A JSON file
//! can override any subset of the fields; absent keys keep their defaults.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Categorical labels that replace 1 and 0 in binary columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinaryLabels {
    pub yes: String,
    pub no: String,
}

impl Default for BinaryLabels {
    fn default() -> Self {
        Self {
            yes: "Sim".to_string(),
            no: "Não".to_string(),
        }
    }
}

/// A numeric column summed as one bar/slice, shown under `label`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelColumn {
    pub column: String,
    pub label: String,
}

impl LevelColumn {
    fn new(column: &str, label: &str) -> Self {
        Self {
            column: column.to_string(),
            label: label.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Raw column identifier → display label.
    pub column_mapping: BTreeMap<String, String>,
    /// Display labels of the 0/1 columns.
    pub binary_columns: Vec<String>,
    pub binary_labels: BinaryLabels,
    /// Display labels offered as sidebar multiselects, in order.
    pub filter_columns: Vec<String>,
    pub delimiter: char,

    pub region_column: String,
    pub school_id_column: String,
    pub state_column: String,
    pub enrollment_total_column: String,
    pub staff_total_column: String,
    pub enrollment_levels: Vec<LevelColumn>,
    pub staff_levels: Vec<LevelColumn>,

    /// Distinct uploads kept in the dataset cache.
    pub cache_capacity: usize,
}

const COLUMN_MAPPING: &[(&str, &str)] = &[
    ("ano_censo", "Ano do Censo"),
    ("regiao", "Região"),
    ("uf", "UF"),
    ("municipio", "Município"),
    ("co_entidade", "Código da Escola"),
    ("dependencia", "Dependência Administrativa"),
    ("categoria_escola_privada", "Categoria Escola Privada"),
    ("local_func_socioeducativo", "Local Func. Socioeducativo"),
    ("esola_sistema_s", "Escola Sistema S"),
    ("acesso_internet_alunos_computador", "Acesso Internet Alunos"),
    ("qt_docentes_total", "Total Docentes"),
    ("alunado_total_edb", "Total Alunos Educação Básica"),
    ("qt_docentes_educacao_infantil", "Docentes Educação Infantil"),
    ("qt_docentes_ensino_fundamental", "Docentes Ensino Fundamental"),
    ("qt_docentes_ensino_medio", "Docentes Ensino Médio"),
    ("qt_mat_educacao_infantil", "Matrículas Educação Infantil"),
    (
        "qt_mat_ensino_fundamental_anos_iniciais",
        "Matrículas Fund. Anos Iniciais",
    ),
    (
        "qt_mat_ensino_fundamental_anos_finais",
        "Matrículas Fund. Anos Finais",
    ),
    ("qt_mat_ensino_medio", "Matrículas Ensino Médio"),
];

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            column_mapping: COLUMN_MAPPING
                .iter()
                .map(|(raw, label)| (raw.to_string(), label.to_string()))
                .collect(),
            binary_columns: vec![
                "Local Func. Socioeducativo".to_string(),
                "Escola Sistema S".to_string(),
                "Acesso Internet Alunos".to_string(),
            ],
            binary_labels: BinaryLabels::default(),
            filter_columns: vec![
                "Região".to_string(),
                "UF".to_string(),
                "Município".to_string(),
                "Dependência Administrativa".to_string(),
                "Categoria Escola Privada".to_string(),
            ],
            delimiter: ';',
            region_column: "Região".to_string(),
            school_id_column: "Código da Escola".to_string(),
            state_column: "UF".to_string(),
            enrollment_total_column: "Total Alunos Educação Básica".to_string(),
            staff_total_column: "Total Docentes".to_string(),
            enrollment_levels: vec![
                LevelColumn::new("Matrículas Educação Infantil", "Educação Infantil"),
                LevelColumn::new("Matrículas Fund. Anos Iniciais", "Fundamental - Iniciais"),
                LevelColumn::new("Matrículas Fund. Anos Finais", "Fundamental - Finais"),
                LevelColumn::new("Matrículas Ensino Médio", "Ensino Médio"),
            ],
            staff_levels: vec![
                LevelColumn::new("Docentes Educação Infantil", "Educação Infantil"),
                LevelColumn::new("Docentes Ensino Fundamental", "Fundamental"),
                LevelColumn::new("Docentes Ensino Médio", "Ensino Médio"),
            ],
            cache_capacity: 4,
        }
    }
}

impl PipelineConfig {
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_json_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text)
    }
}
