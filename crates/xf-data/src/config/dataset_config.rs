//! Declared schema and row selection for a tabular source

use std::path::Path;
use serde::{Deserialize, Serialize};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};

use super::null_handling::NullConfig;
use crate::DataError;

/// Type a source column is coerced to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ColumnType {
    Float,
    Integer,
    Text,
    /// Timestamps stored in milliseconds; `utc` makes the column timezone-aware
    Timestamp { utc: bool },
}

impl ColumnType {
    pub fn data_type(&self) -> DataType {
        match self {
            ColumnType::Float => DataType::Float64,
            ColumnType::Integer => DataType::Int64,
            ColumnType::Text => DataType::Utf8,
            ColumnType::Timestamp { utc: true } => DataType::Timestamp(TimeUnit::Millisecond, Some("UTC".into())),
            ColumnType::Timestamp { utc: false } => DataType::Timestamp(TimeUnit::Millisecond, None),
        }
    }
}

/// One column kept in the dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Name in the dataset
    pub name: String,

    #[serde(flatten)]
    pub column_type: ColumnType,

    /// Header in the source, when it differs from `name`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self { name: name.into(), column_type, source: None }
    }

    pub fn source_header(&self) -> &str {
        self.source.as_deref().unwrap_or(&self.name)
    }
}

/// Keep only rows whose `column` equals `equals`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowFilter {
    pub column: String,
    pub equals: String,
}

/// How a source file becomes a dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Columns to keep, in dataset order
    pub columns: Vec<ColumnSpec>,

    /// Row filters, all of which must match; they may reference any source header
    #[serde(default)]
    pub filters: Vec<RowFilter>,

    /// Keep at most this many matching rows, in source order
    #[serde(default)]
    pub max_rows: Option<usize>,

    #[serde(default)]
    pub null_config: NullConfig,

    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

fn default_delimiter() -> char {
    ','
}

impl DatasetConfig {
    pub fn new(columns: Vec<ColumnSpec>) -> Self {
        Self {
            columns,
            filters: Vec::new(),
            max_rows: None,
            null_config: NullConfig::default(),
            delimiter: default_delimiter(),
        }
    }

    pub fn with_filter(mut self, column: impl Into<String>, equals: impl Into<String>) -> Self {
        self.filters.push(RowFilter { column: column.into(), equals: equals.into() });
        self
    }

    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = Some(max_rows);
        self
    }

    /// Read a configuration from a JSON file
    pub fn from_path(path: &Path) -> Result<Self, DataError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Arrow schema of the loaded dataset
    pub fn schema(&self) -> Schema {
        Schema::new(
            self.columns
                .iter()
                .map(|c| Field::new(&c.name, c.column_type.data_type(), true))
                .collect::<Vec<_>>(),
        )
    }
}
