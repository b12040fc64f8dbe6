//! Immutable in-memory table shared by every linked view

mod row_set;

pub use row_set::{RowId, RowSet};

use std::sync::Arc;
use arrow::array::{Array, Float64Array, StringArray, TimestampMillisecondArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, SchemaRef, TimeUnit};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use indexmap::IndexMap;

/// How a column can take part in selections
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnKind {
    /// Any integer or floating point column, compared as `f64`
    Numeric,
    /// Timestamps in milliseconds; `timezone` is `None` for naive wall-clock values
    Temporal { timezone: Option<Arc<str>> },
    /// String-like labels
    Categorical,
    /// Columns no predicate can reference
    Unsupported,
}

impl ColumnKind {
    fn of(data_type: &DataType) -> Self {
        match data_type {
            DataType::Int8 | DataType::Int16 | DataType::Int32 | DataType::Int64
            | DataType::UInt8 | DataType::UInt16 | DataType::UInt32 | DataType::UInt64
            | DataType::Float32 | DataType::Float64 => ColumnKind::Numeric,
            DataType::Timestamp(_, timezone) => ColumnKind::Temporal { timezone: timezone.clone() },
            DataType::Date32 | DataType::Date64 => ColumnKind::Temporal { timezone: None },
            DataType::Utf8 | DataType::LargeUtf8 | DataType::Boolean => ColumnKind::Categorical,
            DataType::Dictionary(_, value) if matches!(value.as_ref(), DataType::Utf8 | DataType::LargeUtf8) => {
                ColumnKind::Categorical
            }
            _ => ColumnKind::Unsupported,
        }
    }

    /// Human readable name used in error messages
    pub fn describe(&self) -> &'static str {
        match self {
            ColumnKind::Numeric => "numeric",
            ColumnKind::Temporal { timezone: Some(_) } => "timezone-aware temporal",
            ColumnKind::Temporal { timezone: None } => "naive temporal",
            ColumnKind::Categorical => "categorical",
            ColumnKind::Unsupported => "unsupported",
        }
    }
}

/// Column values normalized once at construction so every scan is a plain loop
enum ColumnData {
    Numeric(Float64Array),
    Temporal(TimestampMillisecondArray),
    Categorical(StringArray),
    Unsupported,
}

struct Column {
    kind: ColumnKind,
    data: ColumnData,
}

/// Ordered, fixed-schema table loaded once and never mutated.
///
/// Row identities are positions in the underlying record batch and are handed
/// out as [`RowId`] values.
pub struct Dataset {
    batch: RecordBatch,
    columns: IndexMap<String, Column>,
}

impl Dataset {
    /// Wrap a finalized record batch
    pub fn new(batch: RecordBatch) -> Result<Self, ArrowError> {
        let schema = batch.schema();
        let mut columns = IndexMap::with_capacity(schema.fields().len());

        for (field, array) in schema.fields().iter().zip(batch.columns()) {
            let kind = ColumnKind::of(field.data_type());
            let data = match &kind {
                ColumnKind::Numeric => {
                    let values = cast(array.as_ref(), &DataType::Float64)?;
                    values.as_any().downcast_ref::<Float64Array>().cloned().map(ColumnData::Numeric)
                }
                ColumnKind::Temporal { timezone } => {
                    let target = DataType::Timestamp(TimeUnit::Millisecond, timezone.clone());
                    let values = cast(array.as_ref(), &target)?;
                    values
                        .as_any()
                        .downcast_ref::<TimestampMillisecondArray>()
                        .cloned()
                        .map(ColumnData::Temporal)
                }
                ColumnKind::Categorical => {
                    let values = cast(array.as_ref(), &DataType::Utf8)?;
                    values.as_any().downcast_ref::<StringArray>().cloned().map(ColumnData::Categorical)
                }
                ColumnKind::Unsupported => None,
            };

            let column = match data {
                Some(data) => Column { kind, data },
                None => Column { kind: ColumnKind::Unsupported, data: ColumnData::Unsupported },
            };
            columns.insert(field.name().clone(), column);
        }

        tracing::debug!(
            "Dataset built with {} rows and {} columns",
            batch.num_rows(),
            columns.len()
        );

        Ok(Self { batch, columns })
    }

    pub fn len(&self) -> usize {
        self.batch.num_rows()
    }

    pub fn is_empty(&self) -> bool {
        self.batch.num_rows() == 0
    }

    pub fn schema(&self) -> SchemaRef {
        self.batch.schema()
    }

    /// The record batch the dataset was built from
    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn column_kind(&self, name: &str) -> Option<&ColumnKind> {
        self.columns.get(name).map(|c| &c.kind)
    }

    /// Identity of the row at `index`, if the dataset has such a row
    pub fn row_id(&self, index: usize) -> Option<RowId> {
        (index < self.len()).then(|| RowId::new(index))
    }

    /// Every row identity in dataset order
    pub fn row_ids(&self) -> impl Iterator<Item = RowId> {
        (0..self.len()).map(RowId::new)
    }

    pub fn contains_row(&self, row: RowId) -> bool {
        row.index() < self.len()
    }

    /// Numeric column values as `f64`
    pub fn numeric(&self, name: &str) -> Option<&Float64Array> {
        match &self.columns.get(name)?.data {
            ColumnData::Numeric(values) => Some(values),
            _ => None,
        }
    }

    /// Temporal column values as epoch milliseconds
    pub fn temporal(&self, name: &str) -> Option<&TimestampMillisecondArray> {
        match &self.columns.get(name)?.data {
            ColumnData::Temporal(values) => Some(values),
            _ => None,
        }
    }

    /// Categorical column values as strings
    pub fn categorical(&self, name: &str) -> Option<&StringArray> {
        match &self.columns.get(name)?.data {
            ColumnData::Categorical(values) => Some(values),
            _ => None,
        }
    }

    /// Numeric reading of a numeric or temporal cell, `None` for nulls
    pub fn value_f64(&self, name: &str, row: RowId) -> Option<f64> {
        let column = self.columns.get(name)?;
        let index = row.index();
        match &column.data {
            ColumnData::Numeric(values) if index < values.len() && values.is_valid(index) => {
                Some(values.value(index))
            }
            ColumnData::Temporal(values) if index < values.len() && values.is_valid(index) => {
                Some(values.value(index) as f64)
            }
            _ => None,
        }
    }

    /// Label of a categorical cell, `None` for nulls
    pub fn label(&self, name: &str, row: RowId) -> Option<&str> {
        let values = self.categorical(name)?;
        let index = row.index();
        (index < values.len() && values.is_valid(index)).then(|| values.value(index))
    }
}

impl std::fmt::Debug for Dataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dataset")
            .field("rows", &self.len())
            .field(
                "columns",
                &self.columns.iter().map(|(name, c)| (name.as_str(), c.kind.describe())).collect::<Vec<_>>(),
            )
            .finish()
    }
}
