//! Selection predicates: what one view's brush says about the rows

mod build;
mod scalar;

pub use build::BoundsPolicy;
pub use scalar::Scalar;

use arrow::array::Array;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::dataset::{ColumnKind, Dataset, RowId, RowSet};
use crate::error::PredicateError;

/// Serializable description of which rows a view currently selects.
///
/// A predicate depends only on the dataset and the gesture it was built from,
/// never on another view's state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Predicate {
    /// No selection made in the view
    #[default]
    Empty,

    /// Inclusive interval on a numeric or temporal column
    RangeOnColumn {
        column: String,
        lower: Scalar,
        upper: Scalar,
    },

    /// Inclusive membership on a categorical column
    CategorySet {
        column: String,
        values: BTreeSet<String>,
    },

    /// Explicit row identities resolved by the rendering layer
    RowIndexSet { indices: BTreeSet<RowId> },
}

impl Predicate {
    /// Whether this is the "no selection" sentinel.
    ///
    /// An empty `CategorySet` or `RowIndexSet` is a selection of nothing and
    /// is not considered empty here.
    pub fn is_empty(&self) -> bool {
        matches!(self, Predicate::Empty)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Predicate::Empty => "empty",
            Predicate::RangeOnColumn { .. } => "range_on_column",
            Predicate::CategorySet { .. } => "category_set",
            Predicate::RowIndexSet { .. } => "row_index_set",
        }
    }

    /// Column the predicate scans, if any
    pub fn column(&self) -> Option<&str> {
        match self {
            Predicate::RangeOnColumn { column, .. } | Predicate::CategorySet { column, .. } => Some(column),
            Predicate::Empty | Predicate::RowIndexSet { .. } => None,
        }
    }

    /// Check that the predicate can be evaluated against `dataset`
    pub fn validate(&self, dataset: &Dataset) -> Result<(), PredicateError> {
        match self {
            Predicate::Empty => Ok(()),
            Predicate::RangeOnColumn { column, lower, upper } => {
                let kind = dataset.column_kind(column).ok_or_else(|| PredicateError::missing_column(column))?;
                lower.check_compatible(column, kind)?;
                upper.check_compatible(column, kind)
            }
            Predicate::CategorySet { column, .. } => {
                match dataset.column_kind(column).ok_or_else(|| PredicateError::missing_column(column))? {
                    ColumnKind::Categorical => Ok(()),
                    other => Err(PredicateError::wrong_kind(column, other.describe(), "category")),
                }
            }
            Predicate::RowIndexSet { indices } => match indices.iter().find(|row| !dataset.contains_row(**row)) {
                Some(row) => Err(PredicateError::RowOutOfRange { row: row.index(), len: dataset.len() }),
                None => Ok(()),
            },
        }
    }

    /// Rows of `dataset` matched by this predicate.
    ///
    /// One linear scan for column predicates. Total over any input: parts of
    /// a predicate that do not fit the dataset simply match nothing, which is
    /// why the engine validates predicates before storing them.
    pub fn evaluate(&self, dataset: &Dataset) -> RowSet {
        match self {
            Predicate::Empty => RowSet::new(),
            Predicate::RangeOnColumn { column, lower, upper } => {
                let (lo, hi) = (lower.key(), upper.key());
                if let Some(values) = dataset.numeric(column) {
                    scan(values.len(), |i| values.is_valid(i) && (lo..=hi).contains(&values.value(i)))
                } else if let Some(values) = dataset.temporal(column) {
                    scan(values.len(), |i| values.is_valid(i) && (lo..=hi).contains(&(values.value(i) as f64)))
                } else {
                    RowSet::new()
                }
            }
            Predicate::CategorySet { column, values: wanted } => match dataset.categorical(column) {
                Some(values) => scan(values.len(), |i| values.is_valid(i) && wanted.contains(values.value(i))),
                None => RowSet::new(),
            },
            Predicate::RowIndexSet { indices } => {
                RowSet::from_sorted(indices.iter().copied().filter(|row| dataset.contains_row(*row)).collect())
            }
        }
    }
}

fn scan(len: usize, mut matches: impl FnMut(usize) -> bool) -> RowSet {
    RowSet::from_sorted((0..len).filter(|&i| matches(i)).map(RowId::new).collect())
}
