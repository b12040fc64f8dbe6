//! Error types for predicate construction and the engine

use thiserror::Error;

use crate::view::ViewId;

/// Failures detected while turning a selection into a [`crate::Predicate`]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PredicateError {
    #[error("column '{column}' holds {column_zone} timestamps but the selection reported {value_zone} values")]
    TimezoneMismatch {
        column: String,
        column_zone: &'static str,
        value_zone: &'static str,
    },

    #[error("encoding '{encoding}' is not mapped to any category of column '{column}'")]
    UnknownCategoryEncoding { column: String, encoding: String },

    #[error("schema mismatch on column '{column}': {reason}")]
    SchemaMismatch { column: String, reason: String },

    #[error("range on column '{column}' requested from zero points")]
    EmptyBoundsRequested { column: String },

    #[error("row {row} is outside the dataset ({len} rows)")]
    RowOutOfRange { row: usize, len: usize },

    #[error("value '{value}' on column '{column}' cannot be read as {expected}")]
    InvalidValue {
        column: String,
        value: String,
        expected: &'static str,
    },
}

impl PredicateError {
    pub(crate) fn missing_column(column: &str) -> Self {
        PredicateError::SchemaMismatch {
            column: column.to_string(),
            reason: "column is not part of the dataset".to_string(),
        }
    }

    pub(crate) fn wrong_kind(column: &str, found: &str, wanted: &str) -> Self {
        PredicateError::SchemaMismatch {
            column: column.to_string(),
            reason: format!("{} column cannot be used for a {} selection", found, wanted),
        }
    }

    /// Errors that degrade to an empty predicate instead of failing the gesture
    pub fn is_recoverable(&self) -> bool {
        matches!(self, PredicateError::EmptyBoundsRequested { .. })
    }
}

/// Errors returned by [`crate::CrossFilterEngine`]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("view '{0}' is not registered")]
    UnknownView(ViewId),

    #[error("view '{0}' is already registered")]
    DuplicateView(ViewId),

    #[error("view '{view}' cannot be registered: {source}")]
    InvalidView {
        view: ViewId,
        #[source]
        source: PredicateError,
    },

    #[error("selection on view '{view}' rejected: {source}")]
    Predicate {
        view: ViewId,
        #[source]
        source: PredicateError,
    },
}
