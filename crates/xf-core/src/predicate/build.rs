//! Predicate construction from raw selection values

use itertools::{Itertools, MinMaxResult};
use serde::{Deserialize, Serialize};

use super::{Predicate, Scalar};
use crate::dataset::{ColumnKind, Dataset, RowId};
use crate::error::PredicateError;
use crate::selection::SelectionEvent;

/// How range bounds are reconstructed from a histogram selection.
///
/// Histograms often report the bars (bin centers) that were hit rather than
/// the drag extent, so a selection of whole bins can be read several ways.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum BoundsPolicy {
    /// `[min, max]` of the reported x values
    #[default]
    PointExtent,
    /// The drag range when the renderer reports one, otherwise the point extent
    DragRange,
    /// Point extent widened by `half_width` on both sides, in column units
    /// (milliseconds for temporal columns)
    PadHalfBin { half_width: f64 },
}

impl Predicate {
    /// Range predicate on `column` from a histogram selection.
    ///
    /// A selection with no usable points degrades to [`Predicate::Empty`].
    pub fn range_from_selection(
        dataset: &Dataset,
        column: &str,
        event: &SelectionEvent,
        policy: BoundsPolicy,
    ) -> Result<Predicate, PredicateError> {
        match range_bounds(dataset, column, event, policy) {
            Ok((lower, upper)) => Ok(Predicate::RangeOnColumn {
                column: column.to_string(),
                lower,
                upper,
            }),
            Err(err) if err.is_recoverable() => {
                tracing::debug!("{}, treating selection as empty", err);
                Ok(Predicate::Empty)
            }
            Err(err) => Err(err),
        }
    }

    /// Category membership predicate on `column`
    pub fn category_set<I, S>(dataset: &Dataset, column: &str, labels: I) -> Result<Predicate, PredicateError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let predicate = Predicate::CategorySet {
            column: column.to_string(),
            values: labels.into_iter().map(Into::into).collect(),
        };
        predicate.validate(dataset)?;
        Ok(predicate)
    }

    /// Explicit row selection; every identity must belong to `dataset`
    pub fn row_index_set<I>(dataset: &Dataset, rows: I) -> Result<Predicate, PredicateError>
    where
        I: IntoIterator<Item = RowId>,
    {
        let predicate = Predicate::RowIndexSet {
            indices: rows.into_iter().collect(),
        };
        predicate.validate(dataset)?;
        Ok(predicate)
    }
}

fn range_bounds(
    dataset: &Dataset,
    column: &str,
    event: &SelectionEvent,
    policy: BoundsPolicy,
) -> Result<(Scalar, Scalar), PredicateError> {
    let kind = dataset.column_kind(column).ok_or_else(|| PredicateError::missing_column(column))?;
    if !matches!(kind, ColumnKind::Numeric | ColumnKind::Temporal { .. }) {
        return Err(PredicateError::wrong_kind(column, kind.describe(), "range"));
    }

    if let BoundsPolicy::PadHalfBin { half_width } = policy {
        if !(half_width.is_finite() && half_width >= 0.0) {
            return Err(PredicateError::InvalidValue {
                column: column.to_string(),
                value: half_width.to_string(),
                expected: "a non-negative bin half-width",
            });
        }
    }

    if let (BoundsPolicy::DragRange, Some(range)) = (policy, &event.range) {
        let a = Scalar::parse(column, kind, &range.x[0])?;
        let b = Scalar::parse(column, kind, &range.x[1])?;
        return Ok(if a.key() <= b.key() { (a, b) } else { (b, a) });
    }

    let scalars = event
        .x_values()
        .map(|value| Scalar::parse(column, kind, value))
        .collect::<Result<Vec<_>, _>>()?;

    let (lower, upper) = match scalars.iter().minmax_by(|a, b| a.key().total_cmp(&b.key())) {
        MinMaxResult::NoElements => {
            return Err(PredicateError::EmptyBoundsRequested { column: column.to_string() })
        }
        MinMaxResult::OneElement(only) => (*only, *only),
        MinMaxResult::MinMax(min, max) => (*min, *max),
    };

    Ok(match policy {
        BoundsPolicy::PadHalfBin { half_width } => (
            lower.with_key(lower.key() - half_width),
            upper.with_key(upper.key() + half_width),
        ),
        BoundsPolicy::PointExtent | BoundsPolicy::DragRange => (lower, upper),
    })
}
