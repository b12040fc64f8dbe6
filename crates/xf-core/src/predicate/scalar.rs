//! Range bounds and their normalization against a column kind

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::dataset::ColumnKind;
use crate::error::PredicateError;
use crate::selection::AxisValue;
use crate::timestamp::{parse_timestamp, ParsedTimestamp};

/// A comparable bound of a range predicate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Scalar {
    Number(f64),
    /// Timezone-aware instant, normalized to UTC
    Instant(DateTime<Utc>),
    /// Wall-clock timestamp without a timezone
    NaiveInstant(NaiveDateTime),
}

impl Scalar {
    /// Key used for comparisons against normalized column values
    /// (plain value for numbers, epoch milliseconds for timestamps).
    pub(crate) fn key(&self) -> f64 {
        match self {
            Scalar::Number(n) => *n,
            Scalar::Instant(t) => t.timestamp_millis() as f64,
            Scalar::NaiveInstant(t) => t.and_utc().timestamp_millis() as f64,
        }
    }

    fn zone(&self) -> &'static str {
        match self {
            Scalar::Number(_) => "numeric",
            Scalar::Instant(_) => "timezone-aware",
            Scalar::NaiveInstant(_) => "naive",
        }
    }

    /// Rebuild a scalar of the same variant from a comparison key
    pub(crate) fn with_key(&self, key: f64) -> Scalar {
        match self {
            Scalar::Number(_) => Scalar::Number(key),
            Scalar::Instant(t) => DateTime::from_timestamp_millis(key as i64).map(Scalar::Instant).unwrap_or(Scalar::Instant(*t)),
            Scalar::NaiveInstant(t) => DateTime::from_timestamp_millis(key as i64)
                .map(|dt| Scalar::NaiveInstant(dt.naive_utc()))
                .unwrap_or(Scalar::NaiveInstant(*t)),
        }
    }

    /// Read an axis value as a bound for `column`
    pub fn parse(column: &str, kind: &ColumnKind, value: &AxisValue) -> Result<Scalar, PredicateError> {
        let scalar = match (kind, value) {
            (ColumnKind::Numeric, AxisValue::Number(n)) => Scalar::Number(finite(column, *n)?),
            (ColumnKind::Numeric, AxisValue::Text(text)) => {
                let n = text.trim().parse::<f64>().map_err(|_| PredicateError::InvalidValue {
                    column: column.to_string(),
                    value: text.clone(),
                    expected: "a number",
                })?;
                Scalar::Number(finite(column, n)?)
            }
            // Epoch milliseconds already use the column's own encoding
            (ColumnKind::Temporal { timezone }, AxisValue::Number(n)) => {
                let millis = finite(column, *n)? as i64;
                let instant = DateTime::from_timestamp_millis(millis).ok_or_else(|| PredicateError::InvalidValue {
                    column: column.to_string(),
                    value: n.to_string(),
                    expected: "epoch milliseconds",
                })?;
                if timezone.is_some() {
                    Scalar::Instant(instant)
                } else {
                    Scalar::NaiveInstant(instant.naive_utc())
                }
            }
            (ColumnKind::Temporal { .. }, AxisValue::Text(text)) => {
                timestamp_scalar(text).ok_or_else(|| PredicateError::InvalidValue {
                    column: column.to_string(),
                    value: text.clone(),
                    expected: "a timestamp",
                })?
            }
            (other, _) => return Err(PredicateError::wrong_kind(column, other.describe(), "range")),
        };

        scalar.check_compatible(column, kind)?;
        Ok(scalar)
    }

    /// Ensure this bound can be compared with values of `kind`
    pub fn check_compatible(&self, column: &str, kind: &ColumnKind) -> Result<(), PredicateError> {
        match (kind, self) {
            (ColumnKind::Numeric, Scalar::Number(_)) => Ok(()),
            (ColumnKind::Temporal { timezone: Some(_) }, Scalar::Instant(_)) => Ok(()),
            (ColumnKind::Temporal { timezone: None }, Scalar::NaiveInstant(_)) => Ok(()),
            (ColumnKind::Temporal { timezone }, Scalar::Instant(_) | Scalar::NaiveInstant(_)) => {
                Err(PredicateError::TimezoneMismatch {
                    column: column.to_string(),
                    column_zone: if timezone.is_some() { "timezone-aware" } else { "naive" },
                    value_zone: self.zone(),
                })
            }
            (kind, _) => Err(PredicateError::SchemaMismatch {
                column: column.to_string(),
                reason: format!("{} bound cannot be compared with a {} column", self.zone(), kind.describe()),
            }),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Number(n) => write!(f, "{}", n),
            Scalar::Instant(t) => write!(f, "{}", t.to_rfc3339()),
            Scalar::NaiveInstant(t) => write!(f, "{}", t),
        }
    }
}

fn timestamp_scalar(text: &str) -> Option<Scalar> {
    parse_timestamp(text).map(|parsed| match parsed {
        ParsedTimestamp::Aware(t) => Scalar::Instant(t.with_timezone(&Utc)),
        ParsedTimestamp::Naive(t) => Scalar::NaiveInstant(t),
    })
}

/// Range bounds must be finite
fn finite(column: &str, n: f64) -> Result<f64, PredicateError> {
    if n.is_finite() {
        Ok(n)
    } else {
        Err(PredicateError::InvalidValue {
            column: column.to_string(),
            value: n.to_string(),
            expected: "a finite number",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aware() -> ColumnKind {
        ColumnKind::Temporal { timezone: Some("UTC".into()) }
    }

    #[test]
    fn test_offsets_normalize_to_utc() {
        let a = Scalar::parse("time", &aware(), &"2023-05-01T12:00:00+02:00".into()).unwrap();
        let b = Scalar::parse("time", &aware(), &"2023-05-01 10:00:00+00:00".into()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_naive_value_against_aware_column() {
        let err = Scalar::parse("time", &aware(), &"2023-05-01 10:00:00".into()).unwrap_err();
        assert!(matches!(err, PredicateError::TimezoneMismatch { .. }));
    }

    #[test]
    fn test_aware_value_against_naive_column() {
        let naive = ColumnKind::Temporal { timezone: None };
        let err = Scalar::parse("time", &naive, &"2023-05-01T10:00:00Z".into()).unwrap_err();
        assert!(matches!(err, PredicateError::TimezoneMismatch { .. }));
        assert!(Scalar::parse("time", &naive, &"2023-05-01".into()).is_ok());
    }

    #[test]
    fn test_numeric_text_and_garbage() {
        assert_eq!(
            Scalar::parse("mag", &ColumnKind::Numeric, &" 2.5".into()).unwrap(),
            Scalar::Number(2.5)
        );
        assert!(matches!(
            Scalar::parse("mag", &ColumnKind::Numeric, &"big".into()),
            Err(PredicateError::InvalidValue { .. })
        ));
        assert!(matches!(
            Scalar::parse("region", &ColumnKind::Categorical, &1.0.into()),
            Err(PredicateError::SchemaMismatch { .. })
        ));
    }

    #[test]
    fn test_non_finite_bounds_rejected() {
        for value in [AxisValue::Text("NaN".into()), AxisValue::Text("inf".into()), AxisValue::Number(f64::NAN)] {
            assert!(matches!(
                Scalar::parse("mag", &ColumnKind::Numeric, &value),
                Err(PredicateError::InvalidValue { expected: "a finite number", .. })
            ));
        }
        assert!(matches!(
            Scalar::parse("time", &aware(), &AxisValue::Number(f64::INFINITY)),
            Err(PredicateError::InvalidValue { .. })
        ));
    }
}
