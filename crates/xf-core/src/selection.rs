//! Raw selection events as reported by the rendering layer
//!
//! The payload mirrors what browser charting front-ends hand back for a
//! brush: a list of points (with axis values, the row identity of the point
//! when known, its category label or marker color) and, for drag selections,
//! the true axis range. An absent payload means "no selection in this view".

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::dataset::RowId;

/// Value read off a chart axis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AxisValue {
    Number(f64),
    Text(String),
}

impl fmt::Display for AxisValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AxisValue::Number(n) => write!(f, "{}", n),
            AxisValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for AxisValue {
    fn from(value: f64) -> Self {
        AxisValue::Number(value)
    }
}

impl From<&str> for AxisValue {
    fn from(value: &str) -> Self {
        AxisValue::Text(value.to_string())
    }
}

/// One point reported inside a selection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedPoint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<AxisValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<AxisValue>,

    /// Row identity resolved by the rendering layer
    #[serde(default, alias = "customdata", skip_serializing_if = "Option::is_none")]
    pub row_id: Option<RowId>,

    /// Category label of a bar or region
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Marker color, for charts that report encodings instead of labels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl SelectedPoint {
    pub fn at_x(x: impl Into<AxisValue>) -> Self {
        Self { x: Some(x.into()), ..Default::default() }
    }

    pub fn row(row_id: RowId) -> Self {
        Self { row_id: Some(row_id), ..Default::default() }
    }

    pub fn labelled(label: impl Into<String>) -> Self {
        Self { label: Some(label.into()), ..Default::default() }
    }

    pub fn colored(color: impl Into<String>) -> Self {
        Self { color: Some(color.into()), ..Default::default() }
    }
}

/// Axis extent of a drag selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionRange {
    pub x: [AxisValue; 2],
}

/// A selection gesture reported by one view
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionEvent {
    #[serde(default)]
    pub points: Vec<SelectedPoint>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<SelectionRange>,
}

impl SelectionEvent {
    pub fn from_points(points: Vec<SelectedPoint>) -> Self {
        Self { points, range: None }
    }

    /// Parse a payload; `null` means no active selection
    pub fn from_json(payload: &str) -> serde_json::Result<Option<Self>> {
        serde_json::from_str(payload)
    }

    /// X values of all points that report one
    pub fn x_values(&self) -> impl Iterator<Item = &AxisValue> {
        self.points.iter().filter_map(|p| p.x.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_histogram_payload() {
        let event = SelectionEvent::from_json(
            r#"{"points": [{"x": 2.5, "curveNumber": 0}, {"x": "2023-05-01 10:00"}], "range": {"x": [2.0, 3.0]}}"#,
        )
        .unwrap()
        .unwrap();

        assert_eq!(event.points.len(), 2);
        assert_eq!(event.points[0].x, Some(AxisValue::Number(2.5)));
        assert_eq!(event.points[1].x, Some(AxisValue::Text("2023-05-01 10:00".into())));
        assert_eq!(event.range.unwrap().x[1], AxisValue::Number(3.0));
    }

    #[test]
    fn test_parse_lasso_payload_with_row_ids() {
        let event = SelectionEvent::from_json(r#"{"points": [{"rowId": 3}, {"customdata": 7, "lat": 1.0}]}"#)
            .unwrap()
            .unwrap();
        let rows: Vec<_> = event.points.iter().filter_map(|p| p.row_id).map(RowId::index).collect();
        assert_eq!(rows, vec![3, 7]);
    }

    #[test]
    fn test_null_payload_is_no_selection() {
        assert_eq!(SelectionEvent::from_json("null").unwrap(), None);
    }
}
