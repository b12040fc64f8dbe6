//! Geographic point map brushed with a lasso

use std::sync::Arc;
use xf_core::{ChartKind, Dataset, DragMode, Predicate, PredicateError, SelectionEvent, ViewConfig, ViewDescriptor, ViewId};

use crate::style;

/// Points placed by latitude/longitude. A lasso selects the enclosed rows by
/// identity.
#[derive(Debug, Clone)]
pub struct PointMapView {
    id: ViewId,
    config: ViewConfig,
}

impl PointMapView {
    pub fn new(id: impl Into<String>, title: impl Into<String>, latitude: &str, longitude: &str) -> Self {
        Self {
            id: ViewId::new(id),
            config: ViewConfig {
                title: title.into(),
                chart: ChartKind::PointMap {
                    latitude: latitude.to_string(),
                    longitude: longitude.to_string(),
                    color_by: None,
                    zoom: 1.0,
                },
                selected: style::MAP_SELECTED,
                unselected: style::MAP_UNSELECTED,
                drag_mode: DragMode::Lasso,
                width_fraction: 1.0,
            },
        }
    }

    /// Color highlighted markers by a numeric column
    pub fn color_by(mut self, column: &str) -> Self {
        if let ChartKind::PointMap { color_by, .. } = &mut self.config.chart {
            *color_by = Some(column.to_string());
        }
        self
    }

    pub fn zoom(mut self, level: f32) -> Self {
        if let ChartKind::PointMap { zoom, .. } = &mut self.config.chart {
            *zoom = level;
        }
        self
    }

    pub fn width_fraction(mut self, fraction: f32) -> Self {
        self.config.width_fraction = fraction;
        self
    }

    pub fn shared(self) -> Arc<dyn ViewDescriptor> {
        Arc::new(self)
    }
}

impl ViewDescriptor for PointMapView {
    fn id(&self) -> &ViewId {
        &self.id
    }

    fn config(&self) -> &ViewConfig {
        &self.config
    }

    fn predicate_from_event(&self, dataset: &Dataset, event: Option<&SelectionEvent>) -> Result<Predicate, PredicateError> {
        let Some(event) = event else {
            return Ok(Predicate::Empty);
        };

        let unresolved = event.points.iter().filter(|p| p.row_id.is_none()).count();
        if unresolved > 0 {
            tracing::warn!("{}: {} lasso points carry no row identity and were ignored", self.id, unresolved);
        }

        Predicate::row_index_set(dataset, event.points.iter().filter_map(|p| p.row_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::quakes;
    use xf_core::SelectedPoint;

    fn view() -> PointMapView {
        PointMapView::new("map", "Map", "latitude", "longitude").color_by("mag").zoom(0.1)
    }

    #[test]
    fn test_builder_sets_chart() {
        let view = view();
        assert_eq!(view.config().drag_mode, DragMode::Lasso);
        assert_eq!(
            view.config().chart,
            ChartKind::PointMap {
                latitude: "latitude".into(),
                longitude: "longitude".into(),
                color_by: Some("mag".into()),
                zoom: 0.1,
            }
        );
    }

    #[test]
    fn test_lasso_selects_row_identities() {
        let dataset = quakes();
        let rows: Vec<_> = [3, 1].iter().filter_map(|i| dataset.row_id(*i)).collect();
        let mut points: Vec<_> = rows.iter().map(|r| SelectedPoint::row(*r)).collect();
        points.push(SelectedPoint::at_x(12.0));

        let predicate = view()
            .predicate_from_event(&dataset, Some(&SelectionEvent::from_points(points)))
            .unwrap();
        assert_eq!(predicate, Predicate::RowIndexSet { indices: rows.into_iter().collect() });
    }

    #[test]
    fn test_absent_payload_is_empty() {
        let dataset = quakes();
        assert_eq!(view().predicate_from_event(&dataset, None).unwrap(), Predicate::Empty);
    }

    #[test]
    fn test_foreign_row_identity_rejected() {
        let dataset = quakes();
        let event = SelectionEvent::from_json(r#"{"points": [{"customdata": 99}]}"#).unwrap();
        let err = view().predicate_from_event(&dataset, event.as_ref()).unwrap_err();
        assert!(matches!(err, PredicateError::RowOutOfRange { row: 99, len: 6 }));
    }
}
