//! Earthquake dashboard: map, magnitude histogram and date histogram
//!
//! Each chart is driven by the other two: the map highlights quakes inside
//! the magnitude and date brushes, each histogram highlights the quakes
//! lassoed on the map or brushed on the other histogram.

use xf_data::{ColumnSpec, ColumnType, DatasetConfig};
use xf_views::{HistogramView, PointMapView};

use crate::{RequiredColumns, Template};

pub const MAP: &str = "map";
pub const MAGNITUDE: &str = "magnitude";
pub const DATE: &str = "date";

/// Rows kept from the source feed
pub const DEFAULT_MAX_ROWS: usize = 1000;

const BINS: usize = 100;

/// Keep earthquakes only, read `time` as UTC and project the charted columns
pub fn dataset_config(max_rows: Option<usize>) -> DatasetConfig {
    let config = DatasetConfig::new(vec![
        ColumnSpec::new("time", ColumnType::Timestamp { utc: true }),
        ColumnSpec::new("latitude", ColumnType::Float),
        ColumnSpec::new("longitude", ColumnType::Float),
        ColumnSpec::new("mag", ColumnType::Float),
    ])
    .with_filter("type", "earthquake");

    match max_rows {
        Some(max) => config.with_max_rows(max),
        None => config,
    }
}

pub fn template() -> Template {
    let dataset = dataset_config(Some(DEFAULT_MAX_ROWS));
    Template {
        id: "earthquake".into(),
        name: "Earthquakes".into(),
        description: "Locations, magnitudes and dates of recent earthquakes".into(),
        matcher: Box::new(RequiredColumns::of(&dataset)),
        dataset,
        views: vec![
            PointMapView::new(MAP, "Earthquake locations", "latitude", "longitude")
                .color_by("mag")
                .zoom(0.1)
                .width_fraction(1.0)
                .shared(),
            HistogramView::new(MAGNITUDE, "Magnitude", "mag", BINS).width_fraction(0.5).shared(),
            HistogramView::new(DATE, "Date", "time", BINS).width_fraction(0.5).shared(),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use xf_core::{DragMode, SelectedPoint, SelectionEvent, ViewId};
    use xf_data::CsvLoader;
    use xf_render::{FigureRenderer, Trace, SELECTED, UNSELECTED};

    const FEED: &str = "\
time,latitude,longitude,depth,mag,magType,type
2023-06-01T00:00:00.000Z,38.1,-122.5,5.0,1.0,md,earthquake
2023-06-02T00:00:00.000Z,61.2,-150.1,10.0,2.0,ml,earthquake
2023-06-02T12:00:00.000Z,44.0,-110.0,1.0,2.4,ml,explosion
2023-06-03T00:00:00.000Z,19.4,-155.3,1.2,3.0,ml,earthquake
2023-06-04T00:00:00.000Z,35.0,-117.9,7.7,4.0,ml,earthquake
2023-06-05T00:00:00.000Z,36.5,-120.2,3.3,5.0,mw,earthquake
";

    fn load() -> Arc<xf_core::Dataset> {
        let dataset = CsvLoader::new(dataset_config(None)).load_reader(FEED.as_bytes()).unwrap();
        Arc::new(dataset)
    }

    fn indices(trace: Option<&Trace>) -> Vec<usize> {
        match trace {
            Some(Trace::Points { rows, .. }) => rows.iter().map(|r| r.index()).collect(),
            other => panic!("expected point trace, got {:?}", other),
        }
    }

    #[test]
    fn test_layout_matches_dashboard() {
        let template = template();
        let views = template.views();
        assert_eq!(views[0].config().drag_mode, DragMode::Lasso);
        assert_eq!(views[0].config().width_fraction, 1.0);
        assert_eq!(views[1].config().drag_mode, DragMode::Select);
        assert_eq!(views[1].config().selected.opacity, 0.5);
        assert_eq!(views[2].config().unselected.opacity, 0.3);
        assert_eq!(template.dataset.max_rows, Some(DEFAULT_MAX_ROWS));
    }

    #[test]
    fn test_magnitude_brush_highlights_map() {
        let dataset = load();
        assert_eq!(dataset.len(), 5);

        let mut engine = template().build_engine(dataset).unwrap();
        let renderer = FigureRenderer::new();
        let brush = SelectionEvent::from_points(vec![
            SelectedPoint::at_x(2.0),
            SelectedPoint::at_x(3.0),
            SelectedPoint::at_x(4.0),
        ]);
        let pass = engine.handle_selection(&ViewId::new(MAGNITUDE), Some(&brush), &renderer).unwrap();

        let rendered: Vec<_> = pass.rendered_views().map(ViewId::as_str).collect();
        assert_eq!(rendered, vec![MAP, DATE]);

        let map = pass.figure(&ViewId::new(MAP)).unwrap();
        assert_eq!(indices(map.trace(SELECTED)), vec![1, 2, 3]);
        assert_eq!(indices(map.trace(UNSELECTED)), vec![0, 4]);
    }

    #[test]
    fn test_map_and_date_brushes_union_on_magnitude() {
        let mut engine = template().build_engine(load()).unwrap();
        let renderer = FigureRenderer::new();

        let lasso = SelectionEvent::from_json(r#"{"points": [{"customdata": 0}]}"#).unwrap();
        engine.handle_selection(&ViewId::new(MAP), lasso.as_ref(), &renderer).unwrap();

        let dates = SelectionEvent::from_json(
            r#"{"points": [{"x": "2023-06-04T00:00:00Z"}, {"x": "2023-06-05T00:00:00Z"}]}"#,
        )
        .unwrap();
        let pass = engine.handle_selection(&ViewId::new(DATE), dates.as_ref(), &renderer).unwrap();

        let magnitude = pass.figure(&ViewId::new(MAGNITUDE)).unwrap();
        assert_eq!(magnitude.trace(SELECTED).unwrap().row_count(), 3);
        assert_eq!(magnitude.trace(UNSELECTED).unwrap().row_count(), 2);
    }
}
