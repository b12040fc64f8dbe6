//! Rendering layer
//!
//! Turns a view's selected/unselected partition into a backend-agnostic
//! [`Figure`] that a drawing frontend can display.

pub mod binning;
pub mod figure;

pub use binning::BinLayout;
pub use figure::{Bin, CategoryCount, Figure, Trace};

use std::collections::BTreeMap;
use xf_core::{ChartKind, Dataset, MarkStyle, Partition, RenderAdapter, RowSet, Rgba, ViewConfig, ViewId};

/// Name of the trace holding the highlighted rows
pub const SELECTED: &str = "selected";
/// Name of the trace holding the dimmed rows
pub const UNSELECTED: &str = "unselected";

/// Builds [`Figure`]s from partitions
#[derive(Debug, Clone, Default)]
pub struct FigureRenderer;

impl FigureRenderer {
    pub fn new() -> Self {
        Self
    }

    fn points(
        dataset: &Dataset,
        name: &str,
        rows: &RowSet,
        latitude: &str,
        longitude: &str,
        color_by: Option<&str>,
        style: MarkStyle,
    ) -> Trace {
        let mut ids = Vec::with_capacity(rows.len());
        let mut lats = Vec::with_capacity(rows.len());
        let mut lons = Vec::with_capacity(rows.len());
        let mut colors = color_by.map(|_| Vec::with_capacity(rows.len()));

        for row in rows.iter() {
            let (Some(lat), Some(lon)) = (dataset.value_f64(latitude, row), dataset.value_f64(longitude, row)) else {
                continue;
            };
            ids.push(row);
            lats.push(lat);
            lons.push(lon);
            if let (Some(colors), Some(column)) = (colors.as_mut(), color_by) {
                colors.push(dataset.value_f64(column, row));
            }
        }

        let skipped = rows.len() - ids.len();
        if skipped > 0 {
            tracing::debug!("{} rows without coordinates left off the {} trace", skipped, name);
        }

        Trace::Points {
            name: name.to_string(),
            rows: ids,
            latitude: lats,
            longitude: lons,
            color_values: colors,
            style,
        }
    }

    fn histogram(dataset: &Dataset, column: &str, bins: usize, partition: &Partition, config: &ViewConfig) -> Vec<Trace> {
        let layout = BinLayout::for_column(dataset, column, bins);
        let count = |rows: &RowSet| layout.map(|l| l.count(dataset, column, rows)).unwrap_or_default();

        vec![
            Trace::Bars { name: UNSELECTED.to_string(), bins: count(&partition.unselected), style: config.unselected },
            Trace::Bars { name: SELECTED.to_string(), bins: count(&partition.selected), style: config.selected },
        ]
    }

    fn categories(
        dataset: &Dataset,
        column: &str,
        palette: &BTreeMap<String, Rgba>,
        partition: &Partition,
        config: &ViewConfig,
    ) -> Vec<Trace> {
        // Palette categories first, in palette order, then any unlisted labels
        let mut order: Vec<String> = palette.keys().cloned().collect();
        for label in dataset.row_ids().filter_map(|row| dataset.label(column, row)) {
            if !palette.contains_key(label) && !order.iter().any(|c| c == label) {
                order.push(label.to_string());
            }
        }

        let tally = |rows: &RowSet, color: &dyn Fn(&str) -> Rgba| {
            let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
            for label in rows.iter().filter_map(|row| dataset.label(column, row)) {
                *counts.entry(label).or_default() += 1;
            }
            order
                .iter()
                .map(|category| CategoryCount {
                    category: category.clone(),
                    count: counts.get(category.as_str()).copied().unwrap_or(0),
                    color: color(category),
                })
                .collect::<Vec<_>>()
        };

        let selected_color = |category: &str| palette.get(category).copied().unwrap_or(config.selected.color);
        let unselected_color = |_: &str| config.unselected.color;

        vec![
            Trace::Categories {
                name: UNSELECTED.to_string(),
                categories: tally(&partition.unselected, &unselected_color),
                opacity: config.unselected.opacity,
            },
            Trace::Categories {
                name: SELECTED.to_string(),
                categories: tally(&partition.selected, &selected_color),
                opacity: config.selected.opacity,
            },
        ]
    }
}

impl RenderAdapter for FigureRenderer {
    type Figure = Figure;

    fn render(&self, view_id: &ViewId, dataset: &Dataset, partition: &Partition, config: &ViewConfig) -> Figure {
        let traces = match &config.chart {
            ChartKind::PointMap { latitude, longitude, color_by, .. } => vec![
                Self::points(dataset, UNSELECTED, &partition.unselected, latitude, longitude, None, config.unselected),
                Self::points(
                    dataset,
                    SELECTED,
                    &partition.selected,
                    latitude,
                    longitude,
                    color_by.as_deref(),
                    config.selected,
                ),
            ],
            ChartKind::Histogram { column, bins } => Self::histogram(dataset, column, *bins, partition, config),
            ChartKind::CategoryBar { column, palette } => Self::categories(dataset, column, palette, partition, config),
        };

        tracing::trace!(
            "Rendered {} ({} selected, {} unselected)",
            view_id,
            partition.selected.len(),
            partition.unselected.len()
        );

        Figure {
            view_id: view_id.to_string(),
            title: config.title.clone(),
            drag_mode: config.drag_mode,
            traces,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Arc;
    use arrow::array::{ArrayRef, Float64Array, StringArray};
    use arrow::datatypes::{DataType, Field, Schema};
    use arrow::record_batch::RecordBatch;
    use xf_core::{AmbientFilter, DragMode, Predicate, Scalar};

    const RED: MarkStyle = MarkStyle::new([255, 0, 0, 255], 0.5);
    const GRAY: MarkStyle = MarkStyle::new([128, 128, 128, 255], 0.3);

    pub(crate) fn quakes() -> Dataset {
        let schema = Arc::new(Schema::new(vec![
            Field::new("latitude", DataType::Float64, true),
            Field::new("longitude", DataType::Float64, false),
            Field::new("mag", DataType::Float64, true),
            Field::new("constant", DataType::Float64, false),
            Field::new("region", DataType::Utf8, true),
        ]));
        let columns: Vec<ArrayRef> = vec![
            Arc::new(Float64Array::from(vec![Some(10.0), Some(20.0), None, Some(40.0), Some(50.0)])),
            Arc::new(Float64Array::from(vec![-120.0, -110.0, -100.0, -90.0, -80.0])),
            Arc::new(Float64Array::from(vec![Some(1.0), Some(2.0), Some(3.0), None, Some(5.0)])),
            Arc::new(Float64Array::from(vec![7.0; 5])),
            Arc::new(StringArray::from(vec![Some("north"), Some("south"), None, Some("north"), Some("east")])),
        ];
        Dataset::new(RecordBatch::try_new(schema, columns).unwrap()).unwrap()
    }

    fn config(chart: ChartKind) -> ViewConfig {
        ViewConfig {
            title: "test".into(),
            chart,
            selected: RED,
            unselected: GRAY,
            drag_mode: DragMode::Select,
            width_fraction: 0.5,
        }
    }

    fn magnitude_partition(dataset: &Dataset) -> Partition {
        let brush = Predicate::RangeOnColumn {
            column: "mag".into(),
            lower: Scalar::Number(2.0),
            upper: Scalar::Number(5.0),
        };
        Partition::compute(dataset, &AmbientFilter::combine(dataset, [&brush]))
    }

    #[test]
    fn test_point_map_traces() {
        let dataset = quakes();
        let partition = magnitude_partition(&dataset);
        let chart = ChartKind::PointMap {
            latitude: "latitude".into(),
            longitude: "longitude".into(),
            color_by: Some("mag".into()),
            zoom: 0.1,
        };
        let figure = FigureRenderer::new().render(&"map".into(), &dataset, &partition, &config(chart));

        let Some(Trace::Points { rows, color_values, style, .. }) = figure.trace(SELECTED) else {
            panic!("missing selected trace");
        };
        // row 2 has no latitude
        assert_eq!(rows.iter().map(|r| r.index()).collect::<Vec<_>>(), vec![1, 4]);
        assert_eq!(color_values.as_deref(), Some(&[Some(2.0), Some(5.0)][..]));
        assert_eq!(*style, RED);

        let Some(Trace::Points { rows, color_values, .. }) = figure.trace(UNSELECTED) else {
            panic!("missing unselected trace");
        };
        assert_eq!(rows.iter().map(|r| r.index()).collect::<Vec<_>>(), vec![0, 3]);
        assert!(color_values.is_none());
    }

    #[test]
    fn test_histogram_halves_share_bins() {
        let dataset = quakes();
        let partition = magnitude_partition(&dataset);
        let chart = ChartKind::Histogram { column: "mag".into(), bins: 4 };
        let figure = FigureRenderer::new().render(&"mag".into(), &dataset, &partition, &config(chart));

        let selected = figure.trace(SELECTED).unwrap();
        let unselected = figure.trace(UNSELECTED).unwrap();
        assert_eq!(selected.row_count(), 3);
        assert_eq!(unselected.row_count(), 1);

        let (Trace::Bars { bins: a, .. }, Trace::Bars { bins: b, .. }) = (selected, unselected) else {
            panic!("expected bar traces");
        };
        assert!(a.iter().zip(b).all(|(x, y)| x.start == y.start && x.end == y.end));
    }

    #[test]
    fn test_category_bars_use_palette() {
        let dataset = quakes();
        let partition = magnitude_partition(&dataset);
        let palette = BTreeMap::from([("north".to_string(), [0, 0, 255, 255]), ("south".to_string(), [0, 255, 0, 255])]);
        let chart = ChartKind::CategoryBar { column: "region".into(), palette };
        let figure = FigureRenderer::new().render(&"region".into(), &dataset, &partition, &config(chart));

        let Some(Trace::Categories { categories, opacity, .. }) = figure.trace(SELECTED) else {
            panic!("missing selected trace");
        };
        assert_eq!(*opacity, 0.5);
        let names: Vec<_> = categories.iter().map(|c| c.category.as_str()).collect();
        assert_eq!(names, vec!["north", "south", "east"]);
        assert_eq!(categories[1].count, 1);
        assert_eq!(categories[1].color, [0, 255, 0, 255]);
        assert_eq!(categories[2].color, RED.color);

        let json = figure.to_json().unwrap();
        assert!(json.contains("\"type\":\"categories\""));
    }
}
