//! Bar chart over a categorical column

use std::collections::BTreeSet;
use std::sync::Arc;
use xf_core::{
    AxisValue, ChartKind, Dataset, DragMode, MarkStyle, Predicate, PredicateError, SelectedPoint, SelectionEvent, ViewConfig,
    ViewDescriptor, ViewId,
};

use crate::color::CategoryColorMap;
use crate::style;

/// One bar per category; clicking or box-selecting bars selects their categories.
///
/// Front-ends report a bar either by its label, by its x value, or only by
/// its marker color. Colors resolve through the configured
/// [`CategoryColorMap`]; without one, a color-only point is an error.
#[derive(Debug, Clone)]
pub struct CategoryBarView {
    id: ViewId,
    config: ViewConfig,
    column: String,
    colors: Option<CategoryColorMap>,
}

impl CategoryBarView {
    pub fn new(id: impl Into<String>, title: impl Into<String>, column: &str) -> Self {
        Self {
            id: ViewId::new(id),
            config: ViewConfig {
                title: title.into(),
                chart: ChartKind::CategoryBar { column: column.to_string(), palette: Default::default() },
                selected: style::SELECTED,
                unselected: style::UNSELECTED,
                drag_mode: DragMode::Select,
                width_fraction: 0.5,
            },
            column: column.to_string(),
            colors: None,
        }
    }

    /// Encode categories by color; the map doubles as the bar palette
    pub fn with_colors(mut self, colors: CategoryColorMap) -> Self {
        if let ChartKind::CategoryBar { palette, .. } = &mut self.config.chart {
            *palette = colors.palette();
        }
        self.colors = Some(colors);
        self
    }

    pub fn styles(mut self, selected: MarkStyle, unselected: MarkStyle) -> Self {
        self.config.selected = selected;
        self.config.unselected = unselected;
        self
    }

    pub fn drag_mode(mut self, mode: DragMode) -> Self {
        self.config.drag_mode = mode;
        self
    }

    pub fn width_fraction(mut self, fraction: f32) -> Self {
        self.config.width_fraction = fraction;
        self
    }

    pub fn colors(&self) -> Option<&CategoryColorMap> {
        self.colors.as_ref()
    }

    pub fn shared(self) -> Arc<dyn ViewDescriptor> {
        Arc::new(self)
    }

    fn category_of<'a>(&'a self, point: &'a SelectedPoint) -> Result<Option<&'a str>, PredicateError> {
        if let Some(label) = &point.label {
            return Ok(Some(label.as_str()));
        }
        if let Some(AxisValue::Text(x)) = &point.x {
            return Ok(Some(x.as_str()));
        }
        let Some(color) = &point.color else {
            return Ok(None);
        };

        self.colors
            .as_ref()
            .and_then(|map| map.category_of(color))
            .map(Some)
            .ok_or_else(|| PredicateError::UnknownCategoryEncoding {
                column: self.column.clone(),
                encoding: color.clone(),
            })
    }
}

impl ViewDescriptor for CategoryBarView {
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

        let mut labels = BTreeSet::new();
        for point in &event.points {
            match self.category_of(point)? {
                Some(label) => {
                    labels.insert(label.to_string());
                }
                None => tracing::debug!("{}: ignoring a selected point with no category", self.id),
            }
        }

        Predicate::category_set(dataset, &self.column, labels)
    }
}
