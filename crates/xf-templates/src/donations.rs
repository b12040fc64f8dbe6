//! Donation submissions dashboard
//!
//! Status and region bars, amount and date histograms, and a classification
//! chart whose bars are reported back by marker color.

use xf_data::{ColumnSpec, ColumnType, DatasetConfig};
use xf_views::{CategoryBarView, CategoryColorMap, HistogramView};

use crate::{RequiredColumns, Template, TemplateError};

pub const STATUS: &str = "status";
pub const REGION: &str = "region";
pub const AMOUNT: &str = "amount";
pub const DATE: &str = "date";
pub const CLASSIFICATION: &str = "classification";

const CLASSIFICATION_COLORS: &[(&str, &str)] = &[
    ("individual", "#1f77b4"),
    ("corporate", "#ff7f0e"),
    ("foundation", "#2ca02c"),
    ("government", "#d62728"),
    ("other", "#9467bd"),
];

pub fn dataset_config() -> DatasetConfig {
    DatasetConfig::new(vec![
        ColumnSpec::new("date", ColumnType::Timestamp { utc: true }),
        ColumnSpec::new("status", ColumnType::Text),
        ColumnSpec::new("region", ColumnType::Text),
        ColumnSpec::new("amount", ColumnType::Float),
        ColumnSpec::new("classification", ColumnType::Text),
    ])
}

pub fn classification_colors() -> Result<CategoryColorMap, TemplateError> {
    Ok(CategoryColorMap::parse(CLASSIFICATION_COLORS.iter().copied())?)
}

pub fn template() -> Result<Template, TemplateError> {
    let dataset = dataset_config();
    Ok(Template {
        id: "donations".into(),
        name: "Donation submissions".into(),
        description: "Submission status, origin, size and classification of donations".into(),
        matcher: Box::new(RequiredColumns::of(&dataset)),
        dataset,
        views: vec![
            CategoryBarView::new(STATUS, "Status", "status").shared(),
            CategoryBarView::new(REGION, "Region", "region").shared(),
            HistogramView::new(AMOUNT, "Amount", "amount", 50).shared(),
            HistogramView::new(DATE, "Submission date", "date", 100).shared(),
            CategoryBarView::new(CLASSIFICATION, "Classification", "classification")
                .with_colors(classification_colors()?)
                .width_fraction(1.0)
                .shared(),
        ],
    })
}
