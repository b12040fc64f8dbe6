//! Mark styles shared by the dashboards

use xf_core::MarkStyle;

/// Highlighted histogram and bar marks
pub const SELECTED: MarkStyle = MarkStyle::new([255, 0, 0, 255], 0.5);

/// Dimmed histogram and bar marks
pub const UNSELECTED: MarkStyle = MarkStyle::new([128, 128, 128, 255], 0.3);

/// Highlighted map markers; the color scale comes from the `color_by` column
pub const MAP_SELECTED: MarkStyle = MarkStyle::new([255, 0, 0, 255], 1.0);

/// Dimmed map markers
pub const MAP_UNSELECTED: MarkStyle = MarkStyle::new([128, 128, 128, 255], 0.5);
