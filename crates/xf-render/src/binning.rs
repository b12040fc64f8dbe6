//! Fixed-width binning shared by the selected and unselected halves of a histogram

use itertools::{Itertools, MinMaxResult};
use xf_core::{Dataset, RowSet};

use crate::figure::Bin;

/// Equal-width bins spanning the non-null values of one column
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinLayout {
    min: f64,
    width: f64,
    count: usize,
}

impl BinLayout {
    /// Layout over every row of `column`, so both halves of a partition share bin edges.
    ///
    /// Returns `None` when the column has no finite values.
    pub fn for_column(dataset: &Dataset, column: &str, bins: usize) -> Option<Self> {
        let values = dataset
            .row_ids()
            .filter_map(|row| dataset.value_f64(column, row))
            .filter(|v| v.is_finite());

        let (min, max) = match values.minmax_by(|a, b| a.total_cmp(b)) {
            MinMaxResult::NoElements => return None,
            MinMaxResult::OneElement(v) => (v, v),
            MinMaxResult::MinMax(min, max) => (min, max),
        };

        let count = bins.max(1);
        let width = if max > min { (max - min) / count as f64 } else { 1.0 };
        Some(Self { min, width, count })
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Bin holding `value`; the maximum lands in the last bin
    pub fn index_of(&self, value: f64) -> Option<usize> {
        if !value.is_finite() || value < self.min {
            return None;
        }
        let index = ((value - self.min) / self.width).floor() as usize;
        Some(index.min(self.count - 1))
    }

    /// Count the values of `rows` into bins
    pub fn count(&self, dataset: &Dataset, column: &str, rows: &RowSet) -> Vec<Bin> {
        let mut counts = vec![0usize; self.count];
        for value in rows.iter().filter_map(|row| dataset.value_f64(column, row)) {
            if let Some(index) = self.index_of(value) {
                counts[index] += 1;
            }
        }

        counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| {
                let start = self.min + i as f64 * self.width;
                Bin { start, end: start + self.width, count }
            })
            .collect()
    }
}
