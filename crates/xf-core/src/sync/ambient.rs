//! Ambient filters and dataset partitions

use serde::Serialize;

use crate::dataset::{Dataset, RowSet};
use crate::predicate::Predicate;

/// Combined selection of every view other than the one being drawn
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AmbientFilter {
    /// No other view holds a selection; the whole dataset is highlighted
    NoneActive,
    /// Union of the rows selected by the other views, possibly empty
    Active(RowSet),
}

impl AmbientFilter {
    /// Union of `predicates`, ignoring [`Predicate::Empty`] ones.
    ///
    /// Only when every predicate is empty does the result fall back to
    /// [`AmbientFilter::NoneActive`]; an explicit selection that matches no
    /// rows still yields `Active` with an empty set.
    pub fn combine<'a, I>(dataset: &Dataset, predicates: I) -> Self
    where
        I: IntoIterator<Item = &'a Predicate>,
    {
        let mut sets = predicates
            .into_iter()
            .filter(|predicate| !predicate.is_empty())
            .map(|predicate| predicate.evaluate(dataset))
            .peekable();

        if sets.peek().is_none() {
            return AmbientFilter::NoneActive;
        }
        AmbientFilter::Active(RowSet::union_all(sets))
    }

    pub fn is_none_active(&self) -> bool {
        matches!(self, AmbientFilter::NoneActive)
    }
}

/// Split of the dataset into highlighted and dimmed rows
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Partition {
    pub selected: RowSet,
    pub unselected: RowSet,
}

impl Partition {
    pub fn compute(dataset: &Dataset, filter: &AmbientFilter) -> Self {
        match filter {
            AmbientFilter::NoneActive => Partition {
                selected: RowSet::all(dataset.len()),
                unselected: RowSet::new(),
            },
            AmbientFilter::Active(rows) => Partition {
                unselected: rows.complement(dataset.len()),
                selected: rows.clone(),
            },
        }
    }

    /// Whether the two halves cover `len` rows exactly once
    pub fn is_complete(&self, len: usize) -> bool {
        self.selected.len() + self.unselected.len() == len
            && self.selected.is_disjoint(&self.unselected)
            && self.selected.iter().chain(self.unselected.iter()).all(|row| row.index() < len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::test_support::quakes;
    use crate::dataset::RowId;
    use crate::predicate::Scalar;

    fn rows_of(dataset: &Dataset, indices: &[usize]) -> Predicate {
        Predicate::RowIndexSet {
            indices: indices.iter().filter_map(|i| dataset.row_id(*i)).collect(),
        }
    }

    #[test]
    fn test_all_empty_is_none_active() {
        let dataset = quakes();
        let filter = AmbientFilter::combine(&dataset, &[Predicate::Empty, Predicate::Empty]);
        assert!(filter.is_none_active());

        let partition = Partition::compute(&dataset, &filter);
        assert_eq!(partition.selected, RowSet::all(5));
        assert!(partition.unselected.is_empty());
    }

    #[test]
    fn test_union_of_other_views() {
        let dataset = quakes();
        let filter = AmbientFilter::combine(&dataset, &[rows_of(&dataset, &[1, 3]), rows_of(&dataset, &[3, 4])]);
        let AmbientFilter::Active(rows) = &filter else {
            panic!("expected an active filter");
        };
        assert_eq!(rows.iter().map(RowId::index).collect::<Vec<_>>(), vec![1, 3, 4]);

        let partition = Partition::compute(&dataset, &filter);
        assert!(partition.is_complete(dataset.len()));
        assert_eq!(partition.unselected.iter().map(RowId::index).collect::<Vec<_>>(), vec![0, 2]);
    }

    #[test]
    fn test_explicit_empty_selection_highlights_nothing() {
        let dataset = quakes();
        let filter = AmbientFilter::combine(&dataset, &[Predicate::Empty, rows_of(&dataset, &[])]);
        assert_eq!(filter, AmbientFilter::Active(RowSet::new()));

        let partition = Partition::compute(&dataset, &filter);
        assert!(partition.selected.is_empty());
        assert_eq!(partition.unselected, RowSet::all(5));
    }

    #[test]
    fn test_range_and_empty_scenario() {
        let dataset = quakes();
        let magnitude = Predicate::RangeOnColumn {
            column: "mag".into(),
            lower: Scalar::Number(2.0),
            upper: Scalar::Number(4.0),
        };
        let filter = AmbientFilter::combine(&dataset, [&magnitude, &Predicate::Empty]);
        let partition = Partition::compute(&dataset, &filter);

        assert_eq!(partition.selected.iter().map(RowId::index).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(partition.unselected.iter().map(RowId::index).collect::<Vec<_>>(), vec![0, 4]);
    }
}
