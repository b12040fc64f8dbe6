//! Row identities and ordered row sets

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identity of a dataset row.
///
/// Identities are minted by [`crate::Dataset`] when it is constructed and stay
/// valid for the dataset's entire lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(usize);

impl RowId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Position of the row in the dataset
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sorted, duplicate-free set of row identities
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowSet {
    rows: Vec<RowId>,
}

impl RowSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Every row of a dataset with `len` rows
    pub fn all(len: usize) -> Self {
        Self {
            rows: (0..len).map(RowId::new).collect(),
        }
    }

    /// Build from rows already in ascending order without duplicates
    pub(crate) fn from_sorted(rows: Vec<RowId>) -> Self {
        debug_assert!(rows.windows(2).all(|w| w[0] < w[1]));
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn contains(&self, row: RowId) -> bool {
        self.rows.binary_search(&row).is_ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = RowId> + '_ {
        self.rows.iter().copied()
    }

    pub fn as_slice(&self) -> &[RowId] {
        &self.rows
    }

    /// Set union of two row sets
    pub fn union(&self, other: &RowSet) -> RowSet {
        Self::from_sorted(self.rows.iter().merge(other.rows.iter()).dedup().copied().collect())
    }

    /// Set union of any number of row sets in one merge pass
    pub fn union_all<I>(sets: I) -> RowSet
    where
        I: IntoIterator<Item = RowSet>,
    {
        let rows = sets
            .into_iter()
            .map(|set| set.rows.into_iter())
            .kmerge()
            .dedup()
            .collect();
        Self::from_sorted(rows)
    }

    /// Rows of a dataset with `len` rows that are not in this set
    pub fn complement(&self, len: usize) -> RowSet {
        let mut members = self.rows.iter().peekable();
        let mut rows = Vec::with_capacity(len.saturating_sub(self.rows.len()));
        for index in 0..len {
            let row = RowId::new(index);
            if members.peek() == Some(&&row) {
                members.next();
            } else {
                rows.push(row);
            }
        }
        Self::from_sorted(rows)
    }

    pub fn is_disjoint(&self, other: &RowSet) -> bool {
        let (small, large) = if self.len() <= other.len() { (self, other) } else { (other, self) };
        small.iter().all(|row| !large.contains(row))
    }
}

impl FromIterator<RowId> for RowSet {
    fn from_iter<T: IntoIterator<Item = RowId>>(iter: T) -> Self {
        let mut rows: Vec<RowId> = iter.into_iter().collect();
        rows.sort_unstable();
        rows.dedup();
        Self { rows }
    }
}

impl<'a> IntoIterator for &'a RowSet {
    type Item = &'a RowId;
    type IntoIter = std::slice::Iter<'a, RowId>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
