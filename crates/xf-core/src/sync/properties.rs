//! Randomized checks of the partition and ambient filter rules

use super::*;
use crate::dataset::{RowId, RowSet};
use crate::predicate::Scalar;
use arrow::array::{ArrayRef, Float64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use proptest::prelude::*;
use std::collections::BTreeSet;

fn dataset(values: &[Option<f64>]) -> Arc<Dataset> {
    let schema = Arc::new(Schema::new(vec![Field::new("value", DataType::Float64, true)]));
    let columns: Vec<ArrayRef> = vec![Arc::new(Float64Array::from(values.to_vec()))];
    Arc::new(Dataset::new(RecordBatch::try_new(schema, columns).unwrap()).unwrap())
}

fn predicate(len: usize) -> impl Strategy<Value = Predicate> {
    prop_oneof![
        Just(Predicate::Empty),
        proptest::collection::vec(any::<bool>(), len).prop_map(|mask| Predicate::RowIndexSet {
            indices: mask.iter().enumerate().filter(|(_, keep)| **keep).map(|(i, _)| RowId::new(i)).collect(),
        }),
        (-10.0..10.0f64, -10.0..10.0f64).prop_map(|(a, b)| Predicate::RangeOnColumn {
            column: "value".into(),
            lower: Scalar::Number(a.min(b)),
            upper: Scalar::Number(a.max(b)),
        }),
    ]
}

/// Dataset values, one predicate per view, and a replacement predicate
fn scenario() -> impl Strategy<Value = (Vec<Option<f64>>, Vec<Predicate>, Predicate)> {
    (0usize..40).prop_flat_map(|len| {
        (
            proptest::collection::vec(proptest::option::weighted(0.9, -10.0..10.0f64), len),
            proptest::collection::vec(predicate(len), 2..=4),
            predicate(len),
        )
    })
}

fn snapshot(dataset: &Arc<Dataset>, predicates: &[Predicate]) -> EngineSnapshot {
    let predicates = predicates
        .iter()
        .enumerate()
        .map(|(i, predicate)| (ViewId::new(format!("view-{}", i)), predicate.clone()))
        .collect();
    EngineSnapshot::new(dataset.clone(), predicates)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        rng_seed: proptest::test_runner::RngSeed::Fixed(0),
        failure_persistence: None,
        .. ProptestConfig::default()
    })]

    #[test]
    fn partitions_are_complete_and_repeatable((values, predicates, _) in scenario()) {
        let dataset = dataset(&values);
        let snapshot = snapshot(&dataset, &predicates);

        for i in 0..predicates.len() {
            let view = ViewId::new(format!("view-{}", i));
            let partition = snapshot.partition(&view);
            prop_assert!(partition.is_complete(dataset.len()));
            prop_assert_eq!(&partition, &snapshot.partition(&view));
        }
    }

    #[test]
    fn ambient_filter_is_union_of_other_views((values, predicates, _) in scenario()) {
        let dataset = dataset(&values);
        let snapshot = snapshot(&dataset, &predicates);

        for i in 0..predicates.len() {
            let others: Vec<&Predicate> = predicates
                .iter()
                .enumerate()
                .filter(|(j, predicate)| *j != i && !predicate.is_empty())
                .map(|(_, predicate)| predicate)
                .collect();
            let filter = snapshot.ambient_filter(&ViewId::new(format!("view-{}", i)));

            if others.is_empty() {
                prop_assert_eq!(filter, AmbientFilter::NoneActive);
            } else {
                let expected: BTreeSet<usize> = others
                    .iter()
                    .flat_map(|predicate| predicate.evaluate(&dataset).iter().map(RowId::index).collect::<Vec<_>>())
                    .collect();
                let AmbientFilter::Active(rows) = filter else {
                    return Err(TestCaseError::fail("expected an active filter"));
                };
                prop_assert_eq!(rows.iter().map(RowId::index).collect::<BTreeSet<_>>(), expected);
            }
        }
    }

    #[test]
    fn own_predicate_does_not_move_own_filter((values, predicates, replacement) in scenario()) {
        let dataset = dataset(&values);
        let before = snapshot(&dataset, &predicates);

        for i in 0..predicates.len() {
            let mut changed = predicates.clone();
            changed[i] = replacement.clone();
            let view = ViewId::new(format!("view-{}", i));
            prop_assert_eq!(before.ambient_filter(&view), snapshot(&dataset, &changed).ambient_filter(&view));
        }
    }
}

#[test]
fn test_empty_dataset_partition() {
    let dataset = dataset(&[]);
    let snapshot = snapshot(&dataset, &[Predicate::Empty, Predicate::RowIndexSet { indices: BTreeSet::new() }]);
    let partition = snapshot.partition(&ViewId::new("view-0"));
    assert_eq!(partition.selected, RowSet::new());
    assert!(partition.is_complete(0));
}
