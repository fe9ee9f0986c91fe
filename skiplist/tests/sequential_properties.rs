//! Property tests for the sequential tier, checked against a
//! `std::collections::BTreeSet`/`BTreeMap` oracle.
//!
//! These correspond to the sequential invariants enumerated in the design
//! document's testable-properties section: contents match a sorted-set
//! oracle under arbitrary operation sequences, `insert` reports novelty
//! correctly across an intervening `remove`, iteration is strictly
//! ascending, and `remove` reports presence exactly once per insertion.

use std::collections::{BTreeMap, BTreeSet};

use proptest::collection::vec;
use proptest::prelude::*;

use skiplist::{SequentialSkipMap, SequentialSkipSet};

#[derive(Debug, Clone)]
enum SetOp {
    Insert(i32),
    Remove(i32),
}

fn set_op_strategy() -> impl Strategy<Value = SetOp> {
    prop_oneof![
        (0..200i32).prop_map(SetOp::Insert),
        (0..200i32).prop_map(SetOp::Remove),
    ]
}

proptest! {
    #[test]
    fn contents_match_btreeset_oracle(ops in vec(set_op_strategy(), 0..500)) {
        let mut set = SequentialSkipSet::new();
        let mut oracle: BTreeSet<i32> = BTreeSet::new();

        for op in ops {
            match op {
                SetOp::Insert(v) => {
                    let inserted = set.insert(v);
                    prop_assert_eq!(inserted, oracle.insert(v));
                }
                SetOp::Remove(v) => {
                    let removed = set.remove(&v);
                    prop_assert_eq!(removed, oracle.remove(&v));
                }
            }
        }

        let actual: Vec<i32> = set.iter().copied().collect();
        let expected: Vec<i32> = oracle.into_iter().collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn iteration_is_strictly_ascending(values in vec(0..1000i32, 0..300)) {
        let mut set = SequentialSkipSet::new();
        for v in values {
            set.insert(v);
        }
        let items: Vec<i32> = set.iter().copied().collect();
        for pair in items.windows(2) {
            prop_assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn insert_true_only_on_first_occurrence_since_last_erase(value in 0..50i32, repeats in 1..20usize) {
        let mut set = SequentialSkipSet::new();
        let mut present = false;
        for i in 0..repeats {
            if i % 3 == 2 {
                let removed = set.remove(&value);
                prop_assert_eq!(removed, present);
                present = false;
            } else {
                let inserted = set.insert(value);
                prop_assert_eq!(inserted, !present);
                present = true;
            }
        }
    }

    #[test]
    fn map_find_reflects_last_insert(entries in vec((0..100i32, 0..1000i32), 0..200)) {
        let mut map = SequentialSkipMap::new();
        let mut oracle: BTreeMap<i32, i32> = BTreeMap::new();

        for (k, v) in entries {
            map.insert(k, v);
            oracle.insert(k, v);
        }

        for (k, v) in &oracle {
            prop_assert_eq!(map.get(k), Some(v));
        }
        prop_assert_eq!(map.len(), oracle.len());
    }
}

#[test]
fn erase_of_non_member_returns_false_member_returns_true_once() {
    let mut set = SequentialSkipSet::new();
    assert!(!set.remove(&42));
    assert!(set.insert(42));
    assert!(set.remove(&42));
    assert!(!set.remove(&42));
}
