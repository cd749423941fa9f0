// =====================================================================
// File: btree/tests.rs
//
//! Unit and property tests for the persistent B-tree.
// =====================================================================

#[cfg(test)]
mod construction_tests {
    use crate::btree::BTreeMap;

    #[test]
    fn new_tree_is_empty() {
        let t: BTreeMap<&str, &str> = BTreeMap::new(3);
        assert_eq!(t.size().unwrap(), 0);
        assert_eq!(t.get(&"dog").unwrap(), None);
    }

    #[test]
    #[should_panic(expected = "order must be >= 3")]
    fn order_below_three_panics() {
        let _: BTreeMap<&str, &str> = BTreeMap::new(2);
    }

    #[test]
    fn uninitialised_handle_reports_error() {
        let t: BTreeMap<&str, &str> = BTreeMap::default();
        assert!(matches!(t.size(), Err(crate::error::Error::UninitializedHandle)));
    }
}

#[cfg(test)]
mod insertion_tests {
    use crate::btree::BTreeMap;

    #[test]
    fn insert_and_get_basic() {
        let t = BTreeMap::new(3);
        let (t, prev) = t.insert("dog", "bark").unwrap();
        assert_eq!(prev, None);
        let (t, prev) = t.insert("cat", "meow").unwrap();
        assert_eq!(prev, None);

        assert_eq!(t.get(&"dog").unwrap(), Some(&"bark"));
        assert_eq!(t.get(&"cat").unwrap(), Some(&"meow"));
        assert_eq!(t.get(&"bird").unwrap(), None);
    }

    #[test]
    fn insert_overwrites_value_and_keeps_size() {
        let (t, _) = BTreeMap::new(3).insert("dog", "bark").unwrap();
        let (t, prev) = t.insert("dog", "woof").unwrap();
        assert_eq!(prev, Some("bark"));
        assert_eq!(t.get(&"dog").unwrap(), Some(&"woof"));
        assert_eq!(t.size().unwrap(), 1);
    }

    #[test]
    fn original_tree_unchanged_after_insert() {
        let (t0, _) = BTreeMap::new(3).insert("a", "1").unwrap();
        let (t1, _) = t0.insert("b", "2").unwrap();

        assert_eq!(t0.size().unwrap(), 1);
        assert_eq!(t0.get(&"b").unwrap(), None);
        assert_eq!(t1.size().unwrap(), 2);
        assert_eq!(t1.get(&"b").unwrap(), Some(&"2"));
    }

    #[test]
    fn insert_causes_leaf_split() {
        let mut t = BTreeMap::new(3);
        for (k, v) in [("a", "1"), ("b", "2"), ("c", "3"), ("d", "4")] {
            let (next, _) = t.insert(k, v).unwrap();
            t = next;
        }
        assert_eq!(t.get(&"a").unwrap(), Some(&"1"));
        assert_eq!(t.get(&"d").unwrap(), Some(&"4"));
        assert_eq!(t.size().unwrap(), 4);
    }

    #[test]
    fn many_keys_stay_reachable_after_repeated_splits() {
        let mut t = BTreeMap::new(3);
        for i in 0..200 {
            let (next, _) = t.insert(format!("k{:04}", i), i).unwrap();
            t = next;
        }
        for i in 0..200 {
            assert_eq!(t.get(&format!("k{:04}", i)).unwrap(), Some(&i));
        }
        assert_eq!(t.get(&"missing".to_string()).unwrap(), None);
        assert_eq!(t.size().unwrap(), 200);
    }

    #[test]
    fn from_pairs_keeps_last_duplicate() {
        let t = BTreeMap::from_pairs(
            4,
            [("a", 1), ("b", 2), ("a", 3)],
        )
        .unwrap();
        assert_eq!(t.get(&"a").unwrap(), Some(&3));
        assert_eq!(t.size().unwrap(), 2);
    }

    #[test]
    fn to_vec_is_sorted() {
        let t = BTreeMap::from_pairs(
            3,
            [("dog", 1), ("cat", 2), ("apple", 3), ("zebra", 4)],
        )
        .unwrap();
        let pairs = t.to_vec().unwrap();
        let keys: Vec<_> = pairs.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec!["apple", "cat", "dog", "zebra"]);
    }
}

#[cfg(test)]
mod property_tests {
    use crate::btree::BTreeMap;
    use proptest::prelude::*;
    use std::collections::BTreeMap as StdMap;

    proptest! {
        /// The size recorded at the root always equals the number of
        /// distinct keys actually inserted.
        #[test]
        fn size_matches_distinct_key_count(
            pairs in proptest::collection::vec((0i64..500, 0i64..1000), 0..200),
        ) {
            let mut tree = BTreeMap::new(4);
            let mut model: StdMap<i64, i64> = StdMap::new();
            for (k, v) in pairs {
                let (next, _) = tree.insert(k, v).unwrap();
                tree = next;
                model.insert(k, v);
            }
            prop_assert_eq!(tree.size().unwrap(), model.len());
        }

        /// Every key inserted is retrievable, and its value matches the
        /// last write; a model built from the same sequence must agree on
        /// every key it knows about.
        #[test]
        fn lookup_agrees_with_model(
            pairs in proptest::collection::vec((0i64..500, 0i64..1000), 0..200),
        ) {
            let mut tree = BTreeMap::new(4);
            let mut model: StdMap<i64, i64> = StdMap::new();
            for (k, v) in pairs {
                let (next, _) = tree.insert(k, v).unwrap();
                tree = next;
                model.insert(k, v);
            }
            for (k, v) in &model {
                prop_assert_eq!(tree.get(k).unwrap(), Some(v));
            }
        }

        /// In-order traversal always yields a strictly ascending key
        /// sequence, regardless of insertion order.
        #[test]
        fn traversal_is_strictly_ascending(
            pairs in proptest::collection::vec((0i64..500, 0i64..10), 0..200),
        ) {
            let mut tree = BTreeMap::new(5);
            for (k, v) in pairs {
                let (next, _) = tree.insert(k, v).unwrap();
                tree = next;
            }
            let pairs = tree.to_vec().unwrap();
            prop_assert!(pairs.windows(2).all(|w| w[0].0 < w[1].0));
        }

        /// Inserting the same pair twice is idempotent: size and value
        /// are unaffected by the repeat.
        #[test]
        fn repeated_insert_is_idempotent(k in 0i64..500, v in 0i64..1000) {
            let tree = BTreeMap::new(3);
            let (tree, _) = tree.insert(k, v).unwrap();
            let size_before = tree.size().unwrap();
            let (tree, prev) = tree.insert(k, v).unwrap();
            prop_assert_eq!(prev, Some(v));
            prop_assert_eq!(tree.size().unwrap(), size_before);
        }

        /// Deriving a new tree from a snapshot never mutates the
        /// snapshot: its size and contents are frozen at the point of
        /// the call.
        #[test]
        fn snapshot_is_isolated_from_later_inserts(
            base in proptest::collection::vec((0i64..200, 0i64..200), 0..50),
            extra in proptest::collection::vec((200i64..400, 0i64..200), 0..50),
        ) {
            let mut tree = BTreeMap::new(4);
            for (k, v) in base {
                let (next, _) = tree.insert(k, v).unwrap();
                tree = next;
            }
            let snapshot = tree.clone();
            let snapshot_size = snapshot.size().unwrap();
            for (k, v) in extra {
                let (next, _) = tree.insert(k, v).unwrap();
                tree = next;
            }
            prop_assert_eq!(snapshot.size().unwrap(), snapshot_size);
        }

        /// Every `Deep` node's cached separator matches its child's own
        /// measure, every cached size matches the sum of its children's
        /// sizes, and every non-root leaf/`Deep` stays within its order
        /// bounds, across orders and insertion sequences.
        #[test]
        fn structural_invariants_hold_after_arbitrary_inserts(
            order in 3usize..12,
            pairs in proptest::collection::vec((0i64..300, 0i64..1000), 0..150),
        ) {
            let mut tree = BTreeMap::new(order);
            for (k, v) in pairs {
                let (next, _) = tree.insert(k, v).unwrap();
                tree = next;
            }
            tree.check_invariants();
        }

        /// Inserting the same pair twice leaves every observable query
        /// unchanged: size, full traversal, and lookups on every key all
        /// agree with the single-insert tree.
        #[test]
        fn repeated_insert_is_observably_idempotent(
            pairs in proptest::collection::vec((0i64..200, 0i64..1000), 1..100),
        ) {
            let mut once = BTreeMap::new(4);
            for &(k, v) in &pairs {
                let (next, _) = once.insert(k, v).unwrap();
                once = next;
            }
            let mut twice = once.clone();
            for &(k, v) in &pairs {
                let (next, _) = twice.insert(k, v).unwrap();
                twice = next;
            }
            prop_assert_eq!(once.size().unwrap(), twice.size().unwrap());
            prop_assert_eq!(once.to_vec().unwrap(), twice.to_vec().unwrap());
        }
    }
}
