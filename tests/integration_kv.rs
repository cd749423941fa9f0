// =====================================================================
// File: integration_kv.rs
//
//! End-to-end scenarios exercising the B-tree and finger-tree engines
//! together, as a user of the public API would: build a tree through a
//! sequence of persistent operations, then check the final state.
// =====================================================================
use cowtree::{BTreeMap, FingerTree, Side};

#[test]
fn s1_btree_order_three_overwrite_and_absent_key() {
    let t = BTreeMap::new(3);
    let (t, _) = t.insert(1, 1).unwrap();
    let (t, _) = t.insert(2, 2).unwrap();
    let (t, _) = t.insert(3, 3).unwrap();
    let (t, prev) = t.insert(2, 42).unwrap();
    let (t, _) = t.insert(4, 1).unwrap();

    assert_eq!(prev, Some(2));
    assert_eq!(t.size().unwrap(), 4);
    assert_eq!(t.get(&2).unwrap(), Some(&42));
    assert_eq!(t.get(&1).unwrap(), Some(&1));
    assert_eq!(t.get(&3).unwrap(), Some(&3));
    assert_eq!(t.get(&4).unwrap(), Some(&1));
    assert_eq!(t.get(&5).unwrap(), None);
}

#[test]
fn s2_btree_order_thirty_two_sequential_insert() {
    let mut t = BTreeMap::new(32);
    for k in 0..1000i64 {
        let (next, _) = t.insert(k, k).unwrap();
        t = next;
    }
    assert_eq!(t.get(&500).unwrap(), Some(&500));
    assert_eq!(t.size().unwrap(), 1000);

    let (t, prev) = t.insert(500, -1).unwrap();
    assert_eq!(prev, Some(500));
    assert_eq!(t.size().unwrap(), 1000);
    assert_eq!(t.get(&500).unwrap(), Some(&-1));
}

#[test]
fn s3_finger_tree_push_right_then_pop_both_ends() {
    let mut t = FingerTree::empty();
    for k in 0..50i64 {
        t = t.push(Side::Right, k, k).unwrap();
    }
    assert_eq!(t.size().unwrap(), 50);

    let (t, popped) = t.pop(Side::Left).unwrap();
    assert_eq!(popped, Some((0, 0)));

    let (t, popped) = t.pop(Side::Right).unwrap();
    assert_eq!(popped, Some((49, 49)));

    assert_eq!(t.get(&25).unwrap(), Some(&25));
    assert_eq!(t.get(&100).unwrap(), None);
}

#[test]
fn s4_finger_tree_split_then_concat() {
    let mut t = FingerTree::empty();
    for k in 0..100i64 {
        t = t.push(Side::Right, k, k).unwrap();
    }

    let (left, hit, right) = t.split(&50).unwrap();
    assert_eq!(hit, Some(50));
    assert_eq!(
        left.to_vec().unwrap(),
        (0..=49).map(|k| (k, k)).collect::<Vec<_>>()
    );
    assert_eq!(
        right.to_vec().unwrap(),
        (51..=99).map(|k| (k, k)).collect::<Vec<_>>()
    );

    let joined = FingerTree::concat(&left, &right).unwrap();
    let expected: Vec<(i64, i64)> = (0..=49).chain(51..=99).map(|k| (k, k)).collect();
    assert_eq!(joined.to_vec().unwrap(), expected);
}

#[test]
fn s5_finger_tree_concat_disjoint_ranges() {
    let mut a = FingerTree::empty();
    for k in 0..10i64 {
        a = a.push(Side::Right, k, k).unwrap();
    }
    let mut b = FingerTree::empty();
    for k in 10..20i64 {
        b = b.push(Side::Right, k, k).unwrap();
    }

    let joined = FingerTree::concat(&a, &b).unwrap();
    let expected: Vec<(i64, i64)> = (0..20).map(|k| (k, k)).collect();
    assert_eq!(joined.to_vec().unwrap(), expected);
    assert_eq!(joined.size().unwrap(), 20);
    assert_eq!(joined.get(&15).unwrap(), Some(&15));
}

#[test]
fn s6_snapshot_isolation_across_finger_tree_insert() {
    let mut t = FingerTree::empty();
    for k in 0..10i64 {
        t = t.push(Side::Right, k, k).unwrap();
    }
    let s = t.clone();

    let (t, _) = t.insert(5, 99).unwrap();

    assert_eq!(s.get(&5).unwrap(), Some(&5));
    assert_eq!(t.get(&5).unwrap(), Some(&99));
}

#[test]
fn s6_snapshot_isolation_across_btree_insert() {
    let mut t = BTreeMap::new(4);
    for k in 0..10i64 {
        let (next, _) = t.insert(k, k).unwrap();
        t = next;
    }
    let s = t.clone();

    let (t, _) = t.insert(5, 99).unwrap();

    assert_eq!(s.get(&5).unwrap(), Some(&5));
    assert_eq!(t.get(&5).unwrap(), Some(&99));
}
