use std::ops::Range;

use proptest::prelude::*;

use crate::model;

use super::*;

// Calls `f` with every permutation of `0..n` (Heap's algorithm).
fn for_each_permutation(n: u32, mut f: impl FnMut(&[u32])) {
    fn heap(k: usize, keys: &mut [u32], f: &mut impl FnMut(&[u32])) {
        if k <= 1 {
            f(keys);
            return;
        }

        heap(k - 1, keys, f);
        for i in 0..k - 1 {
            if k % 2 == 0 {
                keys.swap(i, k - 1);
            } else {
                keys.swap(0, k - 1);
            }
            heap(k - 1, keys, f);
        }
    }

    let mut keys = (0..n).collect::<Vec<_>>();
    heap(keys.len(), &mut keys, &mut f);
}

fn insert_find_all(keys: &[u32]) {
    let mut tree: AvlTree<u32, u32> = AvlTree::new();

    for &key in keys {
        tree.insert(key, key * 10);
        tree.assert_invariants();
    }

    for key in keys {
        let node = tree.find(key).expect("item not found");
        assert_eq!(node.key_value(), (key, &(key * 10)));
    }
}

#[test]
fn zero_elems_find() {
    insert_find_all(&[]);
}

#[test]
fn single_elem_find() {
    insert_find_all(&[0]);
}

#[test]
fn three_elems_find() {
    insert_find_all(&[0, 1, 2]);
    insert_find_all(&[0, 2, 1]);
    insert_find_all(&[1, 0, 2]);
    insert_find_all(&[1, 2, 0]);
    insert_find_all(&[2, 0, 1]);
    insert_find_all(&[2, 1, 0]);
}

#[test]
fn all_orders_find() {
    for n in 0..=6 {
        for_each_permutation(n, insert_find_all);
    }
}

fn insert_remove_all(keys: &[u32]) {
    let mut tree: AvlTree<u32, ()> = AvlTree::new();

    for &key in keys {
        tree.insert(key, ());
        tree.assert_invariants();
    }

    for key in keys {
        assert_eq!(tree.remove(key), Some(()));
        tree.assert_invariants();
    }
    assert!(tree.is_empty());

    for &key in keys {
        tree.insert(key, ());
        tree.assert_invariants();
    }

    for key in keys.iter().rev() {
        assert_eq!(tree.remove(key), Some(()));
        tree.assert_invariants();
    }
    assert!(tree.is_empty());
}

#[test]
fn remove_one() {
    insert_remove_all(&[0]);
}

#[test]
fn remove_two() {
    insert_remove_all(&[0, 1]);
    insert_remove_all(&[1, 0]);
}

#[test]
fn all_orders_remove() {
    for n in 0..=6 {
        for_each_permutation(n, insert_remove_all);
    }
}

#[test]
fn every_order_gives_same_keys_to_plain_tree() {
    for_each_permutation(5, |keys| {
        let tree: SearchTree<u32, ()> = keys.iter().map(|&k| (k, ())).collect();
        tree.assert_invariants();
        assert!(tree.keys().copied().eq(0..5));
    });
}

#[test]
fn ascending_avl_inserts_give_root_four() {
    let tree: AvlTree<u32, ()> = (1..=7).map(|k| (k, ())).collect();

    assert_eq!(tree.root().map(|n| *n.key()), Some(4));
    assert_eq!(tree.height(), 3);
    assert!(tree.is_balanced());
    tree.assert_invariants();
}

#[test]
fn avl_remove_leaves_exact_keys() {
    let mut tree: AvlTree<u32, ()> = [10, 20, 30, 40, 50, 25]
        .into_iter()
        .map(|k| (k, ()))
        .collect();

    tree.remove(&40);

    assert_eq!(tree.keys().copied().collect::<Vec<_>>(), [10, 20, 25, 30, 50]);
    assert!(tree.is_balanced());
    tree.assert_invariants();
}

#[test]
fn ascending_plain_inserts_are_unbalanced() {
    let tree: SearchTree<u32, ()> = (1..=5).map(|k| (k, ())).collect();

    assert!(!tree.is_balanced());
    assert_eq!(tree.height(), 5);
}

#[test]
fn empty_trees_are_inert() {
    let mut plain: SearchTree<u32, ()> = SearchTree::new();
    let mut avl: AvlTree<u32, ()> = AvlTree::new();

    assert_eq!(plain.remove(&1), None);
    assert_eq!(avl.remove(&1), None);
    assert!(plain.find(&1).is_none());
    assert!(avl.find(&1).is_none());
    assert!(plain.is_balanced());
    assert!(avl.is_balanced());

    plain.clear();
    avl.clear();
    assert!(plain.is_empty());
    assert!(avl.is_empty());
    assert_eq!(plain.height(), 0);
    assert_eq!(avl.height(), 0);
}

#[test]
fn transform_plain_chain_into_avl_shape() {
    let avl: AvlTree<u32, ()> = (0..31).map(|k| (k, ())).collect();
    let mut chain: SearchTree<u32, ()> = (0..31).rev().map(|k| (k, ())).collect();

    assert_eq!(chain.height(), 31);
    avl.as_search_tree().transform(&mut chain).unwrap();

    chain.assert_invariants();
    assert_eq!(model::shape(&chain), model::shape(avl.as_search_tree()));
    assert_eq!(chain.height(), 5);
    assert!(chain.is_balanced());
}

#[cfg(miri)]
const FUZZ_RANGE: Range<usize> = 0..10;

#[cfg(not(miri))]
const FUZZ_RANGE: Range<usize> = 0..1000;

proptest::proptest! {
    #![proptest_config(ProptestConfig {
        max_shrink_iters: 65536,
        .. ProptestConfig::default()
    })]

    #[test]
    fn btree_equivalence(ops in proptest::collection::vec(model::op_strategy(), FUZZ_RANGE)) {
        model::run_btree_equivalence(ops);
    }

    #[test]
    fn transform_equivalence(input in model::transform_input_strategy()) {
        model::run_transform_equivalence(input);
    }

    #[test]
    fn cursor_equivalence(
        values in proptest::collection::vec(0u32..500, 0..100),
        ops in proptest::collection::vec(model::cursor_op_strategy(), 0..500),
    ) {
        model::run_cursor_equivalence(values, ops);
    }

    #[test]
    fn upsert_keeps_shape(
        keys in proptest::collection::vec(0u32..200, 1..100),
        pick in any::<prop::sample::Index>(),
    ) {
        let mut tree: AvlTree<u32, u32> = keys.iter().map(|&k| (k, 0)).collect();
        let before = model::shape(tree.as_search_tree());

        let key = keys[pick.index(keys.len())];
        prop_assert_eq!(tree.insert(key, 1), Some(0));

        prop_assert_eq!(before, model::shape(tree.as_search_tree()));
        prop_assert_eq!(tree.get(&key), Some(&1));
    }

    #[test]
    fn remove_undoes_insert(
        keys in proptest::collection::vec(0u32..200, 0..100),
        extra in 200u32..400,
    ) {
        let mut tree: AvlTree<u32, ()> = keys.iter().map(|&k| (k, ())).collect();
        let before = tree.keys().copied().collect::<Vec<_>>();

        tree.insert(extra, ());
        tree.assert_invariants();
        prop_assert_eq!(tree.remove(&extra), Some(()));
        tree.assert_invariants();

        prop_assert_eq!(before, tree.keys().copied().collect::<Vec<_>>());
    }
}
