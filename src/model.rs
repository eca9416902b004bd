//! Reference models for property tests and fuzzing.
//!
//! Each `run_*` function replays a sequence of operations against the trees in this crate and a
//! simple reference model, and panics on the first divergence.

use std::collections::{BTreeMap, BTreeSet};

use arbitrary::{Arbitrary, Unstructured};
use proptest::strategy::{Just, Strategy};

use crate::{AvlTree, NodeRef, SearchTree, TreeError};

#[derive(Copy, Clone, Debug, Arbitrary)]
pub enum ItemValue {
    /// Selects one of the keys currently in the model, wrapping around.
    Index(usize),
    Random(u32),
}

proptest::prop_compose! {
    fn index_strategy()(
        index in 0usize..1000,
    ) -> ItemValue {
        ItemValue::Index(index)
    }
}

proptest::prop_compose! {
    fn random_strategy()(
        random in 0u32..1000,
    ) -> ItemValue {
        ItemValue::Random(random)
    }
}

fn value_strategy() -> impl Strategy<Value = ItemValue> {
    proptest::prop_oneof![index_strategy(), random_strategy()]
}

#[derive(Copy, Clone, Debug, Arbitrary)]
pub enum Op {
    Insert(ItemValue),
    Get(ItemValue),
    Remove(ItemValue),
    First,
    PopFirst,
    Last,
    PopLast,
}

impl Op {
    fn finalize(self, sorted: &[u32]) -> FinalOp {
        fn get_key(v: &[u32], i: ItemValue) -> u32 {
            match i {
                ItemValue::Index(idx) => {
                    if v.is_empty() {
                        idx as u32
                    } else {
                        v[idx % v.len()]
                    }
                }
                ItemValue::Random(v) => v,
            }
        }

        match self {
            Op::Insert(item) => FinalOp::Insert(get_key(sorted, item)),
            Op::Get(item) => FinalOp::Get(get_key(sorted, item)),
            Op::Remove(item) => FinalOp::Remove(get_key(sorted, item)),
            Op::First => FinalOp::First,
            Op::PopFirst => FinalOp::PopFirst,
            Op::Last => FinalOp::Last,
            Op::PopLast => FinalOp::PopLast,
        }
    }
}

#[derive(Copy, Clone, Debug)]
enum FinalOp {
    Insert(u32),
    Get(u32),
    Remove(u32),
    First,
    PopFirst,
    Last,
    PopLast,
}

pub fn op_strategy() -> impl Strategy<Value = Op> {
    proptest::prop_oneof![
        value_strategy().prop_map(Op::Insert),
        value_strategy().prop_map(Op::Get),
        value_strategy().prop_map(Op::Remove),
        Just(Op::First),
        Just(Op::PopFirst),
        Just(Op::Last),
        Just(Op::PopLast),
    ]
}

/// Replays `ops` against an [`AvlTree`], a [`SearchTree`] and a [`BTreeMap`].
///
/// Inserted values are the index of the inserting operation, so upserts are observable.
pub fn run_btree_equivalence(ops: Vec<Op>) {
    let mut sorted_keys = Vec::with_capacity(ops.len());
    let mut btree = BTreeMap::new();
    let mut avl: AvlTree<u32, u32> = AvlTree::new();
    let mut plain: SearchTree<u32, u32> = SearchTree::new();

    fn insert_sorted(v: &mut Vec<u32>, key: u32) {
        if let Err(idx) = v.binary_search(&key) {
            v.insert(idx, key);
        }
    }

    fn remove_sorted(v: &mut Vec<u32>, key: u32) {
        if let Ok(idx) = v.binary_search(&key) {
            v.remove(idx);
        }
    }

    for (op_id, op) in ops.into_iter().enumerate() {
        let final_op = op.finalize(&sorted_keys);

        match final_op {
            FinalOp::Insert(key) => {
                insert_sorted(&mut sorted_keys, key);

                let value = op_id as u32;
                let from_btree = btree.insert(key, value);
                let from_avl = avl.insert(key, value);
                let from_plain = plain.insert(key, value);

                assert_eq!(from_btree, from_avl, "FinalOp #{op_id}: {final_op:?}");
                assert_eq!(from_btree, from_plain, "FinalOp #{op_id}: {final_op:?}");
            }

            FinalOp::Get(key) => {
                let from_btree = btree.get(&key);

                assert_eq!(from_btree, avl.get(&key), "FinalOp #{op_id}: {final_op:?}");
                assert_eq!(from_btree, plain.get(&key), "FinalOp #{op_id}: {final_op:?}");
                assert_eq!(
                    avl.find(&key).map(|n| *n.key()),
                    from_btree.map(|_| key),
                    "FinalOp #{op_id}: {final_op:?}"
                );
            }

            FinalOp::Remove(key) => {
                remove_sorted(&mut sorted_keys, key);

                let from_btree = btree.remove(&key);
                let from_avl = avl.remove(&key);
                let from_plain = plain.remove(&key);

                assert_eq!(from_btree, from_avl, "FinalOp #{op_id}: {final_op:?}");
                assert_eq!(from_btree, from_plain, "FinalOp #{op_id}: {final_op:?}");
            }

            FinalOp::First => {
                let from_btree = btree.first_key_value();

                assert_eq!(from_btree, avl.first_key_value(), "FinalOp #{op_id}: {final_op:?}");
                assert_eq!(from_btree, plain.first_key_value(), "FinalOp #{op_id}: {final_op:?}");
            }

            FinalOp::PopFirst => {
                let from_btree = btree.pop_first();
                if let Some((key, _)) = from_btree {
                    remove_sorted(&mut sorted_keys, key);
                }

                assert_eq!(from_btree, avl.pop_first(), "FinalOp #{op_id}: {final_op:?}");
                assert_eq!(from_btree, plain.pop_first(), "FinalOp #{op_id}: {final_op:?}");
            }

            FinalOp::Last => {
                let from_btree = btree.last_key_value();

                assert_eq!(from_btree, avl.last_key_value(), "FinalOp #{op_id}: {final_op:?}");
                assert_eq!(from_btree, plain.last_key_value(), "FinalOp #{op_id}: {final_op:?}");
            }

            FinalOp::PopLast => {
                let from_btree = btree.pop_last();
                if let Some((key, _)) = from_btree {
                    remove_sorted(&mut sorted_keys, key);
                }

                assert_eq!(from_btree, avl.pop_last(), "FinalOp #{op_id}: {final_op:?}");
                assert_eq!(from_btree, plain.pop_last(), "FinalOp #{op_id}: {final_op:?}");
            }
        }

        avl.assert_invariants();
        plain.assert_invariants();

        assert!(avl.is_balanced());
        assert_eq!(avl.height(), avl.as_search_tree().height());

        assert_eq!(btree.len(), avl.len());
        assert_eq!(btree.len(), plain.len());
        assert!(btree.iter().eq(avl.iter()));
        assert!(btree.iter().eq(plain.iter()));
    }
}

/// Input for [`run_transform_equivalence`]: the insertion orders of a template tree and a target
/// tree.
///
/// Unless the key sets were made to differ, both orders are permutations of the same keys.
#[derive(Clone, Debug)]
pub struct TransformInput {
    pub template: Vec<u32>,
    pub target: Vec<u32>,
    /// Build the template as an AVL tree instead of a plain search tree.
    pub avl_template: bool,
}

impl TransformInput {
    // Keys are even so that an odd key can never collide with them.
    fn keys(len: u32) -> Vec<u32> {
        (0..len).map(|k| 2 * k).collect()
    }

    fn new(
        template: Vec<u32>,
        mut target: Vec<u32>,
        avl_template: bool,
        mismatch: bool,
    ) -> TransformInput {
        if mismatch {
            let len = target.len() as u32;
            match target.pop() {
                Some(_) => target.push(2 * len + 1),
                None => target.push(1),
            }
        }

        TransformInput {
            template,
            target,
            avl_template,
        }
    }
}

impl<'a> Arbitrary<'a> for TransformInput {
    fn arbitrary(u: &mut Unstructured<'a>) -> arbitrary::Result<Self> {
        fn shuffled(u: &mut Unstructured<'_>, mut keys: Vec<u32>) -> arbitrary::Result<Vec<u32>> {
            for i in (1..keys.len()).rev() {
                let j = u.int_in_range(0..=i)?;
                keys.swap(i, j);
            }

            Ok(keys)
        }

        let len = u32::from(u8::arbitrary(u)? % 128);
        let keys = TransformInput::keys(len);

        let template = shuffled(u, keys.clone())?;
        let target = shuffled(u, keys)?;
        let avl_template = bool::arbitrary(u)?;
        let mismatch = u8::arbitrary(u)? % 16 == 0;

        Ok(TransformInput::new(template, target, avl_template, mismatch))
    }
}

pub fn transform_input_strategy() -> impl Strategy<Value = TransformInput> {
    (
        0u32..64,
        proptest::bool::ANY,
        proptest::bool::weighted(0.1),
    )
        .prop_flat_map(|(len, avl_template, mismatch)| {
            let keys = TransformInput::keys(len);

            (
                Just(keys.clone()).prop_shuffle(),
                Just(keys).prop_shuffle(),
                Just(avl_template),
                Just(mismatch),
            )
        })
        .prop_map(|(template, target, avl_template, mismatch)| {
            TransformInput::new(template, target, avl_template, mismatch)
        })
}

/// Every node of `tree` with the keys of its children, in ascending key order.
///
/// Two trees have the same shape exactly when their shapes compare equal.
pub fn shape<V>(tree: &SearchTree<u32, V>) -> Vec<(u32, Option<u32>, Option<u32>)> {
    fn key<V>(node: NodeRef<'_, u32, V>) -> u32 {
        *node.key()
    }

    let mut out = Vec::with_capacity(tree.len());
    let mut stack: Vec<NodeRef<'_, u32, V>> = tree.root().into_iter().collect();

    while let Some(node) = stack.pop() {
        out.push((key(node), node.left().map(key), node.right().map(key)));
        stack.extend(node.left());
        stack.extend(node.right());
    }

    out.sort_unstable();
    out
}

/// Builds both trees of `input`, transforms the target into the template's shape, and checks the
/// result.
pub fn run_transform_equivalence(input: TransformInput) {
    let template: SearchTree<u32, u32> = if input.avl_template {
        let avl: AvlTree<u32, u32> = input.template.iter().map(|&k| (k, k)).collect();
        avl.into_search_tree()
    } else {
        input.template.iter().map(|&k| (k, k)).collect()
    };

    let mut target: SearchTree<u32, u64> = input
        .target
        .iter()
        .map(|&k| (k, u64::from(k) + 1000))
        .collect();

    let before = shape(&target);
    let result = template.transform(&mut target);

    let template_keys: BTreeSet<u32> = input.template.iter().copied().collect();
    let target_keys: BTreeSet<u32> = input.target.iter().copied().collect();

    if template_keys != target_keys {
        assert_eq!(
            result,
            Err(TreeError::ShapeMismatch {
                expected: template.len(),
                found: target.len(),
            })
        );
        assert_eq!(before, shape(&target), "target changed by a rejected transform");
        return;
    }

    assert_eq!(result, Ok(()));
    target.assert_invariants();

    assert_eq!(shape(&template), shape(&target));
    assert_eq!(template.height(), target.height());
    assert!(target.iter().all(|(&k, &v)| v == u64::from(k) + 1000));

    if input.avl_template {
        assert!(target.is_balanced());
    }
}

#[derive(Clone, Debug, Arbitrary)]
pub enum CursorOp {
    // Get is not an operation as it's executed on every loop iteration to check equivalence.
    MovePrev,
    MoveNext,
    PeekNext,
    PeekPrev,
}

pub fn cursor_op_strategy() -> impl Strategy<Value = CursorOp> {
    proptest::prop_oneof![
        Just(CursorOp::MovePrev),
        Just(CursorOp::MoveNext),
        Just(CursorOp::PeekNext),
        Just(CursorOp::PeekPrev),
    ]
}

#[derive(Clone, Debug)]
pub struct CursorEquivalenceInput {
    pub values: Vec<u32>,
    pub ops: Vec<CursorOp>,
}

impl<'a> Arbitrary<'a> for CursorEquivalenceInput {
    fn arbitrary(u: &mut Unstructured<'a>) -> arbitrary::Result<Self> {
        fn value(u: &mut Unstructured<'_>) -> u32 {
            u32::arbitrary(u).unwrap_or(0)
        }

        fn op(u: &mut Unstructured<'_>) -> CursorOp {
            CursorOp::arbitrary(u).unwrap_or(CursorOp::MoveNext)
        }

        let num_values = u8::arbitrary(u)? % 100;
        let num_ops = u16::arbitrary(u)? % 1000;

        let values = core::iter::repeat_with(|| value(u))
            .take(num_values.into())
            .collect();

        let ops = core::iter::repeat_with(|| op(u))
            .take(num_ops.into())
            .collect();

        Ok(CursorEquivalenceInput { values, ops })
    }
}

/// Walks cursors over an [`AvlTree`] and a [`SearchTree`] built from `values`, comparing both
/// against an index into the sorted values.
///
/// `values` are inserted in the given order, so the plain tree takes whatever shape that order
/// produces.
pub fn run_cursor_equivalence(values: Vec<u32>, ops: Vec<CursorOp>) {
    let avl: AvlTree<u32, ()> = values.iter().map(|&v| (v, ())).collect();
    let plain: SearchTree<u32, ()> = values.iter().map(|&v| (v, ())).collect();

    let mut vec = values;
    vec.sort_unstable();
    vec.dedup();

    fn vec_curs_prev(v: &[u32], curs: Option<usize>) -> Option<usize> {
        match curs {
            Some(i) => i.checked_sub(1),
            None => v.len().checked_sub(1),
        }
    }

    fn vec_curs_next(v: &[u32], curs: Option<usize>) -> Option<usize> {
        match curs {
            Some(i) => i.checked_add(1).filter(|&i| i < v.len()),
            None => (!v.is_empty()).then_some(0),
        }
    }

    fn key<V>(entry: Option<(&u32, V)>) -> Option<&u32> {
        entry.map(|(k, _)| k)
    }

    let mut vec_curs = vec_curs_next(&vec, None);
    let mut avl_curs = avl.cursor_first();
    let mut plain_curs = plain.cursor_first();

    // Check that the initial states are equivalent.
    {
        let v = vec_curs.map(|i| &vec[i]);

        assert_eq!(v, key(avl_curs.get()));
        assert_eq!(v, key(plain_curs.get()));
    }

    for op in ops {
        match op {
            CursorOp::MoveNext => {
                vec_curs = vec_curs_next(&vec, vec_curs);
                avl_curs.move_next();
                plain_curs.move_next();
            }

            CursorOp::MovePrev => {
                vec_curs = vec_curs_prev(&vec, vec_curs);
                avl_curs.move_prev();
                plain_curs.move_prev();
            }

            CursorOp::PeekNext => {
                let v = vec_curs_next(&vec, vec_curs).map(|i| &vec[i]);

                assert_eq!(v, key(avl_curs.peek_next()));
                assert_eq!(v, key(plain_curs.peek_next()));
            }

            CursorOp::PeekPrev => {
                let v = vec_curs_prev(&vec, vec_curs).map(|i| &vec[i]);

                assert_eq!(v, key(avl_curs.peek_prev()));
                assert_eq!(v, key(plain_curs.peek_prev()));
            }
        }

        let v = vec_curs.map(|i| &vec[i]);

        assert_eq!(v, key(avl_curs.get()));
        assert_eq!(v, key(plain_curs.get()));
    }
}
