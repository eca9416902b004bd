use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rand::seq::SliceRandom;
use rand::{thread_rng, Rng};
use std::collections::BTreeMap;

use avl_bst::{AvlTree, SearchTree};

const COUNT: usize = 10000;

fn random_keys() -> Vec<u64> {
    let mut rng = thread_rng();
    let mut keys: Vec<u64> = (0..COUNT).map(|_| rng.r#gen()).collect();
    keys.sort_unstable();
    keys.dedup();
    keys.shuffle(&mut rng);
    keys
}

fn bench_insert(c: &mut Criterion) {
    let keys = random_keys();

    let mut group = c.benchmark_group("insert");
    group.throughput(Throughput::Elements(keys.len() as u64));
    group.bench_function("avl_random", |b| {
        b.iter(|| {
            let mut tree = AvlTree::new();
            for &key in &keys {
                tree.insert(key, ());
            }
            black_box(tree.height())
        })
    });
    group.bench_function("avl_ascending", |b| {
        b.iter(|| {
            let mut tree = AvlTree::new();
            for key in 0..COUNT as u64 {
                tree.insert(key, ());
            }
            black_box(tree.height())
        })
    });
    group.bench_function("search_tree_random", |b| {
        b.iter(|| {
            let mut tree = SearchTree::new();
            for &key in &keys {
                tree.insert(key, ());
            }
            black_box(tree.len())
        })
    });
    group.bench_function("btreemap_random", |b| {
        b.iter(|| {
            let mut map = BTreeMap::new();
            for &key in &keys {
                map.insert(key, ());
            }
            black_box(map.len())
        })
    });
    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let keys = random_keys();
    let tree: AvlTree<u64, ()> = keys.iter().map(|&k| (k, ())).collect();
    let map: BTreeMap<u64, ()> = keys.iter().map(|&k| (k, ())).collect();

    let mut group = c.benchmark_group("search");
    group.throughput(Throughput::Elements(keys.len() as u64));
    group.bench_function("avl", |b| {
        b.iter(|| {
            for key in &keys {
                black_box(tree.get(key));
            }
        })
    });
    group.bench_function("btreemap", |b| {
        b.iter(|| {
            for key in &keys {
                black_box(map.get(key));
            }
        })
    });
    group.finish();
}

fn bench_remove(c: &mut Criterion) {
    let keys = random_keys();
    let tree: AvlTree<u64, ()> = keys.iter().map(|&k| (k, ())).collect();

    let mut group = c.benchmark_group("remove");
    group.throughput(Throughput::Elements(keys.len() as u64));
    group.bench_function("avl", |b| {
        b.iter_batched(
            || {
                let tree: AvlTree<u64, ()> = tree.iter().map(|(&k, _)| (k, ())).collect();
                (tree, keys.clone())
            },
            |(mut tree, keys)| {
                for key in &keys {
                    tree.remove(key);
                }
                black_box(tree.is_empty())
            },
            BatchSize::LargeInput,
        )
    });
    group.finish();
}

fn bench_transform(c: &mut Criterion) {
    let len = (COUNT / 10) as u64;
    let template: AvlTree<u64, ()> = (0..len).map(|k| (k, ())).collect();

    let mut group = c.benchmark_group("transform");
    group.throughput(Throughput::Elements(len));
    group.bench_function("chain_to_avl_shape", |b| {
        b.iter_batched(
            || (0..len).rev().map(|k| (k, ())).collect::<SearchTree<_, _>>(),
            |mut chain| {
                template.as_search_tree().transform(&mut chain).unwrap();
                black_box(chain.len())
            },
            BatchSize::LargeInput,
        )
    });
    group.finish();
}

criterion_group!(benches, bench_insert, bench_search, bench_remove, bench_transform);
criterion_main!(benches);
