use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use tango::{Key, PlainTree, RedBlackTango, RedBlackTree, SearchTree, SplayTree, UnbalancedTango};

#[derive(Clone)]
enum TreeEnum {
    Plain(PlainTree<Key>),
    RedBlack(RedBlackTree<Key>),
    Splay(SplayTree<Key>),
    RbTango(RedBlackTango<Key>),
    UTango(UnbalancedTango<Key>),
}

impl TreeEnum {
    fn search(&mut self, k: Key) -> Option<&Key> {
        match self {
            Self::Plain(t) => t.search(k),
            Self::RedBlack(t) => t.search(k),
            Self::Splay(t) => t.search(k),
            Self::RbTango(t) => t.search(k),
            Self::UTango(t) => t.search(k),
        }
    }
}

fn perfect<T: SearchTree<Key> + Default>(levels: u32) -> T {
    let mut tree = T::default();
    tree.initialize_perfect_tree(levels).unwrap();
    tree
}

/// Helper to bench a search sequence on every tree.
/// It creates a group for the given name and, for various sizes, searches the
/// keys `sequence` yields on a fresh perfect tree of each variant.
fn bench_helper(c: &mut Criterion, name: &str, sequence: impl Fn(Key) -> Vec<Key>) {
    let mut group = c.benchmark_group(name);

    for num_levels in [5, 9, 13] {
        let num_nodes: Key = (1 << num_levels) - 1;
        let keys = sequence(num_nodes);

        let tree_tests = [
            ("plain", TreeEnum::Plain(perfect(num_levels))),
            ("red-black", TreeEnum::RedBlack(perfect(num_levels))),
            ("splay", TreeEnum::Splay(perfect(num_levels))),
            ("rb-tango", TreeEnum::RbTango(perfect(num_levels))),
            ("u-tango", TreeEnum::UTango(perfect(num_levels))),
        ];
        for (name, tree) in tree_tests {
            let id = BenchmarkId::new(name, num_nodes);

            group.bench_function(id, |b| {
                b.iter_custom(|iters| {
                    let mut time = std::time::Duration::ZERO;
                    for _ in 0..iters {
                        let mut tree = black_box(tree.clone());
                        let instant = std::time::Instant::now();
                        for &k in &keys {
                            let _value = black_box(tree.search(black_box(k)));
                        }
                        let elapsed = instant.elapsed();
                        time += elapsed;
                    }
                    time
                })
            });
        }
    }

    group.finish();
}

pub fn criterion_benchmark(c: &mut Criterion) {
    bench_helper(c, "increasing", |n| (1..=n).collect());
    bench_helper(c, "permutation", |n| {
        let mut keys: Vec<Key> = (1..=n).collect();
        keys.shuffle(&mut StdRng::seed_from_u64(0x7a46));
        keys
    });
    bench_helper(c, "repeated", |n| vec![n / 3; n as usize]);
    bench_helper(c, "miss", |n| (0..=n).map(|k| if k % 2 == 0 { n + 1 } else { 0 }).collect());
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
