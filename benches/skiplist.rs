use criterion::{criterion_group, criterion_main, Criterion};
use rand::Rng;
use skiplist_map::skiplist::SkipMap;
use std::collections::BTreeMap;

const NUM_OF_OPERATIONS: usize = 1000;

fn bench_skipmap_insert(c: &mut Criterion) {
    c.bench_function("bench skipmap insert", |b| {
        b.iter(|| {
            let mut rng: rand::XorShiftRng = rand::SeedableRng::from_seed([1, 1, 1, 1]);
            let mut map = SkipMap::new();
            for _ in 0..NUM_OF_OPERATIONS {
                map.insert(rng.next_u32(), rng.next_u32());
            }
        })
    });
}

fn bench_skipmap_get(c: &mut Criterion) {
    let mut rng: rand::XorShiftRng = rand::SeedableRng::from_seed([1, 1, 1, 1]);
    let mut map = SkipMap::new();
    let mut keys = Vec::new();
    for _ in 0..NUM_OF_OPERATIONS {
        let key = rng.next_u32();
        map.insert(key, rng.next_u32());
        keys.push(key);
    }
    c.bench_function("bench skipmap get", move |b| {
        b.iter(|| {
            for key in &keys {
                criterion::black_box(map.get(key));
            }
        })
    });
}

fn bench_btreemap_insert(c: &mut Criterion) {
    c.bench_function("bench btreemap insert", |b| {
        b.iter(|| {
            let mut rng: rand::XorShiftRng = rand::SeedableRng::from_seed([1, 1, 1, 1]);
            let mut map = BTreeMap::new();
            for _ in 0..NUM_OF_OPERATIONS {
                map.insert(rng.next_u32(), rng.next_u32());
            }
        })
    });
}

fn bench_btreemap_get(c: &mut Criterion) {
    let mut rng: rand::XorShiftRng = rand::SeedableRng::from_seed([1, 1, 1, 1]);
    let mut map = BTreeMap::new();
    let mut keys = Vec::new();
    for _ in 0..NUM_OF_OPERATIONS {
        let key = rng.next_u32();
        map.insert(key, rng.next_u32());
        keys.push(key);
    }
    c.bench_function("bench btreemap get", move |b| {
        b.iter(|| {
            for key in &keys {
                criterion::black_box(map.get(key));
            }
        })
    });
}

criterion_group!(
    benches,
    bench_skipmap_insert,
    bench_skipmap_get,
    bench_btreemap_insert,
    bench_btreemap_get,
);
criterion_main!(benches);
