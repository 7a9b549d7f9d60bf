use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::{cmp::Reverse, collections::BinaryHeap, hint::black_box};

use fibheap::FibHeap;

const SIZES: [u64; 5] = [10, 100, 1000, 10000, 100000];

fn build_fib_heap(size: u64) -> FibHeap<u64, ()> {
    (0..size).map(|i| (i, ())).collect()
}

fn build_binary_heap(size: u64) -> BinaryHeap<Reverse<u64>> {
    (0..size).map(Reverse).collect()
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("bench_insert");
    for &size in &SIZES {
        group.throughput(Throughput::Elements(size));
        group.bench_with_input(BenchmarkId::new("FibHeap", size), &size, |b, &size| {
            b.iter(|| {
                let mut heap = FibHeap::new();
                (0..size).for_each(|i| {
                    heap.insert(black_box(i), ());
                });
                heap
            });
        });
        group.bench_with_input(BenchmarkId::new("BinaryHeap", size), &size, |b, &size| {
            b.iter(|| {
                let mut heap = BinaryHeap::new();
                (0..size).for_each(|i| heap.push(black_box(Reverse(i))));
                heap
            });
        });
    }
    group.finish();
}

fn bench_delete_min(c: &mut Criterion) {
    let mut group = c.benchmark_group("bench_delete_min");
    for &size in &SIZES {
        group.throughput(Throughput::Elements(size));
        group.bench_with_input(BenchmarkId::new("FibHeap", size), &size, |b, &size| {
            b.iter(|| {
                let mut heap = build_fib_heap(size);
                while let Some(min) = heap.delete_min() {
                    black_box(min);
                }
            });
        });
        group.bench_with_input(BenchmarkId::new("BinaryHeap", size), &size, |b, &size| {
            b.iter(|| {
                let mut heap = build_binary_heap(size);
                while let Some(min) = heap.pop() {
                    black_box(min);
                }
            });
        });
    }
    group.finish();
}

fn bench_decrease_key(c: &mut Criterion) {
    let mut group = c.benchmark_group("bench_decrease_key");
    for &size in &SIZES {
        group.throughput(Throughput::Elements(size));
        group.bench_with_input(BenchmarkId::new("FibHeap", size), &size, |b, &size| {
            let mut rng = StdRng::seed_from_u64(size);
            b.iter(|| {
                let mut heap = FibHeap::new();
                let handles: Vec<_> = (0..size).map(|i| heap.insert(i + size, ())).collect();
                // one extraction so the decreases work on consolidated trees
                heap.delete_min();
                for handle in &handles[1..] {
                    let key = *heap.key(handle);
                    let _ = heap.decrease_key(handle, key - rng.random_range(0..=size));
                }
                heap
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_insert, bench_delete_min, bench_decrease_key);
criterion_main!(benches);
