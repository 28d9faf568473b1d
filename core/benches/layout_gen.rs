use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use minefield_core::*;
use rand::SeedableRng;
use rand::rngs::SmallRng;

fn populate_tiers(c: &mut Criterion) {
    let mut group = c.benchmark_group("populate");
    for &(rows, cols, mines) in &[(9, 9, 10), (16, 16, 40), (16, 30, 99), (100, 100, 3333)] {
        let mut layout = MineLayout::new_empty(rows, cols, mines).unwrap();
        let mut rng = SmallRng::seed_from_u64(0);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{rows}x{cols}/{mines}")),
            &(rows / 2, cols / 2),
            |b, &start| {
                b.iter(|| {
                    layout.populate(black_box(start), &mut rng).unwrap();
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, populate_tiers);
criterion_main!(benches);
