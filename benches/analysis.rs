use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use gridanova::stats::f_p_value;
use gridanova::{analyze, Axis, Design, GridBuilder, GridDataset};

/// Deterministic synthetic grid: `rows x cols` cells, `reps` replicates each.
fn synthetic_grid(rows: usize, cols: usize, reps: usize, design: Design) -> GridDataset {
    let mut builder = GridBuilder::new().dimensions(rows, cols).design(design);
    for r in 0..rows {
        for c in 0..cols {
            let raw = (0..reps)
                .map(|k| format!("{}", ((r * 31 + c * 17 + k * 7) % 13) as f64 + 0.5))
                .collect::<Vec<_>>()
                .join(", ");
            builder = builder.entry(r, c, raw);
        }
    }
    builder.build().unwrap()
}

fn bench_one_way(c: &mut Criterion) {
    let mut group = c.benchmark_group("one_way");

    for groups in [4usize, 16, 64] {
        let grid = synthetic_grid(8, groups, 3, Design::OneWay(Axis::Cols));
        group.bench_with_input(BenchmarkId::from_parameter(groups), &grid, |b, grid| {
            b.iter(|| analyze(grid).unwrap());
        });
    }
    group.finish();
}

fn bench_two_way(c: &mut Criterion) {
    let mut group = c.benchmark_group("two_way");

    for side in [4usize, 8, 16] {
        let grid = synthetic_grid(side, side, 4, Design::TwoWay);
        group.bench_with_input(BenchmarkId::from_parameter(side), &grid, |b, grid| {
            b.iter(|| analyze(grid).unwrap());
        });
    }
    group.finish();
}

fn bench_f_p_value(c: &mut Criterion) {
    let mut group = c.benchmark_group("f_p_value");

    for df2 in [10usize, 100, 1000] {
        group.bench_with_input(BenchmarkId::from_parameter(df2), &df2, |b, &df2| {
            b.iter(|| f_p_value(2.5, 3, df2).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_one_way, bench_two_way, bench_f_p_value);
criterion_main!(benches);
