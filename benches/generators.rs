use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use mazes::{
    cells::GridCoordinate,
    generators,
    grid::Grid,
    units::{ColumnsCount, RowsCount},
};
use rand::SeedableRng;
use rand_xorshift::XorShiftRng;

fn fresh_grid(side: usize) -> Grid {
    Grid::new(RowsCount(side), ColumnsCount(side)).unwrap()
}

fn bench_recursive_backtracker_maze_32(c: &mut Criterion) {
    let mut rng = XorShiftRng::seed_from_u64(32);
    c.bench_function("recursive_backtracker_maze_32", move |b| {
        b.iter_batched(|| fresh_grid(32),
                       |mut g| generators::recursive_backtracker(&mut g, GridCoordinate::new(0, 0), &mut rng),
                       BatchSize::SmallInput)
    });
}

fn bench_recursive_backtracker_maze_350(c: &mut Criterion) {
    let mut rng = XorShiftRng::seed_from_u64(350);
    c.bench_function("recursive_backtracker_maze_350", move |b| {
        b.iter_batched(|| fresh_grid(350),
                       |mut g| generators::recursive_backtracker(&mut g, GridCoordinate::new(175, 175), &mut rng),
                       BatchSize::LargeInput)
    });
}

fn bench_carve_maze_15x25(c: &mut Criterion) {
    let mut rng = XorShiftRng::seed_from_u64(1525);
    c.bench_function("carve_maze_15x25", move |b| {
        b.iter(|| generators::carve_maze(RowsCount(15), ColumnsCount(25), &mut rng))
    });
}

criterion_group!(
    benches,
    bench_recursive_backtracker_maze_32,
    bench_recursive_backtracker_maze_350,
    bench_carve_maze_15x25
);
criterion_main!(benches);
