use criterion::{black_box, criterion_group, criterion_main, Criterion};
use hexboard::{CellPos, GameConfig, GameModel};

fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulation");
    group.sample_size(10);

    let config = GameConfig {
        rows: 200,
        cols: 200,
        ..Default::default()
    };
    let mut game = GameModel::new(config).unwrap();
    // Seed a repeating pattern so there's something to simulate
    for row in (0..config.rows).step_by(3) {
        for col in (0..config.cols).step_by(2) {
            game.board_mut().activate(CellPos::new(row, col), row % 2 == 0);
        }
    }
    group.bench_function("tick 200x200", |b| {
        b.iter(|| black_box(&mut game).step())
    });
    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
