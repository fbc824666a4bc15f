use core::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use mineclear_core::*;
use rand::SeedableRng;
use rand::rngs::SmallRng;

fn bench_place_mines(c: &mut Criterion) {
    let mut group = c.benchmark_group("place_mines");
    for (name, difficulty) in Difficulty::PRESETS {
        group.bench_with_input(BenchmarkId::from_parameter(name), &difficulty, |b, difficulty| {
            let mut rng = SmallRng::seed_from_u64(0xdead_beef);
            b.iter(|| {
                let mut board = Board::new(difficulty.width(), difficulty.height()).unwrap();
                let safe = (difficulty.height() / 2, difficulty.width() / 2);
                board
                    .place_mines(difficulty.mine_count(), safe, &mut rng)
                    .unwrap();
                board.compute_adjacency_counts();
                black_box(board)
            });
        });
    }
    group.finish();
}

fn bench_flood_reveal(c: &mut Criterion) {
    let empty = Board::new(100, 100).unwrap();
    c.bench_function("flood_reveal/empty_100x100", |b| {
        b.iter(|| {
            let mut board = empty.clone();
            black_box(board.reveal((50, 50)).unwrap())
        });
    });

    c.bench_function("first_click/endless", |b| {
        let mut seed = 0;
        b.iter(|| {
            seed += 1;
            let mut game = GameSession::with_seed(Difficulty::ENDLESS, seed).unwrap();
            black_box(game.handle_primary_action((50, 50)).unwrap())
        });
    });
}

criterion_group!(benches, bench_place_mines, bench_flood_reveal);
criterion_main!(benches);
