use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tetris_oracle::core::{Board, Game};
use tetris_oracle::types::PieceKind;

fn bench_line_clear(c: &mut Criterion) {
    c.bench_function("clear_4_lines", |b| {
        b.iter(|| {
            let mut board = Board::new();
            // Fill bottom 4 rows
            for y in 16..20 {
                for x in 0..10 {
                    board.set(x, y, Some(PieceKind::I));
                }
            }
            board.clear_full_rows();
        })
    });
}

fn bench_try_move(c: &mut Criterion) {
    let mut game = Game::new(12345);

    c.bench_function("try_move", |b| {
        b.iter(|| {
            game.try_move(black_box(1), 0);
            game.try_move(black_box(-1), 0);
        })
    });
}

fn bench_rotate(c: &mut Criterion) {
    let mut game = Game::new(12345);

    c.bench_function("rotate", |b| {
        b.iter(|| {
            game.rotate();
        })
    });
}

fn bench_snapshot(c: &mut Criterion) {
    let game = Game::new(12345);

    c.bench_function("snapshot", |b| {
        b.iter(|| {
            black_box(game.snapshot());
        })
    });
}

fn bench_hard_drop(c: &mut Criterion) {
    c.bench_function("hard_drop", |b| {
        b.iter(|| {
            let mut game = Game::new(black_box(777));
            game.hard_drop();
        })
    });
}

criterion_group!(
    benches,
    bench_line_clear,
    bench_try_move,
    bench_rotate,
    bench_snapshot,
    bench_hard_drop
);
criterion_main!(benches);
