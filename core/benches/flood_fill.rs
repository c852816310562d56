use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use sapper_core::*;
use std::hint::black_box;

fn flood_fill(c: &mut Criterion) {
    let empty = Board::new(255, 255).unwrap();
    c.bench_function("flood_fill_empty_255", |b| {
        b.iter_batched(
            || empty.clone(),
            |mut board| board.reveal(black_box((127, 127))),
            BatchSize::LargeInput,
        )
    });

    // diagonal walls leave long corridors to flood through
    let walls: Vec<Location> = (0..255u8)
        .flat_map(|x| (0..255u8).map(move |y| (x, y)))
        .filter(|&(x, y)| (u16::from(x) + u16::from(y)) % 16 == 0 && y % 32 != 0)
        .collect();
    let maze = Board::from_mine_coords((255, 255), &walls).unwrap();
    c.bench_function("flood_fill_maze_255", |b| {
        b.iter_batched(
            || maze.clone(),
            |mut board| board.reveal(black_box((1, 1))),
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(benches, flood_fill);
criterion_main!(benches);
