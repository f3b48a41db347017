use criterion::{Criterion, criterion_group, criterion_main};
use quintet_core::*;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::hint::black_box;

/// Mid-game states reached by cycling directions from a seeded start.
fn corpus() -> Vec<GameState> {
    let engine = Engine::default();
    let mut rng = SmallRng::seed_from_u64(42);
    let mut state = engine.initialize_game(&mut rng);
    let mut states = vec![state.clone()];
    for turn in 0..200 {
        if state.is_game_over() {
            state = engine.restart(&state, &mut rng);
        }
        state = engine
            .play_turn(&state, Direction::ALL[turn % 4], &mut rng, &mut ())
            .state;
        states.push(state.clone());
    }
    states
}

fn bench_moves(c: &mut Criterion) {
    let engine = Engine::default();
    let states = corpus();

    for direction in Direction::ALL {
        c.bench_function(&format!("move/{direction:?}"), |b| {
            b.iter(|| {
                let mut total = 0;
                for state in &states {
                    total += engine.move_tiles(state, direction).score_delta;
                }
                black_box(total)
            })
        });
    }

    c.bench_function("can_move", |b| {
        b.iter(|| states.iter().filter(|state| state.board().can_move()).count())
    });
}

fn bench_games(c: &mut Criterion) {
    let engine = Engine::default();
    c.bench_function("game/cycle", |b| {
        b.iter(|| {
            let mut rng = SmallRng::seed_from_u64(7);
            let mut state = engine.initialize_game(&mut rng);
            for turn in 0..1_000 {
                if state.is_game_over() {
                    break;
                }
                state = engine
                    .play_turn(&state, Direction::ALL[turn % 4], &mut rng, &mut ())
                    .state;
            }
            black_box(state.score())
        })
    });
}

criterion_group!(benches, bench_moves, bench_games);
criterion_main!(benches);
