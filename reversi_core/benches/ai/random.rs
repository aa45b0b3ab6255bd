//! `reversi_core::ai::random` の性能計測（1手選択）。

use core::hint::black_box;
use criterion::BatchSize;
use criterion::BenchmarkId;
use criterion::Criterion;
use reversi_core::ai::types::Ai as _;
use reversi_core::ai::{Difficulty, Opponent, random};
use reversi_core::engine;

/// `cargo bench` の引数を取り込みつつ `Criterion` を生成する。
fn criterion_configured() -> Criterion {
    let base = Criterion::default();
    base.configure_from_args()
}

/// 指定手数だけ進めた局面を返す（途中で終局した場合はその時点で止める）。
fn game_after_plies(plies: u16) -> engine::Game {
    let mut black_agent = Opponent::new(Difficulty::VeryEasy, u64::MIN, 2);
    let mut white_agent = Opponent::new(Difficulty::VeryEasy, u64::MIN.wrapping_add(1), 2);
    let mut game = engine::Game::initial();

    for _turn in u16::MIN..plies {
        if game.is_game_over() {
            break;
        }

        let side = game.side_to_move();
        let legal = game.legal_moves();
        let agent = match side {
            engine::Color::Black => &mut black_agent,
            engine::Color::White => &mut white_agent,
        };

        let Some(mv) = agent.choose(game.board(), side, &legal) else {
            break;
        };
        if game.play(mv.square()).is_err() {
            break;
        }
    }

    game
}

/// ベンチ用に代表局面をいくつか用意する。
fn game_samples() -> [engine::Game; 3] {
    [engine::Game::initial(), game_after_plies(8), game_after_plies(24)]
}

/// `random::Agent::select_move` を計測する。
fn bench_select_move(criterion: &mut Criterion) {
    let samples = game_samples();
    let mut group = criterion.benchmark_group("ai/random/select_move");

    for (index, game) in samples.iter().enumerate() {
        let legal = game.legal_moves();
        let input = (game.board(), game.side_to_move(), legal);
        let bench_id = BenchmarkId::new("pos", index);
        group.bench_with_input(bench_id, &input, |bench, (board, side, legal)| {
            bench.iter_batched(
                || random::Agent::new(u64::MIN),
                |mut agent| black_box(agent.select_move(*board, *side, legal)),
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

/// ベンチマークのエントリーポイント。
fn main() {
    let mut criterion = criterion_configured();
    bench_select_move(&mut criterion);
    criterion.final_summary();
}
