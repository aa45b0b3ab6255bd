//! `reversi_core::ai::minimax` の性能計測（探索深さ別の1手選択）。

use core::hint::black_box;
use criterion::BenchmarkId;
use criterion::Criterion;
use reversi_core::ai::minimax;
use reversi_core::ai::types::Ai as _;
use reversi_core::engine;

/// `cargo bench` の引数を取り込みつつ `Criterion` を生成する。
fn criterion_configured() -> Criterion {
    let base = Criterion::default();
    base.configure_from_args()
}

/// 序盤の代表局面（黒 d3、白 c3 の後）。
fn opening_sample() -> engine::Game {
    let mut game = engine::Game::initial();
    for (row, col) in [(2, 3), (2, 2)] {
        let Some(square) = engine::Square::from_row_col(row, col) else {
            break;
        };
        if game.play(square).is_err() {
            break;
        }
    }
    game
}

/// `minimax::Agent::select_move` を深さ 1〜3 で計測する。
fn bench_select_move(criterion: &mut Criterion) {
    let game = opening_sample();
    let board = game.board();
    let side = game.side_to_move();
    let legal = game.legal_moves();
    let mut group = criterion.benchmark_group("ai/minimax/select_move");

    for depth in 1_u8..=3 {
        let bench_id = BenchmarkId::new("depth", depth);
        group.bench_with_input(bench_id, &depth, |bench, &input| {
            let mut agent = minimax::Agent::new(input);
            bench.iter(|| black_box(agent.select_move(board, side, &legal)));
        });
    }

    group.finish();
}

/// 静的評価を計測する。
fn bench_evaluate(criterion: &mut Criterion) {
    let board = opening_sample().board();
    criterion.bench_function("ai/minimax/evaluate", |bench| {
        bench.iter(|| black_box(minimax::evaluate(board, engine::Color::Black)));
    });
}

/// ベンチマークのエントリーポイント。
fn main() {
    let mut criterion = criterion_configured();

    bench_select_move(&mut criterion);
    bench_evaluate(&mut criterion);

    criterion.final_summary();
}
