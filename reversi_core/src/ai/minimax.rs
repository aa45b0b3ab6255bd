use tracing::debug;

use crate::ai::types::Ai;
use crate::engine::movegen::legal_moves;
use crate::engine::{Board, Color, Move};

mod eval;

pub use eval::evaluate;

/// 既定の探索深さ（ply）。
pub const DEFAULT_DEPTH: u8 = 2;

/// ミニマックス探索を行うAI。
#[derive(Debug, Clone, Copy)]
pub struct Agent {
    /// 探索深さ。
    depth: u8,
}

impl Agent {
    /// 探索深さを返す。
    #[inline]
    #[must_use]
    pub const fn depth(self) -> u8 {
        self.depth
    }

    /// `depth` を指定して初期化する。
    #[inline]
    #[must_use]
    pub const fn new(depth: u8) -> Self {
        Self { depth }
    }
}

impl Default for Agent {
    #[inline]
    fn default() -> Self {
        Self::new(DEFAULT_DEPTH)
    }
}

impl Ai for Agent {
    #[inline]
    fn select_move(&mut self, board: Board, side: Color, legal: &[Move]) -> Option<Move> {
        let depth = normalize_depth(self.depth);
        let result = search_root(board, side, legal, depth);
        debug!(
            %side,
            depth,
            nodes = result.stats.nodes(),
            best_score = result.best_score,
            "minimax search finished"
        );
        result.best_move
    }
}

/// 探索統計。
#[derive(Default, Clone, Copy, Debug)]
pub(super) struct SearchStats {
    /// 評価値を返したノード数（葉・内部ノードを含む）。
    nodes: u64,
}

impl SearchStats {
    /// 探索ノード数を加算する。
    const fn inc_nodes(&mut self) {
        self.nodes = self.nodes.wrapping_add(1);
    }

    /// 探索ノード数を返す。
    pub(super) const fn nodes(&self) -> u64 {
        self.nodes
    }
}

/// ルート探索の結果。
#[derive(Clone, Copy, Debug)]
pub(super) struct SearchResult {
    /// ルートで選択した最善手（合法手なしなら `None`）。
    best_move: Option<Move>,
    /// `best_move` の評価値。
    best_score: i32,
    /// 探索統計。
    stats: SearchStats,
}

/// 探索深さを正規化する（0の場合は1にする）。
#[inline]
const fn normalize_depth(depth: u8) -> u8 {
    if depth == u8::MIN {
        u8::MIN.wrapping_add(1)
    } else {
        depth
    }
}

/// ルート探索。
///
/// 各合法手の子局面を相手番（最小化）から評価し、最大値の手を返す。
/// 同値は先に見つかった手を残す。
fn search_root(board: Board, side: Color, legal: &[Move], depth: u8) -> SearchResult {
    let mut stats = SearchStats::default();
    let mut best_move: Option<Move> = None;
    let mut best_score = i32::MIN;
    let next_depth = depth.saturating_sub(1);

    for &mv in legal {
        let next = match board.apply_move(mv.square(), side) {
            Ok(value) => value,
            Err(_err) => continue,
        };

        let score = minimax(next, next_depth, false, side, &mut stats);
        if best_move.is_none() || score > best_score {
            best_score = score;
            best_move = Some(mv);
        }
    }

    SearchResult {
        best_move,
        best_score,
        stats,
    }
}

/// 盤面が終局（双方とも合法手なし）かを返す。
#[inline]
fn is_terminal(board: Board) -> bool {
    !board.can_play(Color::Black) && !board.can_play(Color::White)
}

/// ミニマックス本体（`ai_side` 視点の評価値を返す）。
///
/// 合法手の無い層はパスとして手番を入れ替え、深さを1消費する。
pub(super) fn minimax(
    board: Board,
    depth: u8,
    maximizing: bool,
    ai_side: Color,
    stats: &mut SearchStats,
) -> i32 {
    stats.inc_nodes();

    if depth == u8::MIN || is_terminal(board) {
        return evaluate(board, ai_side);
    }

    let to_move = if maximizing {
        ai_side
    } else {
        ai_side.opponent()
    };
    let next_depth = depth.saturating_sub(1);

    let moves = legal_moves(board, to_move);
    if moves.is_empty() {
        return minimax(board, next_depth, !maximizing, ai_side, stats);
    }

    let mut best = if maximizing { i32::MIN } else { i32::MAX };
    for mv in moves {
        let next = match board.apply_move(mv.square(), to_move) {
            Ok(value) => value,
            Err(_err) => continue,
        };

        let score = minimax(next, next_depth, !maximizing, ai_side, stats);
        best = if maximizing {
            best.max(score)
        } else {
            best.min(score)
        };
    }

    best
}
