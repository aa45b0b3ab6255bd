use crate::ai::types::Ai;
use crate::engine::{Board, Color, Move, Square};

/// マスごとの重み（行優先）。
///
/// 角は高く、角に斜めで接する X 打ちは大きく負にする。
pub const WEIGHTS: [[i32; 8]; 8] = [
    [120, -20, 20, 5, 5, 20, -20, 120],
    [-20, -40, -5, -5, -5, -5, -40, -20],
    [20, -5, 15, 3, 3, 15, -5, 20],
    [5, -5, 3, 3, 3, 3, -5, 5],
    [5, -5, 3, 3, 3, 3, -5, 5],
    [20, -5, 15, 3, 3, 15, -5, 20],
    [-20, -40, -5, -5, -5, -5, -40, -20],
    [120, -20, 20, 5, 5, 20, -20, 120],
];

/// マスの重みを返す。
#[inline]
#[must_use]
pub fn weight(square: Square) -> i32 {
    WEIGHTS
        .get(usize::from(square.row()))
        .and_then(|row| row.get(usize::from(square.col())))
        .copied()
        .unwrap_or(0_i32)
}

/// ビットボードに含まれるマスの重みの合計を返す。
#[must_use]
pub fn weight_sum(bits: u64) -> i32 {
    Square::iter_bits(bits).fold(0_i32, |acc, square| acc.wrapping_add(weight(square)))
}

/// 評価表の値が最も高いマスを選ぶAI。
///
/// 同値なら反転数の多い方、それも同じなら列挙順で先の手。
#[derive(Debug, Default, Clone, Copy)]
pub struct Agent;

impl Agent {
    /// 初期化する。
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Ai for Agent {
    #[inline]
    fn select_move(&mut self, _board: Board, _side: Color, legal: &[Move]) -> Option<Move> {
        let mut best: Option<(i32, Move)> = None;
        for &mv in legal {
            let score = weight(mv.square());
            let better = match best {
                Some((best_score, current)) => {
                    score > best_score
                        || (score == best_score && mv.flip_count() > current.flip_count())
                }
                None => true,
            };
            if better {
                best = Some((score, mv));
            }
        }
        best.map(|(_, mv)| mv)
    }
}
