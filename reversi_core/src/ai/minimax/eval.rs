use crate::ai::positional::weight_sum;
use crate::engine::{Board, Color};

/// 石差の重み。
const WEIGHT_MATERIAL: i32 = 5;

/// 静的評価（`side` 視点）。
///
/// 自石の重み合計 − 相手石の重み合計 + 5 × (自石数 − 相手石数)。
#[must_use]
pub fn evaluate(board: Board, side: Color) -> i32 {
    let (player_bb, opponent_bb) = match side {
        Color::Black => (board.black(), board.white()),
        Color::White => (board.white(), board.black()),
    };

    let positional = weight_sum(player_bb).wrapping_sub(weight_sum(opponent_bb));
    let material = diff_i32(player_bb.count_ones(), opponent_bb.count_ones());

    positional.wrapping_add(material.wrapping_mul(WEIGHT_MATERIAL))
}

/// `u32` 同士の差を `i32` として返す。
fn diff_i32(lhs: u32, rhs: u32) -> i32 {
    let ai = i32::try_from(lhs).unwrap_or(i32::MAX);
    let bi = i32::try_from(rhs).unwrap_or(i32::MAX);
    ai.wrapping_sub(bi)
}
