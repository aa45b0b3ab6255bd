use crate::engine::board::Board;
use crate::engine::types::{Color, Square};

/// 合法手（着手マスと、その手で反転する石の集合）。
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Move {
    /// 反転する石のビットボード（必ず1枚以上）。
    flips: u64,
    /// 着手マス。
    square: Square,
}

impl Move {
    /// 列（0..=7）を返す。
    #[inline]
    #[must_use]
    pub const fn col(self) -> u8 {
        self.square.col()
    }

    /// 反転する石の枚数を返す。
    #[inline]
    #[must_use]
    pub const fn flip_count(self) -> u32 {
        self.flips.count_ones()
    }

    /// 反転する石のビットボードを返す。
    #[inline]
    #[must_use]
    pub const fn flips(self) -> u64 {
        self.flips
    }

    /// 行（0..=7）を返す。
    #[inline]
    #[must_use]
    pub const fn row(self) -> u8 {
        self.square.row()
    }

    /// 着手マスを返す。
    #[inline]
    #[must_use]
    pub const fn square(self) -> Square {
        self.square
    }
}

/// `color` の合法手を行優先（(0,0), (0,1), …, (7,7)）で列挙する。
///
/// 返す手はすべて空きマスへの着手で、反転数は1以上。
#[must_use]
pub fn legal_moves(board: Board, color: Color) -> Vec<Move> {
    let bits = board.legal_bitboard(color);
    let cap = usize::try_from(bits.count_ones()).unwrap_or(usize::MIN);
    let mut moves = Vec::with_capacity(cap);

    for square in Square::iter_bits(bits) {
        let flips = board.flips(square, color);
        if flips != u64::MIN {
            moves.push(Move { flips, square });
        }
    }

    moves
}

/// 指定マスへの着手が合法ならその手を返す。
#[must_use]
pub fn find_move(board: Board, color: Color, square: Square) -> Option<Move> {
    let flips = board.flips(square, color);
    if flips == u64::MIN {
        return None;
    }

    Some(Move { flips, square })
}
