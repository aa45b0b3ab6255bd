use derive_more::{Display, Error};

use crate::engine::types::{Cell, Color, Grid, Square};

/// A列（col = 0）。
const FILE_A: u64 = 0x0101_0101_0101_0101;

/// H列（col = 7）。
const FILE_H: u64 = 0x8080_8080_8080_8080;

/// 初期配置の黒: (3, 4) と (4, 3)。
const START_BLACK: u64 = 0x0000_0008_1000_0000;

/// 初期配置の白: (3, 3) と (4, 4)。
const START_WHITE: u64 = 0x0000_0010_0800_0000;

/// 1方向に挟める相手石の最大数。
const MAX_RUN: u8 = 6;

/// 盤上の1方向。
///
/// インデックスは `row * 8 + col` なので、列の移動を伴う方向は
/// 端の列を落としてからシフトしないと隣の行へ回り込む。
#[derive(Copy, Clone, Debug)]
struct Direction {
    /// シフト量（ビット）。
    amount: u32,
    /// シフト前に落とす列。
    edge: u64,
    /// インデックスが増える向きか。
    forward: bool,
}

/// 8方向（東、北東、北、北西、西、南西、南、南東）。
const DIRECTIONS: [Direction; 8] = [
    Direction::forward(1, FILE_H),
    Direction::forward(9, FILE_H),
    Direction::forward(8, 0),
    Direction::forward(7, FILE_A),
    Direction::backward(1, FILE_A),
    Direction::backward(9, FILE_A),
    Direction::backward(8, 0),
    Direction::backward(7, FILE_H),
];

impl Direction {
    /// インデックスが減る向き。
    const fn backward(amount: u32, edge: u64) -> Self {
        Self {
            amount,
            edge,
            forward: false,
        }
    }

    /// インデックスが増える向き。
    const fn forward(amount: u32, edge: u64) -> Self {
        Self {
            amount,
            edge,
            forward: true,
        }
    }

    /// `origin` の各石から、隣接する `opponent` の連なりを伸ばした集合。
    const fn run(self, origin: u64, opponent: u64) -> u64 {
        let mut run = self.step(origin) & opponent;
        let mut len = 1_u8;
        while len < MAX_RUN {
            run |= self.step(run) & opponent;
            len = len.wrapping_add(1);
        }
        run
    }

    /// 1マス進める。盤外へ出るビットは消える。
    const fn step(self, bits: u64) -> u64 {
        let kept = bits & !self.edge;
        if self.forward {
            kept.wrapping_shl(self.amount)
        } else {
            kept.wrapping_shr(self.amount)
        }
    }
}

/// 盤面（黒と白のビットボード）。
///
/// 手番は持たない。どちらの色で打つかは呼び出し側が指定する。
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Board {
    /// 黒石のビットボード。
    black: u64,
    /// 白石のビットボード。
    white: u64,
}

/// 着手の適用に失敗した理由。
#[derive(Copy, Clone, Debug, Eq, PartialEq, Display, Error)]
#[non_exhaustive]
pub enum ApplyMoveError {
    /// 指定マスにすでに石がある。
    #[display("cell occupied")]
    Occupied,
    /// 1枚も反転しない。
    #[display("move flips no discs")]
    NoFlips,
}

impl Board {
    /// `color` の石を `square` に置き、挟んだ石を反転した盤面を返す。
    ///
    /// # Errors
    ///
    /// - `ApplyMoveError::Occupied`: 指定マスが空いていない場合
    /// - `ApplyMoveError::NoFlips`: どの方向にも反転できる石が無い場合
    #[inline]
    pub fn apply_move(self, square: Square, color: Color) -> Result<Self, ApplyMoveError> {
        if self.occupied() & square.bit() != u64::MIN {
            return Err(ApplyMoveError::Occupied);
        }

        let (player, opponent) = self.split(color);
        let flipped = flips(player, opponent, square);
        if flipped == u64::MIN {
            return Err(ApplyMoveError::NoFlips);
        }

        let next_player = player | square.bit() | flipped;
        let next_opponent = opponent & !flipped;

        Ok(self.join(color, next_player, next_opponent))
    }

    /// 黒石のビットボードを返す。
    #[inline]
    #[must_use]
    pub const fn black(self) -> u64 {
        self.black
    }

    /// 指定の色で着手可能かを返す。
    #[inline]
    #[must_use]
    pub fn can_play(self, color: Color) -> bool {
        self.legal_bitboard(color) != u64::MIN
    }

    /// 指定の色の石数を返す。
    #[inline]
    #[must_use]
    pub const fn count(self, color: Color) -> u32 {
        match color {
            Color::Black => self.black.count_ones(),
            Color::White => self.white.count_ones(),
        }
    }

    /// 石数（黒、白）を返す。
    #[inline]
    #[must_use]
    pub const fn counts(self) -> (u32, u32) {
        (self.black.count_ones(), self.white.count_ones())
    }

    /// `color` が `square` に打った場合に反転する石の集合を返す。
    ///
    /// マスが埋まっている場合は空集合。
    #[inline]
    #[must_use]
    pub fn flips(self, square: Square, color: Color) -> u64 {
        if self.occupied() & square.bit() != u64::MIN {
            return u64::MIN;
        }

        let (player, opponent) = self.split(color);
        flips(player, opponent, square)
    }

    /// 盤面を生のビットボードから生成する。
    ///
    /// - `black` と `white` は重複しないこと（`black & white == 0`）
    /// - 盤面が実戦で到達可能かどうかは検査しない
    #[inline]
    #[must_use]
    pub const fn from_raw(black: u64, white: u64) -> Self {
        Self {
            black,
            white: white & !black,
        }
    }

    /// 通信・描画用に行優先の 8×8 表現を返す。
    #[must_use]
    pub fn grid(self) -> Grid {
        let mut grid: Grid = [[Cell::Empty; 8]; 8];
        for (row, cells) in (u8::MIN..).zip(grid.iter_mut()) {
            for (col, cell) in (u8::MIN..).zip(cells.iter_mut()) {
                if let Some(square) = Square::from_row_col(row, col) {
                    *cell = Cell::from(self.piece_at(square));
                }
            }
        }
        grid
    }

    /// 初期局面を返す。
    #[inline]
    #[must_use]
    pub const fn initial() -> Self {
        Self {
            black: START_BLACK,
            white: START_WHITE,
        }
    }

    /// 指定の色の合法手ビットボードを返す。
    #[inline]
    #[must_use]
    pub fn legal_bitboard(self, color: Color) -> u64 {
        let (player, opponent) = self.split(color);
        legal_moves(player, opponent)
    }

    /// 盤面の占有ビットボードを返す。
    #[inline]
    #[must_use]
    pub const fn occupied(self) -> u64 {
        self.black | self.white
    }

    /// 指定マスの石を返す。
    #[inline]
    #[must_use]
    pub fn piece_at(self, square: Square) -> Option<Color> {
        let mask = square.bit();
        if self.black & mask != u64::MIN {
            Some(Color::Black)
        } else if self.white & mask != u64::MIN {
            Some(Color::White)
        } else {
            None
        }
    }

    /// 白石のビットボードを返す。
    #[inline]
    #[must_use]
    pub const fn white(self) -> u64 {
        self.white
    }

    /// (自分, 相手) の順にビットボードを返す。
    #[inline]
    const fn split(self, color: Color) -> (u64, u64) {
        match color {
            Color::Black => (self.black, self.white),
            Color::White => (self.white, self.black),
        }
    }

    /// (自分, 相手) のビットボードから盤面を組み立てる。
    #[inline]
    const fn join(self, color: Color, player: u64, opponent: u64) -> Self {
        match color {
            Color::Black => Self {
                black: player,
                white: opponent,
            },
            Color::White => Self {
                black: opponent,
                white: player,
            },
        }
    }
}

impl Default for Board {
    #[inline]
    fn default() -> Self {
        Self::initial()
    }
}

/// `square` に置いたとき反転する石の集合。
///
/// 方向ごとに相手石の連なりを伸ばし、その先が自石なら連なり全体を返す。
fn flips(player: u64, opponent: u64, square: Square) -> u64 {
    let origin = square.bit();
    DIRECTIONS.iter().fold(u64::MIN, |acc, dir| {
        let run = dir.run(origin, opponent);
        if dir.step(run) & player == u64::MIN {
            acc
        } else {
            acc | run
        }
    })
}

/// 合法手の集合。自石から伸ばした相手石の連なりの先にある空きマス。
fn legal_moves(player: u64, opponent: u64) -> u64 {
    let empty = !(player | opponent);
    DIRECTIONS.iter().fold(u64::MIN, |acc, dir| {
        acc | (dir.step(dir.run(player, opponent)) & empty)
    })
}
