use serde::{Deserialize, Serialize, Serializer};

/// 手番（石の色）。
///
/// 対局者は常に2人で、作成者（先手）が黒、参加者（後手）が白になる。
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Color {
    /// 先手。
    Black,
    /// 後手。
    White,
}

impl Color {
    /// 相手側の色を返す。
    #[inline]
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Black => Self::White,
            Self::White => Self::Black,
        }
    }
}

/// 盤面上のマス（0..=63のインデックス）。
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Square(
    /// `row * 8 + col` に対応する0..=63の値。
    u8,
);

impl Square {
    /// 盤の一辺の長さ。
    pub const BOARD_LEN: u8 = 8;

    /// 盤面のマス数。
    pub const COUNT: u8 = 64;

    /// ビットボード上でこのマスだけが立った値。
    #[inline]
    #[must_use]
    pub const fn bit(self) -> u64 {
        1_u64 << (self.0 & 63)
    }

    /// インデックスから `Square` を生成する（範囲チェックなし）。
    #[inline]
    pub(crate) const fn from_index_unchecked(index: u8) -> Self {
        Self(index)
    }

    /// 最下位の立っているビットのマス。空集合なら `None`。
    #[inline]
    #[must_use]
    pub fn from_bit(bit: u64) -> Option<Self> {
        if bit == 0 {
            return None;
        }
        u8::try_from(bit.trailing_zeros()).ok().map(Self)
    }

    /// (行, 列) のマス。盤外なら `None`。
    #[inline]
    #[must_use]
    pub const fn from_row_col(row: u8, col: u8) -> Option<Self> {
        if row >= Self::BOARD_LEN || col >= Self::BOARD_LEN {
            return None;
        }

        match row.checked_mul(Self::BOARD_LEN) {
            Some(base) => match base.checked_add(col) {
                Some(index) => Some(Self(index)),
                None => None,
            },
            None => None,
        }
    }

    /// 0..=63 のインデックスを返す。
    #[inline]
    #[must_use]
    pub const fn index(self) -> u8 {
        self.0
    }

    /// 列（0..=7）。
    #[inline]
    #[must_use]
    pub const fn col(self) -> u8 {
        match self.0.checked_rem(Self::BOARD_LEN) {
            Some(col) => col,
            None => 0,
        }
    }

    /// 行（0..=7）。
    #[inline]
    #[must_use]
    pub const fn row(self) -> u8 {
        match self.0.checked_div(Self::BOARD_LEN) {
            Some(row) => row,
            None => 0,
        }
    }

    /// 立っているビットをインデックス昇順（行優先）に列挙する。
    pub fn iter_bits(bits: u64) -> impl Iterator<Item = Self> {
        let mut rest = bits;
        core::iter::from_fn(move || {
            let square = Self::from_bit(rest)?;
            rest &= rest.wrapping_sub(1);
            Some(square)
        })
    }
}

/// 盤面の1マスの状態（通信・描画用）。
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Default)]
pub enum Cell {
    /// 空き。
    #[default]
    Empty,
    /// 黒石。
    Black,
    /// 白石。
    White,
}

impl From<Option<Color>> for Cell {
    #[inline]
    fn from(piece: Option<Color>) -> Self {
        match piece {
            None => Self::Empty,
            Some(Color::Black) => Self::Black,
            Some(Color::White) => Self::White,
        }
    }
}

/// 空きは `0`、石は `"BLACK"` / `"WHITE"` として書き出す。
impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Empty => serializer.serialize_u8(u8::MIN),
            Self::Black => serializer.serialize_str("BLACK"),
            Self::White => serializer.serialize_str("WHITE"),
        }
    }
}

/// 行優先の 8×8 盤面表現。
pub type Grid = [[Cell; 8]; 8];
