use rand::SeedableRng as _;
use rand::rngs::StdRng;
use rand::seq::SliceRandom as _;

use crate::ai::types::Ai;
use crate::engine::{Board, Color, Move};

/// 合法手から一様ランダムに1手を選択するAI。
///
/// `seed` が同じなら同じ手順を再現する。
#[derive(Debug)]
pub struct Agent {
    /// 乱数生成器。
    rng: StdRng,
}

impl Agent {
    /// `seed` を用いて初期化する。
    #[inline]
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Ai for Agent {
    #[inline]
    fn select_move(&mut self, _board: Board, _side: Color, legal: &[Move]) -> Option<Move> {
        legal.choose(&mut self.rng).copied()
    }
}
