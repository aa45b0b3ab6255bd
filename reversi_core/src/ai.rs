/// 反転数が最大の手を選ぶAI。
pub mod greedy;
/// 固定深さのミニマックス探索AI。
pub mod minimax;
/// 評価表で最も価値の高いマスを選ぶAI。
pub mod positional;
/// 合法手からランダムに1手選ぶAI。
pub mod random;
pub mod types;

use tracing::warn;

use crate::engine::{Board, Color, Move};
use types::Ai as _;

pub type Difficulty = types::Difficulty;

/// 難易度ごとの対戦相手。
///
/// 難易度と戦略は 1 対 1 に対応し、分岐は常に網羅的に扱う。
#[derive(Debug)]
pub enum Opponent {
    /// `Difficulty::Hard`。
    Minimax(minimax::Agent),
    /// `Difficulty::Easy`。
    Greedy(greedy::Agent),
    /// `Difficulty::Medium`。
    Positional(positional::Agent),
    /// `Difficulty::VeryEasy`。
    Random(random::Agent),
}

impl Opponent {
    /// 手を選ぶ。
    ///
    /// 合法手があるのに戦略が手を返さなかった場合は、列挙順で最初の合法手に
    /// 置き換える。合法手が無ければ `None`（パス）。
    #[must_use]
    pub fn choose(&mut self, board: Board, side: Color, legal: &[Move]) -> Option<Move> {
        let first = legal.first().copied()?;

        let chosen = match self {
            Self::Minimax(agent) => agent.select_move(board, side, legal),
            Self::Greedy(agent) => agent.select_move(board, side, legal),
            Self::Positional(agent) => agent.select_move(board, side, legal),
            Self::Random(agent) => agent.select_move(board, side, legal),
        };

        match chosen {
            Some(mv) if legal.contains(&mv) => Some(mv),
            other => {
                warn!(
                    difficulty = %self.difficulty(),
                    chosen = ?other,
                    "strategy returned no usable move, falling back to first legal move"
                );
                Some(first)
            }
        }
    }

    /// この対戦相手の難易度を返す。
    #[inline]
    #[must_use]
    pub const fn difficulty(&self) -> Difficulty {
        match self {
            Self::Minimax(_) => Difficulty::Hard,
            Self::Greedy(_) => Difficulty::Easy,
            Self::Positional(_) => Difficulty::Medium,
            Self::Random(_) => Difficulty::VeryEasy,
        }
    }

    /// 難易度から対戦相手を作る。
    ///
    /// - `seed`: ランダムAIの乱数シード
    /// - `depth`: ミニマックスの探索深さ（ply）
    #[must_use]
    pub fn new(difficulty: Difficulty, seed: u64, depth: u8) -> Self {
        match difficulty {
            Difficulty::VeryEasy => Self::Random(random::Agent::new(seed)),
            Difficulty::Easy => Self::Greedy(greedy::Agent::new()),
            Difficulty::Medium => Self::Positional(positional::Agent::new()),
            Difficulty::Hard => Self::Minimax(minimax::Agent::new(depth)),
        }
    }
}
