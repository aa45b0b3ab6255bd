use serde::{Deserialize, Serialize};

use crate::engine::{Board, Color, Move};

/// 手を選択するAI。
pub trait Ai {
    /// 盤面と、事前に列挙した合法手から次の手を選択する。
    ///
    /// 盤面は読み取り専用のスナップショット。合法手が無ければ `None`（パス）。
    fn select_move(&mut self, board: Board, side: Color, legal: &[Move]) -> Option<Move>;
}

/// コンピュータの強さ。
///
/// 各値はちょうど1つの戦略に対応する。
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    Eq,
    PartialEq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum Difficulty {
    /// ランダム。
    VeryEasy,
    /// 貪欲（反転数最大）。
    #[default]
    Easy,
    /// 評価表。
    Medium,
    /// ミニマックス探索。
    Hard,
}

#[cfg(test)]
mod tests {
    use super::Difficulty;
    use core::str::FromStr as _;

    #[test]
    fn difficulty_parses_kebab_case_names() {
        assert_eq!(Difficulty::from_str("very-easy").ok(), Some(Difficulty::VeryEasy));
        assert_eq!(Difficulty::from_str("HARD").ok(), Some(Difficulty::Hard));
        assert!(Difficulty::from_str("impossible").is_err());
        assert_eq!(Difficulty::Medium.to_string(), "medium");
    }
}
