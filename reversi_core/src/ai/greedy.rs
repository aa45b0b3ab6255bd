use crate::ai::types::Ai;
use crate::engine::{Board, Color, Move};

/// その場で最も多く反転できる手を選ぶAI。
///
/// 同数の場合は列挙順（行優先）で先に見つかった手を選ぶ。
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
        let mut best: Option<Move> = None;
        for &mv in legal {
            let better = match best {
                Some(current) => mv.flip_count() > current.flip_count(),
                None => true,
            };
            if better {
                best = Some(mv);
            }
        }
        best
    }
}
