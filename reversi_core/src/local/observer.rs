use crate::engine::{Color, Grid, Outcome, PlayError, Scores};

/// ローカル対局の状態。
///
/// 着手直後の再判定（パス・終局判定）は `Controller` 内で完結するため、
/// 外から見える状態はこの3つのみ。
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Phase {
    /// 人間の入力待ち。
    AwaitingHumanMove,
    /// コンピュータの手番（思考待ち）。この間の人間の入力は無視する。
    ComputerThinking,
    /// 終局。再開以外の操作は受け付けない。
    GameOver(Outcome),
}

/// 描画用の状態一式。
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Snapshot {
    /// 直近の連続パス回数。
    pub consecutive_passes: u8,
    /// 手番。
    pub current_turn: Color,
    /// 盤面。
    pub grid: Grid,
    /// 人間の手番なら、着手可能なマス（行, 列）。
    pub hints: Vec<(u8, u8)>,
    /// 状態。
    pub phase: Phase,
    /// 石数。
    pub scores: Scores,
}

/// 一時的なメッセージ。
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Notice {
    /// コンピュータが考え始めた。
    ComputerThinking(Color),
    /// 不正な入力（盤面は変化していない）。
    InvalidMove(PlayError),
    /// 打てる手が無く手番を渡した。
    Passed(Color),
}

/// 描画側（外部）へ状態を通知する。
pub trait Observer {
    /// 盤面が変化するたびに呼ばれる。
    fn render(&mut self, snapshot: &Snapshot);

    /// 一時的なメッセージ。既定では何もしない。
    fn notice(&mut self, _notice: &Notice) {}
}

/// 何もしない `Observer`。
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl Observer for NullObserver {
    #[inline]
    fn render(&mut self, _snapshot: &Snapshot) {}
}
