use core::cmp::Ordering;

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::board::{ApplyMoveError, Board};
use crate::engine::movegen::{self, Move};
use crate::engine::types::{Color, Square};

/// 手番の再判定で許す連続パス回数の上限。
///
/// 2回連続でパスになる（双方が打てない）時点で終局が確定する。
pub const MAX_CONSECUTIVE_PASSES: u8 = 2;

/// 石数。
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Scores {
    /// 黒の石数。
    #[serde(rename = "BLACK")]
    pub black: u32,
    /// 白の石数。
    #[serde(rename = "WHITE")]
    pub white: u32,
}

impl Scores {
    /// 盤面の石数を数える。
    #[inline]
    #[must_use]
    pub const fn of(board: Board) -> Self {
        let (black, white) = board.counts();
        Self { black, white }
    }
}

/// 勝敗。
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Winner {
    /// 黒の勝ち。
    Black,
    /// 白の勝ち。
    White,
    /// 引き分け。
    Draw,
}

impl Winner {
    /// 石数から勝者を決める（多い方が勝ち、同数は引き分け）。
    #[inline]
    #[must_use]
    pub fn from_scores(scores: Scores) -> Self {
        match scores.black.cmp(&scores.white) {
            Ordering::Greater => Self::Black,
            Ordering::Less => Self::White,
            Ordering::Equal => Self::Draw,
        }
    }
}

/// 終局結果。
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    /// 終局時の石数。
    pub scores: Scores,
    /// 勝者。
    pub winner: Winner,
}

impl Outcome {
    /// 盤面から終局結果を求める。
    #[inline]
    #[must_use]
    pub fn of(board: Board) -> Self {
        let scores = Scores::of(board);
        Self {
            scores,
            winner: Winner::from_scores(scores),
        }
    }
}

/// ゲームの状態。
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Status {
    /// 終局（双方とも合法手なし）。
    GameOver(Outcome),
    /// 進行中。
    InProgress,
}

/// 手番再判定の結果。
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Resolution {
    /// 双方とも打てない。
    GameOver(Outcome),
    /// `side` の手番。`passed` は打てずにパスした側。
    ToMove {
        /// パスした側（パスが無ければ `None`）。
        passed: Option<Color>,
        /// 次に打つ側。
        side: Color,
    },
}

/// 手番を `candidate` に渡したあとの状態を決める。
///
/// 打てない側は盤面を変えずにパスし、もう一方を再判定する。
/// 連続パスが [`MAX_CONSECUTIVE_PASSES`] に達したら終局。
#[must_use]
pub fn resolve_turn(board: Board, candidate: Color) -> Resolution {
    let mut side = candidate;
    let mut passed = None;

    for _ in u8::MIN..MAX_CONSECUTIVE_PASSES {
        if board.can_play(side) {
            return Resolution::ToMove { passed, side };
        }

        debug!(%side, "no legal move, passing");
        passed = Some(side);
        side = side.opponent();
    }

    Resolution::GameOver(Outcome::of(board))
}

/// 手の適用（打つ/パス）に失敗した理由。
#[derive(Copy, Clone, Debug, Eq, PartialEq, Display, Error)]
#[non_exhaustive]
pub enum PlayError {
    /// すでに終局している。
    #[display("game is over")]
    GameOver,
    /// 指定マスが空いていない。
    #[display("cell occupied")]
    Occupied,
    /// 1枚も反転しない。
    #[display("invalid move")]
    NoFlips,
    /// 盤外の座標。
    #[display("coordinates out of bounds")]
    OutOfBounds,
    /// 現在は入力を受け付けていない（コンピュータの手番など）。
    #[display("not your turn")]
    NotYourTurn,
    /// 合法手があるのにパスしようとした。
    #[display("pass not allowed while a legal move exists")]
    PassNotAllowed,
}

impl From<ApplyMoveError> for PlayError {
    #[inline]
    fn from(err: ApplyMoveError) -> Self {
        match err {
            ApplyMoveError::Occupied => Self::Occupied,
            ApplyMoveError::NoFlips => Self::NoFlips,
        }
    }
}

/// 1手を適用した結果。
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Turn {
    /// 打った側。
    pub mover: Color,
    /// 打った手。
    pub mv: Move,
    /// 着手後に打てずパスした側。
    pub passed: Option<Color>,
    /// 着手後のゲーム状態。
    pub status: Status,
}

/// 1ゲームの進行を管理する構造体。
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Game {
    /// 現在の盤面。
    board: Board,
    /// 連続パス回数。
    consecutive_passes: u8,
    /// 手番。
    side_to_move: Color,
    /// 進行状態。
    status: Status,
}

impl Game {
    /// 現在の盤面を返す。
    #[inline]
    #[must_use]
    pub const fn board(&self) -> Board {
        self.board
    }

    /// 直近の連続パス回数を返す。
    #[inline]
    #[must_use]
    pub const fn consecutive_passes(&self) -> u8 {
        self.consecutive_passes
    }

    /// 任意の盤面と手番からゲームを組み立てる。
    ///
    /// 手番側が打てなければその場でパス/終局を判定する。
    #[must_use]
    pub fn from_position(board: Board, side_to_move: Color) -> Self {
        let mut game = Self {
            board,
            consecutive_passes: u8::MIN,
            side_to_move,
            status: Status::InProgress,
        };
        let _: Option<Color> = game.resolve(side_to_move);
        game
    }

    /// 初期局面からゲームを開始する。
    #[inline]
    #[must_use]
    pub const fn initial() -> Self {
        Self {
            board: Board::initial(),
            consecutive_passes: u8::MIN,
            side_to_move: Color::Black,
            status: Status::InProgress,
        }
    }

    /// 終局しているかどうかを返す。
    #[inline]
    #[must_use]
    pub const fn is_game_over(&self) -> bool {
        matches!(self.status, Status::GameOver(_))
    }

    /// 手番側の合法手を返す（終局後は空）。
    #[must_use]
    pub fn legal_moves(&self) -> Vec<Move> {
        if self.is_game_over() {
            return Vec::new();
        }
        movegen::legal_moves(self.board, self.side_to_move)
    }

    /// 手番側に合法手が無い場合、パスを適用する。
    ///
    /// # Errors
    ///
    /// - `PlayError::GameOver`: すでに終局している場合
    /// - `PlayError::PassNotAllowed`: 合法手が存在する場合
    pub fn pass(&mut self) -> Result<Status, PlayError> {
        if self.is_game_over() {
            return Err(PlayError::GameOver);
        }
        if self.board.can_play(self.side_to_move) {
            return Err(PlayError::PassNotAllowed);
        }

        self.consecutive_passes = self.consecutive_passes.saturating_add(1);
        let _: Option<Color> = self.resolve(self.side_to_move.opponent());
        Ok(self.status)
    }

    /// 手番側が `square` に打ち、次の手番を決める。
    ///
    /// # Errors
    ///
    /// - `PlayError::GameOver`: すでに終局している場合
    /// - `PlayError::Occupied` / `PlayError::NoFlips`: 合法手でない場合
    ///
    /// エラー時は盤面・手番ともに変化しない。
    pub fn play(&mut self, square: Square) -> Result<Turn, PlayError> {
        if self.is_game_over() {
            return Err(PlayError::GameOver);
        }

        let mover = self.side_to_move;
        let mv = match movegen::find_move(self.board, mover, square) {
            Some(value) => value,
            None => {
                return Err(match self.board.apply_move(square, mover) {
                    Err(err) => PlayError::from(err),
                    Ok(_) => PlayError::NoFlips,
                });
            }
        };

        self.board = self.board.apply_move(square, mover)?;
        self.consecutive_passes = u8::MIN;
        let passed = self.resolve(mover.opponent());

        Ok(Turn {
            mover,
            mv,
            passed,
            status: self.status,
        })
    }

    /// 石数を返す。
    #[inline]
    #[must_use]
    pub const fn scores(&self) -> Scores {
        Scores::of(self.board)
    }

    /// 手番を返す。
    #[inline]
    #[must_use]
    pub const fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// 現在のゲーム状態を返す。
    #[inline]
    #[must_use]
    pub const fn status(&self) -> Status {
        self.status
    }

    /// 手番を `candidate` へ渡して再判定し、パスした側を返す。
    fn resolve(&mut self, candidate: Color) -> Option<Color> {
        match resolve_turn(self.board, candidate) {
            Resolution::ToMove { passed, side } => {
                if passed.is_some() {
                    self.consecutive_passes = self.consecutive_passes.saturating_add(1);
                }
                self.side_to_move = side;
                passed
            }
            Resolution::GameOver(outcome) => {
                self.consecutive_passes = MAX_CONSECUTIVE_PASSES;
                self.status = Status::GameOver(outcome);
                None
            }
        }
    }
}

impl Default for Game {
    #[inline]
    fn default() -> Self {
        Self::initial()
    }
}
