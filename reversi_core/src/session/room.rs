use derive_more::{Display, Error};
use rand::Rng;
use rand::seq::SliceRandom as _;
use serde::Serialize;
use tracing::debug;

use crate::engine::{Color, Game, GameStatus, Grid, Square};
use crate::session::events::MoveReport;

/// 作成者の既定名。
pub const DEFAULT_CREATOR_NAME: &str = "Player 1";
/// 参加者の既定名。
pub const DEFAULT_JOINER_NAME: &str = "Player 2";

/// ルームID（英大文字と数字の6文字）。
///
/// 比較は正規化（大文字化）後の値で行うため、入力の大小文字は区別しない。
#[derive(Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Display)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    /// ID に使う文字。
    pub const ALPHABET: &'static [u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
    /// ID の長さ。
    pub const LEN: usize = 6;

    /// 文字列表現を返す。
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 入力コードを解釈する（前後の空白は無視、大文字に正規化）。
    ///
    /// 6文字の英数字でなければ `None`。
    #[must_use]
    pub fn parse(code: &str) -> Option<Self> {
        let code = code.trim();
        if code.len() == Self::LEN && code.bytes().all(|b| b.is_ascii_alphanumeric()) {
            Some(Self(code.to_ascii_uppercase()))
        } else {
            None
        }
    }

    /// ランダムなIDを生成する。
    #[must_use]
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let id = (0..Self::LEN)
            .filter_map(|_| Self::ALPHABET.choose(rng))
            .map(|&b| char::from(b))
            .collect();
        Self(id)
    }
}

/// 接続（座席）の識別子。通信路側が採番する。
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Display)]
#[display("seat#{_0}")]
pub struct SeatId(pub u64);

/// ルームの状態。
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, strum::Display)]
#[serde(rename_all = "camelCase")]
pub enum RoomPhase {
    /// 対戦中。
    Active,
    /// 終局、または退出により終了。
    Finished,
    /// 作成者のみ着席。
    WaitingForOpponent,
}

/// ルーム操作の失敗理由。
///
/// いずれの場合もルームの状態は変化しない。
#[derive(Copy, Clone, Debug, Eq, PartialEq, Display, Error)]
#[non_exhaustive]
pub enum SessionError {
    /// 既にそのルームに着席している。
    #[display("Already in this game")]
    AlreadySeated,
    /// 盤外・埋まっているマス・1枚も返らない手。
    #[display("Invalid move")]
    IllegalMove,
    /// ルームが対戦中ではない（相手待ち、または終了済み）。
    #[display("Game is not active")]
    NotActive,
    /// 手番ではない。
    #[display("Not your turn")]
    OutOfTurn,
    /// 既に2人着席している。
    #[display("Game is full")]
    RoomFull,
    /// IDが割り当てられなかった（生成器が既存IDしか返さない）。
    #[display("Could not allocate a game id")]
    RoomIdExhausted,
    /// 存在しない、または既に破棄されたルーム。
    #[display("Game not found")]
    RoomNotFound,
}

/// 着席しているプレイヤー。
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Player {
    /// 石の色。
    pub color: Color,
    /// 表示名。
    pub name: String,
    /// 座席。
    pub seat: SeatId,
}

impl Player {
    /// 空の名前を既定名に置き換えて作る。
    #[must_use]
    pub fn new(seat: SeatId, color: Color, name: &str) -> Self {
        let name = name.trim();
        let name = if name.is_empty() {
            match color {
                Color::Black => DEFAULT_CREATOR_NAME,
                Color::White => DEFAULT_JOINER_NAME,
            }
        } else {
            name
        };

        Self {
            color,
            name: name.to_owned(),
            seat,
        }
    }
}

/// 1ルームの状態。
///
/// 作成者は黒、参加者は白。
#[derive(Clone, Debug)]
pub struct Room {
    /// 黒（作成者）。
    black: Player,
    /// 盤面と手番。
    game: Game,
    /// ルームID。
    id: RoomId,
    /// 状態。
    phase: RoomPhase,
    /// 白（参加者）。
    white: Option<Player>,
}

impl Room {
    /// 作成者（黒）を返す。
    #[inline]
    #[must_use]
    pub const fn black(&self) -> &Player {
        &self.black
    }

    /// ルームを終了状態にする。
    #[inline]
    pub const fn finish(&mut self) {
        self.phase = RoomPhase::Finished;
    }

    /// 進行中のゲームを返す。
    #[inline]
    #[must_use]
    pub const fn game(&self) -> &Game {
        &self.game
    }

    /// 盤面を配信形式で返す。
    #[inline]
    #[must_use]
    pub fn grid(&self) -> Grid {
        self.game.board().grid()
    }

    /// ルームIDを返す。
    #[inline]
    #[must_use]
    pub const fn id(&self) -> &RoomId {
        &self.id
    }

    /// 作成者だけが着席したルームを作る。
    #[must_use]
    pub fn new(id: RoomId, creator: SeatId, creator_name: &str) -> Self {
        Self {
            black: Player::new(creator, Color::Black, creator_name),
            game: Game::initial(),
            id,
            phase: RoomPhase::WaitingForOpponent,
            white: None,
        }
    }

    /// `seat` 以外に着席しているプレイヤーを返す。
    #[must_use]
    pub fn opponent_of(&self, seat: SeatId) -> Option<&Player> {
        self.players().find(|player| player.seat != seat)
    }

    /// 状態を返す。
    #[inline]
    #[must_use]
    pub const fn phase(&self) -> RoomPhase {
        self.phase
    }

    /// `color` の手番で (row, col) に打つ。
    ///
    /// 検査はすべて盤面の書き換え前に行う。
    ///
    /// # Errors
    ///
    /// - `SessionError::NotActive`: 相手待ち、または終了済み
    /// - `SessionError::OutOfTurn`: `color` の手番ではない
    /// - `SessionError::IllegalMove`: 盤外・埋まっている・1枚も返らない
    pub fn play(&mut self, color: Color, row: u8, col: u8) -> Result<MoveReport, SessionError> {
        if self.phase != RoomPhase::Active {
            return Err(SessionError::NotActive);
        }
        if color != self.game.side_to_move() {
            return Err(SessionError::OutOfTurn);
        }

        let square = Square::from_row_col(row, col).ok_or(SessionError::IllegalMove)?;
        let turn = match self.game.play(square) {
            Ok(value) => value,
            Err(err) => {
                debug!(room = %self.id, %color, row, col, error = %err, "move rejected by engine");
                return Err(SessionError::IllegalMove);
            }
        };

        let winner = match turn.status {
            GameStatus::GameOver(outcome) => {
                self.phase = RoomPhase::Finished;
                Some(outcome.winner)
            }
            GameStatus::InProgress => None,
        };

        Ok(MoveReport {
            board: self.grid(),
            col,
            color,
            current_turn: self.game.side_to_move(),
            flipped: turn.mv.flip_count(),
            passed: turn.passed,
            row,
            scores: self.game.scores(),
            winner,
        })
    }

    /// `seat` のプレイヤーを返す。
    #[must_use]
    pub fn player(&self, seat: SeatId) -> Option<&Player> {
        self.players().find(|player| player.seat == seat)
    }

    /// 着席しているプレイヤー（黒、白の順）。
    pub fn players(&self) -> impl Iterator<Item = &Player> {
        core::iter::once(&self.black).chain(self.white.as_ref())
    }

    /// 着席している座席の一覧。
    #[must_use]
    pub fn seats(&self) -> Vec<SeatId> {
        self.players().map(|player| player.seat).collect()
    }

    /// 参加者を白として着席させ、対戦を開始する。
    ///
    /// # Errors
    ///
    /// - `SessionError::RoomNotFound`: 既に終了したルーム
    /// - `SessionError::RoomFull`: 既に2人着席している
    pub fn seat_joiner(&mut self, seat: SeatId, name: &str) -> Result<&Player, SessionError> {
        match self.phase {
            RoomPhase::Finished => return Err(SessionError::RoomNotFound),
            RoomPhase::Active => return Err(SessionError::RoomFull),
            RoomPhase::WaitingForOpponent => {}
        }

        self.phase = RoomPhase::Active;
        Ok(&*self.white.insert(Player::new(seat, Color::White, name)))
    }

    /// 白（参加者）を返す。
    #[inline]
    #[must_use]
    pub const fn white(&self) -> Option<&Player> {
        self.white.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand::rngs::StdRng;

    use super::{Player, Room, RoomId, RoomPhase, SeatId, SessionError};
    use crate::engine::{Board, Color, Game, Square, Winner};

    fn room_id(code: &str) -> RoomId {
        RoomId::parse(code).unwrap_or_else(|| RoomId(String::from("AAAAAA")))
    }

    fn active_room() -> Room {
        let mut room = Room::new(room_id("ABC123"), SeatId(1), "alice");
        assert!(room.seat_joiner(SeatId(2), "bob").is_ok());
        room
    }

    /// 黒が (0,2) に打つと白が打てなくなる対戦中のルーム。
    fn stranding_room() -> Room {
        let bits = |squares: &[(u8, u8)]| {
            squares
                .iter()
                .filter_map(|&(row, col)| Square::from_row_col(row, col))
                .fold(0_u64, |acc, square| acc | square.bit())
        };
        let board = Board::from_raw(bits(&[(0, 0), (7, 0)]), bits(&[(0, 1), (7, 1), (7, 2)]));

        Room {
            black: Player::new(SeatId(1), Color::Black, "alice"),
            game: Game::from_position(board, Color::Black),
            id: room_id("PASS01"),
            phase: RoomPhase::Active,
            white: Some(Player::new(SeatId(2), Color::White, "bob")),
        }
    }

    #[test]
    fn room_id_parsing_is_case_insensitive() {
        assert_eq!(RoomId::parse(" abc12z "), RoomId::parse("ABC12Z"));
        assert_eq!(room_id("abc12z").as_str(), "ABC12Z");
        assert_eq!(RoomId::parse("ABC12"), None);
        assert_eq!(RoomId::parse("ABC-12"), None);
    }

    #[test]
    fn random_ids_use_the_alphabet() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..32 {
            let id = RoomId::random(&mut rng);
            assert_eq!(id.as_str().len(), RoomId::LEN);
            assert_eq!(RoomId::parse(id.as_str()), Some(id));
        }
    }

    #[test]
    fn empty_names_fall_back_to_defaults() {
        let mut room = Room::new(room_id("ABC123"), SeatId(1), "  ");
        assert_eq!(room.black().name, "Player 1");
        assert_eq!(room.phase(), RoomPhase::WaitingForOpponent);

        let joined = room.seat_joiner(SeatId(2), "").map(|p| p.name.clone());
        assert_eq!(joined, Ok(String::from("Player 2")));
        assert_eq!(room.phase(), RoomPhase::Active);
    }

    #[test]
    fn third_seat_is_rejected() {
        let mut room = active_room();
        assert_eq!(
            room.seat_joiner(SeatId(3), "carol").err(),
            Some(SessionError::RoomFull)
        );
        assert_eq!(room.seats(), vec![SeatId(1), SeatId(2)]);
    }

    #[test]
    fn moves_need_an_active_room() {
        let mut room = Room::new(room_id("ABC123"), SeatId(1), "alice");
        assert_eq!(room.play(Color::Black, 2, 3), Err(SessionError::NotActive));
    }

    #[test]
    fn out_of_turn_move_changes_nothing() {
        let mut room = active_room();
        let before = *room.game();

        assert_eq!(room.play(Color::White, 2, 3), Err(SessionError::OutOfTurn));
        assert_eq!(*room.game(), before);
    }

    #[test]
    fn illegal_moves_are_rejected() {
        let mut room = active_room();
        assert_eq!(room.play(Color::Black, 3, 3), Err(SessionError::IllegalMove));
        assert_eq!(room.play(Color::Black, 0, 0), Err(SessionError::IllegalMove));
        assert_eq!(room.play(Color::Black, 9, 0), Err(SessionError::IllegalMove));
        assert_eq!(room.game().side_to_move(), Color::Black);
    }

    #[test]
    fn legal_move_reports_authoritative_state() {
        let mut room = active_room();
        let report = room.play(Color::Black, 2, 3);
        assert!(report.is_ok());
        if let Ok(report) = report {
            assert_eq!(report.flipped, 1);
            assert_eq!(report.current_turn, Color::White);
            assert_eq!((report.scores.black, report.scores.white), (4, 1));
            assert_eq!(report.passed, None);
            assert_eq!(report.winner, None);
        }
    }

    #[test]
    fn stranded_opponent_is_reported_as_passed() {
        let mut room = stranding_room();
        let report = room.play(Color::Black, 0, 2);
        assert!(report.is_ok(), "{report:?}");
        if let Ok(report) = report {
            assert_eq!(report.passed, Some(Color::White));
            assert_eq!(report.current_turn, Color::Black);
            assert_eq!(report.winner, None);
            assert_eq!((report.scores.black, report.scores.white), (4, 2));
        }
        assert_eq!(room.phase(), RoomPhase::Active);

        // 白の番は飛ばされたまま。
        assert_eq!(room.play(Color::White, 7, 3), Err(SessionError::OutOfTurn));
        let last = room.play(Color::Black, 7, 3);
        assert!(matches!(last, Ok(report) if report.winner == Some(Winner::Black)));
        assert_eq!(room.phase(), RoomPhase::Finished);
    }

    #[test]
    fn fools_mate_finishes_the_room() {
        // 最短の終局（9手で白が全滅）。
        let moves = [
            (Color::Black, 4, 5),
            (Color::White, 5, 3),
            (Color::Black, 4, 2),
            (Color::White, 3, 5),
            (Color::Black, 2, 4),
            (Color::White, 5, 5),
            (Color::Black, 4, 6),
            (Color::White, 5, 4),
            (Color::Black, 6, 4),
        ];

        let mut room = active_room();
        let mut last = None;
        for (color, row, col) in moves {
            let report = room.play(color, row, col);
            assert!(report.is_ok(), "{color} ({row},{col}): {report:?}");
            last = report.ok();
        }

        assert_eq!(room.phase(), RoomPhase::Finished);
        assert_eq!(last.and_then(|r| r.winner), Some(Winner::Black));
        assert_eq!(room.play(Color::White, 0, 0), Err(SessionError::NotActive));
    }
}
