//! 1プロセス内で完結する対局（人間同士、人間対コンピュータ）の手番制御。
//!
//! 状態遷移:
//! `AwaitingHumanMove` / `ComputerThinking` → 着手 → 再判定 →
//! `AwaitingHumanMove` | `ComputerThinking` | `GameOver`。
//! コンピュータの着手前の待ち時間は描画側が持ち、その間は [`Controller::may_act`]
//! が `false` を返すことで人間の入力を止める。

/// 描画側とのインターフェース。
pub mod observer;

use tracing::{debug, info};

use crate::ai::{Difficulty, Opponent, minimax};
use crate::engine::movegen::Move;
use crate::engine::{Color, Game, GameStatus, PlayError, Square};

pub use observer::{Notice, NullObserver, Observer, Phase, Snapshot};

/// 対局形式。
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Mode {
    /// コンピュータ同士。
    ComputerVsComputer {
        /// 黒の難易度。
        black: Difficulty,
        /// 白の難易度。
        white: Difficulty,
    },
    /// 人間（黒）対コンピュータ（白）。
    HumanVsComputer(Difficulty),
    /// 人間同士（1台の端末を交互に使う）。
    HumanVsHuman,
}

/// コンピュータの設定。
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ComputerOptions {
    /// ミニマックスの探索深さ。
    pub depth: u8,
    /// ランダムAIの乱数シード。
    pub seed: u64,
}

impl Default for ComputerOptions {
    #[inline]
    fn default() -> Self {
        Self {
            depth: minimax::DEFAULT_DEPTH,
            seed: u64::MIN,
        }
    }
}

/// 各色の担当。
#[derive(Debug)]
enum Seat {
    /// コンピュータ。
    Computer(Opponent),
    /// 人間。
    Human,
}

impl Seat {
    /// 難易度からコンピュータ席を作る。
    fn computer(difficulty: Difficulty, options: ComputerOptions, salt: u64) -> Self {
        Self::Computer(Opponent::new(
            difficulty,
            options.seed.wrapping_add(salt),
            options.depth,
        ))
    }

    /// 人間の席かを返す。
    const fn is_human(&self) -> bool {
        matches!(self, Self::Human)
    }
}

/// ローカル対局の手番制御。
#[derive(Debug)]
pub struct Controller<O: Observer> {
    /// 黒の担当。
    black: Seat,
    /// 進行中のゲーム。
    game: Game,
    /// 描画側。
    observer: O,
    /// 現在の状態。
    phase: Phase,
    /// 白の担当。
    white: Seat,
}

impl<O: Observer> Controller<O> {
    /// 人間の着手（クリック）を処理する。
    ///
    /// # Errors
    ///
    /// - `PlayError::GameOver`: 終局後
    /// - `PlayError::NotYourTurn`: コンピュータの手番中（入力は無視される）
    /// - `PlayError::OutOfBounds` / `Occupied` / `NoFlips`: 不正な手。
    ///   `Notice::InvalidMove` を通知し、状態も盤面も変えない。
    pub fn click(&mut self, row: u8, col: u8) -> Result<Move, PlayError> {
        match self.phase {
            Phase::GameOver(_) => return Err(PlayError::GameOver),
            Phase::ComputerThinking => return Err(PlayError::NotYourTurn),
            Phase::AwaitingHumanMove => {}
        }

        let result = match Square::from_row_col(row, col) {
            Some(square) => self.game.play(square),
            None => Err(PlayError::OutOfBounds),
        };

        match result {
            Ok(turn) => {
                self.after_turn(turn.passed);
                Ok(turn.mv)
            }
            Err(err) => {
                debug!(row, col, error = %err, "rejected human move");
                self.observer.notice(&Notice::InvalidMove(err));
                Err(err)
            }
        }
    }

    /// 進行中のゲームを返す。
    #[inline]
    #[must_use]
    pub const fn game(&self) -> &Game {
        &self.game
    }

    /// コンピュータの手番かどうか（この間は人間の入力を無視する）。
    #[inline]
    #[must_use]
    pub const fn is_computer_turn(&self) -> bool {
        matches!(self.phase, Phase::ComputerThinking)
    }

    /// 人間が今操作してよいかを返す。
    #[inline]
    #[must_use]
    pub const fn may_act(&self) -> bool {
        matches!(self.phase, Phase::AwaitingHumanMove)
    }

    /// 対局を開始する。
    ///
    /// 開始直後に1回描画し、先手がコンピュータなら `ComputerThinking` から始まる。
    #[must_use]
    pub fn new(mode: Mode, options: ComputerOptions, observer: O) -> Self {
        let (black, white) = match mode {
            Mode::HumanVsHuman => (Seat::Human, Seat::Human),
            Mode::HumanVsComputer(difficulty) => {
                (Seat::Human, Seat::computer(difficulty, options, 1))
            }
            Mode::ComputerVsComputer { black, white } => (
                Seat::computer(black, options, 0),
                Seat::computer(white, options, 1),
            ),
        };

        info!(?mode, ?options, "starting local game");

        let mut controller = Self {
            black,
            game: Game::initial(),
            observer,
            phase: Phase::AwaitingHumanMove,
            white,
        };
        controller.settle();
        controller
    }

    /// 描画側への参照を返す。
    #[inline]
    #[must_use]
    pub const fn observer(&self) -> &O {
        &self.observer
    }

    /// 現在の状態を返す。
    #[inline]
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// コンピュータの手を1手進める。
    ///
    /// 手が無ければパスを記録する。いずれの場合も再判定して次の状態へ進む。
    ///
    /// # Errors
    ///
    /// - `PlayError::GameOver`: 終局後
    /// - `PlayError::NotYourTurn`: コンピュータの手番ではない
    pub fn play_computer_turn(&mut self) -> Result<Option<Move>, PlayError> {
        match self.phase {
            Phase::GameOver(_) => return Err(PlayError::GameOver),
            Phase::AwaitingHumanMove => return Err(PlayError::NotYourTurn),
            Phase::ComputerThinking => {}
        }

        let side = self.game.side_to_move();
        let board = self.game.board();
        let legal = self.game.legal_moves();

        let chosen = match self.seat_mut(side) {
            Seat::Computer(opponent) => opponent.choose(board, side, &legal),
            Seat::Human => return Err(PlayError::NotYourTurn),
        };

        match chosen {
            Some(mv) => {
                let turn = self.game.play(mv.square())?;
                debug!(%side, row = mv.row(), col = mv.col(), flips = mv.flip_count(), "computer moved");
                self.after_turn(turn.passed);
                Ok(Some(mv))
            }
            None => {
                let _: GameStatus = self.game.pass()?;
                self.observer.notice(&Notice::Passed(side));
                self.settle();
                Ok(None)
            }
        }
    }

    /// 現在の状態をそのまま描画し直す。
    pub fn refresh(&mut self) {
        let snapshot = self.snapshot();
        self.observer.render(&snapshot);
    }

    /// 盤面を初期化して対局をやり直す（終局後も可）。
    pub fn restart(&mut self) {
        info!("restarting local game");
        self.game = Game::initial();
        self.settle();
    }

    /// 描画用の状態を組み立てる。
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        let hints = if self.may_act() {
            self.game
                .legal_moves()
                .iter()
                .map(|mv| (mv.row(), mv.col()))
                .collect()
        } else {
            Vec::new()
        };

        Snapshot {
            consecutive_passes: self.game.consecutive_passes(),
            current_turn: self.game.side_to_move(),
            grid: self.game.board().grid(),
            hints,
            phase: self.phase,
            scores: self.game.scores(),
        }
    }

    /// 着手後の処理（パス通知と再判定）。
    fn after_turn(&mut self, passed: Option<Color>) {
        if let Some(color) = passed {
            self.observer.notice(&Notice::Passed(color));
        }
        self.settle();
    }

    /// 指定色の担当を返す。
    const fn seat(&self, color: Color) -> &Seat {
        match color {
            Color::Black => &self.black,
            Color::White => &self.white,
        }
    }

    /// 指定色の担当への可変参照を返す。
    const fn seat_mut(&mut self, color: Color) -> &mut Seat {
        match color {
            Color::Black => &mut self.black,
            Color::White => &mut self.white,
        }
    }

    /// ゲームの状態から次の `Phase` を決めて描画する。
    fn settle(&mut self) {
        self.phase = match self.game.status() {
            GameStatus::GameOver(outcome) => {
                info!(
                    winner = %outcome.winner,
                    black = outcome.scores.black,
                    white = outcome.scores.white,
                    "local game over"
                );
                Phase::GameOver(outcome)
            }
            GameStatus::InProgress => {
                let side = self.game.side_to_move();
                if self.seat(side).is_human() {
                    Phase::AwaitingHumanMove
                } else {
                    self.observer.notice(&Notice::ComputerThinking(side));
                    Phase::ComputerThinking
                }
            }
        };

        self.refresh();
    }
}

#[cfg(test)]
mod tests {
    use super::{ComputerOptions, Controller, Mode, Notice, Observer, Phase, Snapshot};
    use crate::ai::Difficulty;
    use crate::engine::{Board, Color, Game, PlayError, Square, Winner};

    /// 通知を記録するだけの `Observer`。
    #[derive(Debug, Default)]
    struct Recorder {
        notices: Vec<Notice>,
        renders: Vec<Snapshot>,
    }

    impl Observer for Recorder {
        fn render(&mut self, snapshot: &Snapshot) {
            self.renders.push(snapshot.clone());
        }

        fn notice(&mut self, notice: &Notice) {
            self.notices.push(*notice);
        }
    }

    fn human_vs_computer() -> Controller<Recorder> {
        Controller::new(
            Mode::HumanVsComputer(Difficulty::Easy),
            ComputerOptions::default(),
            Recorder::default(),
        )
    }

    /// 黒が (0,2) に打つと白が打てなくなる局面。
    fn white_stranded_game() -> Game {
        let bits = |squares: &[(u8, u8)]| {
            squares
                .iter()
                .filter_map(|&(row, col)| Square::from_row_col(row, col))
                .fold(0_u64, |acc, square| acc | square.bit())
        };
        let board = Board::from_raw(bits(&[(0, 0), (7, 0)]), bits(&[(0, 1), (7, 1), (7, 2)]));
        Game::from_position(board, Color::Black)
    }

    #[test]
    fn starts_waiting_for_human_with_hints() {
        let controller = human_vs_computer();
        assert_eq!(controller.phase(), Phase::AwaitingHumanMove);
        assert!(controller.may_act());

        let first = controller.observer().renders.first().cloned();
        assert!(first.is_some());
        if let Some(snapshot) = first {
            assert_eq!(snapshot.current_turn, Color::Black);
            assert_eq!(snapshot.hints, vec![(2, 3), (3, 2), (4, 5), (5, 4)]);
        }
    }

    #[test]
    fn illegal_click_only_signals_an_error() {
        let mut controller = human_vs_computer();
        let before = *controller.game();
        let renders = controller.observer().renders.len();

        assert_eq!(controller.click(3, 3), Err(PlayError::Occupied));
        assert_eq!(controller.click(0, 0), Err(PlayError::NoFlips));
        assert_eq!(controller.click(8, 0), Err(PlayError::OutOfBounds));

        assert_eq!(*controller.game(), before);
        assert_eq!(controller.phase(), Phase::AwaitingHumanMove);
        assert_eq!(controller.observer().renders.len(), renders);
        assert_eq!(
            controller.observer().notices,
            vec![
                Notice::InvalidMove(PlayError::Occupied),
                Notice::InvalidMove(PlayError::NoFlips),
                Notice::InvalidMove(PlayError::OutOfBounds),
            ]
        );
    }

    #[test]
    fn human_move_hands_over_to_computer_and_blocks_input() {
        let mut controller = human_vs_computer();
        assert!(controller.click(2, 3).is_ok());

        assert_eq!(controller.phase(), Phase::ComputerThinking);
        assert!(controller.is_computer_turn());
        assert!(!controller.may_act());
        assert_eq!(controller.click(2, 2), Err(PlayError::NotYourTurn));
        assert!(
            controller
                .observer()
                .notices
                .contains(&Notice::ComputerThinking(Color::White))
        );

        let reply = controller.play_computer_turn();
        assert!(matches!(reply, Ok(Some(_))));
        assert_eq!(controller.phase(), Phase::AwaitingHumanMove);
        assert_eq!(controller.game().side_to_move(), Color::Black);
    }

    #[test]
    fn stranded_computer_passes_back_to_the_human() {
        let mut controller = human_vs_computer();
        controller.game = white_stranded_game();
        controller.observer.notices.clear();

        assert!(controller.click(0, 2).is_ok());
        assert_eq!(controller.observer().notices, vec![Notice::Passed(Color::White)]);
        assert_eq!(controller.phase(), Phase::AwaitingHumanMove);
        assert!(controller.may_act());
        assert_eq!(controller.game().side_to_move(), Color::Black);

        let last = controller.observer().renders.last().cloned();
        assert!(last.is_some());
        if let Some(snapshot) = last {
            assert_eq!(snapshot.current_turn, Color::Black);
            assert_eq!(snapshot.consecutive_passes, 1);
            assert_eq!(snapshot.hints, vec![(7, 3)]);
        }
    }

    #[test]
    fn computer_turn_is_rejected_while_human_to_move() {
        let mut controller = human_vs_computer();
        assert_eq!(controller.play_computer_turn(), Err(PlayError::NotYourTurn));
    }

    #[test]
    fn computer_vs_computer_runs_to_game_over_and_restarts() {
        let mut controller = Controller::new(
            Mode::ComputerVsComputer {
                black: Difficulty::VeryEasy,
                white: Difficulty::Hard,
            },
            ComputerOptions { depth: 1, seed: 9 },
            Recorder::default(),
        );

        for _ in 0_u16..200 {
            if !controller.is_computer_turn() {
                break;
            }
            assert!(controller.play_computer_turn().is_ok());
        }

        let phase = controller.phase();
        assert!(matches!(phase, Phase::GameOver(_)), "{phase:?}");
        if let Phase::GameOver(outcome) = phase {
            let scores = controller.game().scores();
            assert_eq!(outcome.scores, scores);
            let expected = Winner::from_scores(scores);
            assert_eq!(outcome.winner, expected);
            let board = controller.game().board();
            assert!(!board.can_play(Color::Black) && !board.can_play(Color::White));
        }
        assert_eq!(controller.click(0, 0), Err(PlayError::GameOver));

        controller.restart();
        assert_eq!(controller.game().scores().black, 2);
        assert_eq!(controller.phase(), Phase::ComputerThinking);
    }

    #[test]
    fn human_vs_human_alternates_without_computer() {
        let mut controller = Controller::new(
            Mode::HumanVsHuman,
            ComputerOptions::default(),
            Recorder::default(),
        );
        assert!(controller.click(2, 3).is_ok());
        assert!(controller.may_act());
        assert_eq!(controller.game().side_to_move(), Color::White);
        assert!(controller.click(2, 2).is_ok());
        assert_eq!(controller.game().side_to_move(), Color::Black);
    }
}
