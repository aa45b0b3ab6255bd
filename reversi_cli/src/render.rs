use std::io::Write;

use reversi_core::engine::{Cell, Color, Winner};
use reversi_core::local::{Notice, Observer, Phase, Snapshot};
use tracing::warn;

/// 列見出し。
const FILES: &str = "abcdefgh";

/// 石の表示。
const fn disc(color: Color) -> char {
    match color {
        Color::Black => 'X',
        Color::White => 'O',
    }
}

/// 端末へ盤面とメッセージを書き出す `Observer`。
#[derive(Debug)]
pub struct Terminal<W: Write> {
    /// 出力先。
    out: W,
}

impl<W: Write> Terminal<W> {
    /// 出力先を取り出す。
    pub fn into_inner(self) -> W {
        self.out
    }

    /// 出力先を指定して作る。
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    /// 1行書き出す。失敗してもゲームは続ける。
    fn line(&mut self, text: &str) {
        if let Err(err) = writeln!(self.out, "{text}") {
            warn!(error = %err, "failed to write to terminal");
        }
    }
}

/// 盤面を文字列にする。着手可能なマスは `*`。
#[must_use]
pub fn board_text(snapshot: &Snapshot) -> String {
    let mut text = String::from("  ");
    for file in FILES.chars() {
        text.push(' ');
        text.push(file);
    }
    text.push('\n');

    for (row, cells) in (0_u8..).zip(snapshot.grid.iter()) {
        let rank = row.saturating_add(1);
        text.push_str(&format!("{rank:>2}"));
        for (col, cell) in (0_u8..).zip(cells.iter()) {
            let mark = match cell {
                Cell::Black => disc(Color::Black),
                Cell::White => disc(Color::White),
                Cell::Empty if snapshot.hints.contains(&(row, col)) => '*',
                Cell::Empty => '.',
            };
            text.push(' ');
            text.push(mark);
        }
        text.push('\n');
    }
    text
}

impl<W: Write> Observer for Terminal<W> {
    fn render(&mut self, snapshot: &Snapshot) {
        let board = board_text(snapshot);
        self.line(&board);
        self.line(&format!(
            "{} {}  {} {}",
            disc(Color::Black),
            snapshot.scores.black,
            disc(Color::White),
            snapshot.scores.white
        ));

        let status = match snapshot.phase {
            Phase::AwaitingHumanMove => format!(
                "{} ({}) to move. Enter a square like d3, r to restart, q to quit.",
                snapshot.current_turn,
                disc(snapshot.current_turn)
            ),
            Phase::ComputerThinking => format!("{} is thinking...", snapshot.current_turn),
            Phase::GameOver(outcome) => match outcome.winner {
                Winner::Draw => String::from("Game over: draw. r to restart, q to quit."),
                Winner::Black | Winner::White => format!(
                    "Game over: {} wins. r to restart, q to quit.",
                    outcome.winner
                ),
            },
        };
        self.line(&status);
    }

    fn notice(&mut self, notice: &Notice) {
        match notice {
            Notice::ComputerThinking(_) => {}
            Notice::InvalidMove(err) => self.line(&format!("Invalid move: {err}")),
            Notice::Passed(color) => self.line(&format!("{color} has no legal move and passes.")),
        }
    }
}
