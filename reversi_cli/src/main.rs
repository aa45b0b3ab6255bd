//! 端末で遊ぶローカル対局。

mod input;
mod render;

use std::io::{self, BufRead as _};
use std::thread;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use reversi_core::ai::{Difficulty, minimax};
use reversi_core::local::{ComputerOptions, Controller, Mode, Phase};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::input::Command;
use crate::render::Terminal;

/// 対局形式。
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum ModeArg {
    /// コンピュータ同士。
    ComputerVsComputer,
    /// 人間（黒）対コンピュータ（白）。
    HumanVsComputer,
    /// 人間同士。
    HumanVsHuman,
}

/// コマンドライン引数。
#[derive(Debug, Parser)]
#[command(name = "reversi_cli", about = "Play Reversi in the terminal")]
struct Cli {
    /// 黒のコンピュータの難易度（computer-vs-computer のみ。省略時は `--difficulty`）。
    #[arg(long)]
    black_difficulty: Option<Difficulty>,

    /// ミニマックスの探索深さ。
    #[arg(long, default_value_t = minimax::DEFAULT_DEPTH)]
    depth: u8,

    /// コンピュータの難易度（very-easy, easy, medium, hard）。
    #[arg(long, default_value_t = Difficulty::Easy)]
    difficulty: Difficulty,

    /// 対局形式。
    #[arg(long, value_enum, default_value_t = ModeArg::HumanVsComputer)]
    mode: ModeArg,

    /// ランダムAIの乱数シード。
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// コンピュータが打つまでの待ち時間（ミリ秒）。
    #[arg(long, default_value_t = 500)]
    think_ms: u64,
}

impl Cli {
    /// 対局形式を組み立てる。
    fn mode(&self) -> Mode {
        match self.mode {
            ModeArg::HumanVsHuman => Mode::HumanVsHuman,
            ModeArg::HumanVsComputer => Mode::HumanVsComputer(self.difficulty),
            ModeArg::ComputerVsComputer => Mode::ComputerVsComputer {
                black: self.black_difficulty.unwrap_or(self.difficulty),
                white: self.difficulty,
            },
        }
    }
}

/// ログは標準エラーへ（既定は `warn`）。
fn init_logging() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!(err))
}

fn main() -> anyhow::Result<()> {
    init_logging()?;
    let cli = Cli::parse();

    let options = ComputerOptions {
        depth: cli.depth,
        seed: cli.seed,
    };
    let think = Duration::from_millis(cli.think_ms);
    let mut controller = Controller::new(cli.mode(), options, Terminal::new(io::stdout()));
    let mut lines = io::stdin().lock().lines();

    loop {
        if controller.phase() == Phase::ComputerThinking {
            thread::sleep(think);
            if let Err(err) = controller.play_computer_turn() {
                warn!(error = %err, "computer turn rejected");
            }
            continue;
        }

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;

        match input::parse(&line) {
            Some(Command::Quit) => break,
            Some(Command::Restart) => controller.restart(),
            Some(Command::Help) | None => controller.refresh(),
            Some(Command::Place { col, row }) => {
                // 不正な手は Observer に通知済み。
                let _: Result<_, _> = controller.click(row, col);
            }
        }
    }

    info!("bye");
    Ok(())
}
