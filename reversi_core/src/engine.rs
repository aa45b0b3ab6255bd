/// 盤面（ビットボード）と反転処理の実装。
pub mod board;
/// ゲーム進行（手番、パス、終局判定など）の実装。
pub mod game;
/// 合法手の列挙。
pub mod movegen;
pub mod types;

pub type Board = board::Board;
pub type ApplyMoveError = board::ApplyMoveError;
pub type Game = game::Game;
pub type GameStatus = game::Status;
pub type Outcome = game::Outcome;
pub type PlayError = game::PlayError;
pub type Scores = game::Scores;
pub type Winner = game::Winner;
pub type Move = movegen::Move;
pub type Cell = types::Cell;
pub type Color = types::Color;
pub type Grid = types::Grid;
pub type Square = types::Square;
