//! Reversi (Othello) core logic.
//!
//! このクレートは盤面と進行を扱う `engine`、手を選択する `ai`、
//! ローカル対局の手番制御 `local`、オンライン対局のルーム管理 `session` を提供します。
//! 描画や入力、通信路（`reversi_cli` / `reversi_server`）から利用されることを想定しています。

#![forbid(unsafe_code)]

/// ゲームルール・盤面・進行を提供するモジュール。
pub mod engine;

/// AI（手選択アルゴリズム）を提供するモジュール。
pub mod ai;

/// 1プロセス内で完結する対局の手番制御。
pub mod local;

/// サーバー権威のオンライン対局ルーム管理。
pub mod session;
