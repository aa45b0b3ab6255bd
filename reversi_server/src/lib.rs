//! Reversi のオンライン対局サーバー。
//!
//! WebSocket でクライアントの要求を受け、`reversi_core::session` のルーム管理へ中継する。
//! 盤面の正はサーバー側にのみあり、クライアントへはイベントとして配信する。

#![forbid(unsafe_code)]

/// 設定（TOML、CLI、環境変数）。
pub mod config;
/// `tracing` の初期化。
pub mod logging;
/// クライアントとのメッセージ形式と要求の処理。
pub mod protocol;
/// HTTP / WebSocket のルーティング。
pub mod routes;
/// 接続ごとの送信キュー。
pub mod transport;

use std::sync::Arc;

use reversi_core::session::{RoomStore, SessionManager};

pub use routes::{SharedSessions, router};
pub use transport::ChannelOutbox;

/// 空のルーム表でルーム管理を作る。
#[must_use]
pub fn new_sessions() -> SharedSessions {
    Arc::new(SessionManager::new(RoomStore::new(), ChannelOutbox::default()))
}
