//! サーバー権威のオンライン対局。
//!
//! ルームは `WaitingForOpponent → Active → Finished` と遷移する。
//! 盤面の正は常にサーバー側にあり、クライアントへは [`Event`] で配信する。

/// クライアントへ配信するイベント。
pub mod events;
/// ルーム管理の操作。
pub mod manager;
/// 1ルームの状態。
pub mod room;
/// ルームの保持と座席索引。
pub mod store;

pub use events::{Event, MoveReport, Outbox};
pub use manager::{JoinLink, RoomTicket, SessionManager};
pub use room::{Player, Room, RoomId, RoomPhase, SeatId, SessionError};
pub use store::RoomStore;
