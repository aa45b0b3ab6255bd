use serde::Serialize;

use crate::engine::{Color, Grid, Scores, Winner};
use crate::session::room::{RoomId, SeatId};

/// 着手1回分の結果（権威側の状態）。
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveReport {
    /// 着手後の盤面。
    pub board: Grid,
    /// 列。
    pub col: u8,
    /// 打った側。
    #[serde(rename = "playerColor")]
    pub color: Color,
    /// 次の手番（パスを反映済み）。
    pub current_turn: Color,
    /// 反転した枚数。
    pub flipped: u32,
    /// 打てずにパスした側。
    pub passed: Option<Color>,
    /// 行。
    pub row: u8,
    /// 着手後の石数。
    pub scores: Scores,
    /// 終局した場合の勝者。
    pub winner: Option<Winner>,
}

/// クライアントへ配信するイベント。
///
/// JSON では `"type"` で区別する。
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Event {
    /// 処理できなかった要求への応答（送信者にのみ届く）。
    Error {
        /// 理由。
        message: String,
    },
    /// ルーム作成の確認（作成者へ）。
    GameCreated {
        /// 初期盤面。
        board: Grid,
        /// ルームID。
        game_id: RoomId,
        /// 作成者の色（常に黒）。
        player_color: Color,
        /// 作成者の表示名。
        player_name: String,
    },
    /// 参加の確認（参加者へ）。
    GameJoined {
        /// 現在の盤面。
        board: Grid,
        /// ルームID。
        game_id: RoomId,
        /// 相手（作成者）の表示名。
        opponent_name: String,
        /// 参加者の色（常に白）。
        player_color: Color,
    },
    /// 着手の配信（両者へ）。
    MoveMade(MoveReport),
    /// 相手の参加通知（作成者へ）。
    OpponentJoined {
        /// 現在の盤面。
        board: Grid,
        /// 参加者の表示名。
        opponent_name: String,
    },
    /// 相手の退出通知。ルームは破棄済み。
    OpponentLeft {
        /// 退出した側の表示名。
        opponent_name: String,
    },
}

/// イベントの配送先（通信路）。
///
/// 実装は非同期の送信キューへ積むだけで、ブロックしてはならない。
pub trait Outbox {
    /// 1つの座席へ送る。切断済みの座席へは黙って捨ててよい。
    fn send(&self, seat: SeatId, event: &Event);

    /// 複数の座席へ送る。
    fn broadcast(&self, seats: &[SeatId], event: &Event) {
        for &seat in seats {
            self.send(seat, event);
        }
    }
}
