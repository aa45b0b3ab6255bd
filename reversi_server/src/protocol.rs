use reversi_core::session::{Event, Outbox, SeatId, SessionError, SessionManager};
use serde::Deserialize;
use tracing::{debug, warn};

/// 解釈できないメッセージへの応答。
pub const MALFORMED_MESSAGE: &str = "Malformed message";

/// クライアントから届く要求。
///
/// ルームIDと色は接続自身の座席から補うため、要求には含めない。
#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    /// ルームを作る。
    CreateGame {
        /// 表示名（空なら既定名）。
        #[serde(default)]
        player_name: String,
    },
    /// ルームに参加する。
    JoinGame {
        /// ルームID。
        game_id: String,
        /// 表示名（空なら既定名）。
        #[serde(default)]
        player_name: String,
    },
    /// ルームから退出する（再開）。
    LeaveGame,
    /// 石を置く。
    MakeMove {
        /// 列。
        col: u8,
        /// 行。
        row: u8,
    },
}

/// テキストフレームを要求として解釈する。
///
/// # Errors
///
/// JSON として、または既知の要求として解釈できない場合。
pub fn decode(text: &str) -> Result<ClientMessage, serde_json::Error> {
    serde_json::from_str(text)
}

/// イベントをテキストフレームへ変換する。
///
/// # Errors
///
/// シリアライズに失敗した場合。
pub fn encode(event: &Event) -> Result<String, serde_json::Error> {
    serde_json::to_string(event)
}

/// 1つの要求を処理する。失敗は送信者にだけ `error` として返す。
pub fn dispatch<O: Outbox>(sessions: &SessionManager<O>, seat: SeatId, message: ClientMessage) {
    debug!(%seat, ?message, "client message");

    let result = match message {
        ClientMessage::CreateGame { player_name } => {
            sessions.create_room(seat, &player_name).map(drop)
        }
        ClientMessage::JoinGame {
            game_id,
            player_name,
        } => sessions.join_room(seat, &game_id, &player_name).map(drop),
        ClientMessage::LeaveGame => {
            let _: Option<_> = sessions.leave_room(seat);
            Ok(())
        }
        ClientMessage::MakeMove { col, row } => match sessions.seat_context(seat) {
            Some((room_id, color)) => sessions.submit_move(&room_id, color, row, col).map(drop),
            None => Err(SessionError::RoomNotFound),
        },
    };

    if let Err(err) = result {
        reject(sessions, seat, &err.to_string());
    }
}

/// 送信者にだけ `error` を返す。
pub fn reject<O: Outbox>(sessions: &SessionManager<O>, seat: SeatId, message: &str) {
    warn!(%seat, message, "request rejected");
    sessions.outbox().send(
        seat,
        &Event::Error {
            message: message.to_owned(),
        },
    );
}
