use std::sync::Arc;

use axum::Router;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::response::{Redirect, Response};
use axum::routing::get;
use futures::{SinkExt as _, StreamExt as _};
use reversi_core::session::{JoinLink, SessionManager};
use tracing::{debug, info, warn};

use crate::protocol::{self, MALFORMED_MESSAGE};
use crate::transport::ChannelOutbox;

/// ハンドラ間で共有するルーム管理。
pub type SharedSessions = Arc<SessionManager<ChannelOutbox>>;

/// HTTP / WebSocket のルーティングを組み立てる。
pub fn router(sessions: SharedSessions) -> Router {
    Router::new()
        .route("/ws", get(ws_upgrade))
        .route("/join/{code}", get(join_link))
        .route("/health", get(health))
        .with_state(sessions)
}

/// 死活確認。
async fn health() -> &'static str {
    "ok"
}

/// 招待リンク。ルームがあれば `/?join=<ID>`、無ければエラー付きでトップへ戻す。
async fn join_link(Path(code): Path<String>, State(sessions): State<SharedSessions>) -> Redirect {
    match sessions.resolve_join_link(&code) {
        JoinLink::Forward(room_id) => {
            debug!(room = %room_id, "forwarding join link");
            Redirect::to(&format!("/?join={room_id}"))
        }
        JoinLink::NotFound => {
            debug!(code, "join link for unknown room");
            Redirect::to("/?error=gamenotfound")
        }
    }
}

/// WebSocket へ昇格する。
async fn ws_upgrade(ws: WebSocketUpgrade, State(sessions): State<SharedSessions>) -> Response {
    ws.on_upgrade(move |socket| serve_socket(socket, sessions))
}

/// 1接続分の送受信。
///
/// 受信側は要求をルーム管理へ渡し、送信側は座席の送信キューをソケットへ流す。
/// 切断はルームの破棄として扱う。
async fn serve_socket(socket: WebSocket, sessions: SharedSessions) {
    let (seat, mut events) = sessions.outbox().connect();
    let (mut sink, mut stream) = socket.split();
    info!(%seat, "client connected");

    let writer = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            let text = match protocol::encode(&event) {
                Ok(value) => value,
                Err(err) => {
                    warn!(error = %err, "failed to encode event");
                    continue;
                }
            };
            if sink.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(frame) = stream.next().await {
        let text = match frame {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) | Err(_) => break,
            Ok(Message::Binary(_) | Message::Ping(_) | Message::Pong(_)) => continue,
        };

        match protocol::decode(text.as_str()) {
            Ok(message) => protocol::dispatch(&*sessions, seat, message),
            Err(err) => {
                debug!(%seat, error = %err, "undecodable frame");
                protocol::reject(&*sessions, seat, MALFORMED_MESSAGE);
            }
        }
    }

    let _: Option<_> = sessions.handle_disconnect(seat);
    sessions.outbox().disconnect(seat);
    if let Err(err) = writer.await {
        warn!(%seat, error = %err, "writer task failed");
    }
    info!(%seat, "client disconnected");
}
