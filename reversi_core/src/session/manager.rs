use std::sync::PoisonError;

use tracing::{info, instrument, warn};

use crate::engine::{Color, Grid};
use crate::session::events::{Event, MoveReport, Outbox};
use crate::session::room::{Room, RoomId, SeatId, SessionError};
use crate::session::store::RoomStore;

/// 作成・参加に成功した座席への返り値。
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RoomTicket {
    /// その時点の盤面。
    pub board: Grid,
    /// 割り当てられた色。
    pub color: Color,
    /// 相手の表示名（相手待ちなら `None`）。
    pub opponent_name: Option<String>,
    /// ルームID。
    pub room_id: RoomId,
}

/// 招待リンクの解決結果。
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum JoinLink {
    /// ルームが存在する（満席でも転送する）。
    Forward(RoomId),
    /// ルームが存在しない。
    NotFound,
}

/// オンライン対局のルームを管理する。
///
/// 同じルームへの操作はルームの `Mutex` で直列化され、
/// 異なるルームへの操作は並行に進む。
#[derive(Debug)]
pub struct SessionManager<O: Outbox> {
    /// 配送先。
    outbox: O,
    /// ルーム表。
    store: RoomStore,
}

impl<O: Outbox> SessionManager<O> {
    /// ルームを作り、作成者を黒として着席させる。
    ///
    /// 既に別のルームにいる座席は、先にそのルームから退出する。
    ///
    /// # Errors
    ///
    /// - `SessionError::RoomIdExhausted`: IDを割り当てられなかった場合
    #[instrument(skip(self), fields(room))]
    pub fn create_room(&self, seat: SeatId, name: &str) -> Result<RoomTicket, SessionError> {
        let _: Option<RoomId> = self.leave_room(seat);

        let (room_id, shared) = self
            .store
            .insert_with(|id| Room::new(id, seat, name))?;
        tracing::Span::current().record("room", tracing::field::display(&room_id));
        self.store.bind_seat(seat, room_id.clone());

        let room = shared.lock().unwrap_or_else(PoisonError::into_inner);
        let creator = room.black();
        info!(player = %creator.name, "room created");

        self.outbox.send(
            seat,
            &Event::GameCreated {
                board: room.grid(),
                game_id: room_id.clone(),
                player_color: Color::Black,
                player_name: creator.name.clone(),
            },
        );

        Ok(RoomTicket {
            board: room.grid(),
            color: Color::Black,
            opponent_name: None,
            room_id,
        })
    }

    /// 座席の切断を処理する。[`Self::leave_room`] と同じ経路を通る。
    #[instrument(skip(self))]
    pub fn handle_disconnect(&self, seat: SeatId) -> Option<RoomId> {
        self.leave_room(seat)
    }

    /// 既存のルームに白として参加する（IDの大小文字は区別しない）。
    ///
    /// 参加が成立してから、座席が元いたルームを退出する。
    /// 拒否された場合はどのルームも変化しない。
    ///
    /// # Errors
    ///
    /// - `SessionError::AlreadySeated`: 自分が着席しているルームへの参加
    /// - `SessionError::RoomNotFound`: 存在しない、または既に終了したルーム
    /// - `SessionError::RoomFull`: 既に2人着席している
    #[instrument(skip(self))]
    pub fn join_room(
        &self,
        seat: SeatId,
        code: &str,
        name: &str,
    ) -> Result<RoomTicket, SessionError> {
        let room_id = RoomId::parse(code).ok_or(SessionError::RoomNotFound)?;
        let previous = self.store.room_of_seat(seat);
        if previous.as_ref() == Some(&room_id) {
            warn!(room = %room_id, "join to own room");
            return Err(SessionError::AlreadySeated);
        }

        let shared = self.store.get(&room_id).ok_or_else(|| {
            warn!(room = %room_id, "join to unknown room");
            SessionError::RoomNotFound
        })?;

        // 元のルームを触る前にロックを手放す。
        let (board, creator, joiner_name) = {
            let mut room = shared.lock().unwrap_or_else(PoisonError::into_inner);
            let joiner_name = match room.seat_joiner(seat, name) {
                Ok(joiner) => joiner.name.clone(),
                Err(err) => {
                    warn!(room = %room_id, error = %err, "join rejected");
                    return Err(err);
                }
            };
            (room.grid(), room.black().clone(), joiner_name)
        };

        if let Some(previous) = previous {
            let _: Option<RoomId> = self.discard(seat, &previous);
        }
        self.store.bind_seat(seat, room_id.clone());
        info!(room = %room_id, creator = %creator.name, joiner = %joiner_name, "opponent joined");

        self.outbox.send(
            seat,
            &Event::GameJoined {
                board,
                game_id: room_id.clone(),
                opponent_name: creator.name.clone(),
                player_color: Color::White,
            },
        );
        self.outbox.send(
            creator.seat,
            &Event::OpponentJoined {
                board,
                opponent_name: joiner_name,
            },
        );

        Ok(RoomTicket {
            board,
            color: Color::White,
            opponent_name: Some(creator.name),
            room_id,
        })
    }

    /// 座席をルームから退出させる（明示的な退出・再開）。
    ///
    /// ルームは終了状態になって破棄され、残った座席には `OpponentLeft` を送る。
    /// 座席がどのルームにも属していなければ `None`。
    #[instrument(skip(self))]
    pub fn leave_room(&self, seat: SeatId) -> Option<RoomId> {
        let room_id = self.store.room_of_seat(seat)?;
        self.discard(seat, &room_id)
    }

    /// `seat` が抜けたものとしてルームを終了・破棄する。
    fn discard(&self, seat: SeatId, room_id: &RoomId) -> Option<RoomId> {
        self.store.unbind_seat(seat, room_id);

        let shared = self.store.remove(room_id)?;
        let mut room = shared.lock().unwrap_or_else(PoisonError::into_inner);
        room.finish();

        let leaver = room
            .player(seat)
            .map_or_else(String::new, |player| player.name.clone());
        if let Some(remaining) = room.opponent_of(seat) {
            self.store.unbind_seat(remaining.seat, room_id);
            self.outbox.send(
                remaining.seat,
                &Event::OpponentLeft {
                    opponent_name: leaver.clone(),
                },
            );
        }

        info!(room = %room_id, player = %leaver, "room discarded");
        Some(room_id.clone())
    }

    /// ルーム表と配送先から作る。
    #[inline]
    #[must_use]
    pub const fn new(store: RoomStore, outbox: O) -> Self {
        Self { outbox, store }
    }

    /// 配送先を返す。
    #[inline]
    #[must_use]
    pub const fn outbox(&self) -> &O {
        &self.outbox
    }

    /// 招待コードを解決する。
    #[must_use]
    pub fn resolve_join_link(&self, code: &str) -> JoinLink {
        match RoomId::parse(code) {
            Some(id) if self.store.contains(&id) => JoinLink::Forward(id),
            _ => JoinLink::NotFound,
        }
    }

    /// 座席が属するルームと、その座席の色を返す。
    #[must_use]
    pub fn seat_context(&self, seat: SeatId) -> Option<(RoomId, Color)> {
        let room_id = self.store.room_of_seat(seat)?;
        let shared = self.store.get(&room_id)?;
        let room = shared.lock().unwrap_or_else(PoisonError::into_inner);
        let color = room.player(seat)?.color;
        Some((room_id, color))
    }

    /// ルーム表を返す。
    #[inline]
    #[must_use]
    pub const fn store(&self) -> &RoomStore {
        &self.store
    }

    /// `color` の手を適用し、両者へ `MoveMade` を配信する。
    ///
    /// 拒否された手は盤面・手番・配信のいずれにも影響しない。
    ///
    /// # Errors
    ///
    /// - `SessionError::RoomNotFound`: 存在しない、または破棄済み
    /// - `SessionError::NotActive`: 相手待ち、または終了済み
    /// - `SessionError::OutOfTurn`: 手番ではない
    /// - `SessionError::IllegalMove`: 不正な手
    #[instrument(skip(self), fields(room = %room_id))]
    pub fn submit_move(
        &self,
        room_id: &RoomId,
        color: Color,
        row: u8,
        col: u8,
    ) -> Result<MoveReport, SessionError> {
        let shared = self.store.get(room_id).ok_or(SessionError::RoomNotFound)?;
        let mut room = shared.lock().unwrap_or_else(PoisonError::into_inner);

        let report = match room.play(color, row, col) {
            Ok(value) => value,
            Err(err) => {
                warn!(error = %err, "move rejected");
                return Err(err);
            }
        };

        self.outbox
            .broadcast(&room.seats(), &Event::MoveMade(report.clone()));

        if let Some(passed) = report.passed {
            info!(%passed, "player passed");
        }
        if let Some(winner) = report.winner {
            info!(
                %winner,
                black = report.scores.black,
                white = report.scores.white,
                "room finished"
            );
        }

        Ok(report)
    }
}
