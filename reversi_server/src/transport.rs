use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use reversi_core::session::{Event, Outbox, SeatId};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::debug;

/// 接続ごとの送信キューへイベントを積む配送先。
///
/// 送信はキューへの追加だけで、ソケットへの書き込みは接続側のタスクが行う。
#[derive(Debug, Default)]
pub struct ChannelOutbox {
    /// 次に払い出す座席番号。
    next_seat: AtomicU64,
    /// 座席ごとの送信口。
    senders: Mutex<HashMap<SeatId, UnboundedSender<Event>>>,
}

impl ChannelOutbox {
    /// 新しい接続に座席を払い出し、受信口を返す。
    pub fn connect(&self) -> (SeatId, UnboundedReceiver<Event>) {
        let seat = SeatId(self.next_seat.fetch_add(1, Ordering::Relaxed));
        let (sender, receiver) = mpsc::unbounded_channel();
        let _: Option<UnboundedSender<Event>> = self
            .senders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(seat, sender);
        debug!(%seat, "seat connected");
        (seat, receiver)
    }

    /// 接続数。
    #[must_use]
    pub fn connections(&self) -> usize {
        self.senders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// 座席の送信口を閉じる（受信側のループは終了する）。
    pub fn disconnect(&self, seat: SeatId) {
        let removed = self
            .senders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&seat);
        if removed.is_some() {
            debug!(%seat, "seat disconnected");
        }
    }
}

impl Outbox for ChannelOutbox {
    fn send(&self, seat: SeatId, event: &Event) {
        let senders = self.senders.lock().unwrap_or_else(PoisonError::into_inner);
        let delivered = senders
            .get(&seat)
            .is_some_and(|sender| sender.send(event.clone()).is_ok());
        if !delivered {
            debug!(%seat, "dropping event for closed seat");
        }
    }
}
