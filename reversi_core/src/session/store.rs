use core::fmt;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use tracing::debug;

use crate::session::room::{Room, RoomId, SeatId, SessionError};

/// ID生成を諦めるまでの試行回数。
pub const MAX_ID_ATTEMPTS: u32 = 64;

/// ルームIDの生成器。
pub type IdGenerator = Box<dyn FnMut() -> RoomId + Send>;

/// 共有ルーム。
pub type SharedRoom = Arc<Mutex<Room>>;

/// ルームの保持と、座席 → ルームの索引。
///
/// 表のロックは検索・追加・削除の間だけ保持し、ルームのロック中には取らない。
pub struct RoomStore {
    /// ID生成器。
    next_id: Mutex<IdGenerator>,
    /// ルーム表。
    rooms: RwLock<HashMap<RoomId, SharedRoom>>,
    /// 座席索引。
    seats: Mutex<HashMap<SeatId, RoomId>>,
}

impl RoomStore {
    /// 座席をルームに結び付ける。
    pub fn bind_seat(&self, seat: SeatId, id: RoomId) {
        let mut seats = self.seats.lock().unwrap_or_else(PoisonError::into_inner);
        let _: Option<RoomId> = seats.insert(seat, id);
    }

    /// ルームが存在するかを返す。
    #[must_use]
    pub fn contains(&self, id: &RoomId) -> bool {
        self.rooms
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(id)
    }

    /// ルームを取得する。
    #[must_use]
    pub fn get(&self, id: &RoomId) -> Option<SharedRoom> {
        self.rooms
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    /// 未使用のIDを割り当て、`make` で作ったルームを登録する。
    ///
    /// 生成したIDが使用中なら作り直す。
    ///
    /// # Errors
    ///
    /// - `SessionError::RoomIdExhausted`: [`MAX_ID_ATTEMPTS`] 回続けて使用中のIDだった場合
    pub fn insert_with(
        &self,
        make: impl FnOnce(RoomId) -> Room,
    ) -> Result<(RoomId, SharedRoom), SessionError> {
        let mut next_id = self.next_id.lock().unwrap_or_else(PoisonError::into_inner);
        let mut rooms = self.rooms.write().unwrap_or_else(PoisonError::into_inner);

        for attempt in 0..MAX_ID_ATTEMPTS {
            let id = (*next_id)();
            if rooms.contains_key(&id) {
                debug!(%id, attempt, "room id collision, regenerating");
                continue;
            }

            let room = Arc::new(Mutex::new(make(id.clone())));
            let _: Option<SharedRoom> = rooms.insert(id.clone(), Arc::clone(&room));
            return Ok((id, room));
        }

        Err(SessionError::RoomIdExhausted)
    }

    /// ルームが無いか。
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 登録中のルーム数。
    #[must_use]
    pub fn len(&self) -> usize {
        self.rooms.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// 乱数でIDを生成するストア。
    #[must_use]
    pub fn new() -> Self {
        Self::with_id_generator(|| RoomId::random(&mut rand::thread_rng()))
    }

    /// ルームを表から外して返す。
    pub fn remove(&self, id: &RoomId) -> Option<SharedRoom> {
        self.rooms
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id)
    }

    /// 座席が属するルームIDを返す。
    #[must_use]
    pub fn room_of_seat(&self, seat: SeatId) -> Option<RoomId> {
        self.seats
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&seat)
            .cloned()
    }

    /// 座席の結び付けを外す（別のルームに結び直されていれば何もしない）。
    pub fn unbind_seat(&self, seat: SeatId, id: &RoomId) {
        let mut seats = self.seats.lock().unwrap_or_else(PoisonError::into_inner);
        if seats.get(&seat) == Some(id) {
            let _: Option<RoomId> = seats.remove(&seat);
        }
    }

    /// ID生成器を指定して作る。
    #[must_use]
    pub fn with_id_generator(generator: impl FnMut() -> RoomId + Send + 'static) -> Self {
        Self {
            next_id: Mutex::new(Box::new(generator)),
            rooms: RwLock::new(HashMap::new()),
            seats: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for RoomStore {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RoomStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoomStore")
            .field("rooms", &self.len())
            .finish_non_exhaustive()
    }
}
