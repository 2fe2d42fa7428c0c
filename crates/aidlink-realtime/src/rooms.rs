//! Joined-room bookkeeping.

use dashmap::DashMap;

use aidlink_core::events::Room;

/// Tracks which broadcast rooms the client has joined.
///
/// Keyed by wire name so lookups match what actually went over the
/// socket. Join is idempotent; the boolean returns tell callers whether
/// a frame needs to be sent at all.
#[derive(Debug, Default)]
pub struct RoomTracker {
    /// Wire name → room.
    rooms: DashMap<String, Room>,
}

impl RoomTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a join. Returns `true` if the room was newly joined.
    pub fn join(&self, room: &Room) -> bool {
        self.rooms.insert(room.to_string(), *room).is_none()
    }

    /// Record a leave. Returns `true` if the room was joined.
    pub fn leave(&self, room: &Room) -> bool {
        self.rooms.remove(&room.to_string()).is_some()
    }

    /// Check membership.
    pub fn contains(&self, room: &Room) -> bool {
        self.rooms.contains_key(&room.to_string())
    }

    /// All currently joined rooms.
    pub fn all(&self) -> Vec<Room> {
        self.rooms.iter().map(|entry| *entry.value()).collect()
    }

    /// Forget every room, returning what was joined.
    pub fn clear(&self) -> Vec<Room> {
        let joined = self.all();
        self.rooms.clear();
        joined
    }

    /// Number of joined rooms.
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    /// Whether no rooms are joined.
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}
