use crate::ID;
use crate::gameroom::Post;
use crate::gameroom::Session;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::time::SystemTime;
use tokio::sync::mpsc::UnboundedSender;

/// Heartbeat a room shares with the registry so the sweeper can judge
/// eviction without ever touching session state: last activity, live
/// connection count, and whether the match has completed.
#[derive(Debug, Default)]
pub struct Pulse {
    seen: AtomicU64,
    links: AtomicU64,
    over: AtomicBool,
}

impl Pulse {
    fn now() -> u64 {
        SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .expect("time moves slow")
            .as_secs()
    }
    pub fn beat(&self) {
        self.seen.store(Self::now(), Ordering::Relaxed);
    }
    pub fn idle_secs(&self) -> u64 {
        Self::now().saturating_sub(self.seen.load(Ordering::Relaxed))
    }
    pub fn set_links(&self, n: usize) {
        self.links.store(n as u64, Ordering::Relaxed);
    }
    pub fn links(&self) -> u64 {
        self.links.load(Ordering::Relaxed)
    }
    pub fn finish(&self) {
        self.over.store(true, Ordering::Relaxed);
    }
    pub fn is_over(&self) -> bool {
        self.over.load(Ordering::Relaxed)
    }
}

/// Handle to a running room: its mailbox plus the heartbeat. Liveness is
/// the mailbox staying open; a room whose task ended reads as dead and
/// gets swept.
#[derive(Debug, Clone)]
pub struct RoomHandle {
    pub id: ID<Session>,
    pub post: UnboundedSender<Post>,
    pub pulse: Arc<Pulse>,
}

impl RoomHandle {
    pub fn is_alive(&self) -> bool {
        !self.post.is_closed()
    }
    /// Eviction policy: idle beyond the TTL, and either finished or
    /// abandoned by every connection. A live game with a present player
    /// is never swept.
    pub fn is_evictable(&self, ttl_secs: u64) -> bool {
        self.idle(ttl_secs) && (self.pulse.is_over() || self.pulse.links() == 0)
    }
    fn idle(&self, ttl_secs: u64) -> bool {
        self.pulse.idle_secs() > ttl_secs
    }
}
