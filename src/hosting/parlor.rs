use super::Gate;
use super::RoomHandle;
use crate::ID;
use crate::SESSION_TTL_SECS;
use crate::SWEEP_SECS;
use crate::Score;
use crate::TICK_MILLIS;
use crate::Unique;
use crate::board::Color;
use crate::gameplay::Engine;
use crate::gameplay::Match;
use crate::gameroom::Bot;
use crate::gameroom::Clock;
use crate::gameroom::Connection;
use crate::gameroom::Post;
use crate::gameroom::Room;
use crate::gameroom::Session;
use crate::gameroom::Snapshot;
use crate::gameroom::hire;
use crate::records::Archive;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::sync::oneshot;

/// One line of the admin roster.
#[derive(Debug, serde::Serialize)]
pub struct RosterEntry {
    pub session: ID<Session>,
    pub alive: bool,
    pub connections: u64,
    pub finished: bool,
    pub idle_secs: u64,
}

/// The session registry. Maps session ids to room handles and
/// connection ids to sessions, opens rooms on demand, and runs the two
/// background loops: the sweeper that evicts idle rooms and the
/// timekeeper that feeds every room its clock ticks.
///
/// Registry locks guard the maps and nothing else; they are always
/// released before anything is posted to a room, so the registry can
/// never deadlock against a busy mailbox.
pub struct Parlor {
    rooms: RwLock<HashMap<ID<Session>, RoomHandle>>,
    connections: RwLock<HashMap<ID<Connection>, ID<Session>>>,
    archive: Arc<dyn Archive>,
    gate: Arc<dyn Gate>,
}

impl Parlor {
    pub fn new(archive: Arc<dyn Archive>, gate: Arc<dyn Gate>) -> Arc<Self> {
        Arc::new(Self {
            rooms: RwLock::new(HashMap::new()),
            connections: RwLock::new(HashMap::new()),
            archive,
            gate,
        })
    }
    pub fn gate(&self) -> &dyn Gate {
        self.gate.as_ref()
    }

    /// Open a session: a fresh match to `target`, optionally against a
    /// roster bot on the Red side, optionally on the clock.
    pub async fn start(
        &self,
        opponent: Option<&str>,
        target: Score,
        clocked: bool,
    ) -> anyhow::Result<ID<Session>> {
        let matchplay = Match::to(target);
        let clock = clocked.then(|| Clock::chicago(target));
        let mut session = Session::new(matchplay, Engine::new(), clock);
        let mut bots: [Option<Box<dyn Bot>>; 2] = [None, None];
        if let Some(name) = opponent {
            let bot = hire(name).ok_or_else(|| anyhow::anyhow!("no bot named {}", name))?;
            session.reserve(Color::Red, ID::default());
            bots[Color::Red.index()] = Some(bot);
        }
        let id = session.id();
        let handle = Room::spawn(session, bots, self.archive.clone());
        self.rooms.write().await.insert(id, handle);
        Ok(id).inspect(|id| log::info!("opened session {}", id))
    }

    pub async fn handle(&self, id: ID<Session>) -> anyhow::Result<RoomHandle> {
        self.rooms
            .read()
            .await
            .get(&id)
            .cloned()
            .filter(RoomHandle::is_alive)
            .ok_or_else(|| anyhow::anyhow!("session not found"))
    }

    /// Forcible eviction: the room checkpoints and closes.
    pub async fn evict(&self, id: ID<Session>) -> anyhow::Result<()> {
        let handle = self
            .rooms
            .write()
            .await
            .remove(&id)
            .ok_or_else(|| anyhow::anyhow!("session not found"))?;
        let _ = handle.post.send(Post::Evict);
        log::info!("evicted session {}", id);
        Ok(())
    }

    /// Ask a room for its public state.
    pub async fn inspect(&self, id: ID<Session>) -> anyhow::Result<Snapshot> {
        let handle = self.handle(id).await?;
        let (tx, rx) = oneshot::channel();
        handle
            .post
            .send(Post::Inspect { reply: tx })
            .map_err(|_| anyhow::anyhow!("session closed"))?;
        rx.await.map_err(|_| anyhow::anyhow!("session closed"))
    }

    pub async fn reseed(&self, id: ID<Session>, d1: crate::Die, d2: crate::Die) -> anyhow::Result<()> {
        let handle = self.handle(id).await?;
        handle
            .post
            .send(Post::Reseed { d1, d2 })
            .map_err(|_| anyhow::anyhow!("session closed"))
    }

    pub async fn roster(&self) -> Vec<RosterEntry> {
        self.rooms
            .read()
            .await
            .iter()
            .map(|(id, handle)| RosterEntry {
                session: *id,
                alive: handle.is_alive(),
                connections: handle.pulse.links(),
                finished: handle.pulse.is_over(),
                idle_secs: handle.pulse.idle_secs(),
            })
            .collect()
    }

    // connection index

    pub async fn track(&self, conn: ID<Connection>, session: ID<Session>) {
        self.connections.write().await.insert(conn, session);
    }
    pub async fn untrack(&self, conn: ID<Connection>) {
        self.connections.write().await.remove(&conn);
    }
    pub async fn session_of(&self, conn: ID<Connection>) -> Option<ID<Session>> {
        self.connections.read().await.get(&conn).copied()
    }

    /// Spawn the background loops. The sweeper reaps dead rooms and
    /// evicts idle ones; the timekeeper fans clock ticks into every
    /// mailbox. Neither ever holds a registry lock across a post: the
    /// handles are cloned out first.
    pub fn keep(parlor: Arc<Self>) {
        let sweeper = parlor.clone();
        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(std::time::Duration::from_secs(SWEEP_SECS));
            loop {
                interval.tick().await;
                sweeper.sweep().await;
            }
        });
        let timekeeper = parlor;
        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(std::time::Duration::from_millis(TICK_MILLIS));
            loop {
                interval.tick().await;
                let handles = timekeeper
                    .rooms
                    .read()
                    .await
                    .values()
                    .cloned()
                    .collect::<Vec<RoomHandle>>();
                for handle in handles {
                    let _ = handle.post.send(Post::Tick);
                }
            }
        });
    }

    async fn sweep(&self) {
        let stale = self
            .rooms
            .read()
            .await
            .values()
            .filter(|handle| !handle.is_alive() || handle.is_evictable(SESSION_TTL_SECS))
            .cloned()
            .collect::<Vec<RoomHandle>>();
        for handle in stale {
            log::info!("sweeping session {}", handle.id);
            let _ = handle.post.send(Post::Evict);
            self.rooms.write().await.remove(&handle.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hosting::Turnstile;
    use crate::records::Ledger;

    fn parlor() -> Arc<Parlor> {
        Parlor::new(Ledger::new(), Arc::new(Turnstile))
    }

    #[tokio::test]
    async fn start_and_find_a_session() {
        let parlor = parlor();
        let id = parlor.start(None, 5, false).await.expect("start");
        assert!(parlor.handle(id).await.is_ok());
        assert_eq!(parlor.roster().await.len(), 1);
    }

    #[tokio::test]
    async fn unknown_bots_are_refused() {
        let parlor = parlor();
        assert!(parlor.start(Some("deep-blue"), 5, false).await.is_err());
        assert!(parlor.start(Some("pigeon"), 5, false).await.is_ok());
    }

    #[tokio::test]
    async fn eviction_removes_the_session() {
        let parlor = parlor();
        let id = parlor.start(None, 5, false).await.expect("start");
        parlor.evict(id).await.expect("evict");
        assert!(parlor.handle(id).await.is_err());
        assert!(parlor.evict(id).await.is_err());
    }

    #[tokio::test]
    async fn inspection_reads_fresh_state() {
        let parlor = parlor();
        let id = parlor.start(None, 7, false).await.expect("start");
        let snapshot = parlor.inspect(id).await.expect("inspect");
        assert_eq!(snapshot.matchplay.target, 7);
        assert_eq!(snapshot.phase, crate::gameplay::Phase::Waiting);
    }

    #[tokio::test]
    async fn connection_index_tracks_and_forgets() {
        let parlor = parlor();
        let id = parlor.start(None, 5, false).await.expect("start");
        let conn = ID::default();
        parlor.track(conn, id).await;
        assert_eq!(parlor.session_of(conn).await, Some(id));
        parlor.untrack(conn).await;
        assert_eq!(parlor.session_of(conn).await, None);
    }
}
