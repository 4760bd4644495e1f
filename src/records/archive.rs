use super::GameCheckpoint;
use crate::ID;
use crate::Unique;
use crate::gameplay::GameResult;
use crate::gameplay::Match;
use std::collections::BTreeMap;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// The persistence gateway, consumed by rooms and the registry. Every
/// operation is idempotent on retry: the core checkpoints at game start,
/// game terminal, match terminal, and session eviction, and a retried
/// checkpoint must change nothing.
///
/// Snapshots are captured inside the room actor and written from a
/// spawned task, so no write ever sits in the mutation path.
#[async_trait::async_trait]
pub trait Archive: Send + Sync {
    async fn save_match(&self, matchplay: &Match) -> anyhow::Result<()>;
    async fn load_match(&self, id: ID<Match>) -> anyhow::Result<Option<Match>>;
    async fn save_game(&self, checkpoint: &GameCheckpoint) -> anyhow::Result<()>;
    async fn load_game(&self, id: ID<GameCheckpoint>) -> anyhow::Result<Option<GameCheckpoint>>;
    /// Record a finished game under (match, game number). Replays of the
    /// same terminal checkpoint land on the same key.
    async fn append_result(
        &self,
        matchplay: ID<Match>,
        game: usize,
        result: GameResult,
    ) -> anyhow::Result<()>;
}

/// In-memory gateway for tests and single-node play. A database-backed
/// implementation slots in behind the same trait.
#[derive(Default)]
pub struct Ledger {
    matches: RwLock<HashMap<ID<Match>, Match>>,
    games: RwLock<HashMap<ID<GameCheckpoint>, GameCheckpoint>>,
    results: RwLock<BTreeMap<(ID<Match>, usize), GameResult>>,
}

impl Ledger {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
    pub async fn results_for(&self, matchplay: ID<Match>) -> Vec<GameResult> {
        self.results
            .read()
            .await
            .iter()
            .filter(|((id, _), _)| *id == matchplay)
            .map(|(_, result)| *result)
            .collect()
    }
}

#[async_trait::async_trait]
impl Archive for Ledger {
    async fn save_match(&self, matchplay: &Match) -> anyhow::Result<()> {
        self.matches
            .write()
            .await
            .insert(matchplay.id(), matchplay.clone());
        Ok(())
    }
    async fn load_match(&self, id: ID<Match>) -> anyhow::Result<Option<Match>> {
        Ok(self.matches.read().await.get(&id).cloned())
    }
    async fn save_game(&self, checkpoint: &GameCheckpoint) -> anyhow::Result<()> {
        self.games
            .write()
            .await
            .insert(checkpoint.id(), checkpoint.clone());
        Ok(())
    }
    async fn load_game(&self, id: ID<GameCheckpoint>) -> anyhow::Result<Option<GameCheckpoint>> {
        Ok(self.games.read().await.get(&id).cloned())
    }
    async fn append_result(
        &self,
        matchplay: ID<Match>,
        game: usize,
        result: GameResult,
    ) -> anyhow::Result<()> {
        self.results
            .write()
            .await
            .insert((matchplay, game), result);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Stakes;
    use crate::board::Color;
    use crate::gameplay::WinKind;

    fn win(stakes: Stakes) -> GameResult {
        GameResult {
            winner: Color::White,
            kind: WinKind::Normal,
            stakes,
        }
    }

    #[tokio::test]
    async fn match_round_trips() {
        let ledger = Ledger::new();
        let mut m = Match::to(5);
        m.absorb(win(2));
        ledger.save_match(&m).await.unwrap();
        let loaded = ledger.load_match(m.id()).await.unwrap().expect("present");
        assert_eq!(loaded.score(Color::White), 2);
        assert_eq!(loaded.target(), 5);
    }

    #[tokio::test]
    async fn terminal_checkpoint_is_idempotent() {
        let ledger = Ledger::new();
        let mut m = Match::to(5);
        m.absorb(win(2));
        let id = m.id();
        ledger.save_match(&m).await.unwrap();
        ledger.append_result(id, 1, win(2)).await.unwrap();
        // retry the identical terminal checkpoint
        ledger.save_match(&m).await.unwrap();
        ledger.append_result(id, 1, win(2)).await.unwrap();
        let loaded = ledger.load_match(id).await.unwrap().expect("present");
        assert_eq!(loaded.score(Color::White), 2);
        assert_eq!(ledger.results_for(id).await.len(), 1);
    }

    #[tokio::test]
    async fn missing_ids_load_nothing() {
        let ledger = Ledger::new();
        assert!(ledger.load_match(crate::ID::default()).await.unwrap().is_none());
        assert!(ledger.load_game(crate::ID::default()).await.unwrap().is_none());
    }
}
