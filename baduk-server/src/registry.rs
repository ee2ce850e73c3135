use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use baduk_engine::GameState;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

pub type GameId = i64;

#[derive(Debug, Clone)]
pub struct GameRecord {
    pub id: GameId,
    pub state: GameState,
    pub created_at: DateTime<Utc>,
}

/// In-memory game store.
///
/// The outer lock only guards the id map and is never held across a
/// per-game lock acquisition. Each game sits behind its own lock, so
/// mutations of one game are serialized while other games proceed.
#[derive(Debug, Clone)]
pub struct GameRegistry {
    games: Arc<RwLock<HashMap<GameId, Arc<RwLock<GameRecord>>>>>,
    next_id: Arc<AtomicI64>,
}

impl GameRegistry {
    pub fn new() -> Self {
        GameRegistry {
            games: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }

    pub async fn create(&self, size: u8) -> GameRecord {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let record = GameRecord {
            id,
            state: GameState::new(size),
            created_at: Utc::now(),
        };
        self.games
            .write()
            .await
            .insert(id, Arc::new(RwLock::new(record.clone())));
        record
    }

    /// Snapshot of a game, taken under its read lock.
    pub async fn get(&self, id: GameId) -> Option<GameRecord> {
        let slot = self.slot(id).await?;
        let record = slot.read().await;
        Some(record.clone())
    }

    /// Run `f` with exclusive access to one game. Returns `None` for an
    /// unknown id.
    pub async fn with_game_mut<T>(
        &self,
        id: GameId,
        f: impl FnOnce(&mut GameRecord) -> T,
    ) -> Option<T> {
        let slot = self.slot(id).await?;
        let mut record = slot.write().await;
        Some(f(&mut record))
    }

    pub async fn remove(&self, id: GameId) -> bool {
        self.games.write().await.remove(&id).is_some()
    }

    pub async fn count(&self) -> usize {
        self.games.read().await.len()
    }

    async fn slot(&self, id: GameId) -> Option<Arc<RwLock<GameRecord>>> {
        self.games.read().await.get(&id).cloned()
    }
}

impl Default for GameRegistry {
    fn default() -> Self {
        Self::new()
    }
}
