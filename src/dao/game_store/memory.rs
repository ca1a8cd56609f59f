use std::sync::Arc;

use dashmap::DashMap;
use futures::future::{self, BoxFuture};

use crate::dao::{game_store::GameStore, models::GameEntity, storage::StorageResult};

/// Process-local store used by tests and local development.
///
/// Records live as native values and are never expired.
#[derive(Clone, Default)]
pub struct MemoryGameStore {
    games: Arc<DashMap<String, GameEntity>>,
}

impl MemoryGameStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored games.
    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}

impl GameStore for MemoryGameStore {
    fn get(&self, id: String) -> BoxFuture<'static, StorageResult<Option<GameEntity>>> {
        let game = self.games.get(&id).map(|entry| entry.value().clone());
        Box::pin(future::ready(Ok(game)))
    }

    fn put(&self, id: String, game: GameEntity) -> BoxFuture<'static, StorageResult<()>> {
        self.games.insert(id, game);
        Box::pin(future::ready(Ok(())))
    }

    fn exists(&self, id: String) -> BoxFuture<'static, StorageResult<bool>> {
        let exists = self.games.contains_key(&id);
        Box::pin(future::ready(Ok(exists)))
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(future::ready(Ok(())))
    }
}
