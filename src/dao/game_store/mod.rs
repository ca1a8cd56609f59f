pub mod memory;
#[cfg(feature = "redis-store")]
pub mod redis;

use futures::future::BoxFuture;

use crate::dao::models::GameEntity;
use crate::dao::storage::StorageResult;
use crate::state::game::{ArtistRecord, Comparison};

/// Abstraction over the key-value persistence of game records.
///
/// Backends only provide raw record access; the game-level operations are
/// shared default methods built on top of them. Ids are opaque strings.
pub trait GameStore: Send + Sync {
    /// Fetch the record stored under `id`.
    fn get(&self, id: String) -> BoxFuture<'static, StorageResult<Option<GameEntity>>>;
    /// Store `game` under `id`, replacing any previous record.
    fn put(&self, id: String, game: GameEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Whether a record exists under `id`.
    fn exists(&self, id: String) -> BoxFuture<'static, StorageResult<bool>>;
    /// Probe the backend connectivity.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;

    /// Create (or overwrite) a game with an empty guess log.
    fn create(&self, id: String, answer: ArtistRecord) -> BoxFuture<'static, StorageResult<()>> {
        self.put(id, GameEntity::new(answer))
    }

    /// Answer of the game stored under `id`.
    fn get_answer(&self, id: String) -> BoxFuture<'_, StorageResult<Option<ArtistRecord>>> {
        Box::pin(async move { Ok(self.get(id).await?.map(|game| game.answer)) })
    }

    /// Append a guess to the log. Returns `false` when no record exists.
    ///
    /// This is a read-modify-write of the whole record; callers serialize
    /// concurrent appends to the same id.
    fn append_guess(&self, id: String, guess: Comparison) -> BoxFuture<'_, StorageResult<bool>> {
        Box::pin(async move {
            let Some(mut game) = self.get(id.clone()).await? else {
                return Ok(false);
            };
            game.guesses.push(guess);
            self.put(id, game).await?;
            Ok(true)
        })
    }

    /// Guess log of the game stored under `id`.
    fn get_guesses(&self, id: String) -> BoxFuture<'_, StorageResult<Option<Vec<Comparison>>>> {
        Box::pin(async move { Ok(self.get(id).await?.map(|game| game.guesses)) })
    }
}
