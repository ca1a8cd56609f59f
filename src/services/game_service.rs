use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

use crate::{
    dao::game_store::GameStore,
    error::ServiceError,
    services::comparison::compare_artists,
    state::game::{ArtistRecord, Comparison},
};

/// Storage key of the game bound to a session.
pub fn game_key(session_id: &str) -> String {
    format!("game:{session_id}")
}

/// Game lifecycle on top of a [`GameStore`].
///
/// Guesses on the same game id are serialized through a per-id lock so the
/// read-modify-write of the guess log cannot interleave within this process.
pub struct GameService {
    store: Arc<dyn GameStore>,
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl GameService {
    pub fn new(store: Arc<dyn GameStore>) -> Self {
        Self {
            store,
            locks: DashMap::new(),
        }
    }

    /// Backend this service persists to.
    pub fn store(&self) -> &Arc<dyn GameStore> {
        &self.store
    }

    /// Start (or restart) the game stored under `game_id`.
    pub async fn new_game(&self, game_id: &str, answer: ArtistRecord) -> Result<(), ServiceError> {
        let entry = self.lock_entry(game_id);
        let _guard = entry.lock().await;
        self.store.create(game_id.to_owned(), answer).await?;

        info!(game_id, "new game created");
        Ok(())
    }

    pub async fn exists(&self, game_id: &str) -> Result<bool, ServiceError> {
        Ok(self.store.exists(game_id.to_owned()).await?)
    }

    /// Compare `guess` with the stored answer and record the comparison.
    ///
    /// Returns `Ok(None)` when no game exists under `game_id`.
    pub async fn guess(
        &self,
        game_id: &str,
        guess: ArtistRecord,
    ) -> Result<Option<Comparison>, ServiceError> {
        let entry = self.lock_entry(game_id);
        let _guard = entry.lock().await;
        self.guess_locked(game_id, guess).await
    }

    async fn guess_locked(
        &self,
        game_id: &str,
        guess: ArtistRecord,
    ) -> Result<Option<Comparison>, ServiceError> {
        let Some(game) = self.store.get(game_id.to_owned()).await? else {
            debug!(game_id, "guess on missing game");
            return Ok(None);
        };

        let guess_number = u32::try_from(game.guesses.len() + 1).unwrap_or(u32::MAX);
        let comparison = compare_artists(&guess, &game.answer, guess_number);

        if !self
            .store
            .append_guess(game_id.to_owned(), comparison.clone())
            .await?
        {
            debug!(game_id, "game disappeared before the guess was recorded");
            return Ok(None);
        }

        debug!(
            game_id,
            guess_number,
            is_correct = comparison.is_correct,
            "guess recorded"
        );
        Ok(Some(comparison))
    }

    fn lock_entry(&self, game_id: &str) -> LockEntry<'_> {
        let lock = self
            .locks
            .entry(game_id.to_owned())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        LockEntry {
            locks: &self.locks,
            game_id: game_id.to_owned(),
            lock,
        }
    }
}

/// Handle on a per-game lock.
///
/// Dropping the handle, including when the owning future is cancelled,
/// removes the map entry once the map and this handle are its only owners.
struct LockEntry<'a> {
    locks: &'a DashMap<String, Arc<Mutex<()>>>,
    game_id: String,
    lock: Arc<Mutex<()>>,
}

impl LockEntry<'_> {
    async fn lock(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().await
    }
}

impl Drop for LockEntry<'_> {
    fn drop(&mut self) {
        self.locks.remove_if(&self.game_id, |_, lock| {
            Arc::ptr_eq(lock, &self.lock) && Arc::strong_count(lock) == 2
        });
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use futures::future::{self, BoxFuture};

    use super::*;
    use crate::{
        dao::{game_store::memory::MemoryGameStore, models::GameEntity, storage::StorageResult},
        services::comparison::determine_game_status,
        state::game::{Area, FieldOutcome, GameStatus, MAX_GUESSES},
    };

    fn artist(name: &str, gender: &str, area: &str, tag: &str, popularity: i64) -> ArtistRecord {
        ArtistRecord {
            name: Some(name.into()),
            gender: Some(gender.into()),
            area: Some(Area {
                name: Some(area.into()),
            }),
            tag: Some(tag.into()),
            popularity: Some(popularity.into()),
            ..ArtistRecord::default()
        }
    }

    fn pitbull() -> ArtistRecord {
        artist("Pitbull", "male", "United States", "dance-pop", 85)
    }

    fn wrong_guesses() -> Vec<ArtistRecord> {
        vec![
            artist("Taylor Swift", "female", "United States", "pop", 92),
            artist("Drake", "male", "Canada", "hip-hop", 88),
            artist("Adele", "female", "United Kingdom", "soul", 80),
            artist("Harry Styles", "male", "United Kingdom", "pop", 87),
            artist("Kendrick Lamar", "male", "United States", "hip-hop", 83),
            artist("Bad Bunny", "male", "Puerto Rico", "reggaeton", 90),
            artist("Post Malone", "male", "United States", "hip-hop", 89),
        ]
    }

    fn service() -> (GameService, MemoryGameStore) {
        let store = MemoryGameStore::new();
        (GameService::new(Arc::new(store.clone())), store)
    }

    #[tokio::test]
    async fn new_game_exists() {
        let (service, _) = service();
        assert!(!service.exists("game:test").await.unwrap());

        service.new_game("game:test", pitbull()).await.unwrap();

        assert!(service.exists("game:test").await.unwrap());
    }

    #[tokio::test]
    async fn guess_on_missing_game_is_none() {
        let (service, store) = service();
        let outcome = service.guess("game:none", pitbull()).await.unwrap();
        assert!(outcome.is_none());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn scenario_first_wrong_guess() {
        let (service, _) = service();
        service.new_game("game:test", pitbull()).await.unwrap();

        let comparison = service
            .guess(
                "game:test",
                artist("Taylor Swift", "female", "United States", "pop", 92),
            )
            .await
            .unwrap()
            .unwrap();

        assert!(!comparison.is_correct);
        assert_eq!(comparison.fields.gender, FieldOutcome::NoMatch);
        assert_eq!(comparison.fields.area, FieldOutcome::Match);
        assert_eq!(comparison.fields.genre, FieldOutcome::NoMatch);
        assert_eq!(comparison.fields.popularity, FieldOutcome::Higher);
        assert_eq!(comparison.guess_number, 1);
    }

    #[tokio::test]
    async fn guesses_append_without_touching_answer() {
        let (service, store) = service();
        service.new_game("game:test", pitbull()).await.unwrap();

        for (index, guess) in wrong_guesses().into_iter().enumerate() {
            let comparison = service.guess("game:test", guess).await.unwrap().unwrap();
            assert_eq!(comparison.guess_number as usize, index + 1);
        }

        let game = store.get("game:test".into()).await.unwrap().unwrap();
        assert_eq!(game.answer, pitbull());
        assert_eq!(game.guesses.len(), 7);
        assert_eq!(game.guesses[0].guess_artist.name.as_deref(), Some("Taylor Swift"));
    }

    #[tokio::test]
    async fn seventh_wrong_guess_loses() {
        let (service, _) = service();
        service.new_game("game:test", pitbull()).await.unwrap();

        let mut last = None;
        for guess in wrong_guesses() {
            last = service.guess("game:test", guess).await.unwrap();
        }

        let last = last.unwrap();
        assert_eq!(last.guess_number, MAX_GUESSES);
        assert_eq!(
            determine_game_status(last.is_correct, last.guess_number),
            GameStatus::Lost
        );
        assert_eq!(last.answer_snapshot.name.as_deref(), Some("Pitbull"));
    }

    #[tokio::test]
    async fn genre_matches_follow_the_tag() {
        let (service, _) = service();
        service.new_game("game:test", pitbull()).await.unwrap();

        let same_tag = artist("Taylor Swift", "female", "United States", "dance-pop", 92);
        let comparison = service.guess("game:test", same_tag).await.unwrap().unwrap();
        assert_eq!(comparison.fields.genre, FieldOutcome::Match);

        let other_tag = artist("Drake", "male", "Canada", "hip-hop", 88);
        let comparison = service.guess("game:test", other_tag).await.unwrap().unwrap();
        assert_eq!(comparison.fields.genre, FieldOutcome::NoMatch);
        assert_eq!(comparison.guess_number, 2);
    }

    #[tokio::test]
    async fn new_game_resets_the_guess_log() {
        let (service, _) = service();
        service.new_game("game:test", pitbull()).await.unwrap();
        service
            .guess("game:test", wrong_guesses().remove(0))
            .await
            .unwrap();

        service.new_game("game:test", pitbull()).await.unwrap();
        let comparison = service.guess("game:test", pitbull()).await.unwrap().unwrap();
        assert_eq!(comparison.guess_number, 1);
        assert!(comparison.is_correct);
    }

    #[tokio::test]
    async fn concurrent_guesses_get_distinct_numbers() {
        let (service, _) = service();
        let service = Arc::new(service);
        service.new_game("game:test", pitbull()).await.unwrap();

        let handles = wrong_guesses()
            .into_iter()
            .map(|guess| {
                let service = Arc::clone(&service);
                tokio::spawn(async move { service.guess("game:test", guess).await })
            })
            .collect::<Vec<_>>();

        let mut numbers = Vec::new();
        for handle in handles {
            numbers.push(handle.await.unwrap().unwrap().unwrap().guess_number);
        }
        numbers.sort_unstable();

        assert_eq!(numbers, (1..=7).collect::<Vec<_>>());
        assert!(service.locks.is_empty());
    }

    /// Store whose reads and writes never complete.
    struct StalledStore;

    impl GameStore for StalledStore {
        fn get(&self, _id: String) -> BoxFuture<'static, StorageResult<Option<GameEntity>>> {
            Box::pin(future::pending())
        }

        fn put(&self, _id: String, _game: GameEntity) -> BoxFuture<'static, StorageResult<()>> {
            Box::pin(future::pending())
        }

        fn exists(&self, _id: String) -> BoxFuture<'static, StorageResult<bool>> {
            Box::pin(future::ready(Ok(true)))
        }

        fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
            Box::pin(future::ready(Ok(())))
        }
    }

    #[tokio::test]
    async fn cancelled_calls_release_their_lock_entries() {
        let service = GameService::new(Arc::new(StalledStore));

        for i in 0..50 {
            let key = format!("game:{i}");
            let guess = service.guess(&key, pitbull());
            assert!(tokio::time::timeout(Duration::from_millis(1), guess).await.is_err());

            let new_key = format!("game:new-{i}");
            let new_game = service.new_game(&new_key, pitbull());
            assert!(tokio::time::timeout(Duration::from_millis(1), new_game).await.is_err());
        }

        assert!(service.locks.is_empty());
    }

    #[tokio::test]
    async fn cancelled_waiter_keeps_the_holders_entry() {
        let service = Arc::new(GameService::new(Arc::new(StalledStore)));

        let holder = {
            let service = Arc::clone(&service);
            tokio::spawn(async move { service.guess("game:shared", pitbull()).await })
        };
        while service.locks.is_empty() {
            tokio::task::yield_now().await;
        }

        let waiter = service.guess("game:shared", pitbull());
        assert!(tokio::time::timeout(Duration::from_millis(5), waiter).await.is_err());
        assert_eq!(service.locks.len(), 1);

        holder.abort();
        assert!(holder.await.unwrap_err().is_cancelled());
        assert!(service.locks.is_empty());
    }

    #[test]
    fn game_key_prefixes_session() {
        assert_eq!(game_key("abc123"), "game:abc123");
    }
}
