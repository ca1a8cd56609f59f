use std::{sync::Arc, time::Duration};

use futures::future::BoxFuture;
use redis::{AsyncCommands, aio::ConnectionManager};

use crate::dao::{
    game_store::GameStore,
    models::GameEntity,
    storage::{StorageError, StorageResult},
};

use super::{
    config::RedisConfig,
    connection::{establish_connection, ping},
    error::{RedisDaoError, RedisResult},
};

/// Game store keeping each record as a JSON string under its game id.
#[derive(Clone)]
pub struct RedisGameStore {
    connection: ConnectionManager,
    ttl: Option<Duration>,
    url: Arc<str>,
}

impl RedisGameStore {
    /// Connect to Redis, waiting for the server to answer.
    pub async fn connect(config: RedisConfig) -> RedisResult<Self> {
        let url = config.url();
        let connection = establish_connection(&url).await?;
        Ok(Self {
            connection,
            ttl: config.ttl,
            url: Arc::from(url),
        })
    }

    /// URL this store is connected to.
    pub fn url(&self) -> &str {
        &self.url
    }

    async fn read(&self, key: &str) -> StorageResult<Option<GameEntity>> {
        let mut connection = self.connection.clone();
        let payload: Option<String> =
            connection
                .get(key)
                .await
                .map_err(|source| RedisDaoError::Command {
                    command: "GET",
                    key: key.to_owned(),
                    source,
                })?;

        payload
            .map(|payload| {
                serde_json::from_str(&payload).map_err(|source| StorageError::Corrupt {
                    id: key.to_owned(),
                    source,
                })
            })
            .transpose()
    }

    async fn write(&self, key: &str, game: &GameEntity) -> RedisResult<()> {
        let payload = serde_json::to_string(game).map_err(|source| RedisDaoError::Serialize {
            key: key.to_owned(),
            source,
        })?;

        let mut connection = self.connection.clone();
        let result: redis::RedisResult<()> = match self.ttl {
            Some(ttl) => connection.set_ex(key, payload, ttl.as_secs()).await,
            None => connection.set(key, payload).await,
        };

        result.map_err(|source| RedisDaoError::Command {
            command: "SET",
            key: key.to_owned(),
            source,
        })
    }
}

impl GameStore for RedisGameStore {
    fn get(&self, id: String) -> BoxFuture<'static, StorageResult<Option<GameEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.read(&id).await })
    }

    fn put(&self, id: String, game: GameEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.write(&id, &game).await.map_err(Into::into) })
    }

    fn exists(&self, id: String) -> BoxFuture<'static, StorageResult<bool>> {
        let mut connection = self.connection.clone();
        Box::pin(async move {
            let exists: bool =
                connection
                    .exists(&id)
                    .await
                    .map_err(|source| RedisDaoError::Command {
                        command: "EXISTS",
                        key: id.clone(),
                        source,
                    })?;
            Ok(exists)
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let mut connection = self.connection.clone();
        Box::pin(async move {
            ping(&mut connection)
                .await
                .map_err(|source| RedisDaoError::HealthPing { source }.into())
        })
    }
}
