use redis::{
    Client,
    aio::{ConnectionManager, ConnectionManagerConfig},
};

use super::error::{RedisDaoError, RedisResult};

/// Open a managed connection and check that Redis answers a ping.
///
/// A single attempt is made; an unreachable server is fatal at startup.
pub async fn establish_connection(url: &str) -> RedisResult<ConnectionManager> {
    let client = Client::open(url).map_err(|source| RedisDaoError::InvalidUrl {
        url: url.to_owned(),
        source,
    })?;

    let config = ConnectionManagerConfig::new().set_number_of_retries(0);
    let mut connection = client
        .get_connection_manager_with_config(config)
        .await
        .map_err(|source| RedisDaoError::InitialPing {
            url: url.to_owned(),
            source,
        })?;
    ping(&mut connection)
        .await
        .map_err(|source| RedisDaoError::InitialPing {
            url: url.to_owned(),
            source,
        })?;

    Ok(connection)
}

pub async fn ping(connection: &mut ConnectionManager) -> redis::RedisResult<()> {
    let _: String = redis::cmd("PING").query_async(connection).await?;
    Ok(())
}
