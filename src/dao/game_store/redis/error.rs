//! Error types shared by the Redis storage implementation.

use thiserror::Error;

/// Convenient result alias returning [`RedisDaoError`] failures.
pub type RedisResult<T> = Result<T, RedisDaoError>;

/// Failures that can occur while interacting with Redis.
#[derive(Debug, Error)]
pub enum RedisDaoError {
    /// Required environment variable is missing.
    #[error("missing Redis environment variable `{var}`")]
    MissingEnvVar { var: &'static str },
    /// The configured port is not a valid TCP port.
    #[error("invalid Redis port `{value}`")]
    InvalidPort { value: String },
    /// The connection URL was rejected by the client.
    #[error("invalid Redis URL `{url}`")]
    InvalidUrl {
        url: String,
        #[source]
        source: redis::RedisError,
    },
    /// Redis did not answer the startup ping.
    #[error("Redis unreachable at `{url}`")]
    InitialPing {
        url: String,
        #[source]
        source: redis::RedisError,
    },
    /// A command against a key failed.
    #[error("Redis command `{command}` failed for `{key}`")]
    Command {
        command: &'static str,
        key: String,
        #[source]
        source: redis::RedisError,
    },
    /// Health ping failed on an established connection.
    #[error("Redis health ping failed")]
    HealthPing {
        #[source]
        source: redis::RedisError,
    },
    /// A game record could not be encoded as JSON.
    #[error("failed to serialize game `{key}`")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}
