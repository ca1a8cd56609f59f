use std::time::Duration;

use super::error::{RedisDaoError, RedisResult};

/// Runtime configuration describing how to reach Redis.
#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub host: String,
    pub port: u16,
    /// Expiry applied to every written game; `None` keeps records forever.
    pub ttl: Option<Duration>,
}

impl RedisConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ttl: None,
        }
    }

    /// Expire game records `ttl` after their last write.
    pub fn with_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.ttl = ttl.filter(|ttl| !ttl.is_zero());
        self
    }

    /// Build a configuration by reading `REDIS_HOST` and `REDIS_PORT`.
    pub fn from_env() -> RedisResult<Self> {
        let host = std::env::var("REDIS_HOST")
            .ok()
            .filter(|value| !value.is_empty())
            .ok_or(RedisDaoError::MissingEnvVar { var: "REDIS_HOST" })?;
        let raw_port = std::env::var("REDIS_PORT")
            .ok()
            .filter(|value| !value.is_empty())
            .ok_or(RedisDaoError::MissingEnvVar { var: "REDIS_PORT" })?;
        let port = raw_port
            .trim()
            .parse::<u16>()
            .map_err(|_| RedisDaoError::InvalidPort { value: raw_port })?;

        Ok(Self::new(host, port))
    }

    /// Connection URL understood by the redis client.
    pub fn url(&self) -> String {
        format!("redis://{}:{}/", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_uses_host_and_port() {
        assert_eq!(
            RedisConfig::new("localhost", 6379).url(),
            "redis://localhost:6379/"
        );
    }

    #[test]
    fn zero_ttl_disables_expiry() {
        let config = RedisConfig::new("localhost", 6379).with_ttl(Some(Duration::ZERO));
        assert!(config.ttl.is_none());

        let config = config.with_ttl(Some(Duration::from_secs(60)));
        assert_eq!(config.ttl, Some(Duration::from_secs(60)));
    }
}
