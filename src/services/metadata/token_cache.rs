use std::{future::Future, time::Duration};

use tokio::{sync::Mutex, time::Instant};

/// Token freshly issued by an authorization server.
#[derive(Debug, Clone)]
pub struct FreshToken {
    pub value: String,
    pub expires_in: Duration,
}

#[derive(Debug)]
struct CachedToken {
    value: String,
    expires_at: Instant,
}

/// Access token cache with single-flight refresh.
///
/// The lock is held while a refresh is in flight, so concurrent callers wait
/// for the one refresh instead of issuing their own. Tokens are considered
/// stale `margin` before the server-side expiry.
#[derive(Debug)]
pub struct TokenCache {
    slot: Mutex<Option<CachedToken>>,
    margin: Duration,
}

impl TokenCache {
    pub fn new(margin: Duration) -> Self {
        Self {
            slot: Mutex::new(None),
            margin,
        }
    }

    /// Return the cached token, or run `fetch` to obtain a new one.
    pub async fn get_or_refresh<F, Fut, E>(&self, fetch: F) -> Result<String, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<FreshToken, E>>,
    {
        let mut slot = self.slot.lock().await;
        if let Some(token) = slot.as_ref().filter(|token| Instant::now() < token.expires_at) {
            return Ok(token.value.clone());
        }

        let fresh = fetch().await?;
        let lifetime = fresh.expires_in.saturating_sub(self.margin);
        *slot = Some(CachedToken {
            value: fresh.value.clone(),
            expires_at: Instant::now() + lifetime,
        });
        Ok(fresh.value)
    }

    /// Forget the cached token, forcing the next call to refresh.
    pub async fn invalidate(&self) {
        self.slot.lock().await.take();
    }
}

#[cfg(test)]
mod tests {
    use std::{
        convert::Infallible,
        sync::{
            Arc,
            atomic::{AtomicUsize, Ordering},
        },
    };

    use super::*;

    const MARGIN: Duration = Duration::from_secs(60);

    fn issue(
        calls: &AtomicUsize,
        expires_in: Duration,
    ) -> impl Future<Output = Result<FreshToken, Infallible>> + '_ {
        async move {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(FreshToken {
                value: format!("token-{n}"),
                expires_in,
            })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn reuses_token_until_margin() {
        let cache = TokenCache::new(MARGIN);
        let calls = AtomicUsize::new(0);
        let hour = Duration::from_secs(3600);

        let first = cache.get_or_refresh(|| issue(&calls, hour)).await.unwrap();
        let second = cache.get_or_refresh(|| issue(&calls, hour)).await.unwrap();
        assert_eq!(first, "token-1");
        assert_eq!(second, "token-1");
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        tokio::time::advance(hour - MARGIN - Duration::from_secs(1)).await;
        cache.get_or_refresh(|| issue(&calls, hour)).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        tokio::time::advance(Duration::from_secs(2)).await;
        let refreshed = cache.get_or_refresh(|| issue(&calls, hour)).await.unwrap();
        assert_eq!(refreshed, "token-2");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn short_lived_tokens_are_not_cached() {
        let cache = TokenCache::new(MARGIN);
        let calls = AtomicUsize::new(0);

        cache
            .get_or_refresh(|| issue(&calls, Duration::from_secs(30)))
            .await
            .unwrap();
        cache
            .get_or_refresh(|| issue(&calls, Duration::from_secs(30)))
            .await
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn invalidate_forces_refresh() {
        let cache = TokenCache::new(MARGIN);
        let calls = AtomicUsize::new(0);
        let hour = Duration::from_secs(3600);

        cache.get_or_refresh(|| issue(&calls, hour)).await.unwrap();
        cache.invalidate().await;
        let token = cache.get_or_refresh(|| issue(&calls, hour)).await.unwrap();
        assert_eq!(token, "token-2");
    }

    #[tokio::test]
    async fn failed_refresh_leaves_cache_empty() {
        let cache = TokenCache::new(MARGIN);
        let err = cache
            .get_or_refresh(|| async { Err::<FreshToken, _>("denied") })
            .await
            .unwrap_err();
        assert_eq!(err, "denied");

        let calls = AtomicUsize::new(0);
        cache
            .get_or_refresh(|| issue(&calls, Duration::from_secs(3600)))
            .await
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_callers_share_one_refresh() {
        let cache = Arc::new(TokenCache::new(MARGIN));
        let calls = Arc::new(AtomicUsize::new(0));

        let tasks = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let calls = Arc::clone(&calls);
                tokio::spawn(async move {
                    cache
                        .get_or_refresh(|| async move {
                            tokio::time::sleep(Duration::from_millis(50)).await;
                            calls.fetch_add(1, Ordering::SeqCst);
                            Ok::<_, Infallible>(FreshToken {
                                value: "shared".into(),
                                expires_in: Duration::from_secs(3600),
                            })
                        })
                        .await
                })
            })
            .collect::<Vec<_>>();

        for task in tasks {
            assert_eq!(task.await.unwrap().unwrap(), "shared");
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
