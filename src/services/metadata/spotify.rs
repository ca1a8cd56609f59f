use std::{sync::Arc, time::Duration};

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{
    LookupError, read_json,
    token_cache::{FreshToken, TokenCache},
};

const SERVICE: &str = "spotify";
const TOKEN_SERVICE: &str = "spotify-accounts";

/// Tokens are refreshed this long before Spotify says they expire.
pub const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Client-credentials pair issued by the Spotify developer dashboard.
#[derive(Debug, Clone)]
pub struct SpotifyCredentials {
    pub client_id: String,
    pub client_secret: String,
}

/// Spotify Web API client limited to artist popularity lookups.
#[derive(Clone)]
pub struct SpotifyClient {
    http: Client,
    api_base: Arc<str>,
    accounts_base: Arc<str>,
    credentials: Arc<SpotifyCredentials>,
    tokens: Arc<TokenCache>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: u64,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    artists: ArtistPage,
}

#[derive(Debug, Deserialize)]
struct ArtistPage {
    #[serde(default)]
    items: Vec<ArtistItem>,
}

#[derive(Debug, Deserialize)]
struct ArtistItem {
    popularity: i64,
}

impl SpotifyClient {
    pub fn new(
        http: Client,
        api_base: &str,
        accounts_base: &str,
        credentials: SpotifyCredentials,
    ) -> Self {
        Self {
            http,
            api_base: Arc::from(api_base.trim_end_matches('/')),
            accounts_base: Arc::from(accounts_base.trim_end_matches('/')),
            credentials: Arc::new(credentials),
            tokens: Arc::new(TokenCache::new(TOKEN_EXPIRY_MARGIN)),
        }
    }

    /// Popularity score (0-100) of the best artist match for `query`.
    pub async fn artist_popularity(&self, query: &str) -> Result<i64, LookupError> {
        let token = self
            .tokens
            .get_or_refresh(|| self.request_access_token())
            .await?;

        let response = self
            .http
            .get(format!("{}/v1/search", self.api_base))
            .bearer_auth(&token)
            .query(&[("q", query), ("type", "artist"), ("limit", "1")])
            .send()
            .await
            .map_err(|source| LookupError::Request {
                service: SERVICE,
                source,
            })?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            // Revoked early; the next lookup fetches a new token.
            self.tokens.invalidate().await;
        }

        let page: SearchResponse = read_json(SERVICE, response).await?;
        let item = page
            .artists
            .items
            .into_iter()
            .next()
            .ok_or_else(|| LookupError::NoMatch {
                service: SERVICE,
                query: query.to_owned(),
            })?;

        debug!(query, popularity = item.popularity, "spotify popularity");
        Ok(item.popularity)
    }

    async fn request_access_token(&self) -> Result<FreshToken, LookupError> {
        let response = self
            .http
            .post(format!("{}/api/token", self.accounts_base))
            .basic_auth(
                &self.credentials.client_id,
                Some(&self.credentials.client_secret),
            )
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|source| LookupError::Request {
                service: TOKEN_SERVICE,
                source,
            })?;

        let token: TokenResponse = read_json(TOKEN_SERVICE, response).await?;
        debug!(expires_in = token.expires_in, "spotify token refreshed");
        Ok(FreshToken {
            value: token.access_token,
            expires_in: Duration::from_secs(token.expires_in),
        })
    }
}
