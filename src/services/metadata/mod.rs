//! Artist metadata assembled from MusicBrainz (identity, tags) and Spotify
//! (popularity).

pub mod musicbrainz;
pub mod spotify;
pub mod token_cache;

use std::time::Duration;

use futures::future::BoxFuture;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::state::game::{Area, ArtistRecord};

use self::{
    musicbrainz::{MbArtist, MusicBrainzClient},
    spotify::{SpotifyClient, SpotifyCredentials},
};

/// Timeout applied to every upstream request.
pub const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(10);

pub const DEFAULT_MUSICBRAINZ_URL: &str = "https://musicbrainz.org";
pub const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com";
pub const DEFAULT_SPOTIFY_ACCOUNTS_URL: &str = "https://accounts.spotify.com";
pub const DEFAULT_CONTACT_EMAIL: &str = "example@example.com";

/// Failures while fetching artist metadata.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),
    #[error("{service} request failed")]
    Request {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{service} responded with status {status}")]
    Status {
        service: &'static str,
        status: StatusCode,
    },
    #[error("failed to decode {service} response")]
    Decode {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{service} has no artist matching `{query}`")]
    NoMatch { service: &'static str, query: String },
}

/// Check the status of an upstream response and decode its JSON body.
pub(crate) async fn read_json<T: DeserializeOwned>(
    service: &'static str,
    response: reqwest::Response,
) -> Result<T, LookupError> {
    let status = response.status();
    if !status.is_success() {
        return Err(LookupError::Status { service, status });
    }
    response
        .json()
        .await
        .map_err(|source| LookupError::Decode { service, source })
}

/// Source of artist records, abstracted so handlers can be tested offline.
pub trait ArtistLookup: Send + Sync {
    fn lookup(&self, query: String) -> BoxFuture<'static, Result<ArtistRecord, LookupError>>;
}

/// Endpoints and credentials of the upstream providers.
#[derive(Debug, Clone)]
pub struct MetadataConfig {
    pub musicbrainz_url: String,
    pub spotify_api_url: String,
    pub spotify_accounts_url: String,
    pub contact_email: String,
    pub spotify: SpotifyCredentials,
}

impl MetadataConfig {
    /// Production endpoints with the given credentials.
    pub fn new(spotify: SpotifyCredentials, contact_email: Option<String>) -> Self {
        Self {
            musicbrainz_url: DEFAULT_MUSICBRAINZ_URL.to_owned(),
            spotify_api_url: DEFAULT_SPOTIFY_API_URL.to_owned(),
            spotify_accounts_url: DEFAULT_SPOTIFY_ACCOUNTS_URL.to_owned(),
            contact_email: contact_email.unwrap_or_else(|| DEFAULT_CONTACT_EMAIL.to_owned()),
            spotify,
        }
    }
}

/// [`ArtistLookup`] backed by the real MusicBrainz and Spotify APIs.
#[derive(Clone)]
pub struct MetadataClient {
    musicbrainz: MusicBrainzClient,
    spotify: SpotifyClient,
}

impl MetadataClient {
    pub fn new(config: MetadataConfig) -> Result<Self, LookupError> {
        let http = Client::builder()
            .timeout(UPSTREAM_TIMEOUT)
            .build()
            .map_err(LookupError::Client)?;

        Ok(Self {
            musicbrainz: MusicBrainzClient::new(
                http.clone(),
                &config.musicbrainz_url,
                &config.contact_email,
            ),
            spotify: SpotifyClient::new(
                http,
                &config.spotify_api_url,
                &config.spotify_accounts_url,
                config.spotify,
            ),
        })
    }

    pub async fn fetch(&self, query: &str) -> Result<ArtistRecord, LookupError> {
        let artist = self.musicbrainz.find_artist(query).await?;
        let popularity = self.spotify.artist_popularity(query).await?;
        Ok(build_record(artist, popularity))
    }
}

impl ArtistLookup for MetadataClient {
    fn lookup(&self, query: String) -> BoxFuture<'static, Result<ArtistRecord, LookupError>> {
        let client = self.clone();
        Box::pin(async move { client.fetch(&query).await })
    }
}

fn build_record(artist: MbArtist, popularity: i64) -> ArtistRecord {
    let tag = artist.top_tag().map(|tag| tag.name.clone());
    ArtistRecord {
        name: artist.name,
        kind: artist.kind,
        gender: artist.gender,
        life_span: artist.life_span,
        area: artist.area.map(|area| Area { name: area.name }),
        tag,
        popularity: Some(popularity.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::game::Popularity;

    #[test]
    fn record_keeps_top_tag_and_popularity() {
        let artist: MbArtist = serde_json::from_value(serde_json::json!({
            "name": "Pitbull",
            "type": "Person",
            "gender": "male",
            "area": {"name": "United States"},
            "tags": [{"name": "pop", "count": 2}, {"name": "dance-pop", "count": 9}]
        }))
        .unwrap();

        let record = build_record(artist, 85);
        assert_eq!(record.name.as_deref(), Some("Pitbull"));
        assert_eq!(record.kind.as_deref(), Some("Person"));
        assert_eq!(record.area_name(), Some("United States"));
        assert_eq!(record.tag.as_deref(), Some("dance-pop"));
        assert_eq!(record.popularity, Some(Popularity::Score(85)));
    }

    #[test]
    fn record_tolerates_sparse_artists() {
        let artist: MbArtist =
            serde_json::from_value(serde_json::json!({"name": "Unknown Band"})).unwrap();

        let record = build_record(artist, 3);
        assert!(record.tag.is_none());
        assert!(record.area.is_none());
        assert!(record.gender.is_none());
    }

    #[test]
    fn default_contact_email() {
        let config = MetadataConfig::new(
            SpotifyCredentials {
                client_id: "id".into(),
                client_secret: "secret".into(),
            },
            None,
        );
        assert_eq!(config.contact_email, DEFAULT_CONTACT_EMAIL);
        assert_eq!(config.musicbrainz_url, DEFAULT_MUSICBRAINZ_URL);
    }
}
