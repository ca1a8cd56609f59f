use std::sync::Arc;

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::state::game::LifeSpan;

use super::{LookupError, read_json};

const SERVICE: &str = "musicbrainz";

/// Minimal MusicBrainz web-service client (JSON flavour of `/ws/2`).
#[derive(Clone)]
pub struct MusicBrainzClient {
    http: Client,
    base_url: Arc<str>,
    user_agent: Arc<str>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    artists: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    id: String,
}

/// Artist detail as returned by `/ws/2/artist/<id>?inc=tags`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct MbArtist {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub gender: Option<String>,
    pub area: Option<MbArea>,
    #[serde(rename = "life-span")]
    pub life_span: Option<LifeSpan>,
    #[serde(default)]
    pub tags: Vec<MbTag>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct MbArea {
    pub name: Option<String>,
}

/// Folksonomy tag with its vote count.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct MbTag {
    pub name: String,
    #[serde(default)]
    pub count: i64,
}

impl MbArtist {
    /// Tag with the most votes; the first one listed wins ties.
    pub fn top_tag(&self) -> Option<&MbTag> {
        self.tags.iter().fold(None::<&MbTag>, |best, tag| match best {
            Some(best) if best.count >= tag.count => Some(best),
            _ => Some(tag),
        })
    }
}

impl MusicBrainzClient {
    pub fn new(http: Client, base_url: &str, contact_email: &str) -> Self {
        Self {
            http,
            base_url: Arc::from(base_url.trim_end_matches('/')),
            user_agent: Arc::from(user_agent(contact_email)),
        }
    }

    /// Resolve the best match for `query` and fetch its details with tags.
    pub async fn find_artist(&self, query: &str) -> Result<MbArtist, LookupError> {
        let search_url = format!("{}/ws/2/artist/", self.base_url);
        let response = self
            .http
            .get(&search_url)
            .header(reqwest::header::USER_AGENT, self.user_agent.as_ref())
            .query(&[("query", query), ("limit", "1"), ("fmt", "json")])
            .send()
            .await
            .map_err(|source| LookupError::Request {
                service: SERVICE,
                source,
            })?;
        let search: SearchResponse = read_json(SERVICE, response).await?;

        let Some(hit) = search.artists.into_iter().next() else {
            return Err(LookupError::NoMatch {
                service: SERVICE,
                query: query.to_owned(),
            });
        };
        debug!(query, artist_id = %hit.id, "musicbrainz search hit");

        let detail_url = format!("{}/ws/2/artist/{}", self.base_url, hit.id);
        let response = self
            .http
            .get(&detail_url)
            .header(reqwest::header::USER_AGENT, self.user_agent.as_ref())
            .query(&[("inc", "tags"), ("fmt", "json")])
            .send()
            .await
            .map_err(|source| LookupError::Request {
                service: SERVICE,
                source,
            })?;

        read_json(SERVICE, response).await
    }
}

fn user_agent(contact_email: &str) -> String {
    format!("ArtistGuesser/1.0 ( {contact_email} )")
}
