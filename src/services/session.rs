//! Signed session cookies binding a browser to its game.

use axum::http::{HeaderMap, HeaderValue, header};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac, digest::InvalidLength};
use sha2::Sha256;

use crate::services::game_service::game_key;

/// Name of the cookie carrying the signed session id.
pub const SESSION_COOKIE: &str = "artist_guesser_session";

type HmacSha256 = Hmac<Sha256>;

/// Session attached to a request by the session middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: String,
    /// Whether the id was minted for this request.
    pub fresh: bool,
}

impl Session {
    /// Storage key of the game bound to this session.
    pub fn game_id(&self) -> String {
        game_key(&self.id)
    }
}

/// HMAC-SHA256 key used to sign and verify session ids.
#[derive(Clone)]
pub struct SessionKey {
    mac: HmacSha256,
}

impl SessionKey {
    pub fn new(secret: &[u8]) -> Result<Self, InvalidLength> {
        Ok(Self {
            mac: HmacSha256::new_from_slice(secret)?,
        })
    }

    /// Random 16-byte session id, hex encoded.
    pub fn generate_id() -> String {
        hex::encode(rand::random::<[u8; 16]>())
    }

    /// Cookie value `<sid>.<signature>` for `session_id`.
    pub fn sign(&self, session_id: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(session_id.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
        format!("{session_id}.{signature}")
    }

    /// Session id carried by a cookie value, if its signature checks out.
    pub fn verify(&self, cookie_value: &str) -> Option<String> {
        let (session_id, signature) = cookie_value.rsplit_once('.')?;
        if session_id.is_empty() {
            return None;
        }
        let signature = URL_SAFE_NO_PAD.decode(signature).ok()?;
        let mut mac = self.mac.clone();
        mac.update(session_id.as_bytes());
        mac.verify_slice(&signature).ok()?;
        Some(session_id.to_owned())
    }

    /// Resolve the session from request headers, minting a new one when the
    /// cookie is missing or tampered with.
    pub fn session_from_headers(&self, headers: &HeaderMap) -> Session {
        match find_cookie(headers, SESSION_COOKIE).and_then(|value| self.verify(value)) {
            Some(id) => Session { id, fresh: false },
            None => Session {
                id: Self::generate_id(),
                fresh: true,
            },
        }
    }

    /// `Set-Cookie` header value persisting `session`.
    pub fn set_cookie(&self, session: &Session) -> Option<HeaderValue> {
        let cookie = format!(
            "{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax",
            self.sign(&session.id)
        );
        HeaderValue::from_str(&cookie).ok()
    }
}

fn find_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}
