pub mod game;

use std::sync::Arc;

use crate::{
    config::AppConfig,
    dao::game_store::GameStore,
    services::{game_service::GameService, metadata::ArtistLookup, session::SessionKey},
};

pub type SharedState = Arc<AppState>;

/// Central application state shared by every request handler.
pub struct AppState {
    games: GameService,
    lookup: Arc<dyn ArtistLookup>,
    config: AppConfig,
    session_key: SessionKey,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    pub fn new(
        store: Arc<dyn GameStore>,
        lookup: Arc<dyn ArtistLookup>,
        config: AppConfig,
        session_key: SessionKey,
    ) -> SharedState {
        Arc::new(Self {
            games: GameService::new(store),
            lookup,
            config,
            session_key,
        })
    }

    /// Game lifecycle operations and the per-session lock map.
    pub fn games(&self) -> &GameService {
        &self.games
    }

    /// Artist metadata provider.
    pub fn lookup(&self) -> &Arc<dyn ArtistLookup> {
        &self.lookup
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn session_key(&self) -> &SessionKey {
        &self.session_key
    }
}
