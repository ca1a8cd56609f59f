//! Player-facing flows: starting a game, guessing and searching artists.

use tracing::{info, warn};
use validator::Validate;

use crate::{
    dto::game::{GuessRequest, GuessResponse},
    error::ServiceError,
    services::session::Session,
    state::{SharedState, game::ArtistRecord},
};

const NEW_GAME_LOOKUP_FAILED: &str = "Could not start a new game (artist lookup failed)";
const GUESS_LOOKUP_FAILED: &str = "Could not find that artist";
const NO_ANSWERS: &str = "No artists configured";

/// Pick a random curated artist, resolve its metadata and bind a fresh game to the session.
pub async fn start_game(state: &SharedState, session: &Session) -> Result<(), ServiceError> {
    let name = state
        .config()
        .random_answer()
        .ok_or_else(|| ServiceError::Upstream(NO_ANSWERS.into()))?
        .to_owned();

    let answer = state.lookup().lookup(name.clone()).await.map_err(|err| {
        warn!(query = %name, error = %err, "answer lookup failed");
        ServiceError::Upstream(NEW_GAME_LOOKUP_FAILED.into())
    })?;

    let game_id = session.game_id();
    state.games().new_game(&game_id, answer).await?;
    info!(game_id, answer = %name, "game started");
    Ok(())
}

/// Resolve the guessed artist and score it against the session's game.
pub async fn submit_guess(
    state: &SharedState,
    session: &Session,
    request: GuessRequest,
) -> Result<GuessResponse, ServiceError> {
    let game_id = session.game_id();
    if !state.games().exists(&game_id).await? {
        return Err(ServiceError::InvalidSession);
    }

    request.validate()?;
    let query = request.guess.trim().to_owned();

    let guess = state.lookup().lookup(query.clone()).await.map_err(|err| {
        warn!(game_id, query, error = %err, "guess lookup failed");
        ServiceError::Upstream(GUESS_LOOKUP_FAILED.into())
    })?;

    let comparison = state
        .games()
        .guess(&game_id, guess)
        .await?
        .ok_or(ServiceError::NoResult)?;

    Ok(comparison.into())
}

/// Look an artist up without touching any game.
pub async fn search_artist(
    state: &SharedState,
    query: Option<String>,
) -> Result<ArtistRecord, ServiceError> {
    let query = query
        .map(|q| q.trim().to_owned())
        .filter(|q| !q.is_empty())
        .ok_or_else(|| ServiceError::InvalidInput("Missing search query".into()))?;

    state.lookup().lookup(query.clone()).await.map_err(|err| {
        warn!(query, error = %err, "artist search failed");
        ServiceError::NotFound("Artist not found".into())
    })
}
