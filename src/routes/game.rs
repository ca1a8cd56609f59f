use axum::{
    Extension, Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::{get, post},
};

use crate::{
    dto::game::{GuessRequest, GuessResponse, NewGameResponse},
    error::{AppError, ErrorBody},
    services::{player_service, session::Session},
    state::SharedState,
};

/// Configure the game routes subtree.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new()
        .route("/new-game", get(new_game))
        .route("/guess", post(guess))
}

/// Start a new game for the caller's session with a random curated artist.
#[utoipa::path(
    get,
    path = "/new-game",
    tag = "game",
    responses(
        (status = 200, description = "Game created", body = NewGameResponse),
        (status = 500, description = "Answer lookup failed", body = ErrorBody)
    )
)]
pub async fn new_game(
    State(state): State<SharedState>,
    Extension(session): Extension<Session>,
) -> Result<Json<NewGameResponse>, AppError> {
    player_service::start_game(&state, &session).await?;
    Ok(Json(NewGameResponse { ok: true }))
}

/// Submit a guess for the caller's current game.
///
/// A body that is not valid JSON is treated like an empty guess.
#[utoipa::path(
    post,
    path = "/guess",
    tag = "game",
    request_body = GuessRequest,
    responses(
        (status = 200, description = "Guess scored", body = GuessResponse),
        (status = 400, description = "No game, blank guess or no result", body = ErrorBody),
        (status = 500, description = "Guessed artist lookup failed", body = ErrorBody)
    )
)]
pub async fn guess(
    State(state): State<SharedState>,
    Extension(session): Extension<Session>,
    payload: Result<Json<GuessRequest>, JsonRejection>,
) -> Result<Json<GuessResponse>, AppError> {
    let request = payload.map(|Json(request)| request).unwrap_or_default();
    let response = player_service::submit_guess(&state, &session, request).await?;
    Ok(Json(response))
}
