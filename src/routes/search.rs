use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};

use crate::{
    dto::game::SearchQuery,
    error::{AppError, ErrorBody},
    services::player_service,
    state::{SharedState, game::ArtistRecord},
};

/// Configure the artist search subtree.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new().route("/musicbrain/search", get(search))
}

/// Look an artist up by name, without affecting the current game.
#[utoipa::path(
    get,
    path = "/musicbrain/search",
    tag = "search",
    params(SearchQuery),
    responses(
        (status = 200, description = "Artist metadata", body = ArtistRecord),
        (status = 400, description = "Missing search query", body = ErrorBody),
        (status = 404, description = "Artist not found", body = ErrorBody)
    )
)]
pub async fn search(
    State(state): State<SharedState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ArtistRecord>, AppError> {
    Ok(Json(player_service::search_artist(&state, query.q).await?))
}
