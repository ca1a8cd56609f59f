use utoipa::OpenApi;

#[derive(OpenApi)]
/// OpenAPI document of the artist guessing API.
#[openapi(
    info(title = "Artist Guesser", description = "Guess the mystery artist in seven tries."),
    paths(
        crate::routes::home::home,
        crate::routes::game::new_game,
        crate::routes::game::guess,
        crate::routes::search::search,
        crate::routes::health::healthcheck,
    ),
    components(
        schemas(
            crate::dto::game::GuessRequest,
            crate::dto::game::GuessResponse,
            crate::dto::game::ComparisonView,
            crate::dto::game::NewGameResponse,
            crate::dto::health::HealthResponse,
            crate::dto::health::HealthStatus,
            crate::error::ErrorBody,
            crate::state::game::ArtistRecord,
            crate::state::game::AnswerSnapshot,
            crate::state::game::FieldComparisons,
            crate::state::game::FieldOutcome,
            crate::state::game::GameStatus,
            crate::state::game::Popularity,
        )
    ),
    tags(
        (name = "game", description = "Game page, new games and guesses"),
        (name = "search", description = "Artist metadata lookup"),
        (name = "health", description = "Health check endpoints"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_player_routes() {
        let doc = ApiDoc::openapi();
        for path in ["/", "/new-game", "/guess", "/musicbrain/search", "/healthcheck"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
