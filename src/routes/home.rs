use axum::{Router, response::Html, routing::get};
use tower_http::services::ServeDir;

use crate::state::SharedState;

/// Directory holding the page's script and stylesheet.
const STATIC_DIR: &str = "static";

const INDEX_HTML: &str = include_str!("../../static/index.html");

/// Serve the game page and its static assets.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new()
        .route("/", get(home))
        .nest_service("/static", ServeDir::new(STATIC_DIR))
}

/// Game page.
#[utoipa::path(
    get,
    path = "/",
    tag = "game",
    responses((status = 200, description = "HTML page", content_type = "text/html", body = String))
)]
pub async fn home() -> Html<&'static str> {
    Html(INDEX_HTML)
}
