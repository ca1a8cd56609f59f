use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, header::SET_COOKIE},
    middleware::{self, Next},
    response::Response,
};

use crate::state::SharedState;

pub mod docs;
pub mod game;
pub mod health;
pub mod home;
pub mod search;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    let player_router = home::router()
        .merge(game::router())
        .merge(search::router())
        .layer(middleware::from_fn_with_state(state.clone(), attach_session));

    let docs_router = docs::router(state.clone());

    health::router()
        .merge(player_router)
        .merge(docs_router)
        .with_state(state)
}

/// Resolve the caller's session from its cookie, or mint one and set the cookie.
async fn attach_session(
    State(state): State<SharedState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let session = state.session_key().session_from_headers(req.headers());
    req.extensions_mut().insert(session.clone());

    let mut response = next.run(req).await;
    if session.fresh {
        if let Some(cookie) = state.session_key().set_cookie(&session) {
            response.headers_mut().append(SET_COOKIE, cookie);
        }
    }
    response
}
