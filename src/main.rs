//! Artist Guesser binary entrypoint wiring configuration, storage, metadata and HTTP layers.

use std::{net::SocketAddr, path::Path, sync::Arc};

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use artist_guesser_back::{
    config::{AppConfig, Settings, StorageBackend, ensure_secret_key},
    dao::game_store::{GameStore, memory::MemoryGameStore},
    routes,
    services::{
        metadata::{MetadataClient, MetadataConfig},
        session::SessionKey,
    },
    state::{AppState, SharedState},
};

const DOTENV_PATH: &str = ".env";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    match dotenvy::from_path(DOTENV_PATH) {
        Ok(()) => info!(path = DOTENV_PATH, "loaded environment file"),
        Err(err) if err.not_found() => {}
        Err(err) => warn!(path = DOTENV_PATH, error = %err, "failed to load environment file"),
    }

    let settings = Settings::from_env().inspect_err(|err| error!(error = %err, "invalid settings"))?;
    let secret = ensure_secret_key(settings.secret_key.clone(), Path::new(DOTENV_PATH))?;
    let session_key = SessionKey::new(secret.as_bytes())
        .map_err(|_| anyhow::anyhow!("SECRET_KEY cannot be used as an HMAC key"))?;

    let config = AppConfig::load();
    let store = connect_store(settings.backend, &config).await?;
    let lookup = MetadataClient::new(MetadataConfig::new(
        settings.spotify.clone(),
        settings.user_email.clone(),
    ))
    .context("building metadata client")?;

    let app_state = AppState::new(store, Arc::new(lookup), config, session_key);
    let app = build_router(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    Ok(())
}

/// Open the configured storage backend.
async fn connect_store(
    backend: StorageBackend,
    config: &AppConfig,
) -> anyhow::Result<Arc<dyn GameStore>> {
    let store: Arc<dyn GameStore> = match backend {
        #[cfg(feature = "redis-store")]
        StorageBackend::Redis => {
            use artist_guesser_back::dao::game_store::redis::{RedisConfig, RedisGameStore};

            let redis_config = RedisConfig::from_env()?.with_ttl(config.game_ttl());
            let store = RedisGameStore::connect(redis_config).await?;
            info!(url = store.url(), "connected to Redis");
            Arc::new(store)
        }
        StorageBackend::Memory => {
            warn!("using in-memory storage; games are lost on restart");
            Arc::new(MemoryGameStore::new())
        }
        #[allow(unreachable_patterns)]
        other => anyhow::bail!("storage backend {other:?} is not compiled in"),
    };
    Ok(store)
}

/// Build the top-level router and attach cross-cutting middleware layers.
fn build_router(state: SharedState) -> Router<()> {
    routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = term.recv() => {},
                }
            }
            Err(err) => {
                warn!(error = %err, "failed to install SIGTERM handler");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
