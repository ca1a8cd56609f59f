/// Field-by-field scoring of guesses.
pub mod comparison;
/// OpenAPI documentation generation.
pub mod documentation;
/// Game lifecycle on top of the storage backends.
pub mod game_service;
/// Health check service.
pub mod health_service;
/// MusicBrainz and Spotify artist metadata.
pub mod metadata;
/// Player-facing flows behind the HTTP routes.
pub mod player_service;
/// Signed session cookies.
pub mod session;
