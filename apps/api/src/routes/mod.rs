//! HTTP route handlers for the Cinedex API
//!
//! - `/rest/directors`, `/rest/genres`, `/rest/movies` - catalog resources
//! - `/health` - liveness and readiness probes

pub mod directors;
pub mod genres;
pub mod health;
pub mod movies;
pub mod params;

pub use directors::directors_router;
pub use genres::genres_router;
pub use health::{health_router, HealthState};
pub use movies::movies_router;
pub use params::CatalogState;

use axum::Router;

/// All catalog resources under `/rest`
pub fn rest_router(state: CatalogState) -> Router {
    Router::new()
        .nest("/directors", directors_router(state.clone()))
        .nest("/genres", genres_router(state.clone()))
        .nest("/movies", movies_router(state))
}
