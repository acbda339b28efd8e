//! Router assembly
//!
//! - `POST /graphql`, `GET /graphql/playground`
//! - `/rest/...` catalog resources
//! - `/health` probes

use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    extract::Extension,
    http::{header, Method},
    response::{Html, IntoResponse},
    routing::{get, post},
    Router,
};
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::Config;
use crate::graphql::{self, CinedexSchema};
use crate::middleware::MaybeCaller;
use crate::routes::{health_router, rest_router, CatalogState, HealthState};
use crate::services::{AuthService, HealthService};
use cinedex_shared_config::DatabaseConfig;

/// Long-lived services shared by every request
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub auth_service: AuthService,
    pub schema: CinedexSchema,
}

impl AppState {
    pub fn new(pool: PgPool, auth_service: AuthService) -> Self {
        Self {
            pool,
            auth_service,
            schema: graphql::build_schema(),
        }
    }
}

/// Open the connection pool with the configured limits and timeouts
pub async fn connect_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
        .connect(&config.url)
        .await
}

/// Build the CORS layer based on configuration.
///
/// In production mode:
/// - If `CORS_ORIGINS` is set, only those origins are allowed
/// - If `CORS_ORIGINS` is not set, CORS requests are rejected
///
/// In development mode without `CORS_ORIGINS`, permissive CORS is used.
pub fn build_cors_layer(config: &Config) -> CorsLayer {
    match &config.cors_allowed_origins {
        Some(origins) if !origins.is_empty() => {
            let allowed_origins: Vec<_> = origins
                .iter()
                .filter_map(|origin| {
                    origin.parse().ok().or_else(|| {
                        tracing::warn!("Invalid CORS origin '{}', skipping", origin);
                        None
                    })
                })
                .collect();

            if allowed_origins.is_empty() {
                tracing::error!("No valid CORS origins configured, CORS requests will be rejected");
                return CorsLayer::new();
            }

            tracing::info!(
                "CORS configured with {} allowed origin(s): {:?}",
                allowed_origins.len(),
                origins
            );
            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
                .max_age(Duration::from_secs(3600))
        }
        _ if config.is_production() => {
            tracing::warn!(
                "CORS_ORIGINS not configured in production mode. \
                 CORS requests will be rejected."
            );
            CorsLayer::new()
        }
        _ => {
            tracing::warn!("Using permissive CORS in development mode");
            CorsLayer::permissive()
        }
    }
}

/// Application router without CORS; `main` adds it from configuration
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/graphql", post(graphql_handler))
        .route("/graphql/playground", get(graphql_playground))
        .nest(
            "/health",
            health_router(HealthState::new(HealthService::new(state.pool.clone()))),
        )
        .nest("/rest", rest_router(CatalogState::new(state.pool.clone())))
        .layer(Extension(state.schema))
        .layer(Extension(state.pool))
        .layer(Extension(state.auth_service))
        .layer(TraceLayer::new_for_http())
}

/// Executes a GraphQL request in its own transaction for the token's caller
async fn graphql_handler(
    Extension(schema): Extension<CinedexSchema>,
    Extension(pool): Extension<PgPool>,
    MaybeCaller(caller): MaybeCaller,
    req: GraphQLRequest,
) -> GraphQLResponse {
    graphql::execute(&schema, &pool, caller, req.into_inner())
        .await
        .into()
}

async fn graphql_playground() -> impl IntoResponse {
    Html(async_graphql::http::playground_source(
        async_graphql::http::GraphQLPlaygroundConfig::new("/graphql"),
    ))
}

async fn root() -> &'static str {
    "Cinedex movie catalog"
}
