//! Genre REST route handlers
//!
//! - `GET /rest/genres` - List genres (`with_movies`, `skip`, `limit`)
//! - `GET /rest/genres/genre` - One genre by `id` or `name`
//! - `POST /rest/genres/genre` - Create a genre, or return the existing one with that name (admin)
//! - `PATCH /rest/genres/genre` - Rename a genre (admin)
//! - `DELETE /rest/genres/genre/:id` - Delete a genre (admin)

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use uuid::Uuid;

use super::params::{pagination, CatalogState, ListParams, LookupParams};
use crate::error::ApiResult;
use crate::middleware::MaybeCaller;
use crate::models::{CreateGenre, Genre, GenreView, UpdateGenre};
use crate::repositories::ViewMode;
use crate::services::GenreService;

pub fn genres_router(state: CatalogState) -> Router {
    Router::new()
        .route("/", get(list_genres))
        .route(
            "/genre",
            get(get_genre).post(create_genre).patch(update_genre),
        )
        .route("/genre/:id", delete(delete_genre))
        .with_state(state)
}

async fn list_genres(
    State(state): State<CatalogState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<GenreView>>> {
    let page = pagination(params.skip, params.limit)?;
    let view = ViewMode::from_flag(params.with_movies);

    let mut tx = state.pool.begin().await?;
    let genres = GenreService::new(&mut *tx).list(page, view).await?;
    tx.commit().await?;

    Ok(Json(genres))
}

async fn get_genre(
    State(state): State<CatalogState>,
    Query(params): Query<LookupParams>,
) -> ApiResult<Json<GenreView>> {
    let filter = params.filter()?;
    let view = ViewMode::from_flag(params.with_movies);

    let mut tx = state.pool.begin().await?;
    let genre = GenreService::new(&mut *tx).get(&filter, view).await?;
    tx.commit().await?;

    Ok(Json(genre))
}

async fn create_genre(
    State(state): State<CatalogState>,
    caller: MaybeCaller,
    Json(input): Json<CreateGenre>,
) -> ApiResult<(StatusCode, Json<Genre>)> {
    let mut tx = state.pool.begin().await?;
    let genre = GenreService::new(&mut *tx)
        .create(caller.caller(), input)
        .await?;
    tx.commit().await?;

    Ok((StatusCode::CREATED, Json(genre)))
}

async fn update_genre(
    State(state): State<CatalogState>,
    caller: MaybeCaller,
    Json(input): Json<UpdateGenre>,
) -> ApiResult<Json<Genre>> {
    let mut tx = state.pool.begin().await?;
    let genre = GenreService::new(&mut *tx)
        .update(caller.caller(), input)
        .await?;
    tx.commit().await?;

    Ok(Json(genre))
}

async fn delete_genre(
    State(state): State<CatalogState>,
    caller: MaybeCaller,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Genre>> {
    let mut tx = state.pool.begin().await?;
    let genre = GenreService::new(&mut *tx)
        .delete(caller.caller(), id)
        .await?;
    tx.commit().await?;

    Ok(Json(genre))
}
