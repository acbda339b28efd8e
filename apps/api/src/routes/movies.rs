//! Movie REST route handlers
//!
//! - `GET /rest/movies` - List movies (`extended`, `skip`, `limit`,
//!   `order_by=title|year`, `sort_by=asc|desc`)
//! - `GET /rest/movies/movie?id` - One movie
//! - `POST /rest/movies/movie` - Create a movie with its genres (admin)
//! - `PATCH /rest/movies/movie` - Partially update a movie (admin)
//! - `DELETE /rest/movies/movie/:id` - Delete a movie (admin)

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use super::params::{pagination, CatalogState};
use crate::error::{ApiError, ApiResult};
use crate::middleware::MaybeCaller;
use crate::models::{CreateMovie, MovieExtended, MovieView, UpdateMovie};
use crate::repositories::{KeyFilter, MovieOrderKey, MovieOrdering, SortDirection, ViewMode};
use crate::services::MovieService;

pub fn movies_router(state: CatalogState) -> Router {
    Router::new()
        .route("/", get(list_movies))
        .route(
            "/movie",
            get(get_movie).post(create_movie).patch(update_movie),
        )
        .route("/movie/:id", delete(delete_movie))
        .with_state(state)
}

#[derive(Debug, Default, Deserialize)]
pub struct MovieListParams {
    #[serde(default)]
    pub extended: bool,
    pub skip: Option<i64>,
    pub limit: Option<i64>,
    pub order_by: Option<String>,
    pub sort_by: Option<String>,
}

impl MovieListParams {
    fn ordering(&self) -> ApiResult<MovieOrdering> {
        let key = match self.order_by.as_deref() {
            Some(value) => value.parse::<MovieOrderKey>()?,
            None => MovieOrderKey::default(),
        };
        let direction = match self.sort_by.as_deref() {
            Some(value) => value.parse::<SortDirection>()?,
            None => SortDirection::default(),
        };
        Ok(MovieOrdering::new(key, direction))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct MovieLookupParams {
    pub id: Option<Uuid>,
    #[serde(default)]
    pub extended: bool,
}

async fn list_movies(
    State(state): State<CatalogState>,
    Query(params): Query<MovieListParams>,
) -> ApiResult<Json<Vec<MovieView>>> {
    let page = pagination(params.skip, params.limit)?;
    let ordering = params.ordering()?;
    let view = ViewMode::from_flag(params.extended);

    let mut tx = state.pool.begin().await?;
    let movies = MovieService::new(&mut *tx)
        .list(page, view, ordering)
        .await?;
    tx.commit().await?;

    Ok(Json(movies))
}

async fn get_movie(
    State(state): State<CatalogState>,
    Query(params): Query<MovieLookupParams>,
) -> ApiResult<Json<MovieView>> {
    let id = params.id.ok_or(ApiError::MissingField("id"))?;
    let view = ViewMode::from_flag(params.extended);

    let mut tx = state.pool.begin().await?;
    let movie = MovieService::new(&mut *tx)
        .get(&KeyFilter::Id(id), view)
        .await?;
    tx.commit().await?;

    Ok(Json(movie))
}

/// The movie insert and its genre associations commit together
async fn create_movie(
    State(state): State<CatalogState>,
    caller: MaybeCaller,
    Json(input): Json<CreateMovie>,
) -> ApiResult<(StatusCode, Json<MovieExtended>)> {
    let mut tx = state.pool.begin().await?;
    let movie = MovieService::new(&mut *tx)
        .create(caller.caller(), input)
        .await?;
    tx.commit().await?;

    Ok((StatusCode::CREATED, Json(movie)))
}

async fn update_movie(
    State(state): State<CatalogState>,
    caller: MaybeCaller,
    Json(input): Json<UpdateMovie>,
) -> ApiResult<Json<MovieExtended>> {
    let mut tx = state.pool.begin().await?;
    let movie = MovieService::new(&mut *tx)
        .update(caller.caller(), input)
        .await?;
    tx.commit().await?;

    Ok(Json(movie))
}

async fn delete_movie(
    State(state): State<CatalogState>,
    caller: MaybeCaller,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MovieExtended>> {
    let mut tx = state.pool.begin().await?;
    let movie = MovieService::new(&mut *tx).delete(caller.caller(), id).await?;
    tx.commit().await?;

    Ok(Json(movie))
}
