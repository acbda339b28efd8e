//! Director REST route handlers
//!
//! - `GET /rest/directors` - List directors (`with_movies`, `skip`, `limit`)
//! - `GET /rest/directors/director` - One director by `id` or `name`
//! - `POST /rest/directors/director` - Create a director (admin)
//! - `PATCH /rest/directors/director` - Rename a director (admin)
//! - `DELETE /rest/directors/director/:id` - Delete a director (admin)

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
use crate::models::{CreateDirector, Director, DirectorView, UpdateDirector};
use crate::repositories::ViewMode;
use crate::services::DirectorService;

pub fn directors_router(state: CatalogState) -> Router {
    Router::new()
        .route("/", get(list_directors))
        .route(
            "/director",
            get(get_director).post(create_director).patch(update_director),
        )
        .route("/director/:id", delete(delete_director))
        .with_state(state)
}

async fn list_directors(
    State(state): State<CatalogState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<DirectorView>>> {
    let page = pagination(params.skip, params.limit)?;
    let view = ViewMode::from_flag(params.with_movies);

    let mut tx = state.pool.begin().await?;
    let directors = DirectorService::new(&mut *tx).list(page, view).await?;
    tx.commit().await?;

    Ok(Json(directors))
}

async fn get_director(
    State(state): State<CatalogState>,
    Query(params): Query<LookupParams>,
) -> ApiResult<Json<DirectorView>> {
    let filter = params.filter()?;
    let view = ViewMode::from_flag(params.with_movies);

    let mut tx = state.pool.begin().await?;
    let director = DirectorService::new(&mut *tx).get(&filter, view).await?;
    tx.commit().await?;

    Ok(Json(director))
}

async fn create_director(
    State(state): State<CatalogState>,
    caller: MaybeCaller,
    Json(input): Json<CreateDirector>,
) -> ApiResult<(StatusCode, Json<Director>)> {
    let mut tx = state.pool.begin().await?;
    let director = DirectorService::new(&mut *tx)
        .create(caller.caller(), input)
        .await?;
    tx.commit().await?;

    Ok((StatusCode::CREATED, Json(director)))
}

async fn update_director(
    State(state): State<CatalogState>,
    caller: MaybeCaller,
    Json(input): Json<UpdateDirector>,
) -> ApiResult<Json<Director>> {
    let mut tx = state.pool.begin().await?;
    let director = DirectorService::new(&mut *tx)
        .update(caller.caller(), input)
        .await?;
    tx.commit().await?;

    Ok(Json(director))
}

async fn delete_director(
    State(state): State<CatalogState>,
    caller: MaybeCaller,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Director>> {
    let mut tx = state.pool.begin().await?;
    let director = DirectorService::new(&mut *tx)
        .delete(caller.caller(), id)
        .await?;
    tx.commit().await?;

    Ok(Json(director))
}
