//! Movie mutations

use async_graphql::{Context, InputObject, Object, Result};
use uuid::Uuid;

use crate::graphql::context::RequestContext;
use crate::graphql::field_error;
use crate::graphql::types::{Movie, StatusResponse};
use crate::models::{CreateMovie, UpdateMovie};
use crate::repositories::{savepoint, settle};
use crate::services::MovieService;

#[derive(Debug, Clone, InputObject)]
pub struct CreateMovieInput {
    pub title: String,
    pub release_year: Option<i32>,
    /// Unknown directors are ignored
    pub director_id: Option<Uuid>,
    /// Genre names separated by `|`, e.g. `"Sci-Fi|Thriller"`
    pub genre: Option<String>,
}

impl From<CreateMovieInput> for CreateMovie {
    fn from(input: CreateMovieInput) -> Self {
        Self {
            title: input.title,
            release_year: input.release_year,
            director_id: input.director_id,
            genre: input.genre,
        }
    }
}

#[derive(Debug, Clone, InputObject)]
pub struct UpdateMovieInput {
    pub id: Uuid,
    pub title: Option<String>,
    pub release_year: Option<i32>,
    pub director_id: Option<Uuid>,
}

impl From<UpdateMovieInput> for UpdateMovie {
    fn from(input: UpdateMovieInput) -> Self {
        Self {
            id: input.id,
            title: input.title,
            release_year: input.release_year,
            director_id: input.director_id,
        }
    }
}

#[derive(Default)]
pub struct MovieMutation;

#[Object]
impl MovieMutation {
    /// Create a movie with its genres, creating missing genres on the way
    async fn create_movie(
        &self,
        ctx: &Context<'_>,
        input: CreateMovieInput,
    ) -> Result<Option<Movie>> {
        let request = ctx.data::<RequestContext>()?;

        let mut conn = request.connection().await.map_err(field_error)?;
        let mut tx = savepoint(&mut conn).await.map_err(field_error)?;
        let result = MovieService::new(&mut *tx)
            .create(request.caller(), input.into())
            .await;
        let movie = settle(tx, result).await.map_err(field_error)?;

        Ok(Some(Movie::from(movie)))
    }

    async fn update_movie(
        &self,
        ctx: &Context<'_>,
        input: UpdateMovieInput,
    ) -> Result<Option<Movie>> {
        let request = ctx.data::<RequestContext>()?;

        let mut conn = request.connection().await.map_err(field_error)?;
        let mut tx = savepoint(&mut conn).await.map_err(field_error)?;
        let result = MovieService::new(&mut *tx)
            .update(request.caller(), input.into())
            .await;
        let movie = settle(tx, result).await.map_err(field_error)?;

        Ok(Some(Movie::from(movie)))
    }

    async fn delete_movie(
        &self,
        ctx: &Context<'_>,
        id: Uuid,
    ) -> Result<Option<StatusResponse>> {
        let request = ctx.data::<RequestContext>()?;

        let mut conn = request.connection().await.map_err(field_error)?;
        let mut tx = savepoint(&mut conn).await.map_err(field_error)?;
        let result = MovieService::new(&mut *tx)
            .delete(request.caller(), id)
            .await;
        let movie = settle(tx, result).await.map_err(field_error)?;

        Ok(Some(StatusResponse::deleted("movie", &movie.title)))
    }
}
