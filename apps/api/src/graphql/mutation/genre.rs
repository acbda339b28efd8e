//! Genre mutations

use async_graphql::{Context, InputObject, Object, Result};
use uuid::Uuid;

use crate::graphql::context::RequestContext;
use crate::graphql::field_error;
use crate::graphql::types::{Genre, StatusResponse};
use crate::models::{CreateGenre, UpdateGenre};
use crate::repositories::{savepoint, settle};
use crate::services::GenreService;

#[derive(Debug, Clone, InputObject)]
pub struct CreateGenreInput {
    pub name: String,
}

#[derive(Debug, Clone, InputObject)]
pub struct UpdateGenreInput {
    pub id: Uuid,
    pub name: Option<String>,
}

#[derive(Default)]
pub struct GenreMutation;

#[Object]
impl GenreMutation {
    /// Create a genre; an existing genre with the same name is returned as is
    async fn create_genre(
        &self,
        ctx: &Context<'_>,
        input: CreateGenreInput,
    ) -> Result<Option<Genre>> {
        let request = ctx.data::<RequestContext>()?;
        let create = CreateGenre { name: input.name };

        let mut conn = request.connection().await.map_err(field_error)?;
        let mut tx = savepoint(&mut conn).await.map_err(field_error)?;
        let result = GenreService::new(&mut *tx)
            .create(request.caller(), create)
            .await;
        let genre = settle(tx, result).await.map_err(field_error)?;

        Ok(Some(Genre::from(genre)))
    }

    async fn update_genre(
        &self,
        ctx: &Context<'_>,
        input: UpdateGenreInput,
    ) -> Result<Option<Genre>> {
        let request = ctx.data::<RequestContext>()?;
        let update = UpdateGenre {
            id: input.id,
            name: input.name,
        };

        let mut conn = request.connection().await.map_err(field_error)?;
        let mut tx = savepoint(&mut conn).await.map_err(field_error)?;
        let result = GenreService::new(&mut *tx)
            .update(request.caller(), update)
            .await;
        let genre = settle(tx, result).await.map_err(field_error)?;

        Ok(Some(Genre::from(genre)))
    }

    async fn delete_genre(
        &self,
        ctx: &Context<'_>,
        id: Uuid,
    ) -> Result<Option<StatusResponse>> {
        let request = ctx.data::<RequestContext>()?;

        let mut conn = request.connection().await.map_err(field_error)?;
        let mut tx = savepoint(&mut conn).await.map_err(field_error)?;
        let result = GenreService::new(&mut *tx)
            .delete(request.caller(), id)
            .await;
        let genre = settle(tx, result).await.map_err(field_error)?;

        Ok(Some(StatusResponse::deleted("genre", &genre.name)))
    }
}
