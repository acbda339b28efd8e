//! Director mutations
//!
//! All of them require the `admin` scope.

use async_graphql::{Context, InputObject, Object, Result};
use uuid::Uuid;

use crate::graphql::context::RequestContext;
use crate::graphql::field_error;
use crate::graphql::types::{Director, StatusResponse};
use crate::models::{CreateDirector, UpdateDirector};
use crate::repositories::{savepoint, settle};
use crate::services::DirectorService;

#[derive(Debug, Clone, InputObject)]
pub struct CreateDirectorInput {
    pub name: String,
}

impl From<CreateDirectorInput> for CreateDirector {
    fn from(input: CreateDirectorInput) -> Self {
        Self { name: input.name }
    }
}

/// Partial update; an absent name leaves the director unchanged
#[derive(Debug, Clone, InputObject)]
pub struct UpdateDirectorInput {
    pub id: Uuid,
    pub name: Option<String>,
}

impl From<UpdateDirectorInput> for UpdateDirector {
    fn from(input: UpdateDirectorInput) -> Self {
        Self {
            id: input.id,
            name: input.name,
        }
    }
}

#[derive(Default)]
pub struct DirectorMutation;

#[Object]
impl DirectorMutation {
    async fn create_director(
        &self,
        ctx: &Context<'_>,
        input: CreateDirectorInput,
    ) -> Result<Option<Director>> {
        let request = ctx.data::<RequestContext>()?;

        let mut conn = request.connection().await.map_err(field_error)?;
        let mut tx = savepoint(&mut conn).await.map_err(field_error)?;
        let result = DirectorService::new(&mut *tx)
            .create(request.caller(), input.into())
            .await;
        let director = settle(tx, result).await.map_err(field_error)?;

        Ok(Some(Director::from(director)))
    }

    async fn update_director(
        &self,
        ctx: &Context<'_>,
        input: UpdateDirectorInput,
    ) -> Result<Option<Director>> {
        let request = ctx.data::<RequestContext>()?;

        let mut conn = request.connection().await.map_err(field_error)?;
        let mut tx = savepoint(&mut conn).await.map_err(field_error)?;
        let result = DirectorService::new(&mut *tx)
            .update(request.caller(), input.into())
            .await;
        let director = settle(tx, result).await.map_err(field_error)?;

        Ok(Some(Director::from(director)))
    }

    /// Delete a director; their movies are kept without a director
    async fn delete_director(
        &self,
        ctx: &Context<'_>,
        id: Uuid,
    ) -> Result<Option<StatusResponse>> {
        let request = ctx.data::<RequestContext>()?;

        let mut conn = request.connection().await.map_err(field_error)?;
        let mut tx = savepoint(&mut conn).await.map_err(field_error)?;
        let result = DirectorService::new(&mut *tx)
            .delete(request.caller(), id)
            .await;
        let director = settle(tx, result).await.map_err(field_error)?;

        Ok(Some(StatusResponse::deleted("director", &director.name)))
    }
}
