//! Director queries

use async_graphql::{Context, Object, Result};
use uuid::Uuid;

use crate::graphql::context::RequestContext;
use crate::graphql::field_error;
use crate::graphql::pagination::page_window;
use crate::graphql::types::Director;
use crate::models::DirectorView;
use crate::repositories::{KeyFilter, ViewMode};
use crate::services::DirectorService;

#[derive(Default)]
pub struct DirectorQuery;

#[Object]
impl DirectorQuery {
    /// Get a director by ID or by name; exactly one must be given
    async fn director(
        &self,
        ctx: &Context<'_>,
        id: Option<Uuid>,
        name: Option<String>,
    ) -> Result<Option<Director>> {
        let request = ctx.data::<RequestContext>()?;
        let filter = KeyFilter::from_parts(id, name).map_err(field_error)?;

        let mut conn = request.connection().await.map_err(field_error)?;
        let director = DirectorService::new(&mut *conn)
            .get(&filter, ViewMode::Flat)
            .await
            .map_err(field_error)?;

        Ok(Some(Director::from(director.into_flat())))
    }

    /// List directors ordered by name
    async fn directors(
        &self,
        ctx: &Context<'_>,
        #[graphql(default = 0)] skip: i32,
        #[graphql(default = 20)] limit: i32,
    ) -> Result<Option<Vec<Director>>> {
        let request = ctx.data::<RequestContext>()?;
        let page = page_window(skip, limit).map_err(field_error)?;

        let mut conn = request.connection().await.map_err(field_error)?;
        let directors = DirectorService::new(&mut *conn)
            .list(page, ViewMode::Flat)
            .await
            .map_err(field_error)?;

        Ok(Some(
            directors
                .into_iter()
                .map(DirectorView::into_flat)
                .map(Director::from)
                .collect(),
        ))
    }
}
