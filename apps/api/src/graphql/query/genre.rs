//! Genre queries

use async_graphql::{Context, Object, Result};
use uuid::Uuid;

use crate::graphql::context::RequestContext;
use crate::graphql::field_error;
use crate::graphql::pagination::page_window;
use crate::graphql::types::Genre;
use crate::models::GenreView;
use crate::repositories::{KeyFilter, ViewMode};
use crate::services::GenreService;

#[derive(Default)]
pub struct GenreQuery;

#[Object]
impl GenreQuery {
    /// Get a genre by ID or by name; exactly one must be given
    async fn genre(
        &self,
        ctx: &Context<'_>,
        id: Option<Uuid>,
        name: Option<String>,
    ) -> Result<Option<Genre>> {
        let request = ctx.data::<RequestContext>()?;
        let filter = KeyFilter::from_parts(id, name).map_err(field_error)?;

        let mut conn = request.connection().await.map_err(field_error)?;
        let genre = GenreService::new(&mut *conn)
            .get(&filter, ViewMode::Flat)
            .await
            .map_err(field_error)?;

        Ok(Some(Genre::from(genre.into_flat())))
    }

    async fn genres(
        &self,
        ctx: &Context<'_>,
        #[graphql(default = 0)] skip: i32,
        #[graphql(default = 20)] limit: i32,
    ) -> Result<Option<Vec<Genre>>> {
        let request = ctx.data::<RequestContext>()?;
        let page = page_window(skip, limit).map_err(field_error)?;

        let mut conn = request.connection().await.map_err(field_error)?;
        let genres = GenreService::new(&mut *conn)
            .list(page, ViewMode::Flat)
            .await
            .map_err(field_error)?;

        Ok(Some(
            genres
                .into_iter()
                .map(GenreView::into_flat)
                .map(Genre::from)
                .collect(),
        ))
    }
}
