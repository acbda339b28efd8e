//! Movie queries

use async_graphql::{Context, Object, Result};
use uuid::Uuid;

use crate::graphql::context::RequestContext;
use crate::graphql::field_error;
use crate::graphql::pagination::page_window;
use crate::graphql::types::{Movie, MovieOrder, MovieSort};
use crate::repositories::{KeyFilter, MovieOrdering, ViewMode};
use crate::services::MovieService;

#[derive(Default)]
pub struct MovieQuery;

#[Object]
impl MovieQuery {
    /// Get a movie by ID with its director name and genres
    async fn movie(&self, ctx: &Context<'_>, id: Uuid) -> Result<Option<Movie>> {
        let request = ctx.data::<RequestContext>()?;

        let mut conn = request.connection().await.map_err(field_error)?;
        let movie = MovieService::new(&mut *conn)
            .get(&KeyFilter::Id(id), ViewMode::Extended)
            .await
            .map_err(field_error)?;

        Movie::from_view(movie).map(Some).map_err(field_error)
    }

    /// List movies; ties in the sort key are broken by ID
    async fn movies(
        &self,
        ctx: &Context<'_>,
        #[graphql(default = 0)] skip: i32,
        #[graphql(default = 20)] limit: i32,
        #[graphql(default)] order_by: MovieOrder,
        #[graphql(default)] sort_by: MovieSort,
    ) -> Result<Option<Vec<Movie>>> {
        let request = ctx.data::<RequestContext>()?;
        let page = page_window(skip, limit).map_err(field_error)?;
        let ordering = MovieOrdering::new(order_by.into(), sort_by.into());

        let mut conn = request.connection().await.map_err(field_error)?;
        let movies = MovieService::new(&mut *conn)
            .list(page, ViewMode::Extended, ordering)
            .await
            .map_err(field_error)?;

        movies
            .into_iter()
            .map(Movie::from_view)
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
            .map_err(field_error)
    }
}
