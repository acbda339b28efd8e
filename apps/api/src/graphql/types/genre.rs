//! Genre GraphQL type

use async_graphql::{Context, ErrorExtensions, Object, Result};
use uuid::Uuid;

use crate::error::ApiError;
use crate::graphql::context::RequestContext;
use crate::models::{Genre as DbGenre, Movie};

/// Genre exposed via GraphQL
#[derive(Debug)]
pub struct Genre {
    inner: DbGenre,
}

impl From<DbGenre> for Genre {
    fn from(genre: DbGenre) -> Self {
        Self { inner: genre }
    }
}

#[Object]
impl Genre {
    async fn id(&self) -> Uuid {
        self.inner.id
    }

    async fn name(&self) -> &str {
        &self.inner.name
    }

    /// Movies tagged with this genre (batched across sibling genres)
    async fn movies(&self, ctx: &Context<'_>) -> Result<Vec<GenreMovie>> {
        let request = ctx.data::<RequestContext>()?;
        let movies = request
            .genre_movies
            .load(self.inner.id)
            .await
            .map_err(|e| ApiError::from(e).extend())?;
        Ok(movies.into_iter().map(GenreMovie).collect())
    }
}

/// Movie as listed under a genre
#[derive(Debug)]
pub struct GenreMovie(Movie);

#[Object]
impl GenreMovie {
    async fn id(&self) -> Uuid {
        self.0.id
    }

    async fn title(&self) -> &str {
        &self.0.title
    }

    async fn release_year(&self) -> Option<i32> {
        self.0.release_year
    }

    async fn director_id(&self) -> Option<Uuid> {
        self.0.director_id
    }
}
