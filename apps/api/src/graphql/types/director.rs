//! Director GraphQL type

use async_graphql::{Context, ErrorExtensions, Object, Result};
use uuid::Uuid;

use crate::error::ApiError;
use crate::graphql::context::RequestContext;
use crate::models::{Director as DbDirector, MovieSummary};

/// Director exposed via GraphQL
#[derive(Debug)]
pub struct Director {
    inner: DbDirector,
}

impl From<DbDirector> for Director {
    fn from(director: DbDirector) -> Self {
        Self { inner: director }
    }
}

#[Object]
impl Director {
    async fn id(&self) -> Uuid {
        self.inner.id
    }

    async fn name(&self) -> &str {
        &self.inner.name
    }

    /// Movies by this director
    ///
    /// Loads for sibling directors are batched into one grouped query.
    async fn movies(&self, ctx: &Context<'_>) -> Result<Vec<DirectorMovie>> {
        let request = ctx.data::<RequestContext>()?;
        let movies = request
            .director_movies
            .load(self.inner.id)
            .await
            .map_err(|e| ApiError::from(e).extend())?;
        Ok(movies.into_iter().map(DirectorMovie).collect())
    }
}

/// Movie as listed under its director
#[derive(Debug)]
pub struct DirectorMovie(MovieSummary);

#[Object]
impl DirectorMovie {
    async fn id(&self) -> Uuid {
        self.0.id
    }

    async fn title(&self) -> &str {
        &self.0.title
    }

    async fn release_year(&self) -> Option<i32> {
        self.0.release_year
    }
}
