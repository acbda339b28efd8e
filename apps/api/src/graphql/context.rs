//! Per-request GraphQL context
//!
//! Built once at request entry and dropped when the response is produced.
//! Every resolver and loader of the request shares the same unit of work.

use sqlx::PgConnection;
use tokio::sync::MappedMutexGuard;

use crate::error::ApiResult;
use crate::loaders::{BatchLoader, MoviesByDirector, MoviesByGenre};
use crate::models::Caller;
use crate::repositories::UnitOfWork;

pub struct RequestContext {
    pub uow: UnitOfWork,
    pub caller: Option<Caller>,
    pub director_movies: BatchLoader<MoviesByDirector>,
    pub genre_movies: BatchLoader<MoviesByGenre>,
}

impl RequestContext {
    pub fn new(uow: UnitOfWork, caller: Option<Caller>) -> Self {
        Self {
            director_movies: BatchLoader::new(MoviesByDirector::new(uow.clone())),
            genre_movies: BatchLoader::new(MoviesByGenre::new(uow.clone())),
            uow,
            caller,
        }
    }

    /// Lock the request's connection for one statement
    pub async fn connection(&self) -> ApiResult<MappedMutexGuard<'_, PgConnection>> {
        self.uow.connection().await
    }

    pub fn caller(&self) -> Option<&Caller> {
        self.caller.as_ref()
    }
}
