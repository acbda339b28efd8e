//! Movies-by-Director fetcher
//!
//! Batches director ID lookups into a single grouped query returning the
//! movies of each director.

use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use super::BatchFetch;
use crate::error::ApiError;
use crate::models::MovieSummary;
use crate::repositories::{DirectorRepository, UnitOfWork};

/// Fetches movies grouped by director on the request's unit of work
#[derive(Clone)]
pub struct MoviesByDirector {
    uow: UnitOfWork,
}

impl MoviesByDirector {
    pub fn new(uow: UnitOfWork) -> Self {
        Self { uow }
    }
}

impl BatchFetch for MoviesByDirector {
    type Key = Uuid;
    type Value = MovieSummary;
    type Error = Arc<ApiError>;

    async fn fetch(&self, keys: &[Uuid]) -> Result<HashMap<Uuid, Vec<MovieSummary>>, Self::Error> {
        if keys.is_empty() {
            return Ok(HashMap::new());
        }

        let mut conn = self.uow.connection().await.map_err(Arc::new)?;
        DirectorRepository::new(&mut *conn)
            .movies_by_director(keys)
            .await
            .map_err(|e| Arc::new(ApiError::Database(e)))
    }
}
