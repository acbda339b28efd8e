//! Movies-by-Genre fetcher

use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use super::BatchFetch;
use crate::error::ApiError;
use crate::models::Movie;
use crate::repositories::{GenreRepository, UnitOfWork};

/// Fetches movies grouped by genre through the association table
#[derive(Clone)]
pub struct MoviesByGenre {
    uow: UnitOfWork,
}

impl MoviesByGenre {
    pub fn new(uow: UnitOfWork) -> Self {
        Self { uow }
    }
}

impl BatchFetch for MoviesByGenre {
    type Key = Uuid;
    type Value = Movie;
    type Error = Arc<ApiError>;

    async fn fetch(&self, keys: &[Uuid]) -> Result<HashMap<Uuid, Vec<Movie>>, Self::Error> {
        if keys.is_empty() {
            return Ok(HashMap::new());
        }

        let mut conn = self.uow.connection().await.map_err(Arc::new)?;
        GenreRepository::new(&mut *conn)
            .movies_by_genre(keys)
            .await
            .map_err(|e| Arc::new(ApiError::Database(e)))
    }
}
