//! Shared state and query parameters for the catalog routes

use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ApiResult;
use crate::repositories::{KeyFilter, Pagination};

/// State shared by the catalog routers
#[derive(Clone)]
pub struct CatalogState {
    pub pool: PgPool,
}

impl CatalogState {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Build a pagination window from optional `skip`/`limit` parameters
pub fn pagination(skip: Option<i64>, limit: Option<i64>) -> ApiResult<Pagination> {
    Pagination::new(
        skip.unwrap_or(0),
        limit.unwrap_or(Pagination::DEFAULT_LIMIT),
    )
}

/// `?with_movies&skip&limit` for director and genre listings
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub with_movies: bool,
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

/// `?id|name&with_movies` for single director and genre lookups
#[derive(Debug, Default, Deserialize)]
pub struct LookupParams {
    pub id: Option<Uuid>,
    pub name: Option<String>,
    #[serde(default)]
    pub with_movies: bool,
}

impl LookupParams {
    pub fn filter(&self) -> ApiResult<KeyFilter> {
        KeyFilter::from_parts(self.id, self.name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use assert_matches::assert_matches;

    #[test]
    fn test_pagination_defaults() {
        assert_eq!(pagination(None, None).unwrap(), Pagination::default());
        assert_eq!(pagination(Some(5), None).unwrap().skip, 5);
    }

    #[test]
    fn test_pagination_rejects_negative_values() {
        assert_matches!(pagination(Some(-1), None), Err(ApiError::ValidationError(_)));
    }

    #[test]
    fn test_lookup_requires_one_key() {
        let params = LookupParams::default();
        assert_matches!(params.filter(), Err(ApiError::ValidationError(_)));
    }
}
