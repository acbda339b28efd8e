//! Pagination arguments for GraphQL list resolvers
//!
//! GraphQL arguments share the REST window rules: negative values are
//! rejected, as is a limit above [`Pagination::MAX_LIMIT`].

use crate::error::ApiResult;
use crate::repositories::Pagination;

/// Build the pagination window from `skip`/`limit` arguments
#[inline]
pub fn page_window(skip: i32, limit: i32) -> ApiResult<Pagination> {
    Pagination::new(i64::from(skip), i64::from(limit))
}
