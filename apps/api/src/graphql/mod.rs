//! GraphQL schema and resolvers for Cinedex
//!
//! - Query resolvers for directors, genres and movies
//! - Mutation resolvers for the same entities (admin only)
//! - Object types whose nested `movies` fields go through batch loaders
//!
//! Each request runs in one unit of work that commits once the response is
//! produced. Every root mutation runs in its own savepoint, so a failed
//! mutation is undone alone and its siblings keep their writes.

pub mod context;
pub mod mutation;
pub mod pagination;
pub mod query;
pub mod schema;
pub mod types;

pub use context::RequestContext;
pub use schema::{build_schema, CinedexSchema, SchemaBuilder};

use async_graphql::{ErrorExtensions, Pos, Response};
use sqlx::PgPool;

use crate::error::ApiError;
use crate::models::Caller;
use crate::repositories::UnitOfWork;

/// Convert a service error into a field error carrying its `code` extension
pub(crate) fn field_error(error: ApiError) -> async_graphql::Error {
    error.extend()
}

fn request_error(error: ApiError) -> Response {
    Response::from_errors(vec![error.extend().into_server_error(Pos::default())])
}

/// Execute one GraphQL request inside its own unit of work
pub async fn execute(
    schema: &CinedexSchema,
    pool: &PgPool,
    caller: Option<Caller>,
    request: async_graphql::Request,
) -> Response {
    let uow = match UnitOfWork::begin(pool).await {
        Ok(uow) => uow,
        Err(e) => return request_error(e),
    };

    let context = RequestContext::new(uow.clone(), caller);
    let response = schema.execute(request.data(context)).await;

    if !response.is_ok() {
        tracing::debug!(
            errors = response.errors.len(),
            "GraphQL request finished with field errors"
        );
    }
    if let Err(e) = uow.commit().await {
        return request_error(e);
    }

    response
}
