//! GraphQL queries for Cinedex
//!
//! Query resolvers are organized by entity.

mod director;
mod genre;
mod movie;

pub use director::DirectorQuery;
pub use genre::GenreQuery;
pub use movie::MovieQuery;

use async_graphql::MergedObject;

/// Root query type combining all entity queries
#[derive(MergedObject, Default)]
pub struct Query(DirectorQuery, GenreQuery, MovieQuery);
