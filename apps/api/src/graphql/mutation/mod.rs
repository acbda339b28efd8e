//! GraphQL mutations for Cinedex
//!
//! Every mutation requires a caller with the `admin` scope.

mod director;
mod genre;
mod movie;

pub use director::DirectorMutation;
pub use genre::GenreMutation;
pub use movie::MovieMutation;

use async_graphql::MergedObject;

/// Root mutation type combining all entity mutations
#[derive(MergedObject, Default)]
pub struct Mutation(DirectorMutation, GenreMutation, MovieMutation);
