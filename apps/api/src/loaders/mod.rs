//! Request-scoped batch loading
//!
//! Nested GraphQL fields ask for related rows one parent at a time. A
//! [`BatchLoader`] collects every key requested while sibling fields are
//! being resolved and answers all of them with one grouped query.
//!
//! Loaders hold no cache and are created per request, so a loader never
//! serves rows from another request's transaction.

mod batch;
mod movies_by_director;
mod movies_by_genre;

pub use batch::{BatchFetch, BatchLoader, LoadError};
pub use movies_by_director::MoviesByDirector;
pub use movies_by_genre::MoviesByGenre;
