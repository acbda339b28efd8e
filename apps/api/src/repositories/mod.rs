//! Database repository layer for Cinedex
//!
//! Repositories borrow one connection for their lifetime, so every statement
//! of a request runs inside the same transaction. Reads are built by
//! [`query_builder`] and decoded through [`mapper`].

pub mod director;
pub mod genre;
pub mod mapper;
pub mod movie;
pub mod query_builder;
pub mod unit_of_work;

pub use director::DirectorRepository;
pub use genre::GenreRepository;
pub use movie::MovieRepository;
pub use query_builder::{
    BuiltQuery, EntityKind, KeyFilter, MovieOrderKey, MovieOrdering, Pagination, SortDirection,
    SqlParam, ViewMode,
};
pub use unit_of_work::{savepoint, settle, UnitOfWork};
