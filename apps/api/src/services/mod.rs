//! Business logic services for Cinedex
//!
//! Entity services borrow the request's connection and are built fresh for
//! every request or GraphQL resolver. `AuthService` and `HealthService` are
//! long-lived and shared through router state.

pub mod auth;
pub mod directors;
pub mod genres;
pub mod health;
pub mod movies;

pub use auth::{authorize, AuthService};
pub use directors::DirectorService;
pub use genres::GenreService;
pub use health::HealthService;
pub use movies::MovieService;
