//! GraphQL object types for the catalog

mod director;
mod genre;
mod movie;
mod status;

pub use director::{Director, DirectorMovie};
pub use genre::{Genre, GenreMovie};
pub use movie::{Movie, MovieOrder, MovieSort};
pub use status::StatusResponse;
