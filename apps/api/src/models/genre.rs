//! Genre records

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::movie::Movie;

/// Genre record from the genres table. Names are unique.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Genre {
    pub id: Uuid,
    pub name: String,
}

/// Genre with every movie tagged with it, ordered by title
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenreWithMovies {
    pub id: Uuid,
    pub name: String,
    pub movies: Vec<Movie>,
}

impl From<GenreWithMovies> for Genre {
    fn from(genre: GenreWithMovies) -> Self {
        Self {
            id: genre.id,
            name: genre.name,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateGenre {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateGenre {
    pub id: Uuid,
    #[serde(default)]
    pub name: Option<String>,
}
