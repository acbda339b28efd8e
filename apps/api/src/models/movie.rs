//! Movie records
//!
//! A movie is stored with a nullable director reference and an ordered set
//! of genre associations. The extended view flattens both into display
//! fields: the director's name and the genre names joined with
//! [`GENRE_DELIMITER`].

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Separator between genre names in the flattened `genre` display string
pub const GENRE_DELIMITER: &str = " | ";

/// Separator accepted between genre names on movie creation
pub const GENRE_INPUT_SEPARATOR: char = '|';

/// Movie record from the movies table
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Movie {
    /// Unique movie identifier
    pub id: Uuid,

    /// Movie title
    pub title: String,

    /// Year of release, when known
    pub release_year: Option<i32>,

    /// Director reference, when the movie has one
    pub director_id: Option<Uuid>,
}

/// Movie as nested under its director
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: Uuid,
    pub title: String,
    pub release_year: Option<i32>,
}

/// Movie with its director name and flattened genre list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MovieExtended {
    pub id: Uuid,
    pub title: String,
    pub release_year: Option<i32>,
    pub director_id: Option<Uuid>,

    /// Name of the director, `None` when the movie has no director
    pub director: Option<String>,

    /// Genre names in attachment order joined with [`GENRE_DELIMITER`];
    /// empty when the movie has no genres
    pub genre: String,
}

impl From<MovieExtended> for Movie {
    fn from(movie: MovieExtended) -> Self {
        Self {
            id: movie.id,
            title: movie.title,
            release_year: movie.release_year,
            director_id: movie.director_id,
        }
    }
}

/// Movie creation input
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateMovie {
    pub title: String,
    #[serde(default)]
    pub release_year: Option<i32>,
    #[serde(default)]
    pub director_id: Option<Uuid>,
    /// Genre names separated by `|`, e.g. `"Sci-Fi|Thriller"`
    #[serde(default)]
    pub genre: Option<String>,
}

/// Movie partial update input; absent fields keep their stored value
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateMovie {
    pub id: Uuid,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub release_year: Option<i32>,
    #[serde(default)]
    pub director_id: Option<Uuid>,
}

impl CreateMovie {
    /// Genre names from the `genre` input, trimmed, in input order, with
    /// empty entries and repeats removed
    pub fn genre_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        let Some(raw) = self.genre.as_deref() else {
            return names;
        };

        for name in raw.split(GENRE_INPUT_SEPARATOR).map(str::trim) {
            if !name.is_empty() && !names.iter().any(|existing| existing == name) {
                names.push(name.to_string());
            }
        }
        names
    }
}
