//! Row to record mapping
//!
//! Extended rows carry their related collections as aggregate columns that
//! are NULL when the parent has no children. Mapping turns those NULLs into
//! empty collections so records never expose a missing list.

use std::collections::HashMap;

use sqlx::{types::Json, FromRow};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::{
    DirectorWithMovies, GenreWithMovies, Movie, MovieExtended, MovieSummary, GENRE_DELIMITER,
};

/// Director row with its aggregated movies
#[derive(Debug, FromRow)]
pub struct DirectorExtendedRow {
    pub id: Uuid,
    pub name: String,
    pub movies: Option<Json<Vec<MovieSummary>>>,
}

/// Genre row with its aggregated movies
#[derive(Debug, FromRow)]
pub struct GenreExtendedRow {
    pub id: Uuid,
    pub name: String,
    pub movies: Option<Json<Vec<Movie>>>,
}

/// Movie row with director name and aggregated genre names
#[derive(Debug, FromRow)]
pub struct MovieExtendedRow {
    pub id: Uuid,
    pub title: String,
    pub release_year: Option<i32>,
    pub director_id: Option<Uuid>,
    pub director: Option<String>,
    pub genres: Option<Vec<String>>,
}

/// One group of a batch query: the key and its children
#[derive(Debug, FromRow)]
pub struct MovieGroupRow<T> {
    pub group_key: Uuid,
    pub movies: Option<Json<Vec<T>>>,
}

/// Null aggregate to empty collection
pub fn coalesce<T>(aggregate: Option<Json<Vec<T>>>) -> Vec<T> {
    aggregate.map(|Json(items)| items).unwrap_or_default()
}

/// Genre names in aggregate order joined into the display string
pub fn join_genres(genres: Option<Vec<String>>) -> String {
    genres.unwrap_or_default().join(GENRE_DELIMITER)
}

impl From<DirectorExtendedRow> for DirectorWithMovies {
    fn from(row: DirectorExtendedRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            movies: coalesce(row.movies),
        }
    }
}

impl From<GenreExtendedRow> for GenreWithMovies {
    fn from(row: GenreExtendedRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            movies: coalesce(row.movies),
        }
    }
}

impl From<MovieExtendedRow> for MovieExtended {
    fn from(row: MovieExtendedRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            release_year: row.release_year,
            director_id: row.director_id,
            director: row.director,
            genre: join_genres(row.genres),
        }
    }
}

/// Map the single row of a keyed lookup
///
/// Fails with `NotFound` only when the parent row is missing.
pub fn map_one<R, T>(row: Option<R>, resource_type: &'static str, key: &str) -> ApiResult<T>
where
    R: Into<T>,
{
    row.map(Into::into)
        .ok_or_else(|| ApiError::not_found(resource_type, key))
}

pub fn map_many<R, T>(rows: Vec<R>) -> Vec<T>
where
    R: Into<T>,
{
    rows.into_iter().map(Into::into).collect()
}

/// Index batch groups by key; keys absent from the result have no entry
pub fn map_groups<T>(rows: Vec<MovieGroupRow<T>>) -> HashMap<Uuid, Vec<T>> {
    rows.into_iter()
        .map(|row| (row.group_key, coalesce(row.movies)))
        .collect()
}
