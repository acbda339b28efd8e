//! Database models and types for Cinedex
//!
//! This module contains the catalog records returned by the repositories,
//! the inputs accepted by the services, and the caller identity types used
//! by the capability check.

pub mod auth;
pub mod director;
pub mod genre;
pub mod movie;

pub use auth::{Caller, Claims, Scope};
pub use director::{CreateDirector, Director, DirectorWithMovies, UpdateDirector};
pub use genre::{CreateGenre, Genre, GenreWithMovies, UpdateGenre};
pub use movie::{
    CreateMovie, Movie, MovieExtended, MovieSummary, UpdateMovie, GENRE_DELIMITER,
    GENRE_INPUT_SEPARATOR,
};

use serde::Serialize;

/// A record in either its flat or its extended shape
///
/// Serializes as the inner record, so REST responses carry exactly the
/// fields of whichever view was requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum EntityView<F, E> {
    Flat(F),
    Extended(E),
}

impl<F, E: Into<F>> EntityView<F, E> {
    /// Drop any aggregated relations and keep the entity's own fields
    pub fn into_flat(self) -> F {
        match self {
            Self::Flat(flat) => flat,
            Self::Extended(extended) => extended.into(),
        }
    }
}

impl<F, E> EntityView<F, E> {
    /// The extended record, if this view carries one
    pub fn into_extended(self) -> Option<E> {
        match self {
            Self::Flat(_) => None,
            Self::Extended(extended) => Some(extended),
        }
    }
}

pub type DirectorView = EntityView<Director, DirectorWithMovies>;
pub type GenreView = EntityView<Genre, GenreWithMovies>;
pub type MovieView = EntityView<Movie, MovieExtended>;

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_extended_view_flattens_to_entity() {
        let id = Uuid::new_v4();
        let view: DirectorView = EntityView::Extended(DirectorWithMovies {
            id,
            name: "Agnès Varda".to_string(),
            movies: Vec::new(),
        });

        let director = view.into_flat();
        assert_eq!(director.id, id);
        assert_eq!(director.name, "Agnès Varda");
    }

    #[test]
    fn test_flat_view_has_no_extended_record() {
        let view: GenreView = EntityView::Flat(Genre {
            id: Uuid::new_v4(),
            name: "Noir".to_string(),
        });
        assert!(view.into_extended().is_none());
    }

    #[test]
    fn test_view_serializes_as_inner_record() {
        let id = Uuid::new_v4();
        let view: DirectorView = EntityView::Flat(Director {
            id,
            name: "Ozu".to_string(),
        });

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json, serde_json::json!({ "id": id, "name": "Ozu" }));
    }
}
