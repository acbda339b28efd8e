//! Director records

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::movie::MovieSummary;

/// Director record from the directors table
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Director {
    /// Unique director identifier
    pub id: Uuid,

    /// Director name
    pub name: String,
}

/// Director with the movies they directed, ordered by title
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectorWithMovies {
    pub id: Uuid,
    pub name: String,
    pub movies: Vec<MovieSummary>,
}

impl From<DirectorWithMovies> for Director {
    fn from(director: DirectorWithMovies) -> Self {
        Self {
            id: director.id,
            name: director.name,
        }
    }
}

/// Director creation input
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDirector {
    pub name: String,
}

/// Director partial update input
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateDirector {
    pub id: Uuid,
    #[serde(default)]
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_director_with_movies_serialization() {
        let director = DirectorWithMovies {
            id: Uuid::new_v4(),
            name: "Agnès Varda".to_string(),
            movies: vec![],
        };

        let json = serde_json::to_value(&director).expect("serialization should succeed");
        assert_eq!(json["name"], "Agnès Varda");
        assert_eq!(json["movies"], serde_json::json!([]));
    }

    #[test]
    fn test_update_director_name_is_optional() {
        let id = Uuid::new_v4();
        let input: UpdateDirector =
            serde_json::from_value(serde_json::json!({ "id": id })).expect("valid input");
        assert_eq!(input.id, id);
        assert!(input.name.is_none());
    }
}
