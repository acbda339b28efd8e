//! Movie service
//!
//! Movie writes touch three tables. Creation resolves the director
//! reference, inserts the movie, then attaches each genre named in the
//! `genre` input in order, creating genres that do not exist yet. All of it
//! runs on the request's transaction and commits or rolls back together.

use sqlx::PgConnection;
use tracing::instrument;
use uuid::Uuid;

use super::auth::authorize;
use super::genres::GenreService;
use crate::error::{ApiError, ApiResult};
use crate::models::{Caller, CreateMovie, MovieExtended, MovieView, Scope, UpdateMovie};
use crate::repositories::{
    DirectorRepository, KeyFilter, MovieOrdering, MovieRepository, Pagination, ViewMode,
};

pub struct MovieService<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> MovieService<'c> {
    pub fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }

    fn repo(&mut self) -> MovieRepository<'_> {
        MovieRepository::new(&mut *self.conn)
    }

    pub async fn list(
        &mut self,
        page: Pagination,
        view: ViewMode,
        ordering: MovieOrdering,
    ) -> ApiResult<Vec<MovieView>> {
        if page.is_empty() {
            return Ok(Vec::new());
        }
        self.repo().list(view, ordering, page).await
    }

    /// Movies are looked up by id only
    pub async fn get(&mut self, filter: &KeyFilter, view: ViewMode) -> ApiResult<MovieView> {
        match filter {
            KeyFilter::Id(id) => self.repo().find(*id, view).await,
            KeyFilter::Name(_) => Err(ApiError::ValidationError(
                "movies can only be looked up by id".to_string(),
            )),
        }
    }

    /// Create a movie with its genres; returns the extended record
    ///
    /// An unknown director id is dropped and the movie is stored without a
    /// director.
    #[instrument(skip(self, caller, input), fields(title = %input.title))]
    pub async fn create(
        &mut self,
        caller: Option<&Caller>,
        input: CreateMovie,
    ) -> ApiResult<MovieExtended> {
        authorize(caller, &[Scope::Admin])?;
        let title = validate_title(&input.title)?;

        let director_id = self.known_director(input.director_id).await?;
        let movie = self
            .repo()
            .insert(title, input.release_year, director_id)
            .await?;

        for (position, name) in input.genre_names().iter().enumerate() {
            let genre = GenreService::new(&mut *self.conn).resolve(name).await?;
            self.repo()
                .attach_genre(movie.id, genre.id, position as i32)
                .await?;
        }

        tracing::info!(movie_id = %movie.id, "Movie created");
        self.repo().find_extended(movie.id).await
    }

    /// Apply a partial update; returns the extended record
    ///
    /// An unknown director id is ignored and the previous director kept.
    #[instrument(skip(self, caller, input), fields(movie_id = %input.id))]
    pub async fn update(
        &mut self,
        caller: Option<&Caller>,
        input: UpdateMovie,
    ) -> ApiResult<MovieExtended> {
        authorize(caller, &[Scope::Admin])?;
        let title = input.title.as_deref().map(validate_title).transpose()?;

        let director_id = self.known_director(input.director_id).await?;
        self.repo()
            .update(input.id, title, input.release_year, director_id)
            .await?
            .ok_or_else(|| ApiError::not_found("movie", input.id.to_string()))?;

        self.repo().find_extended(input.id).await
    }

    /// Delete a movie; returns the record as it was before deletion
    #[instrument(skip(self, caller))]
    pub async fn delete(&mut self, caller: Option<&Caller>, id: Uuid) -> ApiResult<MovieExtended> {
        authorize(caller, &[Scope::Admin])?;

        let movie = self.repo().find_extended(id).await?;
        self.repo()
            .delete(id)
            .await?
            .ok_or_else(|| ApiError::not_found("movie", id.to_string()))?;
        tracing::info!(movie_id = %id, "Movie deleted");
        Ok(movie)
    }

    /// The director id if it references an existing director
    async fn known_director(&mut self, director_id: Option<Uuid>) -> ApiResult<Option<Uuid>> {
        let Some(id) = director_id else {
            return Ok(None);
        };

        if DirectorRepository::new(&mut *self.conn).exists(id).await? {
            Ok(Some(id))
        } else {
            tracing::warn!(director_id = %id, "Ignoring unknown director reference");
            Ok(None)
        }
    }
}

fn validate_title(title: &str) -> ApiResult<&str> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ApiError::ValidationError(
            "title must not be empty".to_string(),
        ));
    }
    Ok(title)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_validate_title() {
        assert_eq!(validate_title(" Tenet ").unwrap(), "Tenet");
        assert_matches!(validate_title("\t"), Err(ApiError::ValidationError(_)));
    }
}
