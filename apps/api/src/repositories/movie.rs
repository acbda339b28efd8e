//! Movie repository

use sqlx::PgConnection;
use uuid::Uuid;

use super::mapper::{self, MovieExtendedRow};
use super::query_builder::{
    build_entity_query, EntityKind, KeyFilter, MovieOrdering, Pagination, ViewMode,
};
use crate::error::ApiResult;
use crate::models::{EntityView, Movie, MovieExtended, MovieView};

const RESOURCE: &str = "movie";

/// Columns returned by movie writes
const RETURNING_MOVIE: &str = "RETURNING id, title, release_year, director_id";

/// Repository for movie database operations on a borrowed connection
pub struct MovieRepository<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> MovieRepository<'c> {
    pub fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }

    pub async fn find(&mut self, id: Uuid, view: ViewMode) -> ApiResult<MovieView> {
        match view {
            ViewMode::Flat => {
                let query = build_entity_query(
                    EntityKind::Movie,
                    Some(&KeyFilter::Id(id)),
                    ViewMode::Flat,
                    None,
                    None,
                )?;
                let row = query
                    .query_as::<Movie>()
                    .fetch_optional(&mut *self.conn)
                    .await?;
                mapper::map_one(row, RESOURCE, &id.to_string()).map(EntityView::Flat)
            }
            ViewMode::Extended => self.find_extended(id).await.map(EntityView::Extended),
        }
    }

    /// Movie with director name and genre string
    pub async fn find_extended(&mut self, id: Uuid) -> ApiResult<MovieExtended> {
        let query = build_entity_query(
            EntityKind::Movie,
            Some(&KeyFilter::Id(id)),
            ViewMode::Extended,
            None,
            None,
        )?;
        let row = query
            .query_as::<MovieExtendedRow>()
            .fetch_optional(&mut *self.conn)
            .await?;
        mapper::map_one(row, RESOURCE, &id.to_string())
    }

    pub async fn list(
        &mut self,
        view: ViewMode,
        ordering: MovieOrdering,
        page: Pagination,
    ) -> ApiResult<Vec<MovieView>> {
        let query =
            build_entity_query(EntityKind::Movie, None, view, Some(ordering), Some(page))?;

        let movies = match view {
            ViewMode::Flat => query
                .query_as::<Movie>()
                .fetch_all(&mut *self.conn)
                .await?
                .into_iter()
                .map(EntityView::Flat)
                .collect(),
            ViewMode::Extended => {
                let rows = query
                    .query_as::<MovieExtendedRow>()
                    .fetch_all(&mut *self.conn)
                    .await?;
                mapper::map_many::<_, MovieExtended>(rows)
                    .into_iter()
                    .map(EntityView::Extended)
                    .collect()
            }
        };
        Ok(movies)
    }

    pub async fn insert(
        &mut self,
        title: &str,
        release_year: Option<i32>,
        director_id: Option<Uuid>,
    ) -> Result<Movie, sqlx::Error> {
        let sql = format!(
            "INSERT INTO movies (id, title, release_year, director_id) VALUES ($1, $2, $3, $4) {}",
            RETURNING_MOVIE
        );
        sqlx::query_as::<_, Movie>(&sql)
            .bind(Uuid::new_v4())
            .bind(title)
            .bind(release_year)
            .bind(director_id)
            .fetch_one(&mut *self.conn)
            .await
    }

    /// Attach a genre at the given position; attaching twice is a no-op
    pub async fn attach_genre(
        &mut self,
        movie_id: Uuid,
        genre_id: Uuid,
        position: i32,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"INSERT INTO movie_genres (movie_id, genre_id, position) VALUES ($1, $2, $3)
            ON CONFLICT (movie_id, genre_id) DO NOTHING"#,
        )
        .bind(movie_id)
        .bind(genre_id)
        .bind(position)
        .execute(&mut *self.conn)
        .await?;
        Ok(())
    }

    /// Apply a partial update; `None` fields keep their stored value
    ///
    /// Returns `None` if the movie does not exist.
    pub async fn update(
        &mut self,
        id: Uuid,
        title: Option<&str>,
        release_year: Option<i32>,
        director_id: Option<Uuid>,
    ) -> Result<Option<Movie>, sqlx::Error> {
        let sql = format!(
            r#"UPDATE movies SET
                title = COALESCE($2, title),
                release_year = COALESCE($3, release_year),
                director_id = COALESCE($4, director_id)
            WHERE id = $1 {}"#,
            RETURNING_MOVIE
        );
        sqlx::query_as::<_, Movie>(&sql)
            .bind(id)
            .bind(title)
            .bind(release_year)
            .bind(director_id)
            .fetch_optional(&mut *self.conn)
            .await
    }

    /// Delete a movie; its genre associations cascade
    pub async fn delete(&mut self, id: Uuid) -> Result<Option<Movie>, sqlx::Error> {
        let sql = format!("DELETE FROM movies WHERE id = $1 {}", RETURNING_MOVIE);
        sqlx::query_as::<_, Movie>(&sql)
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await
    }
}
