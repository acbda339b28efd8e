//! Genre repository

use std::collections::HashMap;

use sqlx::PgConnection;
use uuid::Uuid;

use super::mapper::{self, GenreExtendedRow, MovieGroupRow};
use super::query_builder::{
    build_batch_query, build_entity_query, BatchRelation, EntityKind, KeyFilter, Pagination,
    ViewMode,
};
use crate::error::ApiResult;
use crate::models::{EntityView, Genre, GenreView, GenreWithMovies, Movie};

const RESOURCE: &str = "genre";

/// Repository for genre database operations on a borrowed connection
pub struct GenreRepository<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> GenreRepository<'c> {
    pub fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }

    pub async fn find(&mut self, filter: &KeyFilter, view: ViewMode) -> ApiResult<GenreView> {
        let query = build_entity_query(EntityKind::Genre, Some(filter), view, None, None)?;
        let key = filter.describe();

        match view {
            ViewMode::Flat => {
                let row = query
                    .query_as::<Genre>()
                    .fetch_optional(&mut *self.conn)
                    .await?;
                mapper::map_one(row, RESOURCE, &key).map(EntityView::Flat)
            }
            ViewMode::Extended => {
                let row = query
                    .query_as::<GenreExtendedRow>()
                    .fetch_optional(&mut *self.conn)
                    .await?;
                mapper::map_one::<_, GenreWithMovies>(row, RESOURCE, &key)
                    .map(EntityView::Extended)
            }
        }
    }

    pub async fn list(&mut self, view: ViewMode, page: Pagination) -> ApiResult<Vec<GenreView>> {
        let query = build_entity_query(EntityKind::Genre, None, view, None, Some(page))?;

        let genres = match view {
            ViewMode::Flat => query
                .query_as::<Genre>()
                .fetch_all(&mut *self.conn)
                .await?
                .into_iter()
                .map(EntityView::Flat)
                .collect(),
            ViewMode::Extended => {
                let rows = query
                    .query_as::<GenreExtendedRow>()
                    .fetch_all(&mut *self.conn)
                    .await?;
                mapper::map_many::<_, GenreWithMovies>(rows)
                    .into_iter()
                    .map(EntityView::Extended)
                    .collect()
            }
        };
        Ok(genres)
    }

    /// Insert a genre, or return the existing one with the same name
    ///
    /// The no-op `DO UPDATE` makes `RETURNING` yield the existing row on a
    /// name conflict.
    pub async fn upsert_by_name(&mut self, name: &str) -> Result<Genre, sqlx::Error> {
        sqlx::query_as::<_, Genre>(
            r#"INSERT INTO genres (id, name) VALUES ($1, $2)
            ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
            RETURNING id, name"#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .fetch_one(&mut *self.conn)
        .await
    }

    pub async fn update_name(&mut self, id: Uuid, name: &str) -> Result<Option<Genre>, sqlx::Error> {
        sqlx::query_as::<_, Genre>("UPDATE genres SET name = $2 WHERE id = $1 RETURNING id, name")
            .bind(id)
            .bind(name)
            .fetch_optional(&mut *self.conn)
            .await
    }

    pub async fn delete(&mut self, id: Uuid) -> Result<Option<Genre>, sqlx::Error> {
        sqlx::query_as::<_, Genre>("DELETE FROM genres WHERE id = $1 RETURNING id, name")
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await
    }

    /// Movies tagged with each given genre in one grouped query
    pub async fn movies_by_genre(
        &mut self,
        genre_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<Movie>>, sqlx::Error> {
        let query = build_batch_query(BatchRelation::GenreMovies, genre_ids);
        let rows = query
            .query_as::<MovieGroupRow<Movie>>()
            .fetch_all(&mut *self.conn)
            .await?;
        Ok(mapper::map_groups(rows))
    }
}
