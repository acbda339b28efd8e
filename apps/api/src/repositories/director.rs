//! Director repository
//!
//! All director reads run through the aggregate query builder; writes are
//! plain single-row statements returning the affected record.

use std::collections::HashMap;

use sqlx::PgConnection;
use uuid::Uuid;

use super::mapper::{self, DirectorExtendedRow, MovieGroupRow};
use super::query_builder::{
    build_batch_query, build_entity_query, BatchRelation, EntityKind, KeyFilter, Pagination,
    ViewMode,
};
use crate::error::ApiResult;
use crate::models::{Director, DirectorView, DirectorWithMovies, EntityView, MovieSummary};

const RESOURCE: &str = "director";

/// Repository for director database operations on a borrowed connection
pub struct DirectorRepository<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> DirectorRepository<'c> {
    pub fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }

    /// Find one director by id or name
    pub async fn find(&mut self, filter: &KeyFilter, view: ViewMode) -> ApiResult<DirectorView> {
        let query = build_entity_query(EntityKind::Director, Some(filter), view, None, None)?;
        let key = filter.describe();

        match view {
            ViewMode::Flat => {
                let row = query
                    .query_as::<Director>()
                    .fetch_optional(&mut *self.conn)
                    .await?;
                mapper::map_one(row, RESOURCE, &key).map(EntityView::Flat)
            }
            ViewMode::Extended => {
                let row = query
                    .query_as::<DirectorExtendedRow>()
                    .fetch_optional(&mut *self.conn)
                    .await?;
                mapper::map_one::<_, DirectorWithMovies>(row, RESOURCE, &key)
                    .map(EntityView::Extended)
            }
        }
    }

    /// List directors ordered by name
    pub async fn list(&mut self, view: ViewMode, page: Pagination) -> ApiResult<Vec<DirectorView>> {
        let query = build_entity_query(EntityKind::Director, None, view, None, Some(page))?;

        let directors = match view {
            ViewMode::Flat => query
                .query_as::<Director>()
                .fetch_all(&mut *self.conn)
                .await?
                .into_iter()
                .map(EntityView::Flat)
                .collect(),
            ViewMode::Extended => {
                let rows = query
                    .query_as::<DirectorExtendedRow>()
                    .fetch_all(&mut *self.conn)
                    .await?;
                mapper::map_many::<_, DirectorWithMovies>(rows)
                    .into_iter()
                    .map(EntityView::Extended)
                    .collect()
            }
        };
        Ok(directors)
    }

    pub async fn exists(&mut self, id: Uuid) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM directors WHERE id = $1)")
            .bind(id)
            .fetch_one(&mut *self.conn)
            .await
    }

    pub async fn insert(&mut self, name: &str) -> Result<Director, sqlx::Error> {
        sqlx::query_as::<_, Director>(
            "INSERT INTO directors (id, name) VALUES ($1, $2) RETURNING id, name",
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .fetch_one(&mut *self.conn)
        .await
    }

    /// Rename a director; `None` if the id does not exist
    pub async fn update_name(
        &mut self,
        id: Uuid,
        name: &str,
    ) -> Result<Option<Director>, sqlx::Error> {
        sqlx::query_as::<_, Director>(
            "UPDATE directors SET name = $2 WHERE id = $1 RETURNING id, name",
        )
        .bind(id)
        .bind(name)
        .fetch_optional(&mut *self.conn)
        .await
    }

    /// Delete a director; their movies keep existing without a director
    pub async fn delete(&mut self, id: Uuid) -> Result<Option<Director>, sqlx::Error> {
        sqlx::query_as::<_, Director>("DELETE FROM directors WHERE id = $1 RETURNING id, name")
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await
    }

    /// Movies of every given director in one grouped query
    pub async fn movies_by_director(
        &mut self,
        director_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<MovieSummary>>, sqlx::Error> {
        let query = build_batch_query(BatchRelation::DirectorMovies, director_ids);
        let rows = query
            .query_as::<MovieGroupRow<MovieSummary>>()
            .fetch_all(&mut *self.conn)
            .await?;
        Ok(mapper::map_groups(rows))
    }
}
