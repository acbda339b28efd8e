//! Genre service

use sqlx::PgConnection;
use tracing::instrument;
use uuid::Uuid;

use super::auth::authorize;
use super::directors::validate_name;
use crate::error::{ApiError, ApiResult};
use crate::models::{Caller, CreateGenre, Genre, GenreView, Scope, UpdateGenre};
use crate::repositories::{GenreRepository, KeyFilter, Pagination, ViewMode};

pub struct GenreService<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> GenreService<'c> {
    pub fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }

    fn repo(&mut self) -> GenreRepository<'_> {
        GenreRepository::new(&mut *self.conn)
    }

    pub async fn list(&mut self, page: Pagination, view: ViewMode) -> ApiResult<Vec<GenreView>> {
        if page.is_empty() {
            return Ok(Vec::new());
        }
        self.repo().list(view, page).await
    }

    pub async fn get(&mut self, filter: &KeyFilter, view: ViewMode) -> ApiResult<GenreView> {
        self.repo().find(filter, view).await
    }

    /// Create a genre, or return the existing genre with that name
    #[instrument(skip(self, caller, input), fields(name = %input.name))]
    pub async fn create(&mut self, caller: Option<&Caller>, input: CreateGenre) -> ApiResult<Genre> {
        authorize(caller, &[Scope::Admin])?;
        self.resolve(&input.name).await
    }

    /// Reuse-or-insert by name without a capability check; callers must
    /// have authorized the surrounding mutation
    pub(crate) async fn resolve(&mut self, name: &str) -> ApiResult<Genre> {
        let name = validate_name(name)?;
        Ok(self.repo().upsert_by_name(name).await?)
    }

    #[instrument(skip(self, caller, input), fields(genre_id = %input.id))]
    pub async fn update(&mut self, caller: Option<&Caller>, input: UpdateGenre) -> ApiResult<Genre> {
        authorize(caller, &[Scope::Admin])?;

        let Some(name) = input.name.as_deref() else {
            return self
                .repo()
                .find(&KeyFilter::Id(input.id), ViewMode::Flat)
                .await
                .map(GenreView::into_flat);
        };
        let name = validate_name(name)?;

        match self.repo().update_name(input.id, name).await {
            Ok(Some(genre)) => Ok(genre),
            Ok(None) => Err(ApiError::not_found("genre", input.id.to_string())),
            Err(e) if is_unique_violation(&e) => Err(ApiError::ValidationError(format!(
                "a genre named '{}' already exists",
                name
            ))),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete a genre; its movie associations cascade
    #[instrument(skip(self, caller))]
    pub async fn delete(&mut self, caller: Option<&Caller>, id: Uuid) -> ApiResult<Genre> {
        authorize(caller, &[Scope::Admin])?;

        self.repo()
            .delete(id)
            .await?
            .ok_or_else(|| ApiError::not_found("genre", id.to_string()))
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|db| db.is_unique_violation())
}
