//! Director service
//!
//! Constructed per request over the request's connection. Reads are open
//! to everyone; every mutation checks the caller first.

use sqlx::PgConnection;
use tracing::instrument;
use uuid::Uuid;

use super::auth::authorize;
use crate::error::{ApiError, ApiResult};
use crate::models::{Caller, CreateDirector, Director, DirectorView, Scope, UpdateDirector};
use crate::repositories::{DirectorRepository, KeyFilter, Pagination, ViewMode};

pub struct DirectorService<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> DirectorService<'c> {
    pub fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }

    fn repo(&mut self) -> DirectorRepository<'_> {
        DirectorRepository::new(&mut *self.conn)
    }

    pub async fn list(&mut self, page: Pagination, view: ViewMode) -> ApiResult<Vec<DirectorView>> {
        if page.is_empty() {
            return Ok(Vec::new());
        }
        self.repo().list(view, page).await
    }

    pub async fn get(&mut self, filter: &KeyFilter, view: ViewMode) -> ApiResult<DirectorView> {
        self.repo().find(filter, view).await
    }

    #[instrument(skip(self, caller, input), fields(name = %input.name))]
    pub async fn create(
        &mut self,
        caller: Option<&Caller>,
        input: CreateDirector,
    ) -> ApiResult<Director> {
        authorize(caller, &[Scope::Admin])?;
        let name = validate_name(&input.name)?;

        let director = self.repo().insert(name).await?;
        tracing::info!(director_id = %director.id, "Director created");
        Ok(director)
    }

    #[instrument(skip(self, caller, input), fields(director_id = %input.id))]
    pub async fn update(
        &mut self,
        caller: Option<&Caller>,
        input: UpdateDirector,
    ) -> ApiResult<Director> {
        authorize(caller, &[Scope::Admin])?;

        let Some(name) = input.name.as_deref() else {
            return self
                .repo()
                .find(&KeyFilter::Id(input.id), ViewMode::Flat)
                .await
                .map(DirectorView::into_flat);
        };
        let name = validate_name(name)?;

        self.repo()
            .update_name(input.id, name)
            .await?
            .ok_or_else(|| ApiError::not_found("director", input.id.to_string()))
    }

    /// Delete a director; their movies remain without a director
    #[instrument(skip(self, caller))]
    pub async fn delete(&mut self, caller: Option<&Caller>, id: Uuid) -> ApiResult<Director> {
        authorize(caller, &[Scope::Admin])?;

        let director = self
            .repo()
            .delete(id)
            .await?
            .ok_or_else(|| ApiError::not_found("director", id.to_string()))?;
        tracing::info!(director_id = %id, "Director deleted");
        Ok(director)
    }
}

/// Trimmed name; empty names are rejected
pub(crate) fn validate_name(name: &str) -> ApiResult<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ApiError::ValidationError(
            "name must not be empty".to_string(),
        ));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_validate_name_trims() {
        assert_eq!(validate_name("  Nolan ").unwrap(), "Nolan");
    }

    #[test]
    fn test_validate_name_rejects_blank() {
        assert_matches!(validate_name("   "), Err(ApiError::ValidationError(_)));
        assert_matches!(validate_name(""), Err(ApiError::ValidationError(_)));
    }
}
