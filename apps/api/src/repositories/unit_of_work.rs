//! Request-scoped transaction
//!
//! A GraphQL request resolves many fields concurrently inside one task but
//! must use one connection. `UnitOfWork` owns that connection's transaction
//! behind an async mutex and hands out short-lived guards; a resolver holds
//! the guard for one statement only.
//!
//! A mutation that writes several rows holds the guard for its whole
//! service call and runs inside a savepoint, so a failure undoes that
//! mutation without touching the rest of the request.

use std::sync::Arc;

use sqlx::{Connection, PgConnection, PgPool, Postgres, Transaction};
use tokio::sync::{MappedMutexGuard, Mutex, MutexGuard};

use crate::error::{ApiError, ApiResult};

/// Shared handle to one open transaction
#[derive(Clone)]
pub struct UnitOfWork {
    tx: Arc<Mutex<Option<Transaction<'static, Postgres>>>>,
}

impl UnitOfWork {
    /// Check out a connection from the pool and open a transaction on it
    pub async fn begin(pool: &PgPool) -> ApiResult<Self> {
        let tx = pool.begin().await?;
        Ok(Self {
            tx: Arc::new(Mutex::new(Some(tx))),
        })
    }

    /// Lock the connection for the duration of a statement
    pub async fn connection(&self) -> ApiResult<MappedMutexGuard<'_, PgConnection>> {
        let guard = self.tx.lock().await;
        MutexGuard::try_map(guard, |slot| slot.as_deref_mut())
            .map_err(|_| ApiError::Internal("unit of work already closed".to_string()))
    }

    /// Commit and release the connection
    pub async fn commit(&self) -> ApiResult<()> {
        match self.tx.lock().await.take() {
            Some(tx) => {
                tx.commit().await?;
                Ok(())
            }
            None => Err(ApiError::Internal(
                "unit of work already closed".to_string(),
            )),
        }
    }

    /// Roll back and release the connection. Closing twice is a no-op.
    pub async fn rollback(&self) -> ApiResult<()> {
        if let Some(tx) = self.tx.lock().await.take() {
            tx.rollback().await?;
        }
        Ok(())
    }

    pub async fn is_open(&self) -> bool {
        self.tx.lock().await.is_some()
    }
}

/// Open a savepoint on a connection that is already inside a transaction
pub async fn savepoint(conn: &mut PgConnection) -> ApiResult<Transaction<'_, Postgres>> {
    Ok(conn.begin().await?)
}

/// Release the savepoint when `result` is Ok, roll back to it otherwise
pub async fn settle<T>(
    savepoint: Transaction<'_, Postgres>,
    result: ApiResult<T>,
) -> ApiResult<T> {
    match result {
        Ok(value) => {
            savepoint.commit().await?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback) = savepoint.rollback().await {
                ApiError::from(rollback).log();
            }
            Err(e)
        }
    }
}

impl std::fmt::Debug for UnitOfWork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnitOfWork").finish_non_exhaustive()
    }
}
