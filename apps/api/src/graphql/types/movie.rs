//! Movie GraphQL type

use async_graphql::{Enum, Object};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::{MovieExtended, MovieView};
use crate::repositories::{MovieOrderKey, SortDirection};

/// Movie with its director name and genre string
#[derive(Debug)]
pub struct Movie {
    inner: MovieExtended,
}

impl From<MovieExtended> for Movie {
    fn from(movie: MovieExtended) -> Self {
        Self { inner: movie }
    }
}

impl Movie {
    /// Wrap a view that was requested in its extended shape
    pub(crate) fn from_view(view: MovieView) -> ApiResult<Self> {
        view.into_extended()
            .map(Self::from)
            .ok_or_else(|| ApiError::Internal("movie view is not extended".to_string()))
    }
}

#[Object]
impl Movie {
    async fn id(&self) -> Uuid {
        self.inner.id
    }

    async fn title(&self) -> &str {
        &self.inner.title
    }

    async fn release_year(&self) -> Option<i32> {
        self.inner.release_year
    }

    async fn director_id(&self) -> Option<Uuid> {
        self.inner.director_id
    }

    /// Director name
    async fn director(&self) -> Option<&str> {
        self.inner.director.as_deref()
    }

    /// Genre names joined with `" | "` in the order they were given
    async fn genre(&self) -> &str {
        &self.inner.genre
    }
}

/// Sort key for `movies`
#[derive(Enum, Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum MovieOrder {
    #[default]
    Title,
    Year,
}

impl From<MovieOrder> for MovieOrderKey {
    fn from(order: MovieOrder) -> Self {
        match order {
            MovieOrder::Title => Self::Title,
            MovieOrder::Year => Self::ReleaseYear,
        }
    }
}

#[derive(Enum, Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum MovieSort {
    #[default]
    Asc,
    Desc,
}

impl From<MovieSort> for SortDirection {
    fn from(sort: MovieSort) -> Self {
        match sort {
            MovieSort::Asc => Self::Asc,
            MovieSort::Desc => Self::Desc,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EntityView, Movie as DbMovie};
    use assert_matches::assert_matches;

    #[test]
    fn test_order_maps_to_query_key() {
        assert_eq!(MovieOrderKey::from(MovieOrder::Year), MovieOrderKey::ReleaseYear);
        assert_eq!(SortDirection::from(MovieSort::default()), SortDirection::Asc);
    }

    #[test]
    fn test_flat_view_is_rejected() {
        let view: MovieView = EntityView::Flat(DbMovie {
            id: Uuid::new_v4(),
            title: "Solaris".to_string(),
            release_year: Some(1972),
            director_id: None,
        });
        assert_matches!(Movie::from_view(view), Err(ApiError::Internal(_)));
    }
}
