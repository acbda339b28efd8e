//! Aggregate query construction
//!
//! Every catalog read goes through one statement built here. Flat views
//! select the entity's own columns. Extended views LEFT JOIN the related
//! tables, group by the parent's identity and fold the children into one
//! ordered aggregate column per relation. The aggregate is filtered on the
//! child id, so a parent without children still yields exactly one row with
//! a NULL aggregate.
//!
//! Values are always bound positionally (`$1..$n`) through [`SqlParam`];
//! nothing supplied by a caller is interpolated into the SQL text.

use sqlx::{
    postgres::{PgArguments, PgRow},
    query::QueryAs,
    FromRow, Postgres,
};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};

/// SQL columns for director queries
pub const DIRECTOR_COLUMNS: &str = "d.id, d.name";

/// SQL columns for genre queries
pub const GENRE_COLUMNS: &str = "g.id, g.name";

/// SQL columns for movie queries
pub const MOVIE_COLUMNS: &str = "m.id, m.title, m.release_year, m.director_id";

/// Movie object nested under a director
const MOVIE_SUMMARY_OBJECT: &str =
    "json_build_object('id', m.id, 'title', m.title, 'release_year', m.release_year)";

/// Movie object nested under a genre
const MOVIE_OBJECT: &str = "json_build_object('id', m.id, 'title', m.title, \
     'release_year', m.release_year, 'director_id', m.director_id)";

/// Order of movies inside every aggregate
const CHILD_MOVIE_ORDER: &str = "m.title, m.id";

/// Parameter bound to a built query
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Uuid(Uuid),
    Text(String),
    BigInt(i64),
    /// Key set for `= ANY($n)` predicates
    UuidArray(Vec<Uuid>),
}

/// SQL text plus its positional parameters
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltQuery {
    pub sql: String,
    pub params: Vec<SqlParam>,
}

impl BuiltQuery {
    /// Prepare the statement with every parameter bound in order
    pub fn query_as<'q, O>(&'q self) -> QueryAs<'q, Postgres, O, PgArguments>
    where
        O: for<'r> FromRow<'r, PgRow>,
    {
        let mut query = sqlx::query_as::<_, O>(&self.sql);
        for param in &self.params {
            query = match param {
                SqlParam::Uuid(v) => query.bind(*v),
                SqlParam::Text(v) => query.bind(v.clone()),
                SqlParam::BigInt(v) => query.bind(*v),
                SqlParam::UuidArray(v) => query.bind(v.clone()),
            };
        }
        query
    }

    /// Append a parameter and return its placeholder
    fn push(&mut self, param: SqlParam) -> String {
        self.params.push(param);
        format!("${}", self.params.len())
    }
}

/// Catalog entity a query targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Director,
    Genre,
    Movie,
}

impl EntityKind {
    /// Resource name used in error messages
    pub fn resource_name(&self) -> &'static str {
        match self {
            Self::Director => "director",
            Self::Genre => "genre",
            Self::Movie => "movie",
        }
    }
}

/// Shape of the returned rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// Own columns only
    #[default]
    Flat,
    /// Own columns plus aggregated related rows
    Extended,
}

impl ViewMode {
    pub fn from_flag(extended: bool) -> Self {
        if extended {
            Self::Extended
        } else {
            Self::Flat
        }
    }
}

/// Single-entity lookup key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyFilter {
    Id(Uuid),
    Name(String),
}

impl KeyFilter {
    /// Pick the lookup key from optional request fields; exactly one must be set
    pub fn from_parts(id: Option<Uuid>, name: Option<String>) -> ApiResult<Self> {
        match (id, name) {
            (Some(id), None) => Ok(Self::Id(id)),
            (None, Some(name)) => Ok(Self::Name(name)),
            (Some(_), Some(_)) => Err(ApiError::ValidationError(
                "supply either id or name, not both".to_string(),
            )),
            (None, None) => Err(ApiError::ValidationError(
                "one of id or name is required".to_string(),
            )),
        }
    }

    /// Displayable form of the key for not-found messages
    pub fn describe(&self) -> String {
        match self {
            Self::Id(id) => id.to_string(),
            Self::Name(name) => name.clone(),
        }
    }
}

/// Sort key for movie listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MovieOrderKey {
    #[default]
    Title,
    ReleaseYear,
}

impl std::str::FromStr for MovieOrderKey {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title" => Ok(Self::Title),
            "year" | "release_year" => Ok(Self::ReleaseYear),
            other => Err(ApiError::InvalidQueryParam {
                name: "order_by",
                reason: format!("expected 'title' or 'year', got '{}'", other),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl std::str::FromStr for SortDirection {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(ApiError::InvalidQueryParam {
                name: "sort_by",
                reason: format!("expected 'asc' or 'desc', got '{}'", other),
            }),
        }
    }
}

impl SortDirection {
    fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Ordering of movie listings; ties are always broken by id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MovieOrdering {
    pub key: MovieOrderKey,
    pub direction: SortDirection,
}

impl MovieOrdering {
    pub fn new(key: MovieOrderKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    fn order_clause(&self) -> String {
        match self.key {
            MovieOrderKey::Title => {
                format!("m.title {}, m.id ASC", self.direction.as_sql())
            }
            MovieOrderKey::ReleaseYear => {
                format!("m.release_year {} NULLS LAST, m.id ASC", self.direction.as_sql())
            }
        }
    }
}

/// Offset window over parent rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub skip: i64,
    pub limit: i64,
}

impl Pagination {
    pub const DEFAULT_LIMIT: i64 = 20;
    pub const MAX_LIMIT: i64 = 100;

    /// Validate a requested window; negative values and limits above
    /// [`Self::MAX_LIMIT`] are rejected
    pub fn new(skip: i64, limit: i64) -> ApiResult<Self> {
        if skip < 0 {
            return Err(ApiError::ValidationError(
                "skip must not be negative".to_string(),
            ));
        }
        if limit < 0 {
            return Err(ApiError::ValidationError(
                "limit must not be negative".to_string(),
            ));
        }
        if limit > Self::MAX_LIMIT {
            return Err(ApiError::ValidationError(format!(
                "limit must not exceed {}",
                Self::MAX_LIMIT
            )));
        }
        Ok(Self { skip, limit })
    }

    /// True when the window cannot contain any row
    pub fn is_empty(&self) -> bool {
        self.limit == 0
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}

/// Relation served by a grouped batch query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchRelation {
    /// Movies grouped by `movies.director_id`
    DirectorMovies,
    /// Movies grouped by `movie_genres.genre_id`
    GenreMovies,
}

/// Build the single statement for a lookup or a listing
///
/// `filter` selects one entity (at most one row is returned); without a
/// filter the statement lists entities in their canonical order inside the
/// `pagination` window. `ordering` only applies to movies.
pub fn build_entity_query(
    kind: EntityKind,
    filter: Option<&KeyFilter>,
    view: ViewMode,
    ordering: Option<MovieOrdering>,
    pagination: Option<Pagination>,
) -> ApiResult<BuiltQuery> {
    if ordering.is_some() && kind != EntityKind::Movie {
        return Err(ApiError::ValidationError(format!(
            "{} listings have a fixed order",
            kind.resource_name()
        )));
    }

    let mut query = BuiltQuery {
        sql: String::new(),
        params: Vec::new(),
    };

    let (select, from, group_by, order_by) = match (kind, view) {
        (EntityKind::Director, ViewMode::Flat) => (
            DIRECTOR_COLUMNS.to_string(),
            "directors d".to_string(),
            None,
            "d.name ASC, d.id ASC".to_string(),
        ),
        (EntityKind::Director, ViewMode::Extended) => (
            format!(
                "{}, json_agg({} ORDER BY {}) FILTER (WHERE m.id IS NOT NULL) AS movies",
                DIRECTOR_COLUMNS, MOVIE_SUMMARY_OBJECT, CHILD_MOVIE_ORDER
            ),
            "directors d LEFT JOIN movies m ON m.director_id = d.id".to_string(),
            Some("d.id"),
            "d.name ASC, d.id ASC".to_string(),
        ),
        (EntityKind::Genre, ViewMode::Flat) => (
            GENRE_COLUMNS.to_string(),
            "genres g".to_string(),
            None,
            "g.name ASC, g.id ASC".to_string(),
        ),
        (EntityKind::Genre, ViewMode::Extended) => (
            format!(
                "{}, json_agg({} ORDER BY {}) FILTER (WHERE m.id IS NOT NULL) AS movies",
                GENRE_COLUMNS, MOVIE_OBJECT, CHILD_MOVIE_ORDER
            ),
            "genres g \
             LEFT JOIN movie_genres mg ON mg.genre_id = g.id \
             LEFT JOIN movies m ON m.id = mg.movie_id"
                .to_string(),
            Some("g.id"),
            "g.name ASC, g.id ASC".to_string(),
        ),
        (EntityKind::Movie, ViewMode::Flat) => (
            MOVIE_COLUMNS.to_string(),
            "movies m".to_string(),
            None,
            ordering.unwrap_or_default().order_clause(),
        ),
        (EntityKind::Movie, ViewMode::Extended) => (
            format!(
                "{}, dir.name AS director, \
                 array_agg(g.name ORDER BY mg.position, g.name) FILTER (WHERE g.id IS NOT NULL) AS genres",
                MOVIE_COLUMNS
            ),
            "movies m \
             LEFT JOIN directors dir ON dir.id = m.director_id \
             LEFT JOIN movie_genres mg ON mg.movie_id = m.id \
             LEFT JOIN genres g ON g.id = mg.genre_id"
                .to_string(),
            Some("m.id, dir.id"),
            ordering.unwrap_or_default().order_clause(),
        ),
    };

    let where_clause = match filter {
        None => None,
        Some(KeyFilter::Id(id)) => {
            let alias = table_alias(kind);
            let placeholder = query.push(SqlParam::Uuid(*id));
            Some(format!("{}.id = {}", alias, placeholder))
        }
        Some(KeyFilter::Name(name)) => {
            if kind == EntityKind::Movie {
                return Err(ApiError::ValidationError(
                    "movies can only be looked up by id".to_string(),
                ));
            }
            let alias = table_alias(kind);
            let placeholder = query.push(SqlParam::Text(name.clone()));
            Some(format!("{}.name = {}", alias, placeholder))
        }
    };

    let mut sql = format!("SELECT {} FROM {}", select, from);
    if let Some(predicate) = where_clause {
        sql.push_str(" WHERE ");
        sql.push_str(&predicate);
    }
    if let Some(group_by) = group_by {
        sql.push_str(" GROUP BY ");
        sql.push_str(group_by);
    }
    sql.push_str(" ORDER BY ");
    sql.push_str(&order_by);

    if filter.is_some() {
        // Director names are not unique; a name lookup returns the first match
        sql.push_str(" LIMIT 1");
    } else if let Some(page) = pagination {
        let offset = query.push(SqlParam::BigInt(page.skip));
        let limit = query.push(SqlParam::BigInt(page.limit));
        sql.push_str(&format!(" OFFSET {} LIMIT {}", offset, limit));
    }

    query.sql = sql;
    Ok(query)
}

/// Build one grouped statement returning the children of every key
///
/// Each result row is `(group_key, movies)`. Keys without children produce
/// no row; callers fill those in with empty lists.
pub fn build_batch_query(relation: BatchRelation, keys: &[Uuid]) -> BuiltQuery {
    let sql = match relation {
        BatchRelation::DirectorMovies => format!(
            "SELECT m.director_id AS group_key, \
             json_agg({} ORDER BY {}) AS movies \
             FROM movies m \
             WHERE m.director_id = ANY($1) \
             GROUP BY m.director_id",
            MOVIE_SUMMARY_OBJECT, CHILD_MOVIE_ORDER
        ),
        BatchRelation::GenreMovies => format!(
            "SELECT mg.genre_id AS group_key, \
             json_agg({} ORDER BY {}) FILTER (WHERE m.id IS NOT NULL) AS movies \
             FROM movie_genres mg \
             LEFT JOIN movies m ON m.id = mg.movie_id \
             WHERE mg.genre_id = ANY($1) \
             GROUP BY mg.genre_id",
            MOVIE_OBJECT, CHILD_MOVIE_ORDER
        ),
    };

    BuiltQuery {
        sql,
        params: vec![SqlParam::UuidArray(keys.to_vec())],
    }
}

fn table_alias(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Director => "d",
        EntityKind::Genre => "g",
        EntityKind::Movie => "m",
    }
}
