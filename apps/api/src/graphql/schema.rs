//! GraphQL schema builder for Cinedex

use async_graphql::{EmptySubscription, Schema};

use super::mutation::Mutation;
use super::query::Query;

/// The Cinedex GraphQL schema type
pub type CinedexSchema = Schema<Query, Mutation, EmptySubscription>;

/// Default nesting limit for incoming documents
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Builder for the GraphQL schema
///
/// Request-scoped state (transaction, caller, loaders) is attached per
/// request by [`super::execute`], so the schema itself carries none.
pub struct SchemaBuilder {
    max_depth: usize,
    introspection: bool,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            introspection: true,
        }
    }

    /// Reject documents nested deeper than `depth`
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn introspection(mut self, enabled: bool) -> Self {
        self.introspection = enabled;
        self
    }

    pub fn build(self) -> CinedexSchema {
        let mut builder = Schema::build(Query::default(), Mutation::default(), EmptySubscription)
            .limit_depth(self.max_depth);

        if !self.introspection {
            builder = builder.disable_introspection();
        }

        builder.finish()
    }
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Create the schema with default limits
pub fn build_schema() -> CinedexSchema {
    SchemaBuilder::new().build()
}
