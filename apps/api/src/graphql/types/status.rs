//! Result payload of delete mutations

use async_graphql::SimpleObject;

#[derive(Debug, Clone, SimpleObject)]
pub struct StatusResponse {
    pub success: bool,
    pub message: String,
}

impl StatusResponse {
    pub fn deleted(resource_type: &str, label: &str) -> Self {
        Self {
            success: true,
            message: format!("{} '{}' deleted", resource_type, label),
        }
    }
}
