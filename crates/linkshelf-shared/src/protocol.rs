use serde::{Deserialize, Serialize};

use crate::types::{Link, UserRole};

/// Body of `POST /links`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddLinkRequest {
    pub id: String,
    pub link: Link,
}

/// Body of `PUT /users/{principal}/role`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignRoleRequest {
    pub role: UserRole,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Error body returned with every non-2xx response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
