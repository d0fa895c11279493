//! Authentication data models

use serde::{Deserialize, Serialize};

/// Identity resolved by the provider; lives only for the request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

/// Body of a token verification request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenVerifyRequest {
    pub id_token: String,
}

/// User payload returned by the auth endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub uid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            uid: user.uid,
            email: user.email,
            display_name: user.display_name,
        }
    }
}
