use serde::{Deserialize, Serialize};

/// JWT claims carried by a chat session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Subject (user id)
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub exp: usize, // Expiration time
    pub iat: usize, // Issued at
}

/// Caller identity resolved from a verified session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub email: String,
}

impl AuthenticatedUser {
    /// Both a stable id and an email are required to relay a message.
    pub fn from_claims(claims: Claims) -> Option<Self> {
        if claims.sub.trim().is_empty() || claims.email.trim().is_empty() {
            return None;
        }
        Some(AuthenticatedUser {
            user_id: claims.sub,
            email: claims.email,
        })
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            detail: None,
        }
    }

    pub fn with_detail(error: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            detail: Some(detail.into()),
        }
    }
}
