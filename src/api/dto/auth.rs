//! Authentication-related Data Transfer Objects

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::services::AuthSession;

/// Login request payload
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "owner@example.com", format = "email")]
    pub email: String,
    #[validate(length(min = 6, max = 30, message = "Password must be between 6 and 30 characters"))]
    #[schema(example = "password123", format = "password", min_length = 6, max_length = 30)]
    pub password: String,
}

/// Register request payload
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 20, message = "Username must be between 3 and 20 characters"))]
    #[schema(example = "owner", min_length = 3, max_length = 20)]
    pub username: String,
    /// Must not be registered yet
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "owner@example.com", format = "email")]
    pub email: String,
    /// Plain text; stored as an Argon2 hash
    #[validate(length(min = 6, max = 30, message = "Password must be between 6 and 30 characters"))]
    #[schema(example = "password123", format = "password", min_length = 6, max_length = 30)]
    pub password: String,
}

/// Refresh token request payload
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, message = "Refresh token cannot be empty"))]
    #[schema(example = "eyJ0eXAiOiJKV1QiLCJhbGc...")]
    pub refresh_token: String,
}

/// Account info and tokens returned by register, login and refresh
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub account: AccountInfo,
    /// Access token (short-lived)
    #[schema(example = "eyJ0eXAiOiJKV1QiLCJhbGc...")]
    pub access_token: String,
    /// Refresh token (long-lived)
    #[schema(example = "eyJ0eXAiOiJKV1QiLCJhbGc...")]
    pub refresh_token: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AccountInfo {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "owner")]
    pub username: String,
    #[schema(example = "owner@example.com")]
    pub email: String,
}

impl From<AuthSession> for AuthResponse {
    fn from(session: AuthSession) -> Self {
        Self {
            account: AccountInfo {
                id: session.account.id,
                username: session.account.username,
                email: session.account.email,
            },
            access_token: session.tokens.access_token,
            refresh_token: session.tokens.refresh_token,
        }
    }
}
