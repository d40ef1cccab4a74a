//! Data Transfer Objects for API requests and responses.
//!
//! DTOs are organized by domain:
//! - `user` - User request/response DTOs and query parameters
//! - `auth` - Registration, login and token DTOs
//! - `health` - Health check DTOs
//! - `error` - Common error response DTOs

mod auth;
mod error;
mod health;
mod user;

pub use auth::{AccountInfo, AuthResponse, LoginRequest, RefreshTokenRequest, RegisterRequest};
pub use error::ErrorResponse;
pub use health::{ComponentHealth, HealthResponse, HealthStatus};
pub use user::{ListParams, SearchParams, UserRequest, UserResponse};
