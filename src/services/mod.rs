//! Service layer for business logic operations.
//!
//! User CRUD goes straight from the handlers to the repository; services
//! hold the flows that coordinate more than one collaborator.

mod auth_service;

pub use auth_service::{AuthService, AuthSession};

use crate::config::JwtConfig;
use crate::repositories::Repositories;

/// Aggregates all services for convenient access.
#[derive(Clone)]
pub struct Services {
    pub auth: AuthService,
}

impl Services {
    pub fn new(repos: &Repositories, jwt_config: JwtConfig) -> Self {
        Self {
            auth: AuthService::new(repos.accounts.clone(), jwt_config),
        }
    }
}
