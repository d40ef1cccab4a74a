//! Application state for Axum web framework.

use crate::config::JwtConfig;
use crate::repositories::Repositories;
use crate::services::Services;

/// State shared by every request handler.
///
/// Cloning is cheap: repositories and services hold `Arc`s.
#[derive(Clone)]
pub struct AppState {
    pub repositories: Repositories,
    pub services: Services,
    /// JWT configuration for token generation and validation
    pub jwt_config: JwtConfig,
}

impl AppState {
    pub fn new(repositories: Repositories, jwt_config: JwtConfig) -> Self {
        let services = Services::new(&repositories, jwt_config.clone());
        Self {
            repositories,
            services,
            jwt_config,
        }
    }
}
