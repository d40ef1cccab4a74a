//! Repository layer for data access operations.
//!
//! Each entity has a trait describing its storage contract, a PostgreSQL
//! implementation over `diesel_async` and an in-memory implementation used
//! by tests.

mod account_repo;
mod memory;
mod user_repo;

use std::sync::Arc;

pub use account_repo::{AccountRepository, PgAccountRepository};
pub use memory::{MemoryAccountRepository, MemoryUserRepository};
pub use user_repo::{PgUserRepository, UserRepository};

use crate::db::AsyncDbPool;

/// Aggregates all repositories for convenient access.
///
/// Cloning only bumps the `Arc` reference counts.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub accounts: Arc<dyn AccountRepository>,
}

impl Repositories {
    /// Creates PostgreSQL-backed repositories sharing one connection pool.
    pub fn new(pool: AsyncDbPool) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            accounts: Arc::new(PgAccountRepository::new(pool)),
        }
    }

    /// Creates empty in-memory repositories.
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(MemoryUserRepository::new()),
            accounts: Arc::new(MemoryAccountRepository::new()),
        }
    }
}
