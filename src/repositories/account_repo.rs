//! Account repository for async database operations.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::AsyncDbPool;
use crate::error::{AppResult, DatabaseErrorConverter};
use crate::models::{Account, AccountRow, NewAccount};
use crate::schema::accounts;

/// Storage contract for accounts.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Inserts an account; a taken email surfaces as `AppError::Duplicate`.
    async fn create(&self, new_account: NewAccount) -> AppResult<Account>;

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>>;

    async fn find_by_id(&self, account_id: i32) -> AppResult<Option<Account>>;
}

#[derive(Clone)]
pub struct PgAccountRepository {
    pool: AsyncDbPool,
}

impl PgAccountRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for PgAccountRepository {
    async fn create(&self, new_account: NewAccount) -> AppResult<Account> {
        let mut conn = self.pool.get().await?;

        let row = diesel::insert_into(accounts::table)
            .values(&new_account)
            .returning(AccountRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "create account"))?;

        tracing::info!(account_id = row.id, "Account registered");
        Ok(row.into())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        let mut conn = self.pool.get().await?;

        let row = accounts::table
            .filter(accounts::email.eq(email))
            .select(AccountRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "find account by email"))?;

        Ok(row.map(Account::from))
    }

    async fn find_by_id(&self, account_id: i32) -> AppResult<Option<Account>> {
        let mut conn = self.pool.get().await?;

        let row = accounts::table
            .filter(accounts::id.eq(account_id))
            .select(AccountRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "find account by id"))?;

        Ok(row.map(Account::from))
    }
}
