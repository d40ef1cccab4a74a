//! In-memory repositories for tests and database-less runs.

use std::collections::BTreeMap;

use async_trait::async_trait;
use jiff::civil::{Date, DateTime};
use tokio::sync::RwLock;

use crate::error::{AppError, AppResult};
use crate::models::{Account, NewAccount, Page, SearchFilter, User, UserInput};
use crate::repositories::user_repo::select_birthdays;
use crate::repositories::{AccountRepository, UserRepository};

fn now() -> DateTime {
    jiff::Zoned::now().datetime()
}

#[derive(Debug)]
struct Table<T> {
    rows: BTreeMap<i32, T>,
    last_id: i32,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            last_id: 0,
        }
    }
}

impl<T> Table<T> {
    fn next_id(&mut self) -> i32 {
        self.last_id += 1;
        self.last_id
    }
}

/// Users kept in a `BTreeMap`, so iteration is already ordered by id.
#[derive(Debug, Default)]
pub struct MemoryUserRepository {
    table: RwLock<Table<User>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    async fn owned(&self, owner_id: i32) -> Vec<User> {
        let table = self.table.read().await;
        table
            .rows
            .values()
            .filter(|user| user.owner_id == owner_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn list(&self, owner_id: i32, skip: i64, limit: i64) -> AppResult<Vec<User>> {
        let page = Page::new(skip, limit)?;
        Ok(page.slice(self.owned(owner_id).await))
    }

    async fn birthdays(
        &self,
        owner_id: i32,
        start: Date,
        end: Date,
    ) -> AppResult<Option<Vec<User>>> {
        Ok(select_birthdays(self.owned(owner_id).await, start, end))
    }

    async fn search(&self, owner_id: i32, filter: SearchFilter) -> AppResult<Option<Vec<User>>> {
        let found: Vec<User> = self
            .owned(owner_id)
            .await
            .into_iter()
            .filter(|user| filter.matches(user))
            .collect();

        Ok((!found.is_empty()).then_some(found))
    }

    async fn get(&self, owner_id: i32, user_id: i32) -> AppResult<Option<User>> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .get(&user_id)
            .filter(|user| user.owner_id == owner_id)
            .cloned())
    }

    async fn create(&self, owner_id: i32, input: UserInput) -> AppResult<User> {
        let mut table = self.table.write().await;
        let id = table.next_id();
        let created_at = now();

        let user = User {
            id,
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            phone: input.phone,
            birthday: input.birthday,
            additional_data: input.additional_data,
            owner_id,
            created_at,
            updated_at: created_at,
        };
        table.rows.insert(id, user.clone());

        tracing::debug!(owner_id, user_id = id, "Created user");
        Ok(user)
    }

    async fn update(
        &self,
        owner_id: i32,
        user_id: i32,
        input: UserInput,
    ) -> AppResult<Option<User>> {
        let mut table = self.table.write().await;
        let Some(user) = table
            .rows
            .get_mut(&user_id)
            .filter(|user| user.owner_id == owner_id)
        else {
            return Ok(None);
        };

        user.first_name = input.first_name;
        user.last_name = input.last_name;
        user.email = input.email;
        user.phone = input.phone;
        user.birthday = input.birthday;
        user.additional_data = input.additional_data;
        user.updated_at = now();

        Ok(Some(user.clone()))
    }

    async fn remove(&self, owner_id: i32, user_id: i32) -> AppResult<Option<User>> {
        let mut table = self.table.write().await;
        let owned = table
            .rows
            .get(&user_id)
            .is_some_and(|user| user.owner_id == owner_id);

        Ok(if owned { table.rows.remove(&user_id) } else { None })
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryAccountRepository {
    table: RwLock<Table<Account>>,
}

impl MemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountRepository for MemoryAccountRepository {
    async fn create(&self, new_account: NewAccount) -> AppResult<Account> {
        let mut table = self.table.write().await;

        if table.rows.values().any(|a| a.email == new_account.email) {
            return Err(AppError::Duplicate {
                entity: "accounts".to_string(),
                field: "email".to_string(),
                value: new_account.email,
            });
        }

        let id = table.next_id();
        let created_at = now();
        let account = Account {
            id,
            username: new_account.username,
            email: new_account.email,
            password: new_account.password,
            created_at,
            updated_at: created_at,
        };
        table.rows.insert(id, account.clone());
        Ok(account)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        let table = self.table.read().await;
        Ok(table.rows.values().find(|a| a.email == email).cloned())
    }

    async fn find_by_id(&self, account_id: i32) -> AppResult<Option<Account>> {
        let table = self.table.read().await;
        Ok(table.rows.get(&account_id).cloned())
    }
}
