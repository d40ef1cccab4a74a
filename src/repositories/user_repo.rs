//! User repository for async database operations.
//!
//! Every query is scoped by the owning account, so a record owned by
//! somebody else is reported exactly like a missing one.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use jiff::civil::Date;

use crate::db::AsyncDbPool;
use crate::error::{AppResult, DatabaseErrorConverter};
use crate::models::{
    NewUserRow, Page, SearchFilter, User, UserChangeset, UserInput, UserRow, upcoming_birthday,
};
use crate::schema::users;

/// Storage contract for users, scoped by the owner's account id.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Owner's users ordered by id, skipping `skip` and returning at most
    /// `limit`. Negative bounds are a validation error.
    async fn list(&self, owner_id: i32, skip: i64, limit: i64) -> AppResult<Vec<User>>;

    /// Users whose birthday falls in `[start, end]`, ordered by the upcoming
    /// date then id. `None` when nobody qualifies.
    async fn birthdays(&self, owner_id: i32, start: Date, end: Date)
    -> AppResult<Option<Vec<User>>>;

    /// Users matching every criterion of `filter`. `None` when nothing matches.
    async fn search(&self, owner_id: i32, filter: SearchFilter) -> AppResult<Option<Vec<User>>>;

    async fn get(&self, owner_id: i32, user_id: i32) -> AppResult<Option<User>>;

    async fn create(&self, owner_id: i32, input: UserInput) -> AppResult<User>;

    /// Replaces every writable field of the user.
    async fn update(&self, owner_id: i32, user_id: i32, input: UserInput)
    -> AppResult<Option<User>>;

    /// Deletes the user and returns its last state.
    async fn remove(&self, owner_id: i32, user_id: i32) -> AppResult<Option<User>>;

    /// Verifies that the storage backend is reachable.
    async fn ping(&self) -> AppResult<()>;
}

/// Orders users by their upcoming birthday inside the window and drops the
/// ones outside of it.
pub(crate) fn select_birthdays(
    candidates: impl IntoIterator<Item = User>,
    start: Date,
    end: Date,
) -> Option<Vec<User>> {
    let mut matched: Vec<(Date, User)> = candidates
        .into_iter()
        .filter_map(|user| upcoming_birthday(user.birthday, start, end).map(|day| (day, user)))
        .collect();

    if matched.is_empty() {
        return None;
    }

    matched.sort_by(|(a_day, a), (b_day, b)| a_day.cmp(b_day).then(a.id.cmp(&b.id)));
    Some(matched.into_iter().map(|(_, user)| user).collect())
}

/// PostgreSQL implementation holding an async connection pool.
///
/// `AsyncDbPool` is an `Arc` internally, so cloning is cheap.
#[derive(Clone)]
pub struct PgUserRepository {
    pool: AsyncDbPool,
}

impl PgUserRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn list(&self, owner_id: i32, skip: i64, limit: i64) -> AppResult<Vec<User>> {
        let page = Page::new(skip, limit)?;
        tracing::debug!(owner_id, skip, limit, "Listing users");
        let mut conn = self.pool.get().await?;

        let rows = users::table
            .filter(users::owner_id.eq(owner_id))
            .order(users::id.asc())
            .offset(page.skip())
            .limit(page.limit())
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "list users"))?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn birthdays(
        &self,
        owner_id: i32,
        start: Date,
        end: Date,
    ) -> AppResult<Option<Vec<User>>> {
        tracing::debug!(owner_id, %start, %end, "Looking up upcoming birthdays");
        let mut conn = self.pool.get().await?;

        // Anniversaries wrap around the year end and shift for 29 February,
        // so the window is applied after loading the owner's rows.
        let rows = users::table
            .filter(users::owner_id.eq(owner_id))
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "list birthdays"))?;

        Ok(select_birthdays(rows.into_iter().map(User::from), start, end))
    }

    async fn search(&self, owner_id: i32, filter: SearchFilter) -> AppResult<Option<Vec<User>>> {
        tracing::debug!(owner_id, ?filter, "Searching users");
        let mut conn = self.pool.get().await?;

        let mut query = users::table
            .filter(users::owner_id.eq(owner_id))
            .select(UserRow::as_select())
            .order(users::id.asc())
            .into_boxed();

        if let Some(first_name) = &filter.first_name {
            query = query.filter(users::first_name.ilike(SearchFilter::like_pattern(first_name)));
        }
        if let Some(last_name) = &filter.last_name {
            query = query.filter(users::last_name.ilike(SearchFilter::like_pattern(last_name)));
        }
        if let Some(email) = &filter.email {
            query = query.filter(users::email.ilike(SearchFilter::like_pattern(email)));
        }

        let rows = query
            .load(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "search users"))?;

        if rows.is_empty() {
            return Ok(None);
        }
        Ok(Some(rows.into_iter().map(User::from).collect()))
    }

    async fn get(&self, owner_id: i32, user_id: i32) -> AppResult<Option<User>> {
        let mut conn = self.pool.get().await?;

        let row = users::table
            .filter(users::id.eq(user_id))
            .filter(users::owner_id.eq(owner_id))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "get user"))?;

        Ok(row.map(User::from))
    }

    async fn create(&self, owner_id: i32, input: UserInput) -> AppResult<User> {
        let mut conn = self.pool.get().await?;
        let new_user = NewUserRow::new(owner_id, input);

        let row = diesel::insert_into(users::table)
            .values(&new_user)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "create user"))?;

        tracing::debug!(owner_id, user_id = row.id, "Created user");
        Ok(row.into())
    }

    async fn update(
        &self,
        owner_id: i32,
        user_id: i32,
        input: UserInput,
    ) -> AppResult<Option<User>> {
        let mut conn = self.pool.get().await?;
        let changes = UserChangeset::from(input);

        let row = diesel::update(
            users::table
                .filter(users::id.eq(user_id))
                .filter(users::owner_id.eq(owner_id)),
        )
        .set((&changes, users::updated_at.eq(diesel::dsl::now)))
        .returning(UserRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "update user"))?;

        tracing::debug!(owner_id, user_id, found = row.is_some(), "Updated user");
        Ok(row.map(User::from))
    }

    async fn remove(&self, owner_id: i32, user_id: i32) -> AppResult<Option<User>> {
        let mut conn = self.pool.get().await?;

        let row = diesel::delete(
            users::table
                .filter(users::id.eq(user_id))
                .filter(users::owner_id.eq(owner_id)),
        )
        .returning(UserRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "delete user"))?;

        tracing::debug!(owner_id, user_id, found = row.is_some(), "Deleted user");
        Ok(row.map(User::from))
    }

    async fn ping(&self) -> AppResult<()> {
        let mut conn = self.pool.get().await?;

        diesel::sql_query("SELECT 1")
            .execute(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "ping database"))?;
        Ok(())
    }
}
