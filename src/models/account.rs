use diesel::prelude::*;
use jiff::civil::DateTime;

/// Account that authenticates against the API and owns user records
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: i32,
    pub username: String,
    pub email: String,
    /// Argon2 PHC string
    pub password: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

/// Row shape of the `accounts` table
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = crate::schema::accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AccountRow {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub password: String,
    pub created_at: jiff_diesel::DateTime,
    pub updated_at: jiff_diesel::DateTime,
}

impl From<AccountRow> for Account {
    fn from(row: AccountRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            email: row.email,
            password: row.password,
            created_at: row.created_at.to_jiff(),
            updated_at: row.updated_at.to_jiff(),
        }
    }
}

/// Insert payload; `password` must already be hashed
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::accounts)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password: String,
}
