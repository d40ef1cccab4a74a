mod account;
mod user;

pub use account::{Account, AccountRow, NewAccount};
pub use user::{
    NewUserRow, Page, SearchFilter, User, UserChangeset, UserInput, UserRow, upcoming_birthday,
};
