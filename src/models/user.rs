use diesel::prelude::*;
use jiff::civil::{Date, DateTime};

use crate::error::{AppError, AppResult};

/// A user record owned by an account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub birthday: Date,
    pub additional_data: Option<String>,
    pub owner_id: i32,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

/// Row shape of the `users` table
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub birthday: jiff_diesel::Date,
    pub additional_data: Option<String>,
    pub owner_id: i32,
    pub created_at: jiff_diesel::DateTime,
    pub updated_at: jiff_diesel::DateTime,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            phone: row.phone,
            birthday: row.birthday.to_jiff(),
            additional_data: row.additional_data,
            owner_id: row.owner_id,
            created_at: row.created_at.to_jiff(),
            updated_at: row.updated_at.to_jiff(),
        }
    }
}

/// Writable fields of a user, shared by create and update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub birthday: Date,
    pub additional_data: Option<String>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUserRow {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub birthday: jiff_diesel::Date,
    pub additional_data: Option<String>,
    pub owner_id: i32,
}

impl NewUserRow {
    pub fn new(owner_id: i32, input: UserInput) -> Self {
        Self {
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            phone: input.phone,
            birthday: input.birthday.into(),
            additional_data: input.additional_data,
            owner_id,
        }
    }
}

/// Full replacement of the writable fields; a missing `additional_data`
/// clears the column.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = crate::schema::users)]
#[diesel(treat_none_as_null = true)]
pub struct UserChangeset {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub birthday: jiff_diesel::Date,
    pub additional_data: Option<String>,
}

impl From<UserInput> for UserChangeset {
    fn from(input: UserInput) -> Self {
        Self {
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            phone: input.phone,
            birthday: input.birthday.into(),
            additional_data: input.additional_data,
        }
    }
}

/// Offset pagination over a caller's users.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    skip: i64,
    limit: i64,
}

impl Page {
    pub const DEFAULT_LIMIT: i64 = 100;

    /// Rejects negative values, which PostgreSQL would refuse anyway.
    pub fn new(skip: i64, limit: i64) -> AppResult<Self> {
        if skip < 0 {
            return Err(AppError::Validation {
                field: "skip".to_string(),
                reason: "must be greater than or equal to 0".to_string(),
            });
        }
        if limit < 0 {
            return Err(AppError::Validation {
                field: "limit".to_string(),
                reason: "must be greater than or equal to 0".to_string(),
            });
        }
        Ok(Self { skip, limit })
    }

    pub fn skip(&self) -> i64 {
        self.skip
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    /// Applies the page to an already ordered sequence.
    pub fn slice<T>(&self, items: impl IntoIterator<Item = T>) -> Vec<T> {
        let skip = usize::try_from(self.skip).unwrap_or(usize::MAX);
        let take = usize::try_from(self.limit).unwrap_or(usize::MAX);
        items.into_iter().skip(skip).take(take).collect()
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}

/// Optional search criteria; every present criterion must match.
///
/// Each criterion is a case-insensitive substring match on its field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilter {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

impl SearchFilter {
    /// Builds a filter, treating blank values as absent.
    pub fn new(
        first_name: Option<String>,
        last_name: Option<String>,
        email: Option<String>,
    ) -> Self {
        fn clean(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        Self {
            first_name: clean(first_name),
            last_name: clean(last_name),
            email: clean(email),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none() && self.email.is_none()
    }

    pub fn matches(&self, user: &User) -> bool {
        fn contains(haystack: &str, needle: &Option<String>) -> bool {
            needle
                .as_ref()
                .is_none_or(|n| haystack.to_lowercase().contains(&n.to_lowercase()))
        }

        contains(&user.first_name, &self.first_name)
            && contains(&user.last_name, &self.last_name)
            && contains(&user.email, &self.email)
    }

    /// `ILIKE` pattern for a substring match, with wildcards escaped.
    pub fn like_pattern(needle: &str) -> String {
        let mut escaped = String::with_capacity(needle.len() + 2);
        escaped.push('%');
        for c in needle.chars() {
            if matches!(c, '%' | '_' | '\\') {
                escaped.push('\\');
            }
            escaped.push(c);
        }
        escaped.push('%');
        escaped
    }
}

fn is_leap_year(year: i16) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// The anniversary of `birthday` in `year`; 29 February maps to 28 February
/// in common years.
fn anniversary(birthday: Date, year: i16) -> Option<Date> {
    let day = if birthday.month() == 2 && birthday.day() == 29 && !is_leap_year(year) {
        28
    } else {
        birthday.day()
    };
    Date::new(year, birthday.month(), day).ok()
}

/// Returns the anniversary of `birthday` falling in `[start, end]`, both
/// bounds inclusive, if there is one.
///
/// The window may cross New Year, in which case the anniversary in
/// `end`'s year is considered as well.
pub fn upcoming_birthday(birthday: Date, start: Date, end: Date) -> Option<Date> {
    if end < start {
        return None;
    }

    (start.year()..=end.year())
        .filter_map(|year| anniversary(birthday, year))
        .find(|candidate| *candidate >= start && *candidate <= end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::ToSpan;
    use jiff::civil::date;
    use proptest::prelude::*;

    fn sample_user(first: &str, last: &str, email: &str) -> User {
        User {
            id: 1,
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: email.to_string(),
            phone: "+380501234567".to_string(),
            birthday: date(1990, 5, 17),
            additional_data: None,
            owner_id: 1,
            created_at: date(2024, 1, 1).at(0, 0, 0, 0),
            updated_at: date(2024, 1, 1).at(0, 0, 0, 0),
        }
    }

    #[test]
    fn test_birthday_window_is_inclusive() {
        let start = date(2026, 10, 19);
        let end = date(2026, 10, 26);

        assert_eq!(
            upcoming_birthday(date(1990, 10, 19), start, end),
            Some(date(2026, 10, 19))
        );
        assert_eq!(
            upcoming_birthday(date(1985, 10, 26), start, end),
            Some(date(2026, 10, 26))
        );
        assert_eq!(upcoming_birthday(date(1985, 10, 27), start, end), None);
        assert_eq!(upcoming_birthday(date(1985, 10, 18), start, end), None);
    }

    #[test]
    fn test_birthday_window_crossing_new_year() {
        let start = date(2026, 12, 28);
        let end = date(2027, 1, 4);

        assert_eq!(
            upcoming_birthday(date(2001, 1, 2), start, end),
            Some(date(2027, 1, 2))
        );
        assert_eq!(
            upcoming_birthday(date(2001, 12, 30), start, end),
            Some(date(2026, 12, 30))
        );
        assert_eq!(upcoming_birthday(date(2001, 1, 5), start, end), None);
    }

    #[test]
    fn test_leap_day_birthday_in_common_year() {
        let start = date(2027, 2, 25);
        let end = date(2027, 3, 4);
        assert_eq!(
            upcoming_birthday(date(2000, 2, 29), start, end),
            Some(date(2027, 2, 28))
        );

        let leap_start = date(2028, 2, 25);
        let leap_end = date(2028, 3, 3);
        assert_eq!(
            upcoming_birthday(date(2000, 2, 29), leap_start, leap_end),
            Some(date(2028, 2, 29))
        );
    }

    #[test]
    fn test_inverted_window_is_empty() {
        assert_eq!(
            upcoming_birthday(date(2000, 6, 1), date(2026, 6, 2), date(2026, 6, 1)),
            None
        );
    }

    #[test]
    fn test_page_rejects_negative_values() {
        assert!(matches!(
            Page::new(-1, 10),
            Err(AppError::Validation { ref field, .. }) if field == "skip"
        ));
        assert!(matches!(
            Page::new(0, -5),
            Err(AppError::Validation { ref field, .. }) if field == "limit"
        ));
        assert_eq!(Page::default(), Page::new(0, 100).unwrap());
    }

    #[test]
    fn test_page_slice() {
        let page = Page::new(2, 3).unwrap();
        assert_eq!(page.slice(1..=10), vec![3, 4, 5]);
        assert_eq!(Page::new(8, 5).unwrap().slice(1..=10), vec![9, 10]);
        assert!(Page::new(0, 0).unwrap().slice(1..=10).is_empty());
    }

    #[test]
    fn test_search_filter_matches_case_insensitive_substrings() {
        let user = sample_user("Olena", "Kovalenko", "olena.k@example.com");

        assert!(SearchFilter::default().matches(&user));
        assert!(SearchFilter::new(Some("LEN".into()), None, None).matches(&user));
        assert!(SearchFilter::new(Some("olena".into()), Some("koval".into()), None).matches(&user));
        assert!(!SearchFilter::new(Some("olena".into()), Some("petrenko".into()), None).matches(&user));
        assert!(SearchFilter::new(None, None, Some("@EXAMPLE".into())).matches(&user));
    }

    #[test]
    fn test_search_filter_ignores_blank_values() {
        let filter = SearchFilter::new(Some("  ".into()), Some(String::new()), None);
        assert!(filter.is_empty());
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(SearchFilter::like_pattern("a%b_c"), "%a\\%b\\_c%");
        assert_eq!(SearchFilter::like_pattern("plain"), "%plain%");
    }

    fn arb_date() -> impl Strategy<Value = Date> {
        (1950i16..2100, 1i8..=12, 1i8..=31)
            .prop_filter_map("valid civil date", |(y, m, d)| Date::new(y, m, d).ok())
    }

    proptest! {
        #[test]
        fn prop_found_birthday_lies_in_window_and_keeps_month(
            birthday in arb_date(),
            start in arb_date(),
            days in 0i64..=7,
        ) {
            let end = start.checked_add(days.days()).unwrap();
            if let Some(found) = upcoming_birthday(birthday, start, end) {
                prop_assert!(found >= start && found <= end);
                prop_assert_eq!(found.month(), birthday.month());
                let leap_shift = birthday.month() == 2 && birthday.day() == 29 && found.day() == 28;
                prop_assert!(found.day() == birthday.day() || leap_shift);
            }
        }

        #[test]
        fn prop_page_is_a_bounded_window(
            len in 0usize..50,
            skip in 0i64..60,
            limit in 0i64..60,
        ) {
            let items: Vec<usize> = (0..len).collect();
            let page = Page::new(skip, limit).unwrap().slice(items);

            prop_assert!(page.len() as i64 <= limit);
            for (i, item) in page.iter().enumerate() {
                prop_assert_eq!(*item as i64, skip + i as i64);
            }
        }

        #[test]
        fn prop_every_day_of_the_week_ahead_is_found(
            start in arb_date(),
            offset in 0i64..=7,
            years_back in 1i16..80,
        ) {
            let end = start.checked_add(7.days()).unwrap();
            let target = start.checked_add(offset.days()).unwrap();
            let birthday = Date::new(target.year() - years_back, target.month(), target.day());
            prop_assume!(birthday.is_ok());

            prop_assert_eq!(upcoming_birthday(birthday.unwrap(), start, end), Some(target));
        }
    }
}
