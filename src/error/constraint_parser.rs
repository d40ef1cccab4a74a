use std::sync::OnceLock;

use regex::Regex;

/// Extracts structured information from PostgreSQL constraint violation messages.
pub struct ConstraintParser;

struct Patterns {
    key_value: Regex,
    column_name: Regex,
}

static PATTERNS: OnceLock<Patterns> = OnceLock::new();

fn patterns() -> &'static Patterns {
    PATTERNS.get_or_init(|| Patterns {
        // "Key (email)=(a@b.c) already exists."
        key_value: Regex::new(r"Key \(([^)]+)\)=\(([^)]*)\)").expect("valid key/value pattern"),
        column_name: Regex::new(r#"column "([^"]+)""#).expect("valid column pattern"),
    })
}

impl ConstraintParser {
    /// Parses a unique violation into `(entity, field, value)`.
    ///
    /// PostgreSQL reports the offending key in the DETAIL part, which diesel
    /// exposes separately from the main message, so both are searched.
    ///
    /// ```
    /// use contacts_rs::error::ConstraintParser;
    ///
    /// let parsed = ConstraintParser::parse_unique_violation(
    ///     "duplicate key value violates unique constraint \"accounts_email_key\"",
    ///     Some("Key (email)=(a@example.com) already exists."),
    ///     Some("accounts_email_key"),
    /// );
    /// assert_eq!(
    ///     parsed,
    ///     Some(("accounts".to_string(), "email".to_string(), "a@example.com".to_string()))
    /// );
    /// ```
    pub fn parse_unique_violation(
        message: &str,
        details: Option<&str>,
        constraint_name: Option<&str>,
    ) -> Option<(String, String, String)> {
        let key_value = details
            .and_then(Self::extract_key_value)
            .or_else(|| Self::extract_key_value(message));

        match (constraint_name.and_then(Self::parse_constraint_name), key_value) {
            (Some((entity, _)), Some((field, value))) => Some((entity, field, value)),
            (Some((entity, field)), None) => Some((entity, field, "duplicate_value".to_string())),
            (None, Some((field, value))) => Some(("resource".to_string(), field, value)),
            (None, None) => None,
        }
    }

    /// Parses a not-null violation into the offending column name.
    pub fn parse_not_null_violation(message: &str) -> Option<String> {
        patterns()
            .column_name
            .captures(message)
            .map(|caps| caps[1].to_string())
    }

    /// Splits a constraint name such as `accounts_email_key` into
    /// `(table, column)`.
    pub fn parse_constraint_name(constraint: &str) -> Option<(String, String)> {
        let stem = ["_key", "_fkey", "_pkey", "_check"]
            .iter()
            .find_map(|suffix| constraint.strip_suffix(suffix))?;
        let (table, column) = stem.split_once('_')?;
        if table.is_empty() || column.is_empty() {
            return None;
        }
        Some((table.to_string(), column.to_string()))
    }

    fn extract_key_value(text: &str) -> Option<(String, String)> {
        patterns()
            .key_value
            .captures(text)
            .map(|caps| (caps[1].to_string(), caps[2].to_string()))
    }
}
