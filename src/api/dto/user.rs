//! User-related DTOs for API requests and responses.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::models::{SearchFilter, User, UserInput};

// ============================================================================
// Request DTOs
// ============================================================================

/// Request body for creating or replacing a user.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UserRequest {
    #[validate(length(min = 1, max = 50, message = "First name must be between 1 and 50 characters"))]
    #[schema(example = "Olena", min_length = 1, max_length = 50)]
    pub first_name: String,
    #[validate(length(min = 1, max = 50, message = "Last name must be between 1 and 50 characters"))]
    #[schema(example = "Kovalenko", min_length = 1, max_length = 50)]
    pub last_name: String,
    #[validate(
        email(message = "Invalid email format"),
        length(max = 150, message = "Email must be at most 150 characters")
    )]
    #[schema(example = "olena@example.com", format = "email", max_length = 150)]
    pub email: String,
    #[validate(length(min = 1, max = 30, message = "Phone must be between 1 and 30 characters"))]
    #[schema(example = "+380501234567", min_length = 1, max_length = 30)]
    pub phone: String,
    /// Calendar date, `YYYY-MM-DD`
    #[schema(value_type = String, format = Date, example = "1990-05-17")]
    pub birthday: Date,
    #[validate(length(max = 250, message = "Additional data must be at most 250 characters"))]
    #[schema(max_length = 250)]
    pub additional_data: Option<String>,
}

impl From<UserRequest> for UserInput {
    fn from(request: UserRequest) -> Self {
        Self {
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            phone: request.phone,
            birthday: request.birthday,
            additional_data: request.additional_data,
        }
    }
}

/// Offset pagination for the user list.
#[derive(Debug, Deserialize, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// Number of records to skip
    #[serde(default)]
    #[param(default = 0)]
    pub skip: i64,
    /// Maximum number of records to return
    #[serde(default = "default_limit")]
    #[param(default = 100)]
    pub limit: i64,
}

fn default_limit() -> i64 {
    crate::models::Page::DEFAULT_LIMIT
}

/// Optional search criteria; supplied ones must all match.
#[derive(Debug, Default, Deserialize, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Case-insensitive substring of the first name
    #[validate(length(max = 50))]
    pub first_name: Option<String>,
    /// Case-insensitive substring of the last name
    #[validate(length(max = 50))]
    pub last_name: Option<String>,
    /// Case-insensitive substring of the email
    #[validate(length(max = 150))]
    pub email: Option<String>,
}

impl From<SearchParams> for SearchFilter {
    fn from(params: SearchParams) -> Self {
        SearchFilter::new(params.first_name, params.last_name, params.email)
    }
}

// ============================================================================
// Response DTOs
// ============================================================================

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    #[schema(example = "1990-05-17")]
    pub birthday: String,
    pub additional_data: Option<String>,
    #[schema(example = "2024-11-02T09:30:00")]
    pub created_at: String,
    #[schema(example = "2024-11-02T09:30:00")]
    pub updated_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            phone: user.phone,
            birthday: user.birthday.to_string(),
            additional_data: user.additional_data,
            created_at: user.created_at.to_string(),
            updated_at: user.updated_at.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;

    fn request() -> UserRequest {
        serde_json::from_value(serde_json::json!({
            "first_name": "Olena",
            "last_name": "Kovalenko",
            "email": "olena@example.com",
            "phone": "+380501234567",
            "birthday": "1990-05-17"
        }))
        .unwrap()
    }

    #[test]
    fn test_request_parses_birthday_and_validates() {
        let req = request();
        assert_eq!(req.birthday, date(1990, 5, 17));
        assert!(req.additional_data.is_none());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_request_rejects_out_of_range_fields() {
        let mut req = request();
        req.first_name = String::new();
        req.email = "not-an-email".to_string();
        req.additional_data = Some("x".repeat(251));

        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("first_name"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("additional_data"));
    }

    #[test]
    fn test_invalid_birthday_fails_to_parse() {
        let result = serde_json::from_value::<UserRequest>(serde_json::json!({
            "first_name": "A",
            "last_name": "B",
            "email": "a@example.com",
            "phone": "1",
            "birthday": "1990-02-30"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_list_params_defaults() {
        let params: ListParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.skip, 0);
        assert_eq!(params.limit, 100);
    }

    #[test]
    fn test_response_formats_dates() {
        let user = User {
            id: 3,
            first_name: "Olena".to_string(),
            last_name: "Kovalenko".to_string(),
            email: "olena@example.com".to_string(),
            phone: "+380501234567".to_string(),
            birthday: date(1990, 5, 7),
            additional_data: Some("college friend".to_string()),
            owner_id: 1,
            created_at: date(2024, 11, 2).at(9, 30, 0, 0),
            updated_at: date(2024, 11, 2).at(9, 30, 0, 0),
        };

        let response = UserResponse::from(user);
        assert_eq!(response.birthday, "1990-05-07");
        assert_eq!(response.created_at, "2024-11-02T09:30:00");
    }
}
