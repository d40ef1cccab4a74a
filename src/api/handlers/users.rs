//! User API handlers.
//!
//! Every handler is scoped to the authenticated account and performs a
//! single repository call. Absence, including records owned by another
//! account, is reported as 404 "User not found".

use axum::{
    Extension, Json,
    extract::{Path, State, rejection::PathRejection},
    http::StatusCode,
    routing::{MethodRouter, get},
};
use jiff::ToSpan;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::USER_TAG;
use crate::api::dto::{ErrorResponse, ListParams, SearchParams, UserRequest, UserResponse};
use crate::api::middleware::AuthUser;
use crate::error::{AppError, AppResult};
use crate::models::User;
use crate::state::AppState;
use crate::utils::validate::{ValidatedJson, ValidatedQuery};

const USER_NOT_FOUND: &str = "User not found";

/// Days after today covered by the birthday lookup.
const BIRTHDAY_WINDOW_DAYS: i64 = 7;

/// Creates user-related routes.
///
/// Routes:
/// - GET /            - List users
/// - GET /birthdays   - Users with a birthday in the next week
/// - GET /search      - Search users by name or email
/// - GET /{user_id}    - Get user by ID
/// - POST /           - Create user
/// - PUT /{user_id}    - Replace user
/// - DELETE /{user_id} - Delete user
pub fn user_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_users))
        .routes(routes!(create_user))
        .routes(routes!(upcoming_birthdays))
        .routes(routes!(search_users))
        .routes(routes!(get_user))
        .routes(routes!(update_user))
        .routes(routes!(delete_user))
}

/// List and create under the trailing-slash form of the collection path,
/// which nesting does not cover.
pub fn collection_routes() -> MethodRouter<AppState> {
    get(list_users).post(create_user)
}

fn user_not_found() -> AppError {
    AppError::not_found(USER_NOT_FOUND)
}

fn into_responses(users: Vec<User>) -> Json<Vec<UserResponse>> {
    Json(users.into_iter().map(UserResponse::from).collect())
}

/// GET /users - List users
///
/// An empty page is a successful, empty list.
#[utoipa::path(
    get,
    path = "/",
    tag = USER_TAG,
    params(ListParams),
    responses(
        (status = 200, description = "Page of users", body = Vec<UserResponse>),
        (status = 422, description = "Negative skip or limit", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn list_users(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ValidatedQuery(params): ValidatedQuery<ListParams>,
) -> AppResult<Json<Vec<UserResponse>>> {
    let users = state
        .repositories
        .users
        .list(auth_user.account_id, params.skip, params.limit)
        .await?;
    Ok(into_responses(users))
}

/// GET /users/birthdays - Upcoming birthdays
///
/// Users whose birthday falls between today and seven days from now,
/// both inclusive.
#[utoipa::path(
    get,
    path = "/birthdays",
    tag = USER_TAG,
    responses(
        (status = 200, description = "Users with upcoming birthdays", body = Vec<UserResponse>),
        (status = 404, description = "Nobody has a birthday this week", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn upcoming_birthdays(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<Vec<UserResponse>>> {
    let today = jiff::Zoned::now().date();
    let end = today.checked_add(BIRTHDAY_WINDOW_DAYS.days())?;

    let users = state
        .repositories
        .users
        .birthdays(auth_user.account_id, today, end)
        .await?
        .ok_or_else(user_not_found)?;
    Ok(into_responses(users))
}

/// GET /users/search - Search users
///
/// Without criteria every owned user matches.
#[utoipa::path(
    get,
    path = "/search",
    tag = USER_TAG,
    params(SearchParams),
    responses(
        (status = 200, description = "Matching users", body = Vec<UserResponse>),
        (status = 404, description = "No user matches", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn search_users(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ValidatedQuery(params): ValidatedQuery<SearchParams>,
) -> AppResult<Json<Vec<UserResponse>>> {
    let users = state
        .repositories
        .users
        .search(auth_user.account_id, params.into())
        .await?
        .ok_or_else(user_not_found)?;
    Ok(into_responses(users))
}

/// GET /users/{user_id} - Get user by ID
#[utoipa::path(
    get,
    path = "/{user_id}",
    tag = USER_TAG,
    params(
        ("user_id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn get_user(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    user_id: Result<Path<i32>, PathRejection>,
) -> AppResult<Json<UserResponse>> {
    let Path(user_id) = user_id?;
    let user = state
        .repositories
        .users
        .get(auth_user.account_id, user_id)
        .await?
        .ok_or_else(user_not_found)?;
    Ok(Json(user.into()))
}

/// POST /users - Create user
#[utoipa::path(
    post,
    path = "/",
    tag = USER_TAG,
    request_body = UserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Malformed body", body = ErrorResponse),
        (status = 422, description = "Invalid field values", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn create_user(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ValidatedJson(payload): ValidatedJson<UserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let user = state
        .repositories
        .users
        .create(auth_user.account_id, payload.into())
        .await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// PUT /users/{user_id} - Replace user
///
/// All writable fields are replaced; an omitted `additional_data` clears it.
#[utoipa::path(
    put,
    path = "/{user_id}",
    tag = USER_TAG,
    params(
        ("user_id" = i32, Path, description = "User ID")
    ),
    request_body = UserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 422, description = "Invalid field values", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn update_user(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    user_id: Result<Path<i32>, PathRejection>,
    ValidatedJson(payload): ValidatedJson<UserRequest>,
) -> AppResult<Json<UserResponse>> {
    let Path(user_id) = user_id?;
    let user = state
        .repositories
        .users
        .update(auth_user.account_id, user_id, payload.into())
        .await?
        .ok_or_else(user_not_found)?;
    Ok(Json(user.into()))
}

/// DELETE /users/{user_id} - Delete user
///
/// Responds with the user as it was before deletion.
#[utoipa::path(
    delete,
    path = "/{user_id}",
    tag = USER_TAG,
    params(
        ("user_id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User deleted", body = UserResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn delete_user(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    user_id: Result<Path<i32>, PathRejection>,
) -> AppResult<Json<UserResponse>> {
    let Path(user_id) = user_id?;
    let user = state
        .repositories
        .users
        .remove(auth_user.account_id, user_id)
        .await?
        .ok_or_else(user_not_found)?;
    Ok(Json(user.into()))
}
