//! Auth and admin user-management route handlers.

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use crate::errors::AppError;
use crate::models::user::{LoggedInUser, Role, UserStatus};
use crate::state::AppState;

use super::{self as accounts};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: LoggedInUser,
    /// Opaque session token; send as `Authorization: Bearer <token>`.
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// A managed account plus its derived status, as shown in the admin panel.
#[derive(Debug, Serialize)]
pub struct UserListEntry {
    #[serde(flatten)]
    pub user: LoggedInUser,
    pub status: UserStatus,
}

/// POST /api/v1/auth/admin/register
pub async fn register_admin(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let store = state.store.as_ref();
    accounts::register_admin(store, &req.email, &req.password, &req.confirm_password).await?;
    let admin = accounts::login_admin(store, &req.email, &req.password).await?;
    let token = accounts::create_session(store, &admin).await?;
    info!("Admin account registered");
    Ok(Json(AuthResponse {
        user: LoggedInUser::from(&admin),
        token,
    }))
}

/// POST /api/v1/auth/admin/login
pub async fn login_admin(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let store = state.store.as_ref();
    let admin = accounts::login_admin(store, &req.email, &req.password).await?;
    let token = accounts::create_session(store, &admin).await?;
    Ok(Json(AuthResponse {
        user: LoggedInUser::from(&admin),
        token,
    }))
}

/// POST /api/v1/auth/login — managed users.
pub async fn login_user(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let store = state.store.as_ref();
    let user = accounts::login_user(store, &req.email, &req.password).await?;
    let token = accounts::create_session(store, &user).await?;
    Ok(Json(AuthResponse {
        user: LoggedInUser::from(&user),
        token,
    }))
}

/// GET /api/v1/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<UserListEntry>>, AppError> {
    let store = state.store.as_ref();
    accounts::require_admin(store, &headers).await?;

    let now = Utc::now();
    let users = accounts::load_managed_users(store).await?;
    let entries = users
        .iter()
        .map(|u| UserListEntry {
            user: LoggedInUser::from(u),
            status: u.status(now),
        })
        .collect();
    Ok(Json(entries))
}

/// POST /api/v1/admin/users
pub async fn create_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateUserRequest>,
) -> Result<Json<LoggedInUser>, AppError> {
    let store = state.store.as_ref();
    accounts::require_admin(store, &headers).await?;
    let user = accounts::create_managed_user(store, &req.email, &req.password, req.role).await?;
    info!("Managed user created: {} ({:?})", user.email, user.role);
    Ok(Json(user))
}

/// DELETE /api/v1/admin/users/:email
pub async fn delete_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(email): Path<String>,
) -> Result<Json<Value>, AppError> {
    let store = state.store.as_ref();
    accounts::require_admin(store, &headers).await?;
    accounts::remove_managed_user(store, &email).await?;
    info!("Managed user removed: {email}");
    Ok(Json(json!({ "deleted": email })))
}
