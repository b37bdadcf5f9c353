//! HTTP plumbing around the directory core.
//!
//! Handlers extract the asserted caller identity, hash incoming passwords
//! with argon2, and map typed denials to status codes. No decision logic
//! lives here.

use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{CallerIdentity, ValidatedJson};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::{CreateUser, ReplaceUser, UpdateUser, UserResponse};
use crate::service::DirectoryService;
use crate::store::UserStore;

/// Create the users router with all HTTP endpoints
pub fn router<S: UserStore + 'static>(service: DirectoryService<S>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_users).post(create_user))
        .route(
            "/{id}",
            get(get_user)
                .put(replace_user)
                .patch(patch_user)
                .delete(delete_user),
        )
        .with_state(shared_service)
}

/// List users visible to the caller
///
/// GET /users
async fn list_users<S: UserStore>(
    State(service): State<Arc<DirectoryService<S>>>,
    CallerIdentity(caller): CallerIdentity,
) -> UserResult<Json<Vec<UserResponse>>> {
    let users = service.list_users(caller).await?;
    Ok(Json(users))
}

/// Register a new user
///
/// POST /users
async fn create_user<S: UserStore>(
    State(service): State<Arc<DirectoryService<S>>>,
    ValidatedJson(input): ValidatedJson<CreateUser>,
) -> UserResult<impl IntoResponse> {
    let password_hash = hash_password(&input.password)?;
    let user = service.create_user(input.into_record(password_hash)).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Get a user by ID
///
/// GET /users/:id
async fn get_user<S: UserStore>(
    State(service): State<Arc<DirectoryService<S>>>,
    CallerIdentity(caller): CallerIdentity,
    Path(id): Path<Uuid>,
) -> UserResult<Json<UserResponse>> {
    let user = service.get_user(caller, id).await?;
    Ok(Json(user))
}

/// Fully replace a user
///
/// PUT /users/:id
async fn replace_user<S: UserStore>(
    State(service): State<Arc<DirectoryService<S>>>,
    CallerIdentity(caller): CallerIdentity,
    Path(id): Path<Uuid>,
    ValidatedJson(input): ValidatedJson<ReplaceUser>,
) -> UserResult<Json<UserResponse>> {
    let password_hash = hash_password(&input.password)?;
    let user = service
        .replace_user(caller, id, input.into_record(password_hash))
        .await?;
    Ok(Json(user))
}

/// Partially update a user
///
/// PATCH /users/:id
async fn patch_user<S: UserStore>(
    State(service): State<Arc<DirectoryService<S>>>,
    CallerIdentity(caller): CallerIdentity,
    Path(id): Path<Uuid>,
    ValidatedJson(input): ValidatedJson<UpdateUser>,
) -> UserResult<Json<UserResponse>> {
    let password_hash = match input.password {
        Some(ref password) => Some(hash_password(password)?),
        None => None,
    };
    let user = service
        .patch_user(caller, id, input.into_patch(password_hash))
        .await?;
    Ok(Json(user))
}

/// Delete a user
///
/// DELETE /users/:id
async fn delete_user<S: UserStore>(
    State(service): State<Arc<DirectoryService<S>>>,
    CallerIdentity(caller): CallerIdentity,
    Path(id): Path<Uuid>,
) -> UserResult<impl IntoResponse> {
    service.delete_user(caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Hash a raw password before it reaches the core. The core only ever sees
/// the opaque hash.
pub fn hash_password(password: &str) -> UserResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| UserError::Internal(format!("Password hashing failed: {}", e)))
}
