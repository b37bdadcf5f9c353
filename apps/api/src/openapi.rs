use axum::Json;
use axum_helpers::ErrorResponse;
use domain_users::{CreateUser, ReplaceUser, Role, UpdateUser, UserResponse};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "User Directory API",
        description = "User-directory CRUD gated by a three-tier role model \
                       (GUEST, USER, ADMIN). Caller identity is asserted via \
                       `Authorization: Bearer <user-id>`.",
        version = "0.1.0"
    ),
    components(schemas(
        Role,
        UserResponse,
        CreateUser,
        UpdateUser,
        ReplaceUser,
        ErrorResponse
    ))
)]
pub struct ApiDoc;

/// GET /api-docs/openapi.json
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
