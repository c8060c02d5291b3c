//! RBAC administration under `/api/v1/admin`.
//!
//! Every route requires any of [`ADMIN_PERMISSIONS`]. Permission changes
//! reach users the next time they obtain a token.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use super::{ApiResponse, AppState};
use crate::auth::{AccessGate, AuthContext};
use crate::error::AppError;
use crate::rbac::permissions::{is_reserved, ADMIN_PERMISSIONS};
use crate::rbac::RequirePermissionLayer;

pub fn admin_router(gate: AccessGate) -> Router<AppState> {
    Router::new()
        .route("/roles", get(list_roles).post(create_role))
        .route("/roles/:id/permissions", get(role_permissions))
        .route("/permissions", get(list_permissions).post(create_permission))
        .route("/assign-permission", post(assign_permission))
        .route("/remove-permission", delete(remove_permission))
        .route("/assign-role", post(assign_role))
        .route("/remove-role", delete(remove_role))
        .route("/users/:id/roles", get(user_roles))
        .route("/users/:id/permissions", get(user_permissions))
        .route_layer(RequirePermissionLayer::any_of(gate, &ADMIN_PERMISSIONS))
}

#[derive(Debug, Deserialize)]
struct NamedRequest {
    name: String,
    #[serde(default)]
    description: String,
}

impl NamedRequest {
    fn validated(self, what: &str) -> Result<Self, AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::validation(format!("{what} name is required")));
        }
        Ok(self)
    }
}

#[derive(Debug, Deserialize)]
struct RolePermissionRequest {
    role_id: Uuid,
    permission_id: Uuid,
}

#[derive(Debug, Deserialize)]
struct UserRoleRequest {
    user_id: Uuid,
    role_id: Uuid,
}

// ─────────────────────────────────────────────────────────────────────────────
// Roles
// ─────────────────────────────────────────────────────────────────────────────

async fn list_roles(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(ApiResponse::success(state.rbac.get_all_roles().await?)))
}

async fn create_role(
    State(state): State<AppState>,
    ctx: AuthContext,
    payload: Result<Json<NamedRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(request) = payload?;
    let request = request.validated("Role")?;
    let role = state.rbac.create_role(request.name.trim(), &request.description).await?;
    info!(role_id = %role.id, role = %role.name, admin_id = %ctx.user_id, "Role created");
    Ok((StatusCode::CREATED, Json(ApiResponse::success(role))))
}

async fn role_permissions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let role = state.rbac.get_role(id).await?;
    let permissions = state.rbac.get_permissions_for_role(role.id).await?;
    Ok(Json(ApiResponse::success(permissions)))
}

// ─────────────────────────────────────────────────────────────────────────────
// Permissions
// ─────────────────────────────────────────────────────────────────────────────

async fn list_permissions(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(ApiResponse::success(state.rbac.get_all_permissions().await?)))
}

async fn create_permission(
    State(state): State<AppState>,
    ctx: AuthContext,
    payload: Result<Json<NamedRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(request) = payload?;
    let request = request.validated("Permission")?;
    if is_reserved(request.name.trim()) {
        return Err(AppError::validation(format!(
            "Permission name '{}' is reserved",
            request.name.trim()
        )));
    }
    let permission = state
        .rbac
        .create_permission(request.name.trim(), &request.description)
        .await?;
    info!(permission = %permission.name, admin_id = %ctx.user_id, "Permission created");
    Ok((StatusCode::CREATED, Json(ApiResponse::success(permission))))
}

async fn assign_permission(
    State(state): State<AppState>,
    ctx: AuthContext,
    payload: Result<Json<RolePermissionRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(request) = payload?;
    state
        .rbac
        .assign_permission_to_role(request.role_id, request.permission_id)
        .await?;
    info!(
        role_id = %request.role_id,
        permission_id = %request.permission_id,
        admin_id = %ctx.user_id,
        "Permission assigned to role"
    );
    Ok(Json(ApiResponse::message("Permission assigned to role")))
}

async fn remove_permission(
    State(state): State<AppState>,
    ctx: AuthContext,
    payload: Result<Json<RolePermissionRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(request) = payload?;
    state
        .rbac
        .remove_permission_from_role(request.role_id, request.permission_id)
        .await?;
    info!(
        role_id = %request.role_id,
        permission_id = %request.permission_id,
        admin_id = %ctx.user_id,
        "Permission removed from role"
    );
    Ok(Json(ApiResponse::message("Permission removed from role")))
}

// ─────────────────────────────────────────────────────────────────────────────
// User roles
// ─────────────────────────────────────────────────────────────────────────────

async fn assign_role(
    State(state): State<AppState>,
    ctx: AuthContext,
    payload: Result<Json<UserRoleRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(request) = payload?;
    state
        .rbac
        .assign_role_to_user(request.user_id, request.role_id)
        .await?;
    info!(
        user_id = %request.user_id,
        role_id = %request.role_id,
        admin_id = %ctx.user_id,
        "Role assigned to user"
    );
    Ok(Json(ApiResponse::message("Role assigned to user")))
}

async fn remove_role(
    State(state): State<AppState>,
    ctx: AuthContext,
    payload: Result<Json<UserRoleRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(request) = payload?;
    state
        .rbac
        .remove_role_from_user(request.user_id, request.role_id)
        .await?;
    info!(
        user_id = %request.user_id,
        role_id = %request.role_id,
        admin_id = %ctx.user_id,
        "Role removed from user"
    );
    Ok(Json(ApiResponse::message("Role removed from user")))
}

async fn user_roles(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(ApiResponse::success(state.rbac.get_roles_for_user(id).await?)))
}

/// What a token minted now would carry.
async fn user_permissions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let permissions = state.resolver.resolve_permissions(id).await?;
    Ok(Json(ApiResponse::success(permissions)))
}
