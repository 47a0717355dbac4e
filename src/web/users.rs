use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::extract::{ApiJson, AuthUser};
use super::server::AppState;
use crate::error::Result;
use crate::models::{InsertResult, NewUser, Role, UpdateResult, User};

#[derive(Deserialize)]
pub struct RoleRequest {
    pub role: Role,
}

/// Answer of the role checks; the field is `admin` for every role
#[derive(Debug, Serialize)]
pub struct RoleFlag {
    pub admin: bool,
}

/// GET /users
pub async fn list_users(State(state): State<AppState>) -> Json<Vec<User>> {
    Json(state.users.list().await)
}

/// POST /users
pub async fn create_user(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<NewUser>,
) -> Result<Json<InsertResult>> {
    Ok(Json(state.users.create(req).await?))
}

/// PUT /users/:id/role
pub async fn set_role(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    ApiJson(req): ApiJson<RoleRequest>,
) -> Result<Json<UpdateResult>> {
    Ok(Json(state.users.set_role(&user_id, req.role).await?))
}

/// Callers may only ask about themselves; a mismatch answers `false` without a lookup
async fn role_flag(state: &AppState, caller: &AuthUser, email: &str, role: Role) -> RoleFlag {
    if caller.email() != email {
        warn!("{} asked for the {:?} flag of {}", caller.email(), role, email);
        return RoleFlag { admin: false };
    }

    RoleFlag {
        admin: state.users.has_role(email, role).await,
    }
}

/// GET /users/admin/:email
pub async fn is_admin(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(email): Path<String>,
) -> Json<RoleFlag> {
    Json(role_flag(&state, &caller, &email, Role::Admin).await)
}

/// GET /users/instructor/:email
pub async fn is_instructor(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(email): Path<String>,
) -> Json<RoleFlag> {
    Json(role_flag(&state, &caller, &email, Role::Instructor).await)
}

/// GET /users/student/:email
pub async fn is_student(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(email): Path<String>,
) -> Json<RoleFlag> {
    Json(role_flag(&state, &caller, &email, Role::Student).await)
}
