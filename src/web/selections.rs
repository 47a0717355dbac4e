use axum::{
    extract::{Path, State},
    Json,
};

use super::extract::{ApiJson, AuthUser};
use super::server::AppState;
use crate::error::Result;
use crate::models::{DeleteResult, InsertResult, NewSelection, Selection};

/// GET /select - The caller's own pending selections
pub async fn list_selections(State(state): State<AppState>, caller: AuthUser) -> Json<Vec<Selection>> {
    Json(state.selections.list_for_user(caller.email()).await)
}

/// POST /select
pub async fn add_selection(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<NewSelection>,
) -> Result<Json<InsertResult>> {
    Ok(Json(state.selections.add(req).await?))
}

/// DELETE /select/:id
pub async fn remove_selection(
    State(state): State<AppState>,
    Path(selection_id): Path<String>,
) -> Result<Json<DeleteResult>> {
    Ok(Json(state.selections.remove(&selection_id).await?))
}
