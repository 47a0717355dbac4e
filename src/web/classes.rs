use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

use super::extract::{ApiJson, AuthUser};
use super::server::AppState;
use crate::error::Result;
use crate::managers::class_catalog::POPULAR_LIMIT;
use crate::models::{ClassOffering, ClassStatus, InsertResult, NewClass, UpdateClassRequest, UpdateResult};

#[derive(Deserialize)]
pub struct StatusRequest {
    pub status: ClassStatus,
}

#[derive(Deserialize)]
pub struct FeedbackRequest {
    pub feedback: String,
}

/// GET /classes
pub async fn list_classes(State(state): State<AppState>) -> Json<Vec<ClassOffering>> {
    Json(state.catalog.list_all().await)
}

/// GET /approveclasses
pub async fn list_approved(State(state): State<AppState>) -> Json<Vec<ClassOffering>> {
    Json(state.catalog.list_approved().await)
}

/// GET /popular-classes
pub async fn list_popular(State(state): State<AppState>) -> Json<Vec<ClassOffering>> {
    Json(state.catalog.list_popular(POPULAR_LIMIT).await)
}

/// GET /instructor-classes - Classes taught by the caller
pub async fn list_instructor_classes(
    State(state): State<AppState>,
    caller: AuthUser,
) -> Json<Vec<ClassOffering>> {
    Json(state.catalog.list_by_instructor(caller.email()).await)
}

/// GET /classes/:id
pub async fn get_class(
    State(state): State<AppState>,
    Path(class_id): Path<String>,
) -> Result<Json<ClassOffering>> {
    Ok(Json(state.catalog.get(&class_id).await?))
}

/// POST /classes
pub async fn create_class(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<NewClass>,
) -> Result<Json<InsertResult>> {
    Ok(Json(state.catalog.create(req).await?))
}

/// PUT /classes/:id
pub async fn update_class(
    State(state): State<AppState>,
    Path(class_id): Path<String>,
    ApiJson(req): ApiJson<UpdateClassRequest>,
) -> Result<Json<UpdateResult>> {
    Ok(Json(state.catalog.update(&class_id, req).await?))
}

/// PUT /classes/:id/feedback
pub async fn set_feedback(
    State(state): State<AppState>,
    Path(class_id): Path<String>,
    ApiJson(req): ApiJson<FeedbackRequest>,
) -> Result<Json<UpdateResult>> {
    Ok(Json(state.catalog.set_feedback(&class_id, &req.feedback).await?))
}

/// PUT /manageclasses/:classId
pub async fn set_status(
    State(state): State<AppState>,
    Path(class_id): Path<String>,
    ApiJson(req): ApiJson<StatusRequest>,
) -> Result<Json<UpdateResult>> {
    Ok(Json(state.catalog.set_status(&class_id, req.status).await?))
}
