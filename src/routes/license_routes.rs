//! License routes

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::license_controller::LicenseController;
use crate::dto::license_dto::{
    CreateLicenseRequest, LicenseEnvelope, LicenseResponse, UpdateLicenseRequest,
};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_license_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_licenses).post(create_license))
        .route("/:id", put(update_license).delete(delete_license))
}

async fn list_licenses(
    State(state): State<AppState>,
) -> Result<Json<Vec<LicenseResponse>>, AppError> {
    let controller = LicenseController::new(state.pool.clone());
    let response = controller.list().await?;
    Ok(Json(response))
}

async fn create_license(
    State(state): State<AppState>,
    Json(request): Json<CreateLicenseRequest>,
) -> Result<(StatusCode, Json<LicenseEnvelope>), AppError> {
    let controller = LicenseController::new(state.pool.clone());
    let response = controller.create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn update_license(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateLicenseRequest>,
) -> Result<Json<LicenseEnvelope>, AppError> {
    let controller = LicenseController::new(state.pool.clone());
    let response = controller.update(id, request).await?;
    Ok(Json(response))
}

async fn delete_license(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let controller = LicenseController::new(state.pool.clone());
    controller.delete(id).await?;
    Ok(Json(serde_json::json!({ "message": "License deleted" })))
}
