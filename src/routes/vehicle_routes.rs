//! Vehicle routes
//!
//! `POST /` and `PUT /:id` accept either a JSON body or multipart form data
//! carrying one `licensePdf` file part next to the payload fields (nested
//! groups travel as JSON-encoded text parts, which is how the browser form
//! submits them). Non-PDF uploads are rejected here, before the record
//! service runs.

use axum::{
    body::Body,
    extract::{DefaultBodyLimit, FromRequest, Multipart, Path, Request, State},
    http::{header, StatusCode},
    response::Response,
    routing::{get, put},
    Json, Router,
};
use serde_json::Value;
use uuid::Uuid;

use crate::controllers::vehicle_controller::VehicleController;
use crate::dto::vehicle_dto::{VehicleEnvelope, VehiclePayload, VehicleResponse};
use crate::models::vehicle::Attachment;
use crate::state::AppState;
use crate::utils::errors::AppError;

const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Uploaded PDFs can exceed the framework's default body limit.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn create_vehicle_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_vehicles).post(create_vehicle))
        .route("/:id", put(update_vehicle).delete(delete_vehicle))
        .route("/:id/license", get(get_vehicle_license))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}

async fn list_vehicles(
    State(state): State<AppState>,
) -> Result<Json<Vec<VehicleResponse>>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    let response = controller.list().await?;
    Ok(Json(response))
}

async fn create_vehicle(
    State(state): State<AppState>,
    request: Request,
) -> Result<(StatusCode, Json<VehicleEnvelope>), AppError> {
    let (payload, attachment) = read_vehicle_request(request).await?;
    let controller = VehicleController::new(state.pool.clone());
    let response = controller.create(payload, attachment).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn update_vehicle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    request: Request,
) -> Result<Json<VehicleEnvelope>, AppError> {
    let (payload, attachment) = read_vehicle_request(request).await?;
    let controller = VehicleController::new(state.pool.clone());
    let response = controller.update(id, payload, attachment).await?;
    Ok(Json(response))
}

async fn delete_vehicle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    controller.delete(id).await?;
    Ok(Json(serde_json::json!({ "message": "Vehicle deleted" })))
}

/// Stream the stored license PDF back for inline display.
async fn get_vehicle_license(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    let attachment = controller.attachment(id).await?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, attachment.content_type.as_str())
        .header(
            header::CONTENT_DISPOSITION,
            format!("inline; filename=\"{}\"", attachment.file_name),
        )
        .body(Body::from(attachment.bytes))
        .map_err(|e| AppError::Internal(format!("Error building attachment response: {}", e)))
}

/// Pull the vehicle payload (and optional upload) out of either body shape.
async fn read_vehicle_request(
    request: Request,
) -> Result<(VehiclePayload, Option<Attachment>), AppError> {
    let is_multipart = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.starts_with("multipart/form-data"))
        .unwrap_or(false);

    if is_multipart {
        let multipart = Multipart::from_request(request, &())
            .await
            .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?;
        read_multipart(multipart).await
    } else {
        let Json(payload) = Json::<VehiclePayload>::from_request(request, &())
            .await
            .map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {}", e)))?;
        Ok((payload, None))
    }
}

async fn read_multipart(
    mut multipart: Multipart,
) -> Result<(VehiclePayload, Option<Attachment>), AppError> {
    let mut fields = serde_json::Map::new();
    let mut attachment = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == "licensePdf" {
            let content_type = field.content_type().unwrap_or("").to_string();
            if content_type != PDF_CONTENT_TYPE {
                return Err(AppError::InvalidAttachment(
                    "licensePdf must be a PDF file".to_string(),
                ));
            }
            let file_name = field.file_name().unwrap_or("license.pdf").to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("Error reading upload: {}", e)))?;

            attachment = Some(Attachment {
                bytes: bytes.to_vec(),
                content_type,
                file_name,
            });
            continue;
        }

        let text = field
            .text()
            .await
            .map_err(|e| AppError::BadRequest(format!("Error reading field {}: {}", name, e)))?;

        // Nested groups arrive as JSON-encoded text parts.
        let value = if matches!(name.as_str(), "brakeInsurance" | "permit" | "tax") {
            if text.trim().is_empty() {
                continue;
            }
            serde_json::from_str::<Value>(&text)
                .map_err(|_| AppError::Validation(format!("{} must be a JSON object", name)))?
        } else {
            Value::String(text)
        };

        fields.insert(name, value);
    }

    let payload = serde_json::from_value(Value::Object(fields))
        .map_err(|e| AppError::BadRequest(format!("Invalid vehicle payload: {}", e)))?;

    Ok((payload, attachment))
}
