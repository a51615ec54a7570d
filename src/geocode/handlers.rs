use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tracing::{info, instrument};

use crate::{
    error::ApiError,
    geocode::repo::{self, District, Upazila},
    state::AppState,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub message: String,
    pub inserted_count: u64,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/upload-districts", post(upload_districts))
        .route("/upload-upazilas", post(upload_upazilas))
        .route("/geocode/districts", get(get_districts))
        .route("/geocode/upazilas", get(get_upazilas))
}

/// Bulk bodies must be a non-empty JSON array; anything else is a plain
/// 400 rather than the extractor's 422.
fn require_rows<T>(payload: Result<Json<Vec<T>>, JsonRejection>) -> Result<Vec<T>, ApiError> {
    let Json(rows) = payload.map_err(|_| ApiError::validation("Invalid or empty data"))?;
    if rows.is_empty() {
        return Err(ApiError::validation("Invalid or empty data"));
    }
    Ok(rows)
}

#[instrument(skip(state, payload))]
pub async fn upload_districts(
    State(state): State<AppState>,
    payload: Result<Json<Vec<District>>, JsonRejection>,
) -> Result<(StatusCode, Json<UploadResponse>), ApiError> {
    let payload = require_rows(payload)?;
    let inserted_count = repo::insert_districts(&state.db, &payload).await?;
    info!(inserted_count, "districts uploaded");
    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            message: "Districts uploaded successfully".into(),
            inserted_count,
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn upload_upazilas(
    State(state): State<AppState>,
    payload: Result<Json<Vec<Upazila>>, JsonRejection>,
) -> Result<(StatusCode, Json<UploadResponse>), ApiError> {
    let payload = require_rows(payload)?;
    let inserted_count = repo::insert_upazilas(&state.db, &payload).await?;
    info!(inserted_count, "upazilas uploaded");
    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            message: "Upazilas uploaded successfully".into(),
            inserted_count,
        }),
    ))
}

#[instrument(skip(state))]
pub async fn get_districts(
    State(state): State<AppState>,
) -> Result<Json<Vec<District>>, ApiError> {
    Ok(Json(repo::list_districts(&state.db).await?))
}

#[instrument(skip(state))]
pub async fn get_upazilas(State(state): State<AppState>) -> Result<Json<Vec<Upazila>>, ApiError> {
    Ok(Json(repo::list_upazilas(&state.db).await?))
}
