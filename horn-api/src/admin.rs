use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use horn_core::model::{InquiryRecord, InquiryStatus, PassengerUpdate, TripUpdate};
use horn_core::pii::Sensitive;
use horn_core::search::{search_records, SearchOutcome};
use horn_inquiry::export;

use crate::error::AppError;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: String,
}

#[derive(Debug, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum SearchResponse {
    /// No inquiry matched the reference or phone number.
    NotFound,
    /// Exactly one match; the caller auto-selects it.
    Unique { record: InquiryRecord },
    /// Several matches for the caller to disambiguate.
    Multiple { records: Vec<InquiryRecord> },
}

/// Edit payload for a stored record: a trip-level patch plus per-passenger
/// patches, applied through the typed update methods.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecordEditRequest {
    pub trip: TripUpdate,
    pub passengers: Vec<PassengerEdit>,
}

#[derive(Debug, Deserialize)]
pub struct PassengerEdit {
    pub id: String,
    #[serde(flatten)]
    pub update: PassengerUpdate,
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: InquiryStatus,
}

#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub imported: usize,
    pub total: usize,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/admin/inquiries", get(list_inquiries))
        .route("/v1/admin/inquiries/search", get(search_inquiries))
        .route(
            "/v1/admin/inquiries/{id}",
            get(get_inquiry).put(edit_inquiry).delete(delete_inquiry),
        )
        .route("/v1/admin/inquiries/{id}/status", post(set_status))
        .route("/v1/admin/export/json", get(export_json))
        .route("/v1/admin/export/csv", get(export_csv))
        .route("/v1/admin/import", post(import_backup))
}

// ============================================================================
// Record Handlers
// ============================================================================

/// GET /v1/admin/inquiries
async fn list_inquiries(
    State(state): State<AppState>,
) -> Result<Json<Vec<InquiryRecord>>, AppError> {
    Ok(Json(state.repo.load().await?))
}

/// GET /v1/admin/inquiries/{id}
async fn get_inquiry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<InquiryRecord>, AppError> {
    let records = state.repo.load().await?;
    let record = records
        .into_iter()
        .find(|record| record.id == id)
        .ok_or_else(|| AppError::NotFound(format!("Inquiry not found: {}", id)))?;
    Ok(Json(record))
}

/// DELETE /v1/admin/inquiries/{id}
async fn delete_inquiry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.repo.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /v1/admin/inquiries/{id}
async fn edit_inquiry(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(edit): Json<RecordEditRequest>,
) -> Result<Json<InquiryRecord>, AppError> {
    let records = state.repo.load().await?;
    let mut record = records
        .into_iter()
        .find(|record| record.id == id)
        .ok_or_else(|| AppError::NotFound(format!("Inquiry not found: {}", id)))?;

    record.data.apply_trip_update(edit.trip)?;
    for passenger in edit.passengers {
        record
            .data
            .apply_passenger_update(&passenger.id, passenger.update)?;
    }

    state.repo.update(record.clone()).await?;
    Ok(Json(record))
}

/// POST /v1/admin/inquiries/{id}/status
async fn set_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<StatusRequest>,
) -> Result<Json<InquiryRecord>, AppError> {
    let records = state.repo.load().await?;
    let mut record = records
        .into_iter()
        .find(|record| record.id == id)
        .ok_or_else(|| AppError::NotFound(format!("Inquiry not found: {}", id)))?;

    record.status = record.status.transition(req.status)?;
    state.repo.update(record.clone()).await?;
    Ok(Json(record))
}

/// GET /v1/admin/inquiries/search?q=...
async fn search_inquiries(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, AppError> {
    // The query is usually a phone number; keep it out of the logs.
    tracing::info!(query = %Sensitive(&params.q), "admin inquiry lookup");

    let records = state.repo.load().await?;
    let response = match search_records(&records, &params.q) {
        SearchOutcome::NotFound => SearchResponse::NotFound,
        SearchOutcome::Unique(record) => SearchResponse::Unique { record },
        SearchOutcome::Multiple(records) => SearchResponse::Multiple { records },
    };
    Ok(Json(response))
}

// ============================================================================
// Backup Handlers
// ============================================================================

/// GET /v1/admin/export/json
async fn export_json(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let records = state.repo.load().await?;
    let body = export::export_json(&records).map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(([(header::CONTENT_TYPE, "application/json")], body))
}

/// GET /v1/admin/export/csv
async fn export_csv(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let records = state.repo.load().await?;
    let body = export::export_csv(&records);
    Ok(([(header::CONTENT_TYPE, "text/csv; charset=utf-8")], body))
}

/// POST /v1/admin/import — body is the raw backup file content.
async fn import_backup(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<ImportResponse>, AppError> {
    let candidates = export::parse_backup(&body)?;
    let imported = state.repo.import_merge(candidates).await?;
    let total = state.repo.load().await?.len();

    tracing::info!(imported, total, "backup imported");
    Ok(Json(ImportResponse { imported, total }))
}
