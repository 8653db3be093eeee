use axum::{
    extract::{Path, State},
    routing::{patch, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use horn_core::model::{InquiryData, Passenger, PassengerUpdate, TripUpdate};
use horn_inquiry::wizard::{InquirySession, Step, WizardError};

use crate::error::AppError;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub session_id: Uuid,
    pub step: Step,
    pub step_ordinal: u8,
    pub data: InquiryData,
}

impl SessionResponse {
    fn of(session: &InquirySession) -> Self {
        Self {
            session_id: session.id,
            step: session.step,
            step_ordinal: session.step.ordinal(),
            data: session.data.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub reference: String,
    pub submitted_at: DateTime<Utc>,
    pub step: Step,
    /// mailto URI for the visitor's mail client; absent when the email
    /// pipeline soft-failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mailto: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/inquiries/session", post(create_session))
        .route(
            "/v1/inquiries/session/{id}",
            axum::routing::get(get_session),
        )
        .route("/v1/inquiries/session/{id}/trip", patch(update_trip))
        .route(
            "/v1/inquiries/session/{id}/passengers",
            post(add_passenger),
        )
        .route(
            "/v1/inquiries/session/{id}/passengers/{pid}",
            patch(update_passenger).delete(remove_passenger),
        )
        .route("/v1/inquiries/session/{id}/next", post(advance))
        .route("/v1/inquiries/session/{id}/back", post(go_back))
        .route("/v1/inquiries/session/{id}/restart", post(restart))
        .route("/v1/inquiries/session/{id}/submit", post(submit))
}

// ============================================================================
// Session Handlers
// ============================================================================

/// POST /v1/inquiries/session
async fn create_session(State(state): State<AppState>) -> Json<SessionResponse> {
    let session = InquirySession::new();
    let response = SessionResponse::of(&session);
    state.sessions.write().await.insert(session.id, session);
    Json(response)
}

/// GET /v1/inquiries/session/{id}
async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    let sessions = state.sessions.read().await;
    let session = sessions
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("Session not found: {}", id)))?;
    Ok(Json(SessionResponse::of(session)))
}

/// PATCH /v1/inquiries/session/{id}/trip
async fn update_trip(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<TripUpdate>,
) -> Result<Json<SessionResponse>, AppError> {
    with_session(&state, id, |session| {
        session.update_trip(update)?;
        Ok(SessionResponse::of(session))
    })
    .await
    .map(Json)
}

/// POST /v1/inquiries/session/{id}/passengers
async fn add_passenger(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Passenger>, AppError> {
    with_session(&state, id, |session| Ok(session.add_passenger()?))
        .await
        .map(Json)
}

/// PATCH /v1/inquiries/session/{id}/passengers/{pid}
async fn update_passenger(
    State(state): State<AppState>,
    Path((id, pid)): Path<(Uuid, String)>,
    Json(update): Json<PassengerUpdate>,
) -> Result<Json<SessionResponse>, AppError> {
    with_session(&state, id, |session| {
        session.update_passenger(&pid, update)?;
        Ok(SessionResponse::of(session))
    })
    .await
    .map(Json)
}

/// DELETE /v1/inquiries/session/{id}/passengers/{pid}
async fn remove_passenger(
    State(state): State<AppState>,
    Path((id, pid)): Path<(Uuid, String)>,
) -> Result<Json<SessionResponse>, AppError> {
    with_session(&state, id, |session| {
        session.remove_passenger(&pid)?;
        Ok(SessionResponse::of(session))
    })
    .await
    .map(Json)
}

/// POST /v1/inquiries/session/{id}/next
async fn advance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    with_session(&state, id, |session| {
        session.next()?;
        Ok(SessionResponse::of(session))
    })
    .await
    .map(Json)
}

/// POST /v1/inquiries/session/{id}/back
async fn go_back(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    with_session(&state, id, |session| {
        session.back()?;
        Ok(SessionResponse::of(session))
    })
    .await
    .map(Json)
}

/// POST /v1/inquiries/session/{id}/restart
async fn restart(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    with_session(&state, id, |session| {
        session.restart()?;
        Ok(SessionResponse::of(session))
    })
    .await
    .map(Json)
}

/// POST /v1/inquiries/session/{id}/submit
///
/// Persists the inquiry, runs the email pipeline, and moves the session to
/// Confirmation. A failed email is reported as a warning, not an error —
/// the record is already stored by then.
async fn submit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SubmitResponse>, AppError> {
    // Snapshot under the read lock; the slow submission work runs without
    // holding the session map.
    let data = {
        let sessions = state.sessions.read().await;
        let session = sessions
            .get(&id)
            .ok_or_else(|| AppError::NotFound(format!("Session not found: {}", id)))?;
        if session.step != Step::PassengerInfo {
            return Err(WizardError::InvalidTransition {
                from: session.step,
                to: Step::Confirmation,
            }
            .into());
        }
        session.data.clone()
    };

    let receipt = state.orchestrator.submit(data).await?;

    let step = {
        let mut sessions = state.sessions.write().await;
        let session = sessions
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Session not found: {}", id)))?;
        session.confirm()?
    };

    Ok(Json(SubmitResponse {
        reference: receipt.record.id,
        submitted_at: receipt.record.submitted_at,
        step,
        mailto: receipt.handoff.map(|handoff| handoff.mailto_uri()),
        warning: receipt.warning,
    }))
}

async fn with_session<T>(
    state: &AppState,
    id: Uuid,
    f: impl FnOnce(&mut InquirySession) -> Result<T, WizardError>,
) -> Result<T, AppError> {
    let mut sessions = state.sessions.write().await;
    let session = sessions
        .get_mut(&id)
        .ok_or_else(|| AppError::NotFound(format!("Session not found: {}", id)))?;
    f(session).map_err(AppError::from)
}
