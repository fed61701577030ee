//! Router for the sessions API. A session starts once the learner has
//! identified themselves and ends when they sign out or go idle.

use std::sync::{Arc, RwLock};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};

use super::public;
use crate::api::public::{bad_request, not_found};
use crate::api::state::AppState;
use crate::core::{SessionView, TutorSession};

type SharedState = Arc<RwLock<AppState>>;

/// Identify the learner and start a new session
async fn create_session(
    State(state): State<SharedState>,
    Json(payload): Json<public::CreateSessionRequest>,
) -> Response {
    let mut state = state.write().expect("Unable to write share state");
    let session = match TutorSession::new(&payload.user_name, state.config.tolerance) {
        Ok(session) => session,
        Err(e) => return bad_request(&e.to_string()),
    };
    tracing::info!("Session {} started for {}", session.id, session.user_name);

    let view = SessionView::from(&session);
    state.sessions.insert(session.id.clone(), session);
    Json(view).into_response()
}

async fn get_session(State(state): State<SharedState>, Path(session_id): Path<String>) -> Response {
    let mut state = state.write().expect("Unable to write share state");
    match state.sessions.get_mut(&session_id) {
        Some(session) => {
            session.touch();
            Json(SessionView::from(&*session)).into_response()
        }
        None => not_found("Session", &session_id),
    }
}

/// Sign out. Everything the session accumulated is discarded.
async fn end_session(
    State(state): State<SharedState>,
    Path(session_id): Path<String>,
) -> Response {
    let mut state = state.write().expect("Unable to write share state");
    match state.end_session(&session_id) {
        Some(session) => {
            tracing::info!("Session {} ended for {}", session.id, session.user_name);
            StatusCode::NO_CONTENT.into_response()
        }
        None => not_found("Session", &session_id),
    }
}

/// Return to the landing page
async fn back_to_menu(
    State(state): State<SharedState>,
    Path(session_id): Path<String>,
) -> Response {
    let mut state = state.write().expect("Unable to write share state");
    match state.sessions.get_mut(&session_id) {
        Some(session) => {
            session.back_to_menu();
            Json(SessionView::from(&*session)).into_response()
        }
        None => not_found("Session", &session_id),
    }
}

/// The most recent report generated in this session
async fn last_report(State(state): State<SharedState>, Path(session_id): Path<String>) -> Response {
    let state = state.read().expect("Unable to read share state");
    match state.sessions.get(&session_id) {
        Some(session) => match &session.last_report {
            Some(report) => Json(report.clone()).into_response(),
            None => not_found("Report for session", &session_id),
        },
        None => not_found("Session", &session_id),
    }
}

/// Create the sessions router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", post(create_session))
        .route("/{session_id}", get(get_session).delete(end_session))
        .route("/{session_id}/menu", post(back_to_menu))
        .route("/{session_id}/report", get(last_report))
}
