//! Router for the interactive lectures

use std::sync::{Arc, RwLock};

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use axum_extra::extract::Query;

use super::public;
use crate::ai::agents::tutor;
use crate::api::public::{ApiError, bad_request, not_found};
use crate::api::routes::practice::public::{ChatRequest, SubmitRequest};
use crate::api::state::AppState;
use crate::core::TutorSession;
use crate::lecture::{
    LectureTopic, PolarBasis, normal_acceleration, polar_basis, projectile_trajectory,
};
use crate::report::{ReportRequest, analyze_and_send_report};

type SharedState = Arc<RwLock<AppState>>;

fn parse_topic(slug: &str) -> Result<LectureTopic, Response> {
    LectureTopic::from_slug(slug).ok_or_else(|| not_found("Lecture", slug))
}

fn lecture_chat_response(session: &TutorSession, topic: LectureTopic) -> public::LectureChatResponse {
    public::LectureChatResponse {
        lecture: topic.into(),
        transcript: session
            .lecture_chat(topic)
            .map(|t| t.display())
            .unwrap_or_default(),
    }
}

async fn list_lectures() -> Json<public::LecturesResponse> {
    Json(public::LecturesResponse {
        lectures: LectureTopic::ALL.into_iter().map(Into::into).collect(),
    })
}

async fn trajectory(
    Query(params): Query<public::TrajectoryParams>,
) -> Json<crate::lecture::Trajectory> {
    Json(projectile_trajectory(params.v0, params.angle))
}

async fn acceleration(Query(params): Query<public::NormalAccelerationParams>) -> Response {
    match normal_acceleration(params.speed, params.radius) {
        Some(normal_acceleration) => Json(public::NormalAccelerationResponse {
            speed: params.speed,
            radius: params.radius,
            normal_acceleration,
        })
        .into_response(),
        None => bad_request("Radius of curvature must be positive"),
    }
}

async fn basis(Query(params): Query<public::PolarBasisParams>) -> Json<PolarBasis> {
    Json(polar_basis(params.r, params.theta))
}

/// Enter a lecture. The professor greets the student unless a
/// conversation is already underway.
async fn open_lecture(
    State(state): State<SharedState>,
    Path((session_id, slug)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let topic = match parse_topic(&slug) {
        Ok(topic) => topic,
        Err(resp) => return Ok(resp),
    };

    let (config, needs_greeting, generation) = {
        let mut shared_state = state.write().expect("Unable to write share state");
        let config = shared_state.config.clone();
        let Some(session) = shared_state.sessions.get_mut(&session_id) else {
            return Ok(not_found("Session", &session_id));
        };
        session.open_lecture(topic);
        (
            config,
            session.lecture_chat(topic).is_none(),
            session.lecture_generation(topic),
        )
    };

    if needs_greeting {
        let transcript = tutor::open_lecture_chat(&config, topic).await?;
        let mut shared_state = state.write().expect("Unable to write share state");
        if let Some(session) = shared_state.sessions.get_mut(&session_id) {
            if session.lecture_chat(topic).is_none() {
                session.set_lecture_chat(topic, generation, transcript);
            }
        }
    }

    let shared_state = state.read().expect("Unable to read share state");
    match shared_state.sessions.get(&session_id) {
        Some(session) => Ok(Json(lecture_chat_response(session, topic)).into_response()),
        None => Ok(not_found("Session", &session_id)),
    }
}

async fn view_lecture(
    State(state): State<SharedState>,
    Path((session_id, slug)): Path<(String, String)>,
) -> Response {
    let topic = match parse_topic(&slug) {
        Ok(topic) => topic,
        Err(resp) => return resp,
    };
    let shared_state = state.read().expect("Unable to read share state");
    match shared_state.sessions.get(&session_id) {
        Some(session) => Json(lecture_chat_response(session, topic)).into_response(),
        None => not_found("Session", &session_id),
    }
}

/// Leave the lecture and go back to the menu. The conversation is
/// discarded.
async fn leave_lecture(
    State(state): State<SharedState>,
    Path((session_id, slug)): Path<(String, String)>,
) -> Response {
    let topic = match parse_topic(&slug) {
        Ok(topic) => topic,
        Err(resp) => return resp,
    };
    let mut shared_state = state.write().expect("Unable to write share state");
    match shared_state.sessions.get_mut(&session_id) {
        Some(session) => {
            session.leave_lecture(topic);
            Json(crate::core::SessionView::from(&*session)).into_response()
        }
        None => not_found("Session", &session_id),
    }
}

async fn lecture_turn(
    State(state): State<SharedState>,
    Path((session_id, slug)): Path<(String, String)>,
    Json(payload): Json<ChatRequest>,
) -> Result<Response, ApiError> {
    let topic = match parse_topic(&slug) {
        Ok(topic) => topic,
        Err(resp) => return Ok(resp),
    };
    if payload.message.trim().is_empty() {
        return Ok(bad_request("Message must not be empty"));
    }

    let (config, transcript, generation) = {
        let mut shared_state = state.write().expect("Unable to write share state");
        let config = shared_state.config.clone();
        let Some(session) = shared_state.sessions.get_mut(&session_id) else {
            return Ok(not_found("Session", &session_id));
        };
        session.open_lecture(topic);
        let transcript = match session.lecture_chat(topic) {
            Some(transcript) => transcript.clone(),
            None => tutor::lecture_transcript(topic)?,
        };
        (config, transcript, session.lecture_generation(topic))
    };

    let (reply, transcript) = tutor::lecture_turn(&config, transcript, &payload.message).await?;

    // Dropped when the learner left the lecture mid-turn
    let mut shared_state = state.write().expect("Unable to write share state");
    if let Some(session) = shared_state.sessions.get_mut(&session_id) {
        session.set_lecture_chat(topic, generation, transcript);
    }
    Ok(Json(public::LectureTurnResponse {
        reply: reply.text().to_string(),
    })
    .into_response())
}

/// Grade the lecture conversation and send the report
async fn submit(
    State(state): State<SharedState>,
    Path((session_id, slug)): Path<(String, String)>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let topic = match parse_topic(&slug) {
        Ok(topic) => topic,
        Err(resp) => return Ok(resp),
    };
    let payload = match SubmitRequest::from_body(&body) {
        Ok(payload) => payload,
        Err(e) => return Ok(bad_request(&format!("Invalid submit request: {}", e))),
    };

    let (config, mailer, user_name, transcript) = {
        let shared_state = state.read().expect("Unable to read share state");
        let Some(session) = shared_state.sessions.get(&session_id) else {
            return Ok(not_found("Session", &session_id));
        };
        (
            shared_state.config.clone(),
            shared_state.mailer.clone(),
            session.user_name.clone(),
            session.lecture_chat(topic).cloned(),
        )
    };

    let report_topic = format!("Lecture: {}", topic.title());
    let report = analyze_and_send_report(
        &config,
        &mailer,
        ReportRequest {
            user_name: &user_name,
            topic: &report_topic,
            transcript: transcript.as_ref(),
            feedback: payload.feedback.as_deref(),
            progress: None,
        },
    )
    .await;

    let mut shared_state = state.write().expect("Unable to write share state");
    if let Some(session) = shared_state.sessions.get_mut(&session_id) {
        session.finish(report.clone());
    }
    Ok(Json(report).into_response())
}

/// Public lecture data
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", get(list_lectures))
        .route("/projectile-motion/trajectory", get(trajectory))
        .route("/normal-tangent/acceleration", get(acceleration))
        .route("/polar-coordinates/basis", get(basis))
}

/// Lecture conversations, nested under a session
pub fn session_router() -> Router<SharedState> {
    Router::new()
        .route(
            "/{session_id}/lectures/{topic}",
            post(open_lecture).get(view_lecture).delete(leave_lecture),
        )
        .route("/{session_id}/lectures/{topic}/chat", post(lecture_turn))
        .route("/{session_id}/lectures/{topic}/submit", post(submit))
}
