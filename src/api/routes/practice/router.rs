//! Router for working a practice problem: open it, chat with the
//! tutor, submit for a report.

use std::sync::{Arc, RwLock};

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::post,
};

use super::public;
use crate::ai::agents::tutor;
use crate::ai::chat::models::strip_internal_status;
use crate::api::public::{ApiError, bad_request, not_found};
use crate::api::routes::problems::public::ProblemResponse;
use crate::api::state::AppState;
use crate::core::{Problem, TutorSession};
use crate::report::{ReportRequest, analyze_and_send_report};

type SharedState = Arc<RwLock<AppState>>;

fn progress_response(session: &TutorSession, problem: &Problem) -> public::ProgressResponse {
    public::ProgressResponse::new(
        session.problem_progress(problem),
        session.solved(problem).into_iter().collect(),
    )
}

fn problem_chat_response(session: &TutorSession, problem: &Problem) -> public::ProblemChatResponse {
    public::ProblemChatResponse {
        problem: ProblemResponse::from(problem),
        progress: progress_response(session, problem),
        transcript: session
            .problem_chat(&problem.id)
            .map(|t| t.display())
            .unwrap_or_default(),
    }
}

/// Looks up the session and problem, returning the 404 response to
/// send when either is missing.
fn lookup(
    state: &AppState,
    session_id: &str,
    problem_id: &str,
) -> Result<(Problem, String), Response> {
    let problem = state
        .problems
        .get(problem_id)
        .cloned()
        .ok_or_else(|| not_found("Problem", problem_id))?;
    let session = state
        .sessions
        .get(session_id)
        .ok_or_else(|| not_found("Session", session_id))?;
    Ok((problem, session.user_name.clone()))
}

/// Current transcript and progress for a problem
async fn view_problem(
    State(state): State<SharedState>,
    Path((session_id, problem_id)): Path<(String, String)>,
) -> Response {
    let state = state.read().expect("Unable to read share state");
    let (problem, _) = match lookup(&state, &session_id, &problem_id) {
        Ok(found) => found,
        Err(resp) => return resp,
    };
    let session = &state.sessions[&session_id];
    Json(problem_chat_response(session, &problem)).into_response()
}

/// Open a problem. The tutor greets the student the first time it is
/// opened in a session; reopening keeps the conversation and progress.
async fn open_problem(
    State(state): State<SharedState>,
    Path((session_id, problem_id)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let (config, problem, user_name, needs_greeting) = {
        let mut shared_state = state.write().expect("Unable to write share state");
        let (problem, user_name) = match lookup(&shared_state, &session_id, &problem_id) {
            Ok(found) => found,
            Err(resp) => return Ok(resp),
        };
        let config = shared_state.config.clone();
        let Some(session) = shared_state.sessions.get_mut(&session_id) else {
            return Ok(not_found("Session", &session_id));
        };
        session.open_problem(&problem);
        tracing::info!("{} opened problem {}", user_name, problem.id);
        let needs_greeting = session.problem_chat(&problem.id).is_none();
        (config, problem, user_name, needs_greeting)
    };

    if needs_greeting {
        let transcript = tutor::open_problem_chat(&config, &user_name, &problem).await?;
        let mut shared_state = state.write().expect("Unable to write share state");
        if let Some(session) = shared_state.sessions.get_mut(&session_id) {
            if session.problem_chat(&problem.id).is_none() {
                session.set_problem_chat(&problem.id, transcript);
            }
        }
    }

    let shared_state = state.read().expect("Unable to read share state");
    match shared_state.sessions.get(&session_id) {
        Some(session) => Ok(Json(problem_chat_response(session, &problem)).into_response()),
        None => Ok(not_found("Session", &session_id)),
    }
}

/// Check the student's message for answers, then relay it to the tutor
async fn chat_turn(
    State(state): State<SharedState>,
    Path((session_id, problem_id)): Path<(String, String)>,
    Json(payload): Json<public::ChatRequest>,
) -> Result<Response, ApiError> {
    if payload.message.trim().is_empty() {
        return Ok(bad_request("Message must not be empty"));
    }

    let (config, problem, transcript, newly_solved) = {
        let mut shared_state = state.write().expect("Unable to write share state");
        let (problem, user_name) = match lookup(&shared_state, &session_id, &problem_id) {
            Ok(found) => found,
            Err(resp) => return Ok(resp),
        };
        let config = shared_state.config.clone();
        let Some(session) = shared_state.sessions.get_mut(&session_id) else {
            return Ok(not_found("Session", &session_id));
        };
        session.open_problem(&problem);

        let newly_solved = session.record_attempt(&problem, &payload.message);
        if !newly_solved.is_empty() {
            tracing::info!(
                "{} found {:?} on problem {}",
                user_name,
                newly_solved,
                problem.id
            );
        }

        let transcript = match session.problem_chat(&problem.id) {
            Some(transcript) => transcript.clone(),
            None => tutor::problem_transcript(&user_name, &problem)?,
        };
        (config, problem, transcript, newly_solved)
    };

    let (reply, transcript) =
        tutor::problem_turn(&config, transcript, &payload.message, &newly_solved).await?;

    let mut shared_state = state.write().expect("Unable to write share state");
    let Some(session) = shared_state.sessions.get_mut(&session_id) else {
        return Ok(not_found("Session", &session_id));
    };
    session.set_problem_chat(&problem.id, transcript);

    Ok(Json(public::ChatTurnResponse {
        reply: strip_internal_status(reply.text()),
        newly_solved: newly_solved.into_iter().collect(),
        progress: progress_response(session, &problem),
    })
    .into_response())
}

/// End the problem session: grade it, send the report to the
/// instructor and show it to the student
async fn submit(
    State(state): State<SharedState>,
    Path((session_id, problem_id)): Path<(String, String)>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let payload = match public::SubmitRequest::from_body(&body) {
        Ok(payload) => payload,
        Err(e) => return Ok(bad_request(&format!("Invalid submit request: {}", e))),
    };

    let (config, mailer, problem, user_name, transcript, progress) = {
        let shared_state = state.read().expect("Unable to read share state");
        let (problem, user_name) = match lookup(&shared_state, &session_id, &problem_id) {
            Ok(found) => found,
            Err(resp) => return Ok(resp),
        };
        let session = &shared_state.sessions[&session_id];
        (
            shared_state.config.clone(),
            shared_state.mailer.clone(),
            problem.clone(),
            user_name,
            session.problem_chat(&problem.id).cloned(),
            session.problem_progress(&problem),
        )
    };

    let topic = format!("{} (ID: {})", problem.category, problem.id);
    let report = analyze_and_send_report(
        &config,
        &mailer,
        ReportRequest {
            user_name: &user_name,
            topic: &topic,
            transcript: transcript.as_ref(),
            feedback: payload.feedback.as_deref(),
            progress: Some(progress),
        },
    )
    .await;

    let mut shared_state = state.write().expect("Unable to write share state");
    if let Some(session) = shared_state.sessions.get_mut(&session_id) {
        session.finish(report.clone());
    }
    Ok(Json(report).into_response())
}

/// Create the practice router, nested under a session
pub fn router() -> Router<SharedState> {
    Router::new()
        .route(
            "/{session_id}/problems/{problem_id}",
            post(open_problem).get(view_problem),
        )
        .route("/{session_id}/problems/{problem_id}/chat", post(chat_turn))
        .route("/{session_id}/problems/{problem_id}/submit", post(submit))
}
