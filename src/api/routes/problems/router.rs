//! Router for the problems API

use std::sync::{Arc, RwLock};

use axum::{
    Json, Router,
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::get,
};

use super::public;
use crate::api::public::not_found;
use crate::api::state::AppState;

type SharedState = Arc<RwLock<AppState>>;

/// List all problems grouped by main category
async fn list_problems(State(state): State<SharedState>) -> Json<public::ProblemsResponse> {
    let problems = state
        .read()
        .expect("Unable to read share state")
        .problems
        .clone();

    let categories = problems
        .categories()
        .into_iter()
        .map(|category| public::CategoryResponse {
            name: category.name.to_string(),
            problems: category
                .problems
                .into_iter()
                .map(public::ProblemSummary::from)
                .collect(),
        })
        .collect();

    Json(public::ProblemsResponse {
        total: problems.len(),
        categories,
    })
}

/// Get a single problem by ID
async fn get_problem(State(state): State<SharedState>, Path(id): Path<String>) -> Response {
    let problems = state
        .read()
        .expect("Unable to read share state")
        .problems
        .clone();

    match problems.get(&id) {
        Some(problem) => Json(public::ProblemResponse::from(problem)).into_response(),
        None => not_found("Problem", &id),
    }
}

/// Create the problems router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", get(list_problems))
        .route("/{id}", get(get_problem))
}
