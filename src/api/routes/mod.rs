//! API routes module

pub mod lectures;
pub mod practice;
pub mod problems;
pub mod sessions;

use std::sync::{Arc, RwLock};

use crate::api::state::AppState;
use axum::Router;

type SharedState = Arc<RwLock<AppState>>;

/// Create the combined API router
pub fn router() -> Router<SharedState> {
    Router::new()
        // Problem catalog
        .nest("/problems", problems::router())
        // Lecture topics and visualization data
        .nest("/lectures", lectures::router())
        // Per-learner routes: identity, page flow, problem and lecture chats
        .nest(
            "/sessions",
            sessions::router()
                .merge(practice::router())
                .merge(lectures::session_router()),
        )
}
