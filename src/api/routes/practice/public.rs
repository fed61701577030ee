//! Public types for the practice API
use serde::{Deserialize, Serialize};

use crate::ai::chat::DisplayTurn;
use crate::api::routes::problems::public::ProblemResponse;
use crate::grading::Progress;

#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Deserialize, Default)]
pub struct SubmitRequest {
    #[serde(default)]
    pub feedback: Option<String>,
}

impl SubmitRequest {
    /// The body is optional, an empty one means no feedback.
    pub fn from_body(body: &[u8]) -> serde_json::Result<Self> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body)
    }
}

#[derive(Serialize)]
pub struct ProgressResponse {
    pub satisfied: usize,
    pub total: usize,
    pub fraction: f64,
    pub complete: bool,
    pub solved: Vec<String>,
}

impl ProgressResponse {
    pub fn new(progress: Progress, solved: Vec<String>) -> Self {
        Self {
            satisfied: progress.satisfied,
            total: progress.total,
            fraction: progress.fraction(),
            complete: progress.is_complete(),
            solved,
        }
    }
}

#[derive(Serialize)]
pub struct ProblemChatResponse {
    pub problem: ProblemResponse,
    pub progress: ProgressResponse,
    pub transcript: Vec<DisplayTurn>,
}

#[derive(Serialize)]
pub struct ChatTurnResponse {
    pub reply: String,
    pub newly_solved: Vec<String>,
    pub progress: ProgressResponse,
}
