//! Public types for the lectures API
use serde::{Deserialize, Serialize};

use crate::ai::chat::DisplayTurn;
use crate::lecture::LectureTopic;

#[derive(Serialize)]
pub struct LectureSummary {
    pub slug: &'static str,
    pub title: &'static str,
}

impl From<LectureTopic> for LectureSummary {
    fn from(topic: LectureTopic) -> Self {
        Self {
            slug: topic.slug(),
            title: topic.title(),
        }
    }
}

#[derive(Serialize)]
pub struct LecturesResponse {
    pub lectures: Vec<LectureSummary>,
}

#[derive(Deserialize)]
pub struct TrajectoryParams {
    #[serde(default = "default_v0")]
    pub v0: f64,
    #[serde(default = "default_angle")]
    pub angle: f64,
}

fn default_v0() -> f64 {
    50.0
}

fn default_angle() -> f64 {
    45.0
}

#[derive(Deserialize)]
pub struct NormalAccelerationParams {
    #[serde(default = "default_speed")]
    pub speed: f64,
    #[serde(default = "default_radius")]
    pub radius: f64,
}

fn default_speed() -> f64 {
    10.0
}

fn default_radius() -> f64 {
    20.0
}

#[derive(Deserialize)]
pub struct PolarBasisParams {
    #[serde(default = "default_r")]
    pub r: f64,
    #[serde(default = "default_theta")]
    pub theta: f64,
}

fn default_r() -> f64 {
    10.0
}

fn default_theta() -> f64 {
    30.0
}

#[derive(Serialize)]
pub struct NormalAccelerationResponse {
    pub speed: f64,
    pub radius: f64,
    pub normal_acceleration: f64,
}

#[derive(Serialize)]
pub struct LectureChatResponse {
    pub lecture: LectureSummary,
    pub transcript: Vec<DisplayTurn>,
}

#[derive(Serialize)]
pub struct LectureTurnResponse {
    pub reply: String,
}
