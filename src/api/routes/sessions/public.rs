//! Public types for the sessions API
use serde::Deserialize;

#[derive(Deserialize)]
pub struct CreateSessionRequest {
    pub user_name: String,
}
