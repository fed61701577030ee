use std::env;

use crate::grading::DEFAULT_TOLERANCE;

/// Sessions untouched for this long are dropped.
pub const DEFAULT_SESSION_IDLE_MINUTES: i64 = 120;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub problems_path: String,
    pub static_path: String,
    pub openai_model: String,
    pub openai_api_hostname: String,
    pub openai_api_key: String,
    pub tolerance: f64,
    pub mail_relay_url: Option<String>,
    pub email_sender: String,
    pub email_receiver: String,
    pub session_idle_minutes: i64,
}

impl Default for AppConfig {
    fn default() -> Self {
        let storage_path = env::var("TUTOR_STORAGE_PATH").unwrap_or("./".to_string());
        let problems_path = env::var("TUTOR_PROBLEMS_PATH")
            .unwrap_or_else(|_| format!("{}/problems.json", storage_path));
        let static_path =
            env::var("TUTOR_STATIC_PATH").unwrap_or_else(|_| format!("{}/web-ui", storage_path));
        let openai_api_hostname = env::var("TUTOR_LLM_HOST")
            .unwrap_or_else(|_| "https://api.openai.com".to_string());
        let openai_api_key =
            env::var("TUTOR_LLM_API_KEY").unwrap_or_else(|_| "thiswontworkforopenai".to_string());
        let openai_model =
            env::var("TUTOR_LLM_MODEL").unwrap_or_else(|_| "gpt-4.1-mini".to_string());
        let tolerance = env::var("TUTOR_TOLERANCE")
            .ok()
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|v| v.is_finite() && *v > 0.0)
            .unwrap_or(DEFAULT_TOLERANCE);
        // Reports are only logged when no relay is set
        let mail_relay_url = env::var("TUTOR_MAIL_RELAY_URL").ok();
        let email_sender =
            env::var("TUTOR_EMAIL_SENDER").unwrap_or_else(|_| "tutor@localhost".to_string());
        let email_receiver =
            env::var("TUTOR_EMAIL_RECEIVER").unwrap_or_else(|_| "instructor@localhost".to_string());
        let session_idle_minutes = env::var("TUTOR_SESSION_IDLE_MINUTES")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_SESSION_IDLE_MINUTES);

        Self {
            problems_path,
            static_path,
            openai_api_hostname,
            openai_api_key,
            openai_model,
            tolerance,
            mail_relay_url,
            email_sender,
            email_receiver,
            session_idle_minutes,
        }
    }
}
