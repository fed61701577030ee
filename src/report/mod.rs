//! End-of-session reporting: score the conversation, write it up and
//! send it to the instructor.
pub mod mailer;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::ai::agents::evaluator::{evaluate_understanding_score, write_report};
use crate::ai::chat::Transcript;
use crate::core::AppConfig;
use crate::grading::Progress;
pub use mailer::{Email, HttpMailer, LogMailer, ReportMailer, SharedMailer, mailer_from_config};

pub const FEEDBACK_MARKER: &str = "--- STUDENT FEEDBACK ---";

#[derive(Clone, Debug, Serialize)]
pub struct Report {
    pub topic: String,
    pub score: u8,
    pub subject: String,
    pub body: String,
    pub delivered: bool,
    pub created_at: DateTime<Utc>,
}

/// What gets graded: the conversation plus the student's optional
/// closing feedback.
pub fn session_text(transcript: Option<&Transcript>, feedback: Option<&str>) -> String {
    let mut out = transcript.map(Transcript::to_report_text).unwrap_or_default();
    if let Some(feedback) = feedback.map(str::trim).filter(|f| !f.is_empty()) {
        out.push_str(&format!("\n{}\n{}\n", FEEDBACK_MARKER, feedback));
    }
    out
}

pub fn subject(user_name: &str, topic: &str, score: u8) -> String {
    format!("Eng. Tutor ({}): {} [Score: {}/10]", user_name, topic, score)
}

pub struct ReportRequest<'a> {
    pub user_name: &'a str,
    pub topic: &'a str,
    pub transcript: Option<&'a Transcript>,
    pub feedback: Option<&'a str>,
    pub progress: Option<Progress>,
}

/// Scores the session, writes the report and hands it to `mailer`.
/// Delivery failures are logged and reflected in `delivered`, they
/// never lose the report itself.
pub async fn analyze_and_send_report(
    config: &AppConfig,
    mailer: &SharedMailer,
    request: ReportRequest<'_>,
) -> Report {
    let history = session_text(request.transcript, request.feedback);
    let score = evaluate_understanding_score(config, &history).await;
    let body = write_report(
        config,
        request.user_name,
        request.topic,
        score,
        request.progress,
        &history,
    )
    .await;

    let email = Email {
        from: config.email_sender.clone(),
        to: config.email_receiver.clone(),
        subject: subject(request.user_name, request.topic, score),
        body,
    };
    let delivered = match mailer.send(&email).await {
        Ok(()) => true,
        Err(e) => {
            tracing::error!("Failed to deliver report '{}': {}", email.subject, e);
            false
        }
    };

    Report {
        topic: request.topic.to_string(),
        score,
        subject: email.subject,
        body: email.body,
        delivered,
        created_at: Utc::now(),
    }
}
