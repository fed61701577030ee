//! Grades a finished session and writes the instructor's report. Both
//! calls degrade instead of failing so a flaky LLM never loses a
//! student's submission.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::json;

use crate::ai::chat::ChatBuilder;
use crate::ai::prompt::{Prompt, render};
use crate::core::AppConfig;
use crate::grading::Progress;
use crate::openai::{Message, Role};

pub const MAX_SCORE: u8 = 10;

static SCORE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("Invalid score regex"));

/// First integer in `text` clamped to 0..=10, or 0 when there is none.
pub fn parse_score(text: &str) -> u8 {
    SCORE_RE
        .find(text)
        .map(|m| m.as_str().parse::<u64>().unwrap_or(u64::MAX))
        .map_or(0, |score| score.min(MAX_SCORE as u64) as u8)
}

async fn ask(
    config: &AppConfig,
    system_msg: &str,
    prompt: &str,
    max_tokens: Option<u32>,
) -> anyhow::Result<String> {
    let mut builder = ChatBuilder::new(
        &config.openai_api_hostname,
        &config.openai_api_key,
        &config.openai_model,
    )
    .transcript(crate::ai::chat::Transcript::new_with_messages(vec![
        Message::new(Role::System, system_msg),
    ]));
    if let Some(max_tokens) = max_tokens {
        builder = builder.max_tokens(max_tokens);
    }
    let mut chat = builder.build();
    let reply = chat.next_msg(Message::new(Role::User, prompt)).await?;
    Ok(reply.text().to_string())
}

/// Scores the student's understanding from 0 to 10.
pub async fn evaluate_understanding_score(config: &AppConfig, history: &str) -> u8 {
    let result = async {
        let instruction = render(Prompt::Evaluator, &json!({}))?;
        ask(
            config,
            &instruction,
            &format!("Chat history to evaluate:\n{}", history),
            Some(16),
        )
        .await
    }
    .await;

    match result {
        Ok(text) => parse_score(&text),
        Err(e) => {
            tracing::warn!("Scoring failed, defaulting to 0: {}", e);
            0
        }
    }
}

/// Writes the narrative report. Falls back to an explanation of the
/// failure so there is always something to send.
pub async fn write_report(
    config: &AppConfig,
    user_name: &str,
    topic: &str,
    score: u8,
    progress: Option<Progress>,
    history: &str,
) -> String {
    let progress = progress.map(|p| format!("{}/{}", p.satisfied, p.total));
    let result = async {
        let instruction = render(Prompt::ReportInstruction, &json!({ "score": score }))?;
        let prompt = render(
            Prompt::ReportRequest,
            &json!({
                "user_name": user_name,
                "topic": topic,
                "score": score,
                "progress": progress,
                "transcript": history,
            }),
        )?;
        ask(config, &instruction, &prompt, Some(800)).await
    }
    .await;

    result.unwrap_or_else(|e| {
        tracing::error!("Report generation failed: {}", e);
        format!("Analysis failed: {}", e)
    })
}
