//! Socratic tutor and lecturer agents. Both take a transcript by value
//! and hand back the extended one so callers never hold session state
//! across an LLM call.

use std::collections::BTreeSet;

use anyhow::Result;
use serde_json::json;

use crate::ai::chat::models::with_internal_status;
use crate::ai::chat::{ChatBuilder, Transcript};
use crate::ai::prompt::{PROBLEM_OPENER, Prompt, lecture_opener, render};
use crate::core::{AppConfig, Problem};
use crate::lecture::LectureTopic;
use crate::openai::{Message, Role};

fn chat_builder(config: &AppConfig) -> ChatBuilder {
    let AppConfig {
        openai_api_hostname,
        openai_api_key,
        openai_model,
        ..
    } = config;
    ChatBuilder::new(openai_api_hostname, openai_api_key, openai_model)
}

async fn relay(
    config: &AppConfig,
    transcript: Transcript,
    text: &str,
) -> Result<(Message, Transcript)> {
    let mut chat = chat_builder(config).transcript(transcript).build();
    let reply = chat.next_msg(Message::new(Role::User, text)).await?;
    Ok((reply, chat.into_transcript()))
}

/// A fresh transcript holding only the tutor's system prompt.
pub fn problem_transcript(user_name: &str, problem: &Problem) -> Result<Transcript> {
    let system_msg = render(
        Prompt::SocraticTutor,
        &json!({ "user_name": user_name, "statement": problem.statement }),
    )?;
    Ok(Transcript::new_with_messages(vec![Message::new(
        Role::System,
        &system_msg,
    )]))
}

/// Starts the tutoring conversation for a problem.
pub async fn open_problem_chat(
    config: &AppConfig,
    user_name: &str,
    problem: &Problem,
) -> Result<Transcript> {
    let transcript = problem_transcript(user_name, problem)?;
    let (_, transcript) = relay(config, transcript, PROBLEM_OPENER).await?;
    Ok(transcript)
}

/// Relays a student turn on a problem. Targets the student just found
/// are appended as an internal note so the tutor can move on.
pub async fn problem_turn(
    config: &AppConfig,
    transcript: Transcript,
    user_text: &str,
    newly_solved: &BTreeSet<String>,
) -> Result<(Message, Transcript)> {
    let text = with_internal_status(user_text, newly_solved);
    relay(config, transcript, &text).await
}

pub fn lecture_transcript(topic: LectureTopic) -> Result<Transcript> {
    let system_msg = render(Prompt::Lecturer, &json!({ "topic": topic.title() }))?;
    Ok(Transcript::new_with_messages(vec![Message::new(
        Role::System,
        &system_msg,
    )]))
}

pub async fn open_lecture_chat(config: &AppConfig, topic: LectureTopic) -> Result<Transcript> {
    let transcript = lecture_transcript(topic)?;
    let (_, transcript) = relay(config, transcript, &lecture_opener(topic.title())).await?;
    Ok(transcript)
}

pub async fn lecture_turn(
    config: &AppConfig,
    transcript: Transcript,
    user_text: &str,
) -> Result<(Message, Transcript)> {
    relay(config, transcript, user_text).await
}
