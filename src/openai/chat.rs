use anyhow::{Error, Result};

use crate::openai::{CompletionOptions, Message, Role, completion, completion_content};

/// Runs the next turn in chat by passing the history to the LLM and
/// returns the assistant's reply.
pub async fn chat(
    history: &[Message],
    options: CompletionOptions,
    api_hostname: &str,
    api_key: &str,
    model: &str,
) -> Result<Message, Error> {
    let resp = completion(history, options, api_hostname, api_key, model).await?;
    let content = completion_content(&resp)?;
    Ok(Message::new(Role::Assistant, &content))
}
