use anyhow::{Error, Result};

use super::models::Transcript;
use crate::openai::{CompletionOptions, Message, chat};

/// A stateful chat with an LLM over an OpenAI compatible API. Each
/// call to `next_msg` appends the input and the reply to the
/// transcript.
///
/// Use `ChatBuilder::new()` to construct a valid `Chat`.
pub struct Chat {
    api_hostname: String,
    api_key: String,
    model: String,
    options: CompletionOptions,
    transcript: Transcript,
}

impl Chat {
    /// Runs the next turn in chat and returns the assistant's reply.
    /// The transcript is only updated when the LLM call succeeds so a
    /// failed turn can be retried.
    pub async fn next_msg(&mut self, msg: Message) -> Result<Message, Error> {
        let mut history = self.transcript.messages();
        history.push(msg.clone());

        let reply = chat(
            &history,
            self.options,
            &self.api_hostname,
            &self.api_key,
            &self.model,
        )
        .await?;

        self.transcript.push(msg);
        self.transcript.push(reply.clone());
        Ok(reply)
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn into_transcript(self) -> Transcript {
        self.transcript
    }
}

#[derive(Default)]
pub struct ChatBuilder {
    api_hostname: String,
    api_key: String,
    model: String,
    options: CompletionOptions,
    transcript: Transcript,
}

impl ChatBuilder {
    pub fn new(api_hostname: &str, api_key: &str, model: &str) -> Self {
        Self {
            api_hostname: api_hostname.to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            options: CompletionOptions::default(),
            transcript: Transcript::new(),
        }
    }

    pub fn build(self) -> Chat {
        Chat {
            api_hostname: self.api_hostname,
            api_key: self.api_key,
            model: self.model,
            options: self.options,
            transcript: self.transcript,
        }
    }

    pub fn transcript(mut self, transcript: Transcript) -> Self {
        self.transcript = transcript;
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.options.max_tokens = Some(max_tokens);
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.options.temperature = Some(temperature);
        self
    }
}
