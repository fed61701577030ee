//! The core models for managing a stateful chat with an LLM.
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::openai::{Message, Role};

static INTERNAL_STATUS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(Internal Status:.*?\)").expect("Invalid status regex"));

/// Appends a note for the tutor that the student just found `names`.
pub fn with_internal_status<'a, I>(text: &str, names: I) -> String
where
    I: IntoIterator<Item = &'a String>,
{
    let names: Vec<&str> = names.into_iter().map(String::as_str).collect();
    if names.is_empty() {
        return text.to_string();
    }
    format!("{} (Internal Status: student found {})", text, names.join(", "))
}

/// Removes internal status notes so they never reach the student.
pub fn strip_internal_status(text: &str) -> String {
    INTERNAL_STATUS_RE.replace_all(text, "").trim().to_string()
}

/// A single turn as shown to the student.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct DisplayTurn {
    pub role: Role,
    pub text: String,
}

#[derive(Default, Clone, Debug)]
pub struct Transcript(Vec<Message>);

impl Transcript {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn new_with_messages(messages: Vec<Message>) -> Self {
        Self(messages)
    }

    pub fn messages(&self) -> Vec<Message> {
        self.0.clone()
    }

    pub fn push(&mut self, msg: Message) {
        self.0.push(msg)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Student and tutor turns with internal notes stripped. The system
    /// prompt is never shown.
    pub fn display(&self) -> Vec<DisplayTurn> {
        self.iter()
            .filter(|m| m.role != Role::System)
            .map(|m| DisplayTurn {
                role: m.role.clone(),
                text: strip_internal_status(m.text()),
            })
            .collect()
    }

    /// Plain-text rendering used for grading and reports.
    pub fn to_report_text(&self) -> String {
        let mut out = String::new();
        for m in self.iter() {
            let speaker = match m.role {
                Role::Assistant => "Tutor",
                Role::User => "Student",
                Role::System => continue,
            };
            out.push_str(&format!("{}: {}\n", speaker, strip_internal_status(m.text())));
        }
        out
    }
}
