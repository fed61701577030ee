//! Reusable prompts using Handlebars for templating. Strict mode makes
//! a missing field a render error instead of an empty string, and
//! nothing gets HTML-escaped since the output goes to an LLM, not a
//! browser.

use std::fmt;
use std::sync::LazyLock;

use anyhow::Result;
use handlebars::{Handlebars, no_escape};
use serde::Serialize;

#[derive(Debug)]
pub enum Prompt {
    SocraticTutor,
    Lecturer,
    Evaluator,
    ReportInstruction,
    ReportRequest,
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

pub const PROBLEM_OPENER: &str = "Let's start. How should we approach this?";

const SOCRATIC_TUTOR_PROMPT: &str = r"
You are a Socratic tutor for engineering mechanics working with {{user_name}}.

PROBLEM:
{{statement}}

Guide the student with questions. Never give the final numeric answers away.
Student turns may end with a note like (Internal Status: ...) listing the
quantities they just found correctly. Acknowledge that progress and move on
to what is still missing. Never repeat the note itself.
";

const LECTURER_PROMPT: &str = r"
You are a physics professor specializing in {{topic}}. Teach using the
Socratic method and keep it conversational. Ask the student to state the
governing equations in their own words before building on them.
";

const EVALUATOR_PROMPT: &str = r"
You are a strict engineering professor. Evaluate the student's level of
understanding from 0 to 10 based ONLY on the chat history.

SCORING RUBRIC:
0-3: Little to no participation or irrelevant answers.
4-5: Good engagement but NO use of governing equations.
6-8: Conceptual understanding and correct use of the relevant equations.
9-10: Complete mastery, correct equations and a clear explanation of the physics.

If the student never correctly states or applies the relevant equations the
score MUST NOT exceed 5. Output ONLY the integer.
";

const REPORT_INSTRUCTION_PROMPT: &str = r"
You are an academic evaluator. Analyze this engineering tutoring session.
Your report must include:
1. Session Overview
2. Numerical Understanding Score: {{score}}/10
3. Technical Accuracy: did they use the correct equations?
4. Concept Mastery: strengths and gaps
5. Engagement Level
6. Quote the section '--- STUDENT FEEDBACK ---' exactly if present.
";

const REPORT_REQUEST_PROMPT: &str = r"
Student Name: {{user_name}}
Topic: {{topic}}
Assigned Score: {{score}}/10
{{#if progress}}
Targets found: {{progress}}
{{/if}}

DATA:
{{transcript}}

Please format the report professionally for the instructor.
";

pub fn templates<'a>() -> Handlebars<'a> {
    let mut registry = Handlebars::new();
    registry.set_strict_mode(true);
    registry.register_escape_fn(no_escape);
    for (prompt, template) in [
        (Prompt::SocraticTutor, SOCRATIC_TUTOR_PROMPT),
        (Prompt::Lecturer, LECTURER_PROMPT),
        (Prompt::Evaluator, EVALUATOR_PROMPT),
        (Prompt::ReportInstruction, REPORT_INSTRUCTION_PROMPT),
        (Prompt::ReportRequest, REPORT_REQUEST_PROMPT),
    ] {
        registry
            .register_template_string(&prompt.to_string(), template)
            .expect("Failed to register template");
    }
    registry
}

static TEMPLATES: LazyLock<Handlebars<'static>> = LazyLock::new(templates);

pub fn render<T: Serialize>(prompt: Prompt, data: &T) -> Result<String> {
    Ok(TEMPLATES.render(&prompt.to_string(), data)?.trim().to_string())
}

pub fn lecture_opener(topic: &str) -> String {
    format!("Welcome to the {topic} lecture! What would you like to explore first?")
}
