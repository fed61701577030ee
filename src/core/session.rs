//! Everything one learner accumulates between identifying themselves
//! and closing the tab. Nothing here is shared between sessions.

use std::collections::{BTreeSet, HashMap};

use anyhow::{Result, bail};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::ai::chat::Transcript;
use crate::core::problems::Problem;
use crate::grading::{Progress, ProgressTracker};
use crate::lecture::LectureTopic;
use crate::report::Report;

/// Where the learner currently is in the page flow.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(tag = "page", rename_all = "snake_case")]
pub enum Page {
    Landing,
    Chat { problem_id: String },
    Lecture { topic: LectureTopic },
    ReportView,
}

#[derive(Debug, Clone)]
pub struct TutorSession {
    pub id: String,
    pub user_name: String,
    pub page: Page,
    pub started_at: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    pub last_report: Option<Report>,
    progress: ProgressTracker,
    problem_chats: HashMap<String, Transcript>,
    lecture_chats: HashMap<LectureTopic, Transcript>,
    // Bumped every time the learner leaves a lecture
    lecture_generations: HashMap<LectureTopic, u64>,
}

impl TutorSession {
    /// Starts a session for `user_name`. A name is required since every
    /// report is addressed by it.
    pub fn new(user_name: &str, tolerance: f64) -> Result<Self> {
        let user_name = user_name.trim();
        if user_name.is_empty() {
            bail!("Identification is required for academic reporting");
        }
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            user_name: user_name.to_string(),
            page: Page::Landing,
            started_at: now,
            last_seen: now,
            last_report: None,
            progress: ProgressTracker::new(tolerance),
            problem_chats: HashMap::new(),
            lecture_chats: HashMap::new(),
            lecture_generations: HashMap::new(),
        })
    }

    pub fn touch(&mut self) {
        self.last_seen = Utc::now();
    }

    /// True when nothing happened in the session for longer than
    /// `max_idle`.
    pub fn is_idle(&self, now: DateTime<Utc>, max_idle: Duration) -> bool {
        now - self.last_seen > max_idle
    }

    pub fn back_to_menu(&mut self) {
        self.touch();
        self.page = Page::Landing;
    }

    pub fn open_problem(&mut self, problem: &Problem) {
        self.touch();
        self.progress.ensure(&problem.id, problem.targets.keys());
        self.page = Page::Chat {
            problem_id: problem.id.clone(),
        };
    }

    pub fn record_attempt(&mut self, problem: &Problem, user_text: &str) -> BTreeSet<String> {
        self.touch();
        self.progress
            .record_attempt(&problem.id, user_text, &problem.targets)
    }

    pub fn problem_progress(&self, problem: &Problem) -> Progress {
        self.progress.progress(&problem.id, problem.targets.len())
    }

    pub fn solved(&self, problem: &Problem) -> BTreeSet<String> {
        self.progress.satisfied(&problem.id)
    }

    pub fn problem_chat(&self, problem_id: &str) -> Option<&Transcript> {
        self.problem_chats.get(problem_id)
    }

    pub fn set_problem_chat(&mut self, problem_id: &str, transcript: Transcript) {
        self.touch();
        self.problem_chats.insert(problem_id.to_string(), transcript);
    }

    pub fn open_lecture(&mut self, topic: LectureTopic) {
        self.touch();
        self.page = Page::Lecture { topic };
    }

    pub fn lecture_chat(&self, topic: LectureTopic) -> Option<&Transcript> {
        self.lecture_chats.get(&topic)
    }

    /// Current generation of the lecture's conversation. Take it before
    /// calling the LLM and hand it back to `set_lecture_chat`.
    pub fn lecture_generation(&self, topic: LectureTopic) -> u64 {
        self.lecture_generations.get(&topic).copied().unwrap_or_default()
    }

    /// Stores the lecture conversation unless the learner left the
    /// lecture since `generation` was taken. Returns whether it was
    /// stored.
    pub fn set_lecture_chat(
        &mut self,
        topic: LectureTopic,
        generation: u64,
        transcript: Transcript,
    ) -> bool {
        if generation != self.lecture_generation(topic) {
            tracing::debug!("Dropping stale {} lecture turn for {}", topic, self.id);
            return false;
        }
        self.touch();
        self.lecture_chats.insert(topic, transcript);
        true
    }

    /// Leaving a lecture drops its conversation so the next visit
    /// starts fresh.
    pub fn leave_lecture(&mut self, topic: LectureTopic) {
        self.touch();
        self.lecture_chats.remove(&topic);
        *self.lecture_generations.entry(topic).or_default() += 1;
        self.page = Page::Landing;
    }

    pub fn finish(&mut self, report: Report) {
        self.touch();
        self.last_report = Some(report);
        self.page = Page::ReportView;
    }
}

/// Session snapshot returned to the browser.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub id: String,
    pub user_name: String,
    pub page: Page,
    pub started_at: DateTime<Utc>,
}

impl From<&TutorSession> for SessionView {
    fn from(session: &TutorSession) -> Self {
        Self {
            id: session.id.clone(),
            user_name: session.user_name.clone(),
            page: session.page.clone(),
            started_at: session.started_at,
        }
    }
}
