use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::core::{AppConfig, ProblemCatalog, TutorSession};
use crate::report::SharedMailer;

pub struct AppState {
    pub config: AppConfig,
    pub problems: Arc<ProblemCatalog>,
    pub mailer: SharedMailer,
    // Keyed by session ID, one entry per learner
    pub sessions: HashMap<String, TutorSession>,
}

impl AppState {
    pub fn new(config: AppConfig, problems: ProblemCatalog, mailer: SharedMailer) -> Self {
        Self {
            config,
            problems: Arc::new(problems),
            mailer,
            sessions: HashMap::new(),
        }
    }

    /// Ends a session, discarding its progress, conversations and
    /// report.
    pub fn end_session(&mut self, session_id: &str) -> Option<TutorSession> {
        self.sessions.remove(session_id)
    }

    /// Drops every session idle for longer than `max_idle` and returns
    /// how many were removed.
    pub fn evict_idle(&mut self, now: DateTime<Utc>, max_idle: Duration) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, session| !session.is_idle(now, max_idle));
        before - self.sessions.len()
    }
}
