//! Per-problem record of which targets a learner has already found.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;

use super::matcher::{DEFAULT_TOLERANCE, check_numeric_match};

/// Satisfied vs total targets for one problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub satisfied: usize,
    pub total: usize,
}

impl Progress {
    /// Share of targets found, 0.0 when the problem has none.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.satisfied as f64 / self.total as f64
        }
    }

    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.satisfied >= self.total
    }
}

/// Tracks satisfied targets for every problem opened in a session.
/// Sets only ever grow.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    tolerance: f64,
    solved: HashMap<String, BTreeSet<String>>,
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE)
    }
}

impl ProgressTracker {
    pub fn new(tolerance: f64) -> Self {
        Self {
            tolerance,
            solved: HashMap::new(),
        }
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Creates an empty satisfied set for `problem_id` unless one
    /// already exists. Never resets.
    pub fn ensure<'a, I>(&mut self, problem_id: &str, target_names: I)
    where
        I: IntoIterator<Item = &'a String>,
    {
        if !self.solved.contains_key(problem_id) {
            tracing::debug!(
                "Tracking problem {} with {} targets",
                problem_id,
                target_names.into_iter().count()
            );
            self.solved.insert(problem_id.to_string(), BTreeSet::new());
        }
    }

    /// Checks `user_text` against every target not yet satisfied and
    /// returns the names that matched for the first time.
    pub fn record_attempt(
        &mut self,
        problem_id: &str,
        user_text: &str,
        targets: &BTreeMap<String, f64>,
    ) -> BTreeSet<String> {
        let tolerance = self.tolerance;
        let solved = self.solved.entry(problem_id.to_string()).or_default();

        let newly: BTreeSet<String> = targets
            .iter()
            .filter(|(name, _)| !solved.contains(*name))
            .filter(|(_, value)| check_numeric_match(user_text, **value, tolerance))
            .map(|(name, _)| name.clone())
            .collect();

        solved.extend(newly.iter().cloned());
        newly
    }

    pub fn progress(&self, problem_id: &str, total_targets: usize) -> Progress {
        Progress {
            satisfied: self.solved.get(problem_id).map_or(0, BTreeSet::len),
            total: total_targets,
        }
    }

    pub fn satisfied(&self, problem_id: &str) -> BTreeSet<String> {
        self.solved.get(problem_id).cloned().unwrap_or_default()
    }

    pub fn is_tracked(&self, problem_id: &str) -> bool {
        self.solved.contains_key(problem_id)
    }
}
