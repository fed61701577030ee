//! Public types for the problems API
use serde::Serialize;

use crate::core::Problem;

/// A problem as listed on the landing page.
#[derive(Serialize)]
pub struct ProblemSummary {
    pub id: String,
    pub category: String,
    pub label: String,
    pub target_count: usize,
}

impl From<&Problem> for ProblemSummary {
    fn from(problem: &Problem) -> Self {
        Self {
            id: problem.id.clone(),
            category: problem.category.clone(),
            label: problem.sub_label().to_string(),
            target_count: problem.targets.len(),
        }
    }
}

#[derive(Serialize)]
pub struct CategoryResponse {
    pub name: String,
    pub problems: Vec<ProblemSummary>,
}

#[derive(Serialize)]
pub struct ProblemsResponse {
    pub total: usize,
    pub categories: Vec<CategoryResponse>,
}

/// Target values are never sent to the browser, only their names.
#[derive(Serialize)]
pub struct ProblemResponse {
    pub id: String,
    pub category: String,
    pub statement: String,
    pub targets: Vec<String>,
}

impl From<&Problem> for ProblemResponse {
    fn from(problem: &Problem) -> Self {
        Self {
            id: problem.id.clone(),
            category: problem.category.clone(),
            statement: problem.statement.clone(),
            targets: problem.targets.keys().cloned().collect(),
        }
    }
}
