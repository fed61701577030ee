//! Practice problems and the catalog they are loaded into.

use std::collections::BTreeMap;
use std::fs;

use anyhow::{Context, Result, bail};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

fn default_category() -> String {
    String::from("General")
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Problem {
    pub id: String,
    #[serde(default = "default_category")]
    pub category: String,
    pub statement: String,
    #[serde(default)]
    pub targets: BTreeMap<String, f64>,
}

impl Problem {
    /// Category before the first `:`, e.g. "Kinematics" for
    /// "Kinematics: Projectile".
    pub fn main_category(&self) -> &str {
        self.category.split(':').next().unwrap_or_default().trim()
    }

    /// Label after the last `:`, or the whole category without one.
    pub fn sub_label(&self) -> &str {
        self.category.rsplit(':').next().unwrap_or_default().trim()
    }
}

/// Problems grouped under one main category, in load order.
#[derive(Clone, Debug, Serialize)]
pub struct Category<'a> {
    pub name: &'a str,
    pub problems: Vec<&'a Problem>,
}

/// Immutable set of problems loaded once per process.
#[derive(Clone, Debug, Default)]
pub struct ProblemCatalog {
    problems: Vec<Problem>,
}

impl ProblemCatalog {
    pub fn new(problems: Vec<Problem>) -> Result<Self> {
        if let Some(dup) = problems.iter().map(|p| &p.id).duplicates().next() {
            bail!("Duplicate problem id: {}", dup);
        }
        Ok(Self { problems })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let problems: Vec<Problem> =
            serde_json::from_str(json).context("Failed to parse problems")?;
        Self::new(problems)
    }

    pub fn load(path: &str) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read problems from {}", path))?;
        Self::from_json(&json)
    }

    pub fn get(&self, id: &str) -> Option<&Problem> {
        self.problems.iter().find(|p| p.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Problem> {
        self.problems.iter()
    }

    pub fn len(&self) -> usize {
        self.problems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    /// Groups problems by main category keeping first-seen order.
    pub fn categories(&self) -> Vec<Category<'_>> {
        let mut out: Vec<Category<'_>> = Vec::new();
        for problem in &self.problems {
            let name = problem.main_category();
            match out.iter_mut().find(|c| c.name == name) {
                Some(category) => category.problems.push(problem),
                None => out.push(Category {
                    name,
                    problems: vec![problem],
                }),
            }
        }
        out
    }
}
