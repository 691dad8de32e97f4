//! Poll model and vote tally.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::Resource;
use crate::validation::{Validate, ValidationErrors};

/// One member's recorded choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    pub user_id: String,
    pub option: String,
}

/// A multiple-choice poll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Poll {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub options: Vec<String>,
    #[serde(default)]
    pub votes: Vec<Vote>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ends_at: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Vote count for one option.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionTally {
    pub option: String,
    pub votes: usize,
    /// Share of all counted votes, 0.0 to 100.0
    pub percentage: f64,
}

impl Poll {
    /// The vote `user_id` has on record, if any.
    pub fn vote_of(&self, user_id: &str) -> Option<&Vote> {
        self.votes.iter().find(|v| v.user_id == user_id)
    }

    /// Per-option counts in option order. Votes for unknown options are not counted.
    pub fn tally(&self) -> Vec<OptionTally> {
        let counts: Vec<usize> = self
            .options
            .iter()
            .map(|option| self.votes.iter().filter(|v| &v.option == option).count())
            .collect();
        let total: usize = counts.iter().sum();

        self.options
            .iter()
            .zip(counts)
            .map(|(option, votes)| OptionTally {
                option: option.clone(),
                votes,
                percentage: if total == 0 {
                    0.0
                } else {
                    votes as f64 * 100.0 / total as f64
                },
            })
            .collect()
    }

    /// Total number of counted votes.
    pub fn total_votes(&self) -> usize {
        self.tally().iter().map(|t| t.votes).sum()
    }
}

/// Request body for creating a new poll.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePollRequest {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub options: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ends_at: Option<String>,
}

/// Request body for updating an existing poll.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePollRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ends_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

/// Request body for `POST /polls/{id}/vote`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    pub user_id: String,
    pub option: String,
}

fn check_options(errors: &mut ValidationErrors, options: &[String]) {
    let mut seen = HashSet::new();
    let mut distinct = 0;
    for option in options {
        let trimmed = option.trim();
        if trimmed.is_empty() {
            errors.add("options", "Options cannot be blank");
            return;
        }
        if seen.insert(trimmed) {
            distinct += 1;
        }
    }
    if distinct < 2 {
        errors.add("options", "A poll needs at least two different options");
    }
}

impl Validate for CreatePollRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("title", &self.title, "Title");
        check_options(&mut errors, &self.options);
        errors.into_result()
    }
}

impl Validate for UpdatePollRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require_if_present("title", self.title.as_deref(), "Title");
        if let Some(options) = &self.options {
            check_options(&mut errors, options);
        }
        errors.into_result()
    }
}

impl Resource for Poll {
    const PATH: &'static str = "/polls";
    const LABEL: &'static str = "Poll";
    const PLURAL: &'static str = "polls";

    type Create = CreatePollRequest;
    type Update = UpdatePollRequest;

    fn id(&self) -> &str {
        &self.id
    }
}
