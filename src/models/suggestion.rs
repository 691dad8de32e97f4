//! Suggestion box model.

use serde::{Deserialize, Serialize};

use super::Resource;
use crate::validation::{Validate, ValidationErrors};

/// Review state of a suggestion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl SuggestionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SuggestionStatus::Pending => "pending",
            SuggestionStatus::Approved => "approved",
            SuggestionStatus::Rejected => "rejected",
        }
    }
}

/// An idea submitted by a member. `author` is absent for anonymous submissions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default)]
    pub status: SuggestionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSuggestionRequest {
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSuggestionRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<SuggestionStatus>,
}

impl Validate for CreateSuggestionRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("title", &self.title, "Title");
        errors.require("content", &self.content, "Suggestion");
        errors.into_result()
    }
}

impl Validate for UpdateSuggestionRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require_if_present("title", self.title.as_deref(), "Title");
        errors.require_if_present("content", self.content.as_deref(), "Suggestion");
        errors.into_result()
    }
}

impl Resource for Suggestion {
    const PATH: &'static str = "/suggestions";
    const LABEL: &'static str = "Suggestion";
    const PLURAL: &'static str = "suggestions";

    type Create = CreateSuggestionRequest;
    type Update = UpdateSuggestionRequest;

    fn id(&self) -> &str {
        &self.id
    }
}
