//! Announcement model.

use serde::{Deserialize, Serialize};

use super::Resource;
use crate::validation::{Validate, ValidationErrors};

/// A message posted to all members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAnnouncementRequest {
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub pinned: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAnnouncementRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pinned: Option<bool>,
}

impl Validate for CreateAnnouncementRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("title", &self.title, "Title");
        errors.require("content", &self.content, "Content");
        errors.into_result()
    }
}

impl Validate for UpdateAnnouncementRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require_if_present("title", self.title.as_deref(), "Title");
        errors.require_if_present("content", self.content.as_deref(), "Content");
        errors.into_result()
    }
}

impl Resource for Announcement {
    const PATH: &'static str = "/announcements";
    const LABEL: &'static str = "Announcement";
    const PLURAL: &'static str = "announcements";

    type Create = CreateAnnouncementRequest;
    type Update = UpdateAnnouncementRequest;

    fn id(&self) -> &str {
        &self.id
    }
}
