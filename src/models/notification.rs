//! Notification model.

use serde::{Deserialize, Serialize};

use super::Resource;
use crate::validation::{Validate, ValidationErrors};

/// A notice shown in a member's notification list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub read: bool,
    /// Free-form category such as `event` or `poll`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNotificationRequest {
    pub title: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNotificationRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read: Option<bool>,
}

impl Validate for CreateNotificationRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("title", &self.title, "Title");
        errors.require("message", &self.message, "Message");
        errors.into_result()
    }
}

impl Validate for UpdateNotificationRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require_if_present("title", self.title.as_deref(), "Title");
        errors.require_if_present("message", self.message.as_deref(), "Message");
        errors.into_result()
    }
}

impl Resource for Notification {
    const PATH: &'static str = "/notifications";
    const LABEL: &'static str = "Notification";
    const PLURAL: &'static str = "notifications";

    type Create = CreateNotificationRequest;
    type Update = UpdateNotificationRequest;

    fn id(&self) -> &str {
        &self.id
    }
}
