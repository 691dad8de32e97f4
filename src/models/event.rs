//! Event model with optional attendance counts.

use serde::{Deserialize, Serialize};

use super::Resource;
use crate::attendance::parse_event_date;
use crate::validation::{Validate, ValidationErrors};

/// Head count for one event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendance {
    pub men: u32,
    pub women: u32,
}

impl Attendance {
    /// Combined head count, capped at `u32::MAX`.
    pub fn total(&self) -> u32 {
        self.men.saturating_add(self.women)
    }
}

/// A scheduled youth group event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// ISO date or RFC 3339 timestamp
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attendance: Option<Attendance>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Request body for creating a new event.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attendance: Option<Attendance>,
}

/// Request body for updating an existing event.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attendance: Option<Attendance>,
}

fn check_date(errors: &mut ValidationErrors, date: &str) {
    if date.trim().is_empty() {
        errors.add("date", "Date is required");
    } else if parse_event_date(date).is_none() {
        errors.add("date", "Date must be YYYY-MM-DD");
    }
}

impl Validate for CreateEventRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("title", &self.title, "Title");
        check_date(&mut errors, &self.date);
        errors.into_result()
    }
}

impl Validate for UpdateEventRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require_if_present("title", self.title.as_deref(), "Title");
        if let Some(date) = &self.date {
            check_date(&mut errors, date);
        }
        errors.into_result()
    }
}

impl Resource for Event {
    const PATH: &'static str = "/events";
    const LABEL: &'static str = "Event";
    const PLURAL: &'static str = "events";

    type Create = CreateEventRequest;
    type Update = UpdateEventRequest;

    fn id(&self) -> &str {
        &self.id
    }
}
