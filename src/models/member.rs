//! Member model.

use serde::{Deserialize, Serialize};

use super::Resource;
use crate::validation::{Validate, ValidationErrors};

/// Role of a member within the group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    #[default]
    Member,
    Leader,
    Admin,
}

impl MemberRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberRole::Member => "member",
            MemberRole::Leader => "leader",
            MemberRole::Admin => "admin",
        }
    }
}

/// A registered member of the youth group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: MemberRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthday: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joined_at: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Request body for creating a new member.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMemberRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub role: MemberRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birthday: Option<String>,
    pub active: bool,
}

/// Request body for updating an existing member.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMemberRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<MemberRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birthday: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

fn check_email(errors: &mut ValidationErrors, email: Option<&str>) {
    if let Some(email) = email {
        if !email.trim().is_empty() && !email.contains('@') {
            errors.add("email", "Email address is invalid");
        }
    }
}

impl Validate for CreateMemberRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("name", &self.name, "Name");
        check_email(&mut errors, self.email.as_deref());
        errors.into_result()
    }
}

impl Validate for UpdateMemberRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require_if_present("name", self.name.as_deref(), "Name");
        check_email(&mut errors, self.email.as_deref());
        errors.into_result()
    }
}

impl Resource for Member {
    const PATH: &'static str = "/members";
    const LABEL: &'static str = "Member";
    const PLURAL: &'static str = "members";

    type Create = CreateMemberRequest;
    type Update = UpdateMemberRequest;

    fn id(&self) -> &str {
        &self.id
    }
}
