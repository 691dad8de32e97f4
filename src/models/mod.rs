//! Domain records for the dashboard.
//!
//! These models match the backend's JSON shapes. Each record type names its REST collection
//! and its create/update request bodies through [`Resource`].

mod announcement;
mod budget;
mod event;
mod member;
mod notification;
mod poll;
mod suggestion;

pub use announcement::*;
pub use budget::*;
pub use event::*;
pub use member::*;
pub use notification::*;
pub use poll::*;
pub use suggestion::*;

use serde::{de::DeserializeOwned, Serialize};

use crate::validation::Validate;

/// A record type served by one REST collection.
pub trait Resource: Clone + Serialize + DeserializeOwned {
    /// Collection path, e.g. `/events`.
    const PATH: &'static str;
    /// Singular, capitalised name used in messages.
    const LABEL: &'static str;
    /// Plural name used in messages.
    const PLURAL: &'static str;

    /// Body for `POST PATH`.
    type Create: Serialize + Validate;
    /// Partial body for `PATCH PATH/{id}`.
    type Update: Serialize + Validate;

    fn id(&self) -> &str;

    /// Normalize a create request before validation.
    fn prepare(create: Self::Create) -> Self::Create {
        create
    }

    /// Normalize an update request against the record it modifies.
    fn prepare_update(&self, update: Self::Update) -> Self::Update {
        update
    }

    /// Path of a single record.
    fn item_path(id: &str) -> String {
        format!("{}/{}", Self::PATH, id)
    }
}
