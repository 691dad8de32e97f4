//! Client-side state containers.
//!
//! A [`Store`] owns the records of one REST collection plus its loading and error state.
//! Mutations are pessimistic: local state changes only after the server answers. The plain
//! operations never fail; they record the failure in [`Store::error`]. The `try_*` variants
//! do the same bookkeeping and also hand the error back.
//!
//! Every mutation takes `&mut self`, so one store never has two requests in flight.

mod budget;
mod notifications;
mod polls;

pub use budget::{BudgetStore, BUDGET_STORAGE_KEY};
pub use notifications::NotificationStore;
pub use polls::{check_ballot, PollStore, VoteMode};

use crate::api::ApiClient;
use crate::errors::AppError;
use crate::models::{Announcement, Event, Member, Resource, Suggestion};
use crate::validation::Validate;

pub type EventStore = Store<Event>;
pub type MemberStore = Store<Member>;
pub type SuggestionStore = Store<Suggestion>;
pub type AnnouncementStore = Store<Announcement>;

/// Records of one collection with loading and error state.
#[derive(Debug, Clone)]
pub struct Store<R: Resource> {
    api: ApiClient,
    records: Vec<R>,
    is_loading: bool,
    error: Option<String>,
}

impl<R: Resource> Store<R> {
    pub fn new(api: ApiClient) -> Self {
        Self::with_records(api, Vec::new())
    }

    /// Start from previously known records, e.g. a local cache.
    pub fn with_records(api: ApiClient, records: Vec<R>) -> Self {
        Self {
            api,
            records,
            is_loading: false,
            error: None,
        }
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Message of the last failed operation, cleared when the next one starts.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn get(&self, id: &str) -> Option<&R> {
        self.records.iter().find(|r| r.id() == id)
    }

    /// Replace the list with the server's. On failure the old list is kept.
    pub async fn fetch_all(&mut self) {
        let _ = self.try_fetch_all().await;
    }

    pub async fn try_fetch_all(&mut self) -> Result<&[R], AppError> {
        self.begin();
        let result = self.api.get_json::<Vec<R>>(R::PATH).await;
        let records = self.settle(result, || format!("Failed to load {}", R::PLURAL))?;

        tracing::info!("Loaded {} {}", records.len(), R::PLURAL);
        self.records = records;
        Ok(&self.records)
    }

    /// Validate and create a record; invalid input is reported and never sent.
    pub async fn add(&mut self, create: R::Create) {
        let _ = self.try_add(create).await;
    }

    pub async fn try_add(&mut self, create: R::Create) -> Result<R, AppError> {
        let create = R::prepare(create);
        self.check(&create)?;

        self.begin();
        let result = self.api.post_json::<_, R>(R::PATH, &create).await;
        let record = self.settle(result, || format!("Failed to add {}", R::LABEL.to_lowercase()))?;

        tracing::info!("Added {} {}", R::LABEL.to_lowercase(), record.id());
        self.records.push(record.clone());
        Ok(record)
    }

    /// Patch a record and replace it with the server's copy.
    pub async fn update(&mut self, id: &str, update: R::Update) {
        let _ = self.try_update(id, update).await;
    }

    pub async fn try_update(&mut self, id: &str, update: R::Update) -> Result<R, AppError> {
        let update = self.require(id)?.prepare_update(update);
        self.check(&update)?;

        self.begin();
        let result = self.api.patch_json::<_, R>(&R::item_path(id), &update).await;
        let record = self.settle(result, || {
            format!("Failed to update {}", R::LABEL.to_lowercase())
        })?;

        tracing::info!("Updated {} {}", R::LABEL.to_lowercase(), id);
        Ok(self.replace(id, record))
    }

    /// Remove a record once the server confirms the delete.
    pub async fn delete(&mut self, id: &str) {
        let _ = self.try_delete(id).await;
    }

    pub async fn try_delete(&mut self, id: &str) -> Result<(), AppError> {
        self.require(id)?;

        self.begin();
        let result = self.api.delete(&R::item_path(id)).await;
        self.settle(result, || format!("Failed to delete {}", R::LABEL.to_lowercase()))?;

        tracing::info!("Deleted {} {}", R::LABEL.to_lowercase(), id);
        self.records.retain(|r| r.id() != id);
        Ok(())
    }

    pub(crate) fn api(&self) -> &ApiClient {
        &self.api
    }

    pub(crate) fn begin(&mut self) {
        self.is_loading = true;
        self.error = None;
    }

    /// End a request, recording the failure message if there was one.
    pub(crate) fn settle<T>(
        &mut self,
        result: Result<T, AppError>,
        default_message: impl FnOnce() -> String,
    ) -> Result<T, AppError> {
        self.is_loading = false;
        if let Err(err) = &result {
            let message = err.user_message(&default_message());
            tracing::warn!("{} request failed: {}", R::LABEL, err);
            self.error = Some(message);
        }
        result
    }

    /// The record with `id`, or a not-found error recorded on the store.
    pub(crate) fn require(&mut self, id: &str) -> Result<&R, AppError> {
        match self.records.iter().position(|r| r.id() == id) {
            Some(index) => Ok(&self.records[index]),
            None => {
                let err = AppError::NotFound(format!("{} not found", R::LABEL));
                tracing::debug!("{} {} is not loaded", R::LABEL, id);
                self.error = Some(err.message());
                Err(err)
            }
        }
    }

    /// Swap in the server's copy of `id`, keeping its position.
    pub(crate) fn replace(&mut self, id: &str, record: R) -> R {
        match self.records.iter_mut().find(|r| r.id() == id) {
            Some(slot) => *slot = record.clone(),
            None => self.records.push(record.clone()),
        }
        record
    }

    fn check(&mut self, input: &impl Validate) -> Result<(), AppError> {
        if let Err(errors) = input.validate() {
            tracing::debug!("Rejected {} input: {}", R::LABEL.to_lowercase(), errors);
            self.error = Some(errors.to_string());
            return Err(AppError::Validation(errors));
        }
        Ok(())
    }
}
