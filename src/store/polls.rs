//! Poll store and ballot checks.

use super::Store;
use crate::api::ApiClient;
use crate::errors::AppError;
use crate::models::{CreatePollRequest, Poll, Resource, UpdatePollRequest, VoteRequest};
use crate::validation::ValidationErrors;

/// Whether the voting dialog was opened to change an existing vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VoteMode {
    #[default]
    New,
    EditExisting,
}

/// Check a ballot before it is submitted.
///
/// The option must be one the poll offers, and a member who already voted may only vote
/// again from the edit dialog.
pub fn check_ballot(
    poll: &Poll,
    user_id: &str,
    option: &str,
    mode: VoteMode,
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if !poll.active {
        errors.add("poll", "This poll is closed");
    }
    if !poll.options.iter().any(|o| o == option) {
        errors.add("option", format!("'{}' is not an option in this poll", option));
    }
    if mode == VoteMode::New && poll.vote_of(user_id).is_some() {
        errors.add("option", "You have already voted in this poll");
    }
    errors.into_result()
}

pub struct PollStore {
    store: Store<Poll>,
}

impl PollStore {
    pub fn new(api: ApiClient) -> Self {
        Self {
            store: Store::new(api),
        }
    }

    pub fn records(&self) -> &[Poll] {
        self.store.records()
    }

    pub fn is_loading(&self) -> bool {
        self.store.is_loading()
    }

    pub fn error(&self) -> Option<&str> {
        self.store.error()
    }

    pub fn clear_error(&mut self) {
        self.store.clear_error();
    }

    pub fn get(&self, id: &str) -> Option<&Poll> {
        self.store.get(id)
    }

    pub async fn fetch_all(&mut self) {
        self.store.fetch_all().await;
    }

    pub async fn add(&mut self, create: CreatePollRequest) {
        self.store.add(create).await;
    }

    pub async fn try_add(&mut self, create: CreatePollRequest) -> Result<Poll, AppError> {
        self.store.try_add(create).await
    }

    /// Patch a poll. Unlike the other mutations the error is both recorded and returned,
    /// so the edit dialog can stay open.
    pub async fn update_poll(
        &mut self,
        id: &str,
        update: UpdatePollRequest,
    ) -> Result<Poll, AppError> {
        self.store.try_update(id, update).await
    }

    pub async fn delete(&mut self, id: &str) {
        self.store.delete(id).await;
    }

    /// Record `user_id`'s choice; the server replies with the poll and its merged votes.
    pub async fn vote(&mut self, poll_id: &str, user_id: &str, option: &str) {
        let _ = self.try_vote(poll_id, user_id, option).await;
    }

    pub async fn try_vote(
        &mut self,
        poll_id: &str,
        user_id: &str,
        option: &str,
    ) -> Result<Poll, AppError> {
        self.store.require(poll_id)?;

        let body = VoteRequest {
            user_id: user_id.to_string(),
            option: option.to_string(),
        };
        let path = format!("{}/vote", Poll::item_path(poll_id));

        self.store.begin();
        let result = self.store.api().post_json::<_, Poll>(&path, &body).await;
        let poll = self
            .store
            .settle(result, || "Failed to submit vote".to_string())?;

        tracing::info!("Recorded vote on poll {}", poll_id);
        Ok(self.store.replace(poll_id, poll))
    }
}
