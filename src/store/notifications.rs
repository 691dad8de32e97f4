//! Notifications store.
//!
//! Wraps the generic [`Store`] with read tracking: an unread count and marking one or
//! every notification read through the update endpoint.

use super::Store;
use crate::api::ApiClient;
use crate::errors::AppError;
use crate::models::{CreateNotificationRequest, Notification, UpdateNotificationRequest};

/// A member's notifications with read tracking.
pub struct NotificationStore {
    store: Store<Notification>,
}

impl NotificationStore {
    pub fn new(api: ApiClient) -> Self {
        Self {
            store: Store::new(api),
        }
    }

    pub fn records(&self) -> &[Notification] {
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

    pub fn get(&self, id: &str) -> Option<&Notification> {
        self.store.get(id)
    }

    pub fn unread_count(&self) -> usize {
        self.store.records().iter().filter(|n| !n.read).count()
    }

    pub async fn fetch_all(&mut self) {
        self.store.fetch_all().await;
    }

    pub async fn add(&mut self, create: CreateNotificationRequest) {
        self.store.add(create).await;
    }

    pub async fn delete(&mut self, id: &str) {
        self.store.delete(id).await;
    }

    pub async fn mark_read(&mut self, id: &str) {
        let _ = self.try_mark_read(id).await;
    }

    pub async fn try_mark_read(&mut self, id: &str) -> Result<Notification, AppError> {
        let update = UpdateNotificationRequest {
            read: Some(true),
            ..Default::default()
        };
        self.store.try_update(id, update).await
    }

    /// Mark every unread notification read, one request each. Keeps going past failures.
    pub async fn mark_all_read(&mut self) {
        let _ = self.try_mark_all_read().await;
    }

    /// Returns how many were marked, or the first failure once all have been tried.
    pub async fn try_mark_all_read(&mut self) -> Result<usize, AppError> {
        let unread: Vec<String> = self
            .store
            .records()
            .iter()
            .filter(|n| !n.read)
            .map(|n| n.id.clone())
            .collect();

        let mut marked = 0;
        let mut first_error = None;
        for id in &unread {
            match self.try_mark_read(id).await {
                Ok(_) => marked += 1,
                Err(err) => {
                    first_error.get_or_insert(err);
                }
            }
        }

        match first_error {
            // A later success clears the store error, so record the failure again.
            Some(err) => {
                tracing::warn!("Marked {} of {} notifications read", marked, unread.len());
                self.store
                    .settle(Err(err), || "Failed to update notifications".to_string())
            }
            None => Ok(marked),
        }
    }
}
