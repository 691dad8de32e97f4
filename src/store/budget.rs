//! Budget store with a local cache.

use std::sync::Arc;

use super::Store;
use crate::api::ApiClient;
use crate::errors::AppError;
use crate::models::{BudgetEntry, BudgetSummary, CreateBudgetRequest, UpdateBudgetRequest};
use crate::storage::{load_json, save_json, LocalStorage};

/// Local storage key holding the cached entry list.
pub const BUDGET_STORAGE_KEY: &str = "budget";

/// Budget entries, mirrored to local storage after every successful change.
///
/// Categories that do not belong to the entry's type are replaced with the type's default
/// before anything is sent.
pub struct BudgetStore {
    store: Store<BudgetEntry>,
    storage: Arc<dyn LocalStorage>,
}

impl BudgetStore {
    /// Build the store, seeded from the cache when one exists.
    pub fn new(api: ApiClient, storage: Arc<dyn LocalStorage>) -> Self {
        let cached = match load_json::<Vec<BudgetEntry>>(storage.as_ref(), BUDGET_STORAGE_KEY) {
            Ok(entries) => entries.unwrap_or_default(),
            Err(err) => {
                tracing::warn!("Could not read cached budget: {}", err);
                Vec::new()
            }
        };
        if !cached.is_empty() {
            tracing::debug!("Seeded budget with {} cached entries", cached.len());
        }

        Self {
            store: Store::with_records(api, cached),
            storage,
        }
    }

    pub fn records(&self) -> &[BudgetEntry] {
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

    pub fn get(&self, id: &str) -> Option<&BudgetEntry> {
        self.store.get(id)
    }

    pub fn summary(&self) -> BudgetSummary {
        BudgetSummary::from_entries(self.store.records())
    }

    pub async fn fetch_all(&mut self) {
        let _ = self.try_fetch_all().await;
    }

    pub async fn try_fetch_all(&mut self) -> Result<&[BudgetEntry], AppError> {
        self.store.try_fetch_all().await?;
        self.persist();
        Ok(self.store.records())
    }

    pub async fn add(&mut self, create: CreateBudgetRequest) {
        let _ = self.try_add(create).await;
    }

    pub async fn try_add(&mut self, create: CreateBudgetRequest) -> Result<BudgetEntry, AppError> {
        let entry = self.store.try_add(create).await?;
        self.persist();
        Ok(entry)
    }

    pub async fn update(&mut self, id: &str, update: UpdateBudgetRequest) {
        let _ = self.try_update(id, update).await;
    }

    pub async fn try_update(
        &mut self,
        id: &str,
        update: UpdateBudgetRequest,
    ) -> Result<BudgetEntry, AppError> {
        let entry = self.store.try_update(id, update).await?;
        self.persist();
        Ok(entry)
    }

    pub async fn delete(&mut self, id: &str) {
        let _ = self.try_delete(id).await;
    }

    pub async fn try_delete(&mut self, id: &str) -> Result<(), AppError> {
        self.store.try_delete(id).await?;
        self.persist();
        Ok(())
    }

    // A failed cache write leaves the server state authoritative; it is only logged.
    fn persist(&self) {
        if let Err(err) = save_json(self.storage.as_ref(), BUDGET_STORAGE_KEY, self.store.records()) {
            tracing::warn!("Could not cache budget: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::models::EntryType;
    use crate::storage::MemoryStorage;

    fn api() -> ApiClient {
        ApiClient::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn test_seeds_from_cache() {
        let storage: Arc<dyn LocalStorage> = Arc::new(MemoryStorage::new());
        let entries = vec![
            BudgetEntry {
                id: "b1".to_string(),
                title: "Bake sale".to_string(),
                entry_type: EntryType::Income,
                category: "fundraiser".to_string(),
                amount: 120.0,
                date: "2026-04-11".to_string(),
                notes: None,
            },
            BudgetEntry {
                id: "b2".to_string(),
                title: "Pizza".to_string(),
                entry_type: EntryType::Expense,
                category: "food".to_string(),
                amount: 45.5,
                date: "2026-04-12".to_string(),
                notes: None,
            },
        ];
        save_json(storage.as_ref(), BUDGET_STORAGE_KEY, &entries).unwrap();

        let store = BudgetStore::new(api(), storage);
        assert_eq!(store.records(), entries.as_slice());
        let summary = store.summary();
        assert_eq!(summary.income, 120.0);
        assert_eq!(summary.expense, 45.5);
        assert_eq!(summary.balance, 74.5);
    }

    #[test]
    fn test_corrupt_cache_starts_empty() {
        let storage: Arc<dyn LocalStorage> = Arc::new(MemoryStorage::new());
        storage.set_item(BUDGET_STORAGE_KEY, "{not json").unwrap();

        let store = BudgetStore::new(api(), storage);
        assert!(store.records().is_empty());
        assert_eq!(store.summary(), BudgetSummary::default());
    }
}
