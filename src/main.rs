//! Youth Admin dashboard
//!
//! Loads every collection from the backend, prints the first page of each table and exports
//! each table to CSV.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use youth_admin::api::ApiClient;
use youth_admin::attendance::monthly_attendance_now;
use youth_admin::config::{Config, LogFormat};
use youth_admin::errors::AppError;
use youth_admin::export::DirectoryDownloader;
use youth_admin::pages::{self, Page, PageOptions};
use youth_admin::session::{LocalSessionStore, Session};
use youth_admin::storage::{FileStorage, LocalStorage};
use youth_admin::store::{
    AnnouncementStore, BudgetStore, EventStore, MemberStore, NotificationStore, PollStore,
    SuggestionStore,
};
use youth_admin::table::{DataTable, TableDef, TableState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    match config.log_format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }

    tracing::info!("Starting Youth Admin");
    tracing::info!("Backend: {}", config.api_url);
    tracing::info!("Storage directory: {:?}", config.storage_dir);
    tracing::info!("Export directory: {:?}", config.export_dir);

    // Local storage and session
    let storage: Arc<dyn LocalStorage> = Arc::new(FileStorage::open(&config.storage_dir)?);
    let session = Session::init(LocalSessionStore::new(storage.clone()))?;
    match session.user() {
        Some(user) => tracing::info!("Signed in as {} ({})", user.name, user.role.as_str()),
        None => tracing::warn!("No signed-in user; showing the public view"),
    }
    tracing::info!("Theme: {:?}", session.theme());

    // Stores
    let api = ApiClient::from_config(&config)?;
    let mut events = EventStore::new(api.clone());
    let mut members = MemberStore::new(api.clone());
    let mut suggestions = SuggestionStore::new(api.clone());
    let mut announcements = AnnouncementStore::new(api.clone());
    let mut budget = BudgetStore::new(api.clone(), storage.clone());
    let mut polls = PollStore::new(api.clone());
    let mut notifications = NotificationStore::new(api);

    events.fetch_all().await;
    members.fetch_all().await;
    suggestions.fetch_all().await;
    announcements.fetch_all().await;
    budget.fetch_all().await;
    polls.fetch_all().await;
    notifications.fetch_all().await;

    let failures = [
        (Page::Events, events.error()),
        (Page::Members, members.error()),
        (Page::Suggestions, suggestions.error()),
        (Page::Announcements, announcements.error()),
        (Page::Budget, budget.error()),
        (Page::Polls, polls.error()),
        (Page::Notifications, notifications.error()),
    ];
    for (page, error) in failures {
        if let Some(error) = error {
            tracing::error!("Could not load {}: {}", page.as_str(), error);
        }
    }

    // Summaries
    let summary = budget.summary();
    tracing::info!(
        "Budget: income {:.2}, expense {:.2}, balance {:.2}",
        summary.income,
        summary.expense,
        summary.balance
    );
    for bucket in monthly_attendance_now(events.records()) {
        tracing::info!(
            "Attendance {}: {} men, {} women, {} total",
            bucket.label(),
            bucket.men,
            bucket.women,
            bucket.total
        );
    }
    tracing::info!("{} unread notification(s)", notifications.unread_count());

    // Tables
    let options = PageOptions::new(config.page_size)
        .with_downloader(Arc::new(DirectoryDownloader::new(&config.export_dir)));

    show(Page::Events, pages::events_table(&options), events.records());
    show(Page::Members, pages::members_table(&options), members.records());
    show(Page::Budget, pages::budget_table(&options), budget.records());
    show(Page::Polls, pages::polls_table(&options), polls.records());
    show(
        Page::Suggestions,
        pages::suggestions_table(&options),
        suggestions.records(),
    );
    show(
        Page::Announcements,
        pages::announcements_table(&options),
        announcements.records(),
    );
    show(
        Page::Notifications,
        pages::notifications_table(&options),
        notifications.records(),
    );

    Ok(())
}

/// Print the first page of a table and run its export.
fn show<T>(page: Page, def: Result<TableDef<T>, AppError>, data: &[T]) {
    let def = match def {
        Ok(def) => def,
        Err(err) => {
            tracing::error!("Invalid {} table: {}", page.as_str(), err);
            return;
        }
    };

    let mut state = TableState::new();
    let table = DataTable::new(&def, &mut state, data);
    println!("== {} ==\n{}\n", page.as_str(), table.render_text());

    if let Err(err) = table.trigger_export() {
        tracing::error!("Export of {} failed: {}", page.as_str(), err);
    }
}
