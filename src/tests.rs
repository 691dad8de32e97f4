//! Integration tests for the stores against an in-process mock backend.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};
use serde_json::{json, Value};

use crate::api::ApiClient;
use crate::errors::AppError;
use crate::models::{
    CreateBudgetRequest, CreateEventRequest, CreateMemberRequest, EntryType, MemberRole,
    UpdateBudgetRequest, UpdateEventRequest, UpdatePollRequest,
};
use crate::storage::{LocalStorage, MemoryStorage};
use crate::store::{
    BudgetStore, EventStore, MemberStore, NotificationStore, PollStore, BUDGET_STORAGE_KEY,
};

/// In-memory REST backend state.
#[derive(Default)]
struct MockData {
    collections: HashMap<String, Vec<Value>>,
    next_id: u64,
    requests: usize,
    fail_next: Option<(u16, Value)>,
    delay: Option<Duration>,
}

#[derive(Clone, Default)]
struct MockBackend {
    data: Arc<Mutex<MockData>>,
}

impl MockBackend {
    /// Count the request and return the injected failure, if any, after the configured delay.
    async fn intercept(&self) -> Option<Response> {
        let (delay, failure) = {
            let mut data = self.data.lock().unwrap();
            data.requests += 1;
            (data.delay, data.fail_next.take())
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        failure.map(|(status, body)| {
            let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, Json(body)).into_response()
        })
    }
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "success": false, "error": { "code": "NOT_FOUND", "message": "Record not found" } })),
    )
        .into_response()
}

async fn list_records(State(mock): State<MockBackend>, Path(resource): Path<String>) -> Response {
    if let Some(failure) = mock.intercept().await {
        return failure;
    }
    let data = mock.data.lock().unwrap();
    let records = data.collections.get(&resource).cloned().unwrap_or_default();
    Json(Value::Array(records)).into_response()
}

async fn create_record(
    State(mock): State<MockBackend>,
    Path(resource): Path<String>,
    Json(mut body): Json<Value>,
) -> Response {
    if let Some(failure) = mock.intercept().await {
        return failure;
    }
    let mut data = mock.data.lock().unwrap();
    data.next_id += 1;
    body["id"] = json!(format!("{}-{}", resource, data.next_id));
    data.collections
        .entry(resource)
        .or_default()
        .push(body.clone());
    (StatusCode::CREATED, Json(body)).into_response()
}

async fn update_record(
    State(mock): State<MockBackend>,
    Path((resource, id)): Path<(String, String)>,
    Json(patch): Json<Value>,
) -> Response {
    if let Some(failure) = mock.intercept().await {
        return failure;
    }
    let mut data = mock.data.lock().unwrap();
    let Some(record) = data
        .collections
        .get_mut(&resource)
        .and_then(|records| records.iter_mut().find(|r| r["id"] == id))
    else {
        return not_found();
    };
    if let (Some(target), Some(fields)) = (record.as_object_mut(), patch.as_object()) {
        for (key, value) in fields {
            target.insert(key.clone(), value.clone());
        }
    }
    Json(record.clone()).into_response()
}

async fn delete_record(
    State(mock): State<MockBackend>,
    Path((resource, id)): Path<(String, String)>,
) -> Response {
    if let Some(failure) = mock.intercept().await {
        return failure;
    }
    let mut data = mock.data.lock().unwrap();
    let Some(records) = data.collections.get_mut(&resource) else {
        return not_found();
    };
    let before = records.len();
    records.retain(|r| r["id"] != id);
    if records.len() == before {
        return not_found();
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn vote_on_poll(
    State(mock): State<MockBackend>,
    Path(id): Path<String>,
    Json(ballot): Json<Value>,
) -> Response {
    if let Some(failure) = mock.intercept().await {
        return failure;
    }
    let mut data = mock.data.lock().unwrap();
    let Some(poll) = data
        .collections
        .get_mut("polls")
        .and_then(|polls| polls.iter_mut().find(|p| p["id"] == id))
    else {
        return not_found();
    };

    let mut votes: Vec<Value> = poll["votes"].as_array().cloned().unwrap_or_default();
    votes.retain(|v| v["userId"] != ballot["userId"]);
    votes.push(json!({ "userId": ballot["userId"], "option": ballot["option"] }));
    poll["votes"] = Value::Array(votes);
    Json(poll.clone()).into_response()
}

fn create_mock_router(mock: MockBackend) -> Router {
    Router::new()
        .route("/polls/{id}/vote", post(vote_on_poll))
        .route("/{resource}", get(list_records).post(create_record))
        .route(
            "/{resource}/{id}",
            patch(update_record).delete(delete_record),
        )
        .with_state(mock)
}

/// Test fixture for integration tests.
struct TestFixture {
    api: ApiClient,
    mock: MockBackend,
}

impl TestFixture {
    async fn new() -> Self {
        Self::with_timeout(Duration::from_secs(5)).await
    }

    async fn with_timeout(timeout: Duration) -> Self {
        let mock = MockBackend::default();
        let app = create_mock_router(mock.clone());

        // Bind to random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get addr");

        // Spawn server
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Wait for server to start
        tokio::time::sleep(Duration::from_millis(100)).await;

        let api = ApiClient::new(format!("http://{}", addr), timeout).expect("Failed to build client");
        TestFixture { api, mock }
    }

    fn seed(&self, resource: &str, records: Value) {
        let records = records.as_array().cloned().unwrap_or_default();
        self.mock
            .data
            .lock()
            .unwrap()
            .collections
            .insert(resource.to_string(), records);
    }

    fn fail_next(&self, status: u16, body: Value) {
        self.mock.data.lock().unwrap().fail_next = Some((status, body));
    }

    fn set_delay(&self, delay: Duration) {
        self.mock.data.lock().unwrap().delay = Some(delay);
    }

    fn collection(&self, resource: &str) -> Vec<Value> {
        let data = self.mock.data.lock().unwrap();
        data.collections.get(resource).cloned().unwrap_or_default()
    }

    fn request_count(&self) -> usize {
        self.mock.data.lock().unwrap().requests
    }
}

fn seed_events(fixture: &TestFixture) {
    fixture.seed(
        "events",
        json!([
            { "id": "e1", "title": "Game night", "date": "2026-03-06", "attendance": { "men": 8, "women": 11 } },
            { "id": "e2", "title": "Hike", "date": "2026-04-18" }
        ]),
    );
}

fn new_event(title: &str) -> CreateEventRequest {
    CreateEventRequest {
        title: title.to_string(),
        description: None,
        date: "2026-05-09".to_string(),
        location: Some("Church hall".to_string()),
        attendance: None,
    }
}

// ==================== GENERIC STORE ====================

#[tokio::test]
async fn test_fetch_all_events() {
    let fixture = TestFixture::new().await;
    seed_events(&fixture);

    let mut events = EventStore::new(fixture.api.clone());
    events.fetch_all().await;

    assert!(events.error().is_none());
    assert!(!events.is_loading());
    assert_eq!(events.records().len(), 2);
    assert_eq!(events.get("e1").unwrap().attendance.unwrap().total(), 19);
}

#[tokio::test]
async fn test_fetch_failure_keeps_records() {
    let fixture = TestFixture::new().await;
    seed_events(&fixture);

    let mut events = EventStore::new(fixture.api.clone());
    events.fetch_all().await;

    fixture.fail_next(
        500,
        json!({ "success": false, "error": { "code": "DB_ERROR", "message": "Database unavailable" } }),
    );
    events.fetch_all().await;

    assert_eq!(events.error(), Some("Database unavailable"));
    assert_eq!(events.records().len(), 2);
    assert!(!events.is_loading());
}

#[tokio::test]
async fn test_fetch_failure_without_message_uses_default() {
    let fixture = TestFixture::new().await;
    fixture.fail_next(503, Value::Null);

    let mut events = EventStore::new(fixture.api.clone());
    let err = events.try_fetch_all().await.unwrap_err();

    assert!(matches!(err, AppError::Api { status: 503, message: None }));
    assert_eq!(events.error(), Some("Failed to load events"));

    // The next successful call clears the error.
    events.fetch_all().await;
    assert!(events.error().is_none());
}

#[tokio::test]
async fn test_add_appends_server_record() {
    let fixture = TestFixture::new().await;

    let mut events = EventStore::new(fixture.api.clone());
    let created = events.try_add(new_event("Movie night")).await.unwrap();

    assert_eq!(created.id, "events-1");
    assert_eq!(events.records(), &[created]);
    assert_eq!(fixture.collection("events").len(), 1);
}

#[tokio::test]
async fn test_invalid_input_is_never_sent() {
    let fixture = TestFixture::new().await;

    let mut events = EventStore::new(fixture.api.clone());
    events.add(new_event("  ")).await;
    assert_eq!(events.error(), Some("Title is required"));

    let mut members = MemberStore::new(fixture.api.clone());
    let err = members
        .try_add(CreateMemberRequest {
            name: "Ana".to_string(),
            email: Some("ana.example.com".to_string()),
            phone: None,
            role: MemberRole::Member,
            birthday: None,
            active: true,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(members.error(), Some("Email address is invalid"));
    assert_eq!(fixture.request_count(), 0);
    assert!(events.records().is_empty());
}

#[tokio::test]
async fn test_update_replaces_record() {
    let fixture = TestFixture::new().await;
    seed_events(&fixture);

    let mut events = EventStore::new(fixture.api.clone());
    events.fetch_all().await;
    events
        .update(
            "e2",
            UpdateEventRequest {
                title: Some("Mountain hike".to_string()),
                ..Default::default()
            },
        )
        .await;

    assert!(events.error().is_none());
    assert_eq!(events.get("e2").unwrap().title, "Mountain hike");
    // Position is kept.
    assert_eq!(events.records()[1].id, "e2");
    assert_eq!(fixture.collection("events")[1]["title"], "Mountain hike");
}

#[tokio::test]
async fn test_update_missing_record_fails_locally() {
    let fixture = TestFixture::new().await;

    let mut events = EventStore::new(fixture.api.clone());
    let err = events
        .try_update("nope", UpdateEventRequest::default())
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(events.error(), Some("Event not found"));
    assert_eq!(fixture.request_count(), 0);
}

#[tokio::test]
async fn test_update_of_record_deleted_on_server() {
    let fixture = TestFixture::new().await;
    seed_events(&fixture);

    let mut events = EventStore::new(fixture.api.clone());
    events.fetch_all().await;
    fixture.seed("events", json!([]));

    let err = events
        .try_update(
            "e1",
            UpdateEventRequest {
                location: Some("Park".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(events.error(), Some("Record not found"));
    assert_eq!(events.get("e1").unwrap().location, None);
}

#[tokio::test]
async fn test_delete_after_confirmation() {
    let fixture = TestFixture::new().await;
    seed_events(&fixture);

    let mut events = EventStore::new(fixture.api.clone());
    events.fetch_all().await;

    fixture.fail_next(500, json!({ "message": "Cannot delete right now" }));
    events.delete("e1").await;
    assert_eq!(events.error(), Some("Cannot delete right now"));
    assert!(events.get("e1").is_some());

    events.delete("e1").await;
    assert!(events.error().is_none());
    assert!(events.get("e1").is_none());
    assert_eq!(fixture.collection("events").len(), 1);

    let err = events.try_delete("e1").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_timeout_is_reported() {
    let fixture = TestFixture::with_timeout(Duration::from_millis(200)).await;
    seed_events(&fixture);
    fixture.set_delay(Duration::from_secs(2));

    let mut events = EventStore::new(fixture.api.clone());
    let err = events.try_fetch_all().await.unwrap_err();

    assert!(matches!(err, AppError::Timeout(_)));
    assert_eq!(events.error(), Some("Request timed out after 200ms"));
    assert!(events.records().is_empty());
}

// ==================== BUDGET ====================

fn income(title: &str, category: &str, amount: f64) -> CreateBudgetRequest {
    CreateBudgetRequest {
        title: title.to_string(),
        entry_type: EntryType::Income,
        category: category.to_string(),
        amount,
        date: "2026-05-03".to_string(),
        notes: None,
    }
}

#[tokio::test]
async fn test_budget_category_corrected_on_add() {
    let fixture = TestFixture::new().await;
    let storage: Arc<dyn LocalStorage> = Arc::new(MemoryStorage::new());

    let mut budget = BudgetStore::new(fixture.api.clone(), storage);
    let entry = budget.try_add(income("Car wash", "indoor", 85.0)).await.unwrap();

    assert_eq!(entry.category, "donation");
    assert_eq!(fixture.collection("budget")[0]["category"], "donation");
    assert_eq!(fixture.collection("budget")[0]["type"], "income");
}

#[tokio::test]
async fn test_budget_category_corrected_on_type_change() {
    let fixture = TestFixture::new().await;
    let storage: Arc<dyn LocalStorage> = Arc::new(MemoryStorage::new());

    let mut budget = BudgetStore::new(fixture.api.clone(), storage);
    let entry = budget.try_add(income("Bake sale", "fundraiser", 60.0)).await.unwrap();

    budget
        .update(
            &entry.id,
            UpdateBudgetRequest {
                entry_type: Some(EntryType::Expense),
                ..Default::default()
            },
        )
        .await;

    let updated = budget.get(&entry.id).unwrap();
    assert_eq!(updated.entry_type, EntryType::Expense);
    assert_eq!(updated.category, "indoor");
}

#[tokio::test]
async fn test_budget_cache_and_summary() {
    let fixture = TestFixture::new().await;
    fixture.seed(
        "budget",
        json!([
            { "id": "b1", "title": "Offering", "type": "income", "category": "offering", "amount": 200.0, "date": "2026-05-01" },
            { "id": "b2", "title": "Snacks", "type": "expense", "category": "food", "amount": 35.5, "date": "2026-05-02" }
        ]),
    );
    let storage: Arc<dyn LocalStorage> = Arc::new(MemoryStorage::new());

    let mut budget = BudgetStore::new(fixture.api.clone(), storage.clone());
    budget.fetch_all().await;
    assert!(storage.get_item(BUDGET_STORAGE_KEY).unwrap().is_some());

    budget.delete("b2").await;
    let summary = budget.summary();
    assert_eq!(summary.income, 200.0);
    assert_eq!(summary.expense, 0.0);
    assert_eq!(summary.balance, 200.0);

    // A fresh store starts from the cache even when the backend is down.
    fixture.fail_next(500, Value::Null);
    let mut reopened = BudgetStore::new(fixture.api.clone(), storage);
    reopened.fetch_all().await;
    assert_eq!(reopened.error(), Some("Failed to load budget entries"));
    assert_eq!(reopened.records().len(), 1);
    assert_eq!(reopened.records()[0].id, "b1");
}

#[tokio::test]
async fn test_budget_invalid_amount_not_sent() {
    let fixture = TestFixture::new().await;
    let storage: Arc<dyn LocalStorage> = Arc::new(MemoryStorage::new());

    let mut budget = BudgetStore::new(fixture.api.clone(), storage.clone());
    budget.add(income("Refund", "donation", -5.0)).await;

    assert_eq!(budget.error(), Some("Amount must be greater than zero"));
    assert_eq!(fixture.request_count(), 0);
    assert!(storage.get_item(BUDGET_STORAGE_KEY).unwrap().is_none());
}

// ==================== POLLS ====================

fn seed_poll(fixture: &TestFixture) {
    fixture.seed(
        "polls",
        json!([
            { "id": "p1", "title": "Retreat venue", "options": ["Lake", "Forest"], "votes": [], "active": true }
        ]),
    );
}

#[tokio::test]
async fn test_vote_replaces_poll_with_server_tally() {
    let fixture = TestFixture::new().await;
    seed_poll(&fixture);

    let mut polls = PollStore::new(fixture.api.clone());
    polls.fetch_all().await;

    polls.vote("p1", "u1", "Lake").await;
    polls.vote("p1", "u2", "Forest").await;
    polls.vote("p1", "u1", "Forest").await;
    assert!(polls.error().is_none());

    let poll = polls.get("p1").unwrap();
    assert_eq!(poll.total_votes(), 2);
    let tally = poll.tally();
    assert_eq!(tally[0].votes, 0);
    assert_eq!(tally[1].votes, 2);
    assert_eq!(tally[1].percentage, 100.0);
}

#[tokio::test]
async fn test_vote_on_unknown_poll() {
    let fixture = TestFixture::new().await;

    let mut polls = PollStore::new(fixture.api.clone());
    let err = polls.try_vote("missing", "u1", "Lake").await.unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(polls.error(), Some("Poll not found"));
    assert_eq!(fixture.request_count(), 0);
}

#[tokio::test]
async fn test_update_poll_returns_and_records_error() {
    let fixture = TestFixture::new().await;
    seed_poll(&fixture);

    let mut polls = PollStore::new(fixture.api.clone());
    polls.fetch_all().await;

    fixture.fail_next(409, json!({ "error": "Poll already has votes" }));
    let err = polls
        .update_poll(
            "p1",
            UpdatePollRequest {
                options: Some(vec!["Lake".to_string(), "Beach".to_string()]),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Api { status: 409, .. }));
    assert_eq!(polls.error(), Some("Poll already has votes"));

    let closed = polls
        .update_poll(
            "p1",
            UpdatePollRequest {
                active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(!closed.active);
    assert!(polls.error().is_none());
}

// ==================== NOTIFICATIONS ====================

#[tokio::test]
async fn test_mark_read_and_mark_all_read() {
    let fixture = TestFixture::new().await;
    fixture.seed(
        "notifications",
        json!([
            { "id": "n1", "title": "Camp", "message": "Forms due Friday", "read": false },
            { "id": "n2", "title": "Poll", "message": "Vote on the retreat", "read": false },
            { "id": "n3", "title": "Welcome", "message": "Glad you joined", "read": true }
        ]),
    );

    let mut notifications = NotificationStore::new(fixture.api.clone());
    notifications.fetch_all().await;
    assert_eq!(notifications.unread_count(), 2);

    notifications.mark_read("n1").await;
    assert_eq!(notifications.unread_count(), 1);
    assert!(notifications.get("n1").unwrap().read);

    let before = fixture.request_count();
    notifications.mark_all_read().await;
    assert_eq!(notifications.unread_count(), 0);
    // Only the one unread notification was patched.
    assert_eq!(fixture.request_count(), before + 1);
}

#[tokio::test]
async fn test_mark_all_read_keeps_going_after_failure() {
    let fixture = TestFixture::new().await;
    fixture.seed(
        "notifications",
        json!([
            { "id": "n1", "title": "A", "message": "a", "read": false },
            { "id": "n2", "title": "B", "message": "b", "read": false }
        ]),
    );

    let mut notifications = NotificationStore::new(fixture.api.clone());
    notifications.fetch_all().await;

    fixture.fail_next(500, Value::Null);
    let err = notifications.try_mark_all_read().await.unwrap_err();

    assert!(matches!(err, AppError::Api { status: 500, .. }));
    assert_eq!(notifications.error(), Some("Failed to update notifications"));
    assert_eq!(notifications.unread_count(), 1);
    assert!(notifications.get("n2").unwrap().read);
}
