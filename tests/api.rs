//! Router tests with a pinned clock and a throwaway data directory.

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use chrono::DateTime;
use mep_tracker::{
    AppState, app,
    clock::FixedClock,
    state::Db,
    store::Store,
};
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

fn temp_store() -> Store {
    Store::new(std::env::temp_dir().join(format!("mep-api-{}", Uuid::new_v4())))
}

fn router_at(now: &str, store: Store) -> Router {
    let clock = FixedClock(DateTime::parse_from_rfc3339(now).unwrap());
    app(AppState::new(Db::default(), clock, store))
}

async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(b) => builder
            .header("content-type", "application/json")
            .body(Body::from(b.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn urgent_budget_gets_one_day_deadline() {
    let router = router_at("2025-06-03T08:00:00Z", temp_store());

    let (status, created) = send(
        &router,
        "POST",
        "/api/budgets",
        Some(json!({
            "title": "Chiller replacement",
            "discipline": "mechanical",
            "amount": 125000.0,
            "priority": "urgente"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["priority"], "critical");
    assert_eq!(created["status"], "pending");
    assert_eq!(
        DateTime::parse_from_rfc3339(created["due_at"].as_str().unwrap()).unwrap(),
        DateTime::parse_from_rfc3339("2025-06-04T08:00:00Z").unwrap()
    );

    let (status, listing) = send(&router, "GET", "/api/budgets", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listing["items"][0]["title"], "Chiller replacement");
    assert_eq!(listing["items"][0]["urgency"]["days_remaining"], 1);
    assert_eq!(listing["items"][0]["urgency"]["bucket"], "due_soon");
    assert_eq!(listing["summary"]["due_soon"], 1);
}

#[tokio::test]
async fn budget_filters_and_replacement() {
    let router = router_at("2025-06-03T08:00:00Z", temp_store());

    for (title, discipline, priority) in [
        ("Switchgear", "electrical", "high"),
        ("Booster pumps", "plumbing", "low"),
        ("Panel schedules", "electrical", "medium"),
    ] {
        let (status, _) = send(
            &router,
            "POST",
            "/api/budgets",
            Some(json!({
                "title": title,
                "discipline": discipline,
                "amount": 1000.0,
                "priority": priority
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, electrical) = send(&router, "GET", "/api/budgets?discipline=electrical&status=all", None).await;
    let titles: Vec<&str> = electrical["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["Switchgear", "Panel schedules"]);

    let (_, searched) = send(&router, "GET", "/api/budgets?q=PUMP", None).await;
    assert_eq!(searched["items"].as_array().unwrap().len(), 1);
    let id = searched["items"][0]["id"].as_str().unwrap().to_string();

    // raising the priority pulls the deadline in from 7 days to 3
    let (status, replaced) = send(
        &router,
        "PUT",
        &format!("/api/budgets/{id}"),
        Some(json!({
            "title": "Booster pumps",
            "discipline": "plumbing",
            "amount": 1500.0,
            "priority": "high",
            "status": "approved"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(replaced["status"], "approved");
    assert_eq!(
        DateTime::parse_from_rfc3339(replaced["due_at"].as_str().unwrap()).unwrap(),
        DateTime::parse_from_rfc3339("2025-06-06T08:00:00Z").unwrap()
    );

    let (_, approved) = send(&router, "GET", "/api/budgets?status=approved", None).await;
    assert_eq!(approved["items"].as_array().unwrap().len(), 1);

    let (status, _) = send(&router, "DELETE", &format!("/api/budgets/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&router, "DELETE", &format!("/api/budgets/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_priority_filter_is_rejected() {
    let router = router_at("2025-06-03T08:00:00Z", temp_store());
    let (status, _) = send(&router, "GET", "/api/budgets?priority=whenever", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_policy_entry_is_a_bad_request() {
    let router = router_at("2025-06-03T08:00:00Z", temp_store());

    let (status, _) = send(
        &router,
        "PUT",
        "/api/settings",
        Some(json!({ "clarification_policy": { "critical": 1, "high": 2 } })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &router,
        "POST",
        "/api/clarifications",
        Some(json!({
            "title": "Sleeve sizes at grid C",
            "question": "Confirm sleeve sizes for 6in CW",
            "discipline": "plumbing",
            "requested_by": "Aqua MEP",
            "priority": "low"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn clarifications_use_three_day_window() {
    let router = router_at("2025-06-03T08:00:00Z", temp_store());

    let (_, created) = send(
        &router,
        "POST",
        "/api/clarifications",
        Some(json!({
            "title": "Duct routing at level 2",
            "question": "Can the main run drop below the beam?",
            "discipline": "mechanical",
            "requested_by": "Norte HVAC",
            "priority": "high"
        })),
    )
    .await;
    assert_eq!(created["status"], "open");

    let (_, listing) = send(&router, "GET", "/api/clarifications", None).await;
    assert_eq!(listing["items"][0]["urgency"]["days_remaining"], 3);
    assert_eq!(listing["items"][0]["urgency"]["bucket"], "due_soon");
    assert_eq!(listing["open_overdue"], 0);
}

#[tokio::test]
async fn important_dates_are_cached_on_disk() {
    let store = temp_store();
    let router = router_at("2025-06-03T08:00:00Z", store.clone());

    let (status, created) = send(
        &router,
        "POST",
        "/api/dates",
        Some(json!({
            "title": "Fire alarm acceptance test",
            "category": "inspection",
            "discipline": "electrical",
            "notice_days": 5
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        DateTime::parse_from_rfc3339(created["due_at"].as_str().unwrap()).unwrap(),
        DateTime::parse_from_rfc3339("2025-06-08T08:00:00Z").unwrap()
    );

    let (_, listing) = send(&router, "GET", "/api/dates", None).await;
    assert_eq!(listing["items"][0]["urgency"]["bucket"], "normal");
    assert_eq!(listing["items"][0]["notice"], 7);

    // a fresh process sees the cached record
    let reloaded = AppState::load(store.clone(), FixedClock(
        DateTime::parse_from_rfc3339("2025-06-07T09:00:00Z").unwrap(),
    ))
    .unwrap();
    let router = app(reloaded);
    let (_, listing) = send(&router, "GET", "/api/dates", None).await;
    assert_eq!(listing["items"].as_array().unwrap().len(), 1);
    assert_eq!(listing["items"][0]["notice"], 1);

    let (status, _) = send(
        &router,
        "POST",
        "/api/dates",
        Some(json!({
            "title": "Bad notice",
            "category": "meeting",
            "discipline": "plumbing",
            "notice_days": 2
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let _ = std::fs::remove_dir_all(store.dir());
}

#[tokio::test]
async fn progress_reports_carry_variance_and_tier() {
    let router = router_at("2025-06-03T08:00:00Z", temp_store());

    for (contractor, planned, actual) in [("Norte HVAC", 70, 75), ("Aqua MEP", 60, 45), ("Volt Co", 95, 95)] {
        let (status, _) = send(
            &router,
            "POST",
            "/api/progress",
            Some(json!({
                "contractor": contractor,
                "activity": "Rough-in",
                "discipline": "mechanical",
                "planned_progress": planned,
                "actual_progress": actual,
                "due_at": "2025-06-30"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, listing) = send(&router, "GET", "/api/progress", None).await;
    let items = listing["items"].as_array().unwrap();
    assert_eq!(items[0]["variance"]["variance"], 5);
    assert_eq!(items[0]["variance"]["bucket"], "ahead");
    assert_eq!(items[0]["variance"]["trend"], "up");
    assert_eq!(items[0]["tier"], "poor");
    assert_eq!(items[1]["variance"]["bucket"], "delayed");
    assert_eq!(items[1]["tier"], "critical");
    assert_eq!(items[2]["variance"]["bucket"], "on_track");
    assert_eq!(items[2]["tier"], "excellent");

    assert_eq!(listing["summary"]["reports"], 3);
    assert_eq!(listing["summary"]["delayed"], 1);
    assert_eq!(listing["deadlines"]["normal"], 3);
}

#[tokio::test]
async fn progress_input_is_clamped_and_dates_validated() {
    let router = router_at("2025-06-03T08:00:00Z", temp_store());

    let (status, created) = send(
        &router,
        "POST",
        "/api/progress",
        Some(json!({
            "contractor": "Volt Co",
            "activity": "Terminations",
            "discipline": "electrical",
            "planned_progress": 120,
            "actual_progress": -4,
            "due_at": "2025-06-10T17:00:00-05:00"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["planned_progress"], 100);
    assert_eq!(created["actual_progress"], 0);

    let (status, _) = send(
        &router,
        "POST",
        "/api/progress",
        Some(json!({
            "contractor": "Volt Co",
            "activity": "Terminations",
            "discipline": "electrical",
            "planned_progress": 10,
            "actual_progress": 10,
            "due_at": "soon"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn settings_round_trip_through_the_store() {
    let store = temp_store();
    let router = router_at("2025-06-03T08:00:00Z", store.clone());

    let (status, saved) = send(
        &router,
        "PUT",
        "/api/settings",
        Some(json!({ "variance": { "boundary": "inclusive" } })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(saved["variance"]["delayed_threshold"], -5);
    assert_eq!(saved["budget_policy"]["critical"], 1);

    let loaded = store.load_settings().unwrap().unwrap();
    assert_eq!(
        loaded.variance,
        mep_tracker::variance::VariancePolicy::inclusive()
    );

    let (status, _) = send(
        &router,
        "PUT",
        "/api/settings",
        Some(json!({ "budget_policy": { "critical": 10, "low": 1 } })),
    )
    .await;
    assert!(status.is_client_error());

    let _ = std::fs::remove_dir_all(store.dir());
}

#[tokio::test]
async fn completed_dates_leave_the_overdue_tally() {
    let store = temp_store();
    let router = router_at("2025-06-03T08:00:00Z", store.clone());

    for (title, status) in [("Duct pressure test", "completed"), ("Sprinkler flush", "pending")] {
        let (code, _) = send(
            &router,
            "POST",
            "/api/dates",
            Some(json!({
                "title": title,
                "category": "inspection",
                "discipline": "mechanical",
                "notice_days": 1,
                "status": status
            })),
        )
        .await;
        assert_eq!(code, StatusCode::OK);
    }

    let reloaded = AppState::load(store.clone(), FixedClock(
        DateTime::parse_from_rfc3339("2025-06-20T08:00:00Z").unwrap(),
    ))
    .unwrap();
    let router = app(reloaded);
    let (status, listing) = send(&router, "GET", "/api/dates", None).await;
    assert_eq!(status, StatusCode::OK);

    let items = listing["items"].as_array().unwrap();
    assert_eq!(items[0]["status"], "completed");
    assert_eq!(items[0]["notice"], Value::Null);
    assert_eq!(listing["summary"]["overdue"], 1);
    assert_eq!(listing["summary"]["due_soon"], 0);
    assert_eq!(listing["summary"]["normal"], 0);
    assert_eq!(listing["completed"], 1);

    let (_, only_done) = send(&router, "GET", "/api/dates?status=completed", None).await;
    assert_eq!(only_done["summary"]["overdue"], 0);
    assert_eq!(only_done["completed"], 1);

    let _ = std::fs::remove_dir_all(store.dir());
}

#[tokio::test]
async fn pages_without_priority_refuse_the_filter() {
    let router = router_at("2025-06-03T08:00:00Z", temp_store());

    let (status, _) = send(&router, "GET", "/api/progress?priority=high", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = send(&router, "GET", "/api/dates?priority=critical", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, listing) = send(&router, "GET", "/api/progress?priority=all", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listing["summary"]["reports"], 0);
}

#[tokio::test]
async fn progress_deadlines_use_their_own_window() {
    let router = router_at("2025-06-03T08:00:00Z", temp_store());

    let (status, _) = send(
        &router,
        "POST",
        "/api/progress",
        Some(json!({
            "contractor": "Norte HVAC",
            "activity": "Balancing",
            "discipline": "mechanical",
            "planned_progress": 40,
            "actual_progress": 40,
            "due_at": "2025-06-05T08:00:00Z"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &router,
        "PUT",
        "/api/settings",
        Some(json!({ "budget_warn_window_days": 10 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (_, listing) = send(&router, "GET", "/api/progress", None).await;
    assert_eq!(listing["items"][0]["urgency"]["bucket"], "normal");

    let (status, _) = send(
        &router,
        "PUT",
        "/api/settings",
        Some(json!({ "progress_warn_window_days": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (_, listing) = send(&router, "GET", "/api/progress", None).await;
    assert_eq!(listing["items"][0]["urgency"]["bucket"], "due_soon");
    assert_eq!(listing["deadlines"]["due_soon"], 1);
}
