// --------------------------------------------------
// Scope clarification endpoints (RFI-style questions).
// Same deadline engine as budgets, wider due-soon window.
// --------------------------------------------------

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::{ListQuery, engine_error, not_found, parse_id};
use crate::deadline;
use crate::models::{ClarificationStatus, PriorityLevel, ScopeClarification};
use crate::state::AppState;
use crate::urgency::{Urgency, UrgencyBucket, UrgencyCounts};

const SEARCH_FIELDS: [&str; 4] = ["title", "question", "requested_by", "answer"];

#[derive(Debug, Serialize)]
pub struct ClarificationView<'a> {
    #[serde(flatten)]
    pub item: &'a ScopeClarification,
    pub urgency: Urgency,
}

#[derive(Debug, Serialize)]
pub struct ClarificationsResponse<'a> {
    pub now: String,
    pub items: Vec<ClarificationView<'a>>,
    pub summary: UrgencyCounts,
    pub open_overdue: usize,
}

// -----------------------------
// GET /api/clarifications
// -----------------------------
pub async fn list_clarifications(
    State(state): State<AppState>,
    Query(q): Query<ListQuery>,
) -> Response {
    let filter = match q.to_filter(&SEARCH_FIELDS) {
        Ok(f) => f,
        Err(e) => return engine_error(e),
    };
    let now = state.clock.now();
    let db = state.db.read().await;
    let urgency = db.settings.clarification_urgency();

    let items: Vec<ClarificationView> = filter
        .filter(&db.workspace.clarifications)
        .into_iter()
        .map(|item| ClarificationView {
            item,
            urgency: urgency.classify_record(item, now),
        })
        .collect();

    let summary = items.iter().map(|v| v.urgency.bucket).collect();
    // answered or closed questions no longer count against the schedule
    let open_overdue = items
        .iter()
        .filter(|v| v.item.status == ClarificationStatus::Open)
        .filter(|v| v.urgency.bucket == UrgencyBucket::Overdue)
        .count();

    Json(ClarificationsResponse {
        now: now.to_rfc3339(),
        items,
        summary,
        open_overdue,
    })
    .into_response()
}

#[derive(Debug, Deserialize)]
pub struct ClarificationInput {
    pub title: String,
    pub question: String,
    pub discipline: String,
    pub requested_by: String,
    pub priority: PriorityLevel,
    pub status: Option<ClarificationStatus>,
    pub answer: Option<String>,
}

// -----------------------------
// POST /api/clarifications
// -----------------------------
pub async fn create_clarification(
    State(state): State<AppState>,
    Json(input): Json<ClarificationInput>,
) -> Response {
    if input.title.trim().is_empty() {
        return (StatusCode::BAD_REQUEST, "title required").into_response();
    }

    let now = state.clock.now();
    let mut db = state.db.write().await;

    let due_at = match deadline::compute(now, input.priority, &db.settings.clarification_policy) {
        Ok(d) => d,
        Err(e) => return engine_error(e),
    };

    let item = ScopeClarification {
        id: Uuid::new_v4(),
        title: input.title,
        question: input.question,
        discipline: input.discipline,
        requested_by: input.requested_by,
        priority: input.priority,
        status: input.status.unwrap_or(ClarificationStatus::Open),
        created_at: now,
        due_at,
        answer: input.answer,
    };

    tracing::info!(id = %item.id, priority = %item.priority, due_at = %item.due_at, "clarification created");
    db.workspace.clarifications.push(item.clone());

    Json(item).into_response()
}

// -----------------------------
// PUT /api/clarifications/:id
// -----------------------------
pub async fn update_clarification(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<ClarificationInput>,
) -> Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    if input.title.trim().is_empty() {
        return (StatusCode::BAD_REQUEST, "title required").into_response();
    }

    let mut db = state.db.write().await;
    let Some(pos) = db.workspace.clarifications.iter().position(|c| c.id == id) else {
        return not_found("clarification");
    };

    let current = &db.workspace.clarifications[pos];
    let created_at = current.created_at;
    let status = input.status.unwrap_or(current.status);
    let due_at =
        match deadline::compute(created_at, input.priority, &db.settings.clarification_policy) {
            Ok(d) => d,
            Err(e) => return engine_error(e),
        };

    let replacement = ScopeClarification {
        id,
        title: input.title,
        question: input.question,
        discipline: input.discipline,
        requested_by: input.requested_by,
        priority: input.priority,
        status,
        created_at,
        due_at,
        answer: input.answer,
    };
    db.workspace.clarifications[pos] = replacement.clone();
    tracing::info!(%id, status = status.as_str(), "clarification replaced");

    Json(replacement).into_response()
}

// -----------------------------
// DELETE /api/clarifications/:id
// -----------------------------
pub async fn delete_clarification(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let mut db = state.db.write().await;
    let before = db.workspace.clarifications.len();
    db.workspace.clarifications.retain(|c| c.id != id);

    if db.workspace.clarifications.len() == before {
        return not_found("clarification");
    }
    tracing::info!(%id, "clarification removed");

    Json(serde_json::json!({ "ok": true })).into_response()
}
