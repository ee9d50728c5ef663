// --------------------------------------------------
// Important dates endpoints.
//
// Deadlines come from a selectable day count (1/3/5/7/15) rather than a
// priority policy. This is the only page backed by the on-disk cache:
// every change is written before it is committed to memory.
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
use crate::models::{DateStatus, ImportantDate};
use crate::state::AppState;
use crate::urgency::{Urgency, UrgencyCounts, active_notice};

const SEARCH_FIELDS: [&str; 3] = ["title", "category", "notes"];

#[derive(Debug, Serialize)]
pub struct DateView<'a> {
    #[serde(flatten)]
    pub item: &'a ImportantDate,
    pub urgency: Urgency,
    // tightest advance-notice window reached, if any
    pub notice: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct DatesResponse<'a> {
    pub now: String,
    pub items: Vec<DateView<'a>>,
    // pending dates only
    pub summary: UrgencyCounts,
    pub completed: usize,
}

// -----------------------------
// GET /api/dates
// -----------------------------
pub async fn list_dates(State(state): State<AppState>, Query(q): Query<ListQuery>) -> Response {
    let filter = match q.to_filter_without_priority(&SEARCH_FIELDS) {
        Ok(f) => f,
        Err(e) => return engine_error(e),
    };
    let now = state.clock.now();
    let db = state.db.read().await;
    let urgency = db.settings.dates_urgency();
    let windows = &db.settings.advance_notice_days;

    let items: Vec<DateView> = filter
        .filter(&db.workspace.important_dates)
        .into_iter()
        .map(|item| {
            let u = urgency.classify_record(item, now);
            let notice = match item.status {
                DateStatus::Completed => None,
                DateStatus::Pending => active_notice(u.days_remaining, windows),
            };
            DateView {
                item,
                urgency: u,
                notice,
            }
        })
        .collect();

    let summary = items
        .iter()
        .filter(|v| v.item.status == DateStatus::Pending)
        .map(|v| v.urgency.bucket)
        .collect();
    let completed = items
        .iter()
        .filter(|v| v.item.status == DateStatus::Completed)
        .count();

    Json(DatesResponse {
        now: now.to_rfc3339(),
        items,
        summary,
        completed,
    })
    .into_response()
}

#[derive(Debug, Deserialize)]
pub struct DateInput {
    pub title: String,
    pub category: String,
    pub discipline: String,
    pub notice_days: u32,
    pub status: Option<DateStatus>,
    pub notes: Option<String>,
}

fn save_failed(e: std::io::Error) -> Response {
    tracing::error!(error = %e, "failed to write important dates cache");
    (StatusCode::INTERNAL_SERVER_ERROR, "failed to save important dates").into_response()
}

// -----------------------------
// POST /api/dates
// -----------------------------
pub async fn create_date(State(state): State<AppState>, Json(input): Json<DateInput>) -> Response {
    if input.title.trim().is_empty() {
        return (StatusCode::BAD_REQUEST, "title required").into_response();
    }

    let now = state.clock.now();
    let due_at = match deadline::validate_notice_days(input.notice_days)
        .and_then(|days| deadline::compute_with_offset(now, days))
    {
        Ok(d) => d,
        Err(e) => return engine_error(e),
    };

    let item = ImportantDate {
        id: Uuid::new_v4(),
        title: input.title,
        category: input.category,
        discipline: input.discipline,
        notice_days: input.notice_days,
        status: input.status.unwrap_or(DateStatus::Pending),
        created_at: now,
        due_at,
        notes: input.notes,
    };

    let mut db = state.db.write().await;
    let mut dates = db.workspace.important_dates.clone();
    dates.push(item.clone());

    if let Err(e) = state.store.save_important_dates(&dates) {
        return save_failed(e);
    }
    db.workspace.important_dates = dates;
    tracing::info!(id = %item.id, notice_days = item.notice_days, due_at = %item.due_at, "important date created");

    Json(item).into_response()
}

// -----------------------------
// PUT /api/dates/:id
// -----------------------------
pub async fn update_date(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<DateInput>,
) -> Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    if input.title.trim().is_empty() {
        return (StatusCode::BAD_REQUEST, "title required").into_response();
    }

    let mut db = state.db.write().await;
    let Some(current) = db.workspace.important_dates.iter().find(|d| d.id == id) else {
        return not_found("important date");
    };

    let created_at = current.created_at;
    let status = input.status.unwrap_or(current.status);
    let due_at = match deadline::validate_notice_days(input.notice_days)
        .and_then(|days| deadline::compute_with_offset(created_at, days))
    {
        Ok(d) => d,
        Err(e) => return engine_error(e),
    };

    let replacement = ImportantDate {
        id,
        title: input.title,
        category: input.category,
        discipline: input.discipline,
        notice_days: input.notice_days,
        status,
        created_at,
        due_at,
        notes: input.notes,
    };

    let dates: Vec<ImportantDate> = db
        .workspace
        .important_dates
        .iter()
        .map(|d| if d.id == id { replacement.clone() } else { d.clone() })
        .collect();

    if let Err(e) = state.store.save_important_dates(&dates) {
        return save_failed(e);
    }
    db.workspace.important_dates = dates;
    tracing::info!(%id, "important date replaced");

    Json(replacement).into_response()
}

// -----------------------------
// DELETE /api/dates/:id
// -----------------------------
pub async fn delete_date(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let mut db = state.db.write().await;
    let dates: Vec<ImportantDate> = db
        .workspace
        .important_dates
        .iter()
        .filter(|d| d.id != id)
        .cloned()
        .collect();

    if dates.len() == db.workspace.important_dates.len() {
        return not_found("important date");
    }
    if let Err(e) = state.store.save_important_dates(&dates) {
        return save_failed(e);
    }
    db.workspace.important_dates = dates;
    tracing::info!(%id, "important date removed");

    Json(serde_json::json!({ "ok": true })).into_response()
}
