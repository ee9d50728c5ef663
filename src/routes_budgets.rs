// --------------------------------------------------
// Budget page endpoints.
//
// Responsibilities:
// - List budget items with filters and urgency badges
// - Create items with a due date from the budget deadline policy
// - Replace / remove items by id
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
use crate::models::{BudgetItem, BudgetStatus, PriorityLevel};
use crate::state::AppState;
use crate::urgency::{Urgency, UrgencyCounts};

const SEARCH_FIELDS: [&str; 3] = ["title", "discipline", "notes"];

#[derive(Debug, Serialize)]
pub struct BudgetView<'a> {
    #[serde(flatten)]
    pub item: &'a BudgetItem,
    pub urgency: Urgency,
}

#[derive(Debug, Serialize)]
pub struct BudgetsResponse<'a> {
    pub now: String,
    pub items: Vec<BudgetView<'a>>,
    pub summary: UrgencyCounts,
    pub total_amount: f64,
}

// -----------------------------
// GET /api/budgets
// -----------------------------
pub async fn list_budgets(State(state): State<AppState>, Query(q): Query<ListQuery>) -> Response {
    let filter = match q.to_filter(&SEARCH_FIELDS) {
        Ok(f) => f,
        Err(e) => return engine_error(e),
    };
    let now = state.clock.now();
    let db = state.db.read().await;
    let urgency = db.settings.budget_urgency();

    let items: Vec<BudgetView> = filter
        .filter(&db.workspace.budgets)
        .into_iter()
        .map(|item| BudgetView {
            item,
            urgency: urgency.classify_record(item, now),
        })
        .collect();

    let summary = items.iter().map(|v| v.urgency.bucket).collect();
    let total_amount = items.iter().map(|v| v.item.amount).sum();

    Json(BudgetsResponse {
        now: now.to_rfc3339(),
        items,
        summary,
        total_amount,
    })
    .into_response()
}

#[derive(Debug, Deserialize)]
pub struct BudgetInput {
    pub title: String,
    pub discipline: String,
    pub amount: f64,
    pub priority: PriorityLevel,
    pub status: Option<BudgetStatus>,
    pub notes: Option<String>,
}

// -----------------------------
// POST /api/budgets
// -----------------------------
pub async fn create_budget(State(state): State<AppState>, Json(input): Json<BudgetInput>) -> Response {
    if input.title.trim().is_empty() {
        return (StatusCode::BAD_REQUEST, "title required").into_response();
    }

    let now = state.clock.now();
    let mut db = state.db.write().await;

    let due_at = match deadline::compute(now, input.priority, &db.settings.budget_policy) {
        Ok(d) => d,
        Err(e) => return engine_error(e),
    };

    let item = BudgetItem {
        id: Uuid::new_v4(),
        title: input.title,
        discipline: input.discipline,
        amount: input.amount,
        priority: input.priority,
        status: input.status.unwrap_or(BudgetStatus::Pending),
        created_at: now,
        due_at,
        notes: input.notes,
    };

    tracing::info!(id = %item.id, priority = %item.priority, due_at = %item.due_at, "budget created");
    db.workspace.budgets.push(item.clone());

    Json(item).into_response()
}

// -----------------------------
// PUT /api/budgets/:id
// Whole-record replacement; the due date follows the new priority
// -----------------------------
pub async fn update_budget(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<BudgetInput>,
) -> Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    if input.title.trim().is_empty() {
        return (StatusCode::BAD_REQUEST, "title required").into_response();
    }

    let mut db = state.db.write().await;
    let Some(pos) = db.workspace.budgets.iter().position(|b| b.id == id) else {
        return not_found("budget");
    };

    let created_at = db.workspace.budgets[pos].created_at;
    let due_at = match deadline::compute(created_at, input.priority, &db.settings.budget_policy) {
        Ok(d) => d,
        Err(e) => return engine_error(e),
    };

    let replacement = BudgetItem {
        id,
        title: input.title,
        discipline: input.discipline,
        amount: input.amount,
        priority: input.priority,
        status: input.status.unwrap_or(db.workspace.budgets[pos].status),
        created_at,
        due_at,
        notes: input.notes,
    };
    db.workspace.budgets[pos] = replacement.clone();
    tracing::info!(%id, "budget replaced");

    Json(replacement).into_response()
}

// -----------------------------
// DELETE /api/budgets/:id
// -----------------------------
pub async fn delete_budget(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let mut db = state.db.write().await;
    let before = db.workspace.budgets.len();
    db.workspace.budgets.retain(|b| b.id != id);

    if db.workspace.budgets.len() == before {
        return not_found("budget");
    }
    tracing::info!(%id, "budget removed");

    Json(serde_json::json!({ "ok": true })).into_response()
}
