// --------------------------------------------------
// Contractor progress tracking endpoints.
//
// Each report carries planned vs actual completion; listings add the
// variance status, its trend and the absolute progress tier.
// --------------------------------------------------

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::{ListQuery, engine_error, not_found, parse_id};
use crate::error::EngineResult;
use crate::models::{ProgressReport, ReportStatus, clamp_progress};
use crate::state::AppState;
use crate::urgency::{Urgency, UrgencyCounts, parse_instant};
use crate::variance::{ProgressTier, ProgressTierClassifier, VarianceBucket, VarianceClassification};

const SEARCH_FIELDS: [&str; 2] = ["contractor", "activity"];

#[derive(Debug, Serialize)]
pub struct ProgressView<'a> {
    #[serde(flatten)]
    pub item: &'a ProgressReport,
    pub urgency: Urgency,
    pub variance: VarianceClassification,
    pub tier: ProgressTier,
}

#[derive(Debug, Default, Serialize, PartialEq)]
pub struct ProgressSummary {
    pub reports: usize,
    pub ahead: usize,
    pub on_track: usize,
    pub at_risk: usize,
    pub delayed: usize,
    pub average_planned: f64,
    pub average_actual: f64,
}

impl ProgressSummary {
    fn from_views(views: &[ProgressView]) -> Self {
        let mut summary = ProgressSummary {
            reports: views.len(),
            ..Default::default()
        };
        if views.is_empty() {
            return summary;
        }

        let mut planned = 0u64;
        let mut actual = 0u64;
        for v in views {
            match v.variance.bucket {
                VarianceBucket::Ahead => summary.ahead += 1,
                VarianceBucket::OnTrack => summary.on_track += 1,
                VarianceBucket::AtRisk => summary.at_risk += 1,
                VarianceBucket::Delayed => summary.delayed += 1,
            }
            planned += u64::from(v.item.planned_progress);
            actual += u64::from(v.item.actual_progress);
        }
        summary.average_planned = planned as f64 / views.len() as f64;
        summary.average_actual = actual as f64 / views.len() as f64;
        summary
    }
}

#[derive(Debug, Serialize)]
pub struct ProgressResponse<'a> {
    pub now: String,
    pub items: Vec<ProgressView<'a>>,
    pub summary: ProgressSummary,
    pub deadlines: UrgencyCounts,
}

// -----------------------------
// GET /api/progress
// -----------------------------
pub async fn list_progress(State(state): State<AppState>, Query(q): Query<ListQuery>) -> Response {
    let filter = match q.to_filter_without_priority(&SEARCH_FIELDS) {
        Ok(f) => f,
        Err(e) => return engine_error(e),
    };
    let now = state.clock.now();
    let db = state.db.read().await;
    let urgency = db.settings.progress_urgency();
    let variance = db.settings.variance_classifier();

    let views: EngineResult<Vec<ProgressView>> = filter
        .filter(&db.workspace.progress_reports)
        .into_iter()
        .map(|item| -> EngineResult<ProgressView> {
            let planned = i64::from(item.planned_progress);
            let actual = i64::from(item.actual_progress);
            Ok(ProgressView {
                item,
                urgency: urgency.classify_record(item, now),
                variance: variance.classify(planned, actual)?,
                tier: ProgressTierClassifier.classify(actual)?,
            })
        })
        .collect();

    // stored values are clamped, so this only trips on a corrupted record
    let items = match views {
        Ok(items) => items,
        Err(e) => {
            tracing::error!(error = %e, "stored progress report failed classification");
            return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response();
        }
    };

    let summary = ProgressSummary::from_views(&items);
    let deadlines = items.iter().map(|v| v.urgency.bucket).collect();

    Json(ProgressResponse {
        now: now.to_rfc3339(),
        items,
        summary,
        deadlines,
    })
    .into_response()
}

#[derive(Debug, Deserialize)]
pub struct ProgressInput {
    pub contractor: String,
    pub activity: String,
    pub discipline: String,
    pub planned_progress: i64,
    pub actual_progress: i64,
    pub status: Option<ReportStatus>,
    pub due_at: String, // RFC3339 or YYYY-MM-DD
}

impl ProgressInput {
    fn into_report(
        self,
        id: Uuid,
        created_at: DateTime<FixedOffset>,
        default_status: ReportStatus,
    ) -> EngineResult<ProgressReport> {
        let due_at = parse_instant(&self.due_at)?;
        Ok(ProgressReport {
            id,
            contractor: self.contractor,
            activity: self.activity,
            discipline: self.discipline,
            planned_progress: clamp_progress(self.planned_progress),
            actual_progress: clamp_progress(self.actual_progress),
            status: self.status.unwrap_or(default_status),
            created_at,
            due_at,
        })
    }
}

// -----------------------------
// POST /api/progress
// -----------------------------
pub async fn create_progress(
    State(state): State<AppState>,
    Json(input): Json<ProgressInput>,
) -> Response {
    if input.contractor.trim().is_empty() {
        return (StatusCode::BAD_REQUEST, "contractor required").into_response();
    }

    let now = state.clock.now();
    let report = match input.into_report(Uuid::new_v4(), now, ReportStatus::Draft) {
        Ok(r) => r,
        Err(e) => return engine_error(e),
    };

    let mut db = state.db.write().await;
    tracing::info!(
        id = %report.id,
        planned = report.planned_progress,
        actual = report.actual_progress,
        "progress report created"
    );
    db.workspace.progress_reports.push(report.clone());

    Json(report).into_response()
}

// -----------------------------
// PUT /api/progress/:id
// -----------------------------
pub async fn update_progress(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<ProgressInput>,
) -> Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    if input.contractor.trim().is_empty() {
        return (StatusCode::BAD_REQUEST, "contractor required").into_response();
    }

    let mut db = state.db.write().await;
    let Some(pos) = db.workspace.progress_reports.iter().position(|r| r.id == id) else {
        return not_found("progress report");
    };

    let current = &db.workspace.progress_reports[pos];
    let replacement = match input.into_report(id, current.created_at, current.status) {
        Ok(r) => r,
        Err(e) => return engine_error(e),
    };
    db.workspace.progress_reports[pos] = replacement.clone();
    tracing::info!(%id, "progress report replaced");

    Json(replacement).into_response()
}

// -----------------------------
// DELETE /api/progress/:id
// -----------------------------
pub async fn delete_progress(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let mut db = state.db.write().await;
    let before = db.workspace.progress_reports.len();
    db.workspace.progress_reports.retain(|r| r.id != id);

    if db.workspace.progress_reports.len() == before {
        return not_found("progress report");
    }
    tracing::info!(%id, "progress report removed");

    Json(serde_json::json!({ "ok": true })).into_response()
}
