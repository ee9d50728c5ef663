// -----------------------------
// GET /api/settings
// PUT /api/settings
// Per-page deadline policies, warn windows and the variance boundary.
// Policies are validated while the body is deserialized.
// -----------------------------

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::settings::Settings;
use crate::state::AppState;

pub async fn get_settings(State(state): State<AppState>) -> Response {
    let db = state.db.read().await;
    Json(db.settings.clone()).into_response()
}

pub async fn put_settings(State(state): State<AppState>, Json(settings): Json<Settings>) -> Response {
    let mut db = state.db.write().await;
    if let Err(e) = state.store.save_settings(&settings) {
        tracing::error!(error = %e, "failed to write settings");
        return (StatusCode::INTERNAL_SERVER_ERROR, "failed to save settings").into_response();
    }

    db.settings = settings;
    tracing::info!(
        budget_window = db.settings.budget_warn_window_days,
        clarification_window = db.settings.clarification_warn_window_days,
        "settings replaced"
    );

    Json(db.settings.clone()).into_response()
}
