//! Deadline and status classification for MEP coordination records.
//!
//! The engine is a handful of pure functions:
//! - [`deadline`]: priority policy to due date
//! - [`urgency`]: due date and "now" to overdue / due soon / normal
//! - [`variance`]: planned vs actual progress to a status and a tier
//! - [`filter`]: AND-composed record filters
//!
//! The `routes_*` modules are the pages that call it, served over Axum.

// Engine
pub mod clock;
pub mod deadline;
pub mod error;
pub mod filter;
pub mod models;
pub mod urgency;
pub mod variance;

// Pages, configuration and storage
pub mod api;
pub mod routes_budgets;
pub mod routes_clarifications;
pub mod routes_dates;
pub mod routes_progress;
pub mod routes_settings;
pub mod settings;
pub mod state;
pub mod store;

use axum::{
    Router,
    routing::{get, put},
};
use tower_http::{services::ServeDir, trace::TraceLayer};

pub use error::{EngineError, EngineResult};
pub use state::AppState;

/// API under `/api`, the front end's static files everywhere else.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        // budgets
        .route(
            "/budgets",
            get(routes_budgets::list_budgets).post(routes_budgets::create_budget),
        )
        .route(
            "/budgets/:id",
            put(routes_budgets::update_budget).delete(routes_budgets::delete_budget),
        )
        // scope clarifications
        .route(
            "/clarifications",
            get(routes_clarifications::list_clarifications)
                .post(routes_clarifications::create_clarification),
        )
        .route(
            "/clarifications/:id",
            put(routes_clarifications::update_clarification)
                .delete(routes_clarifications::delete_clarification),
        )
        // important dates
        .route(
            "/dates",
            get(routes_dates::list_dates).post(routes_dates::create_date),
        )
        .route(
            "/dates/:id",
            put(routes_dates::update_date).delete(routes_dates::delete_date),
        )
        // progress tracking
        .route(
            "/progress",
            get(routes_progress::list_progress).post(routes_progress::create_progress),
        )
        .route(
            "/progress/:id",
            put(routes_progress::update_progress).delete(routes_progress::delete_progress),
        )
        // settings
        .route(
            "/settings",
            get(routes_settings::get_settings).put(routes_settings::put_settings),
        )
        .with_state(state);

    Router::new()
        .nest("/api", api)
        .fallback_service(ServeDir::new("static"))
        .layer(TraceLayer::new_for_http())
}
