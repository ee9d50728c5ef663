// Pieces shared by the page handlers: list queries and error responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::filter::RecordFilter;
use crate::models::PriorityLevel;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
    pub discipline: Option<String>,
    pub priority: Option<String>,
    pub q: Option<String>,
}

// Select boxes send "all" (or nothing) for "no filter"
fn selected(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
}

impl ListQuery {
    /// For pages whose records carry no priority.
    pub fn to_filter_without_priority(&self, search_fields: &[&str]) -> EngineResult<RecordFilter> {
        if let Some(priority) = selected(&self.priority) {
            return Err(EngineError::InvalidInput(format!(
                "priority filter `{priority}` is not supported on this page"
            )));
        }
        self.to_filter(search_fields)
    }

    pub fn to_filter(&self, search_fields: &[&str]) -> EngineResult<RecordFilter> {
        let mut filter = RecordFilter::new();
        if let Some(status) = selected(&self.status) {
            filter = filter.status(status);
        }
        if let Some(discipline) = selected(&self.discipline) {
            filter = filter.discipline(discipline);
        }
        if let Some(priority) = selected(&self.priority) {
            filter = filter.priority(priority.parse::<PriorityLevel>()?);
        }
        if let Some(q) = self.q.as_deref().filter(|q| !q.is_empty()) {
            filter = filter.search(q, search_fields.iter().copied());
        }
        Ok(filter)
    }
}

pub fn engine_error(e: EngineError) -> Response {
    (StatusCode::BAD_REQUEST, e.to_string()).into_response()
}

pub fn parse_id(id: &str) -> Result<Uuid, Response> {
    Uuid::parse_str(id).map_err(|_| (StatusCode::BAD_REQUEST, "invalid id").into_response())
}

pub fn not_found(what: &'static str) -> Response {
    (StatusCode::NOT_FOUND, format!("{what} not found")).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_and_blank_mean_unset() {
        let q = ListQuery {
            status: Some("all".to_string()),
            discipline: Some("  ".to_string()),
            priority: None,
            q: Some(String::new()),
        };
        assert_eq!(q.to_filter(&["title"]).unwrap(), RecordFilter::new());
    }

    #[test]
    fn priority_aliases_are_normalised() {
        let q = ListQuery {
            priority: Some("urgente".to_string()),
            ..ListQuery::default()
        };
        let f = q.to_filter(&[]).unwrap();
        assert_eq!(f.priority.as_deref(), Some("critical"));
    }

    #[test]
    fn unknown_priority_is_an_error() {
        let q = ListQuery {
            priority: Some("asap".to_string()),
            ..ListQuery::default()
        };
        assert!(matches!(q.to_filter(&[]), Err(EngineError::InvalidInput(_))));
    }

    #[test]
    fn priority_is_refused_where_records_have_none() {
        let q = ListQuery {
            priority: Some("high".to_string()),
            ..ListQuery::default()
        };
        assert!(matches!(
            q.to_filter_without_priority(&["contractor"]),
            Err(EngineError::InvalidInput(_))
        ));

        let all = ListQuery {
            priority: Some("all".to_string()),
            ..ListQuery::default()
        };
        assert_eq!(all.to_filter_without_priority(&[]).unwrap(), RecordFilter::new());
    }
}
