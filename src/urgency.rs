/*
Urgency classification of a due date against an explicit "now".
Nothing here reads the system clock.
*/

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::TrackedRecord;

/// Budgets flag anything due within a day.
pub const BUDGET_WARN_WINDOW_DAYS: u32 = 1;
/// Scope clarifications flag anything due within three days.
pub const CLARIFICATION_WARN_WINDOW_DAYS: u32 = 3;
/// Advance-notice windows for important dates, widest first.
pub const ADVANCE_NOTICE_DAYS: [u32; 3] = [7, 3, 1];

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum UrgencyBucket {
    Overdue,
    DueSoon,
    Normal,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Urgency {
    pub days_remaining: i64,
    pub bucket: UrgencyBucket,
}

/// Signed whole days until `due_at`, rounded away from zero.
///
/// Future due dates round up (12h left is 1 day), past ones round down
/// (16h late is -1 day), so the result is negative exactly when the due
/// date is already behind `now`.
pub fn days_remaining(due_at: DateTime<FixedOffset>, now: DateTime<FixedOffset>) -> i64 {
    let ms = (due_at - now).num_milliseconds();
    if ms >= 0 {
        (ms + DAY_MS - 1) / DAY_MS
    } else {
        -((-ms + DAY_MS - 1) / DAY_MS)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UrgencyClassifier {
    pub warn_window_days: u32,
}

impl Default for UrgencyClassifier {
    fn default() -> Self {
        Self::new(BUDGET_WARN_WINDOW_DAYS)
    }
}

impl UrgencyClassifier {
    pub fn new(warn_window_days: u32) -> Self {
        Self { warn_window_days }
    }

    pub fn classify(&self, due_at: DateTime<FixedOffset>, now: DateTime<FixedOffset>) -> Urgency {
        let days = days_remaining(due_at, now);
        let bucket = if days < 0 {
            UrgencyBucket::Overdue
        } else if days <= i64::from(self.warn_window_days) {
            UrgencyBucket::DueSoon
        } else {
            UrgencyBucket::Normal
        };

        Urgency {
            days_remaining: days,
            bucket,
        }
    }

    pub fn classify_record<R: TrackedRecord>(&self, record: &R, now: DateTime<FixedOffset>) -> Urgency {
        self.classify(record.due_at(), now)
    }
}

/// Tightest advance-notice window that `days_remaining` falls into.
///
/// With windows 7/3/1 a date two days out is inside the 3-day notice.
/// Overdue dates and dates beyond every window have no active notice.
pub fn active_notice(days_remaining: i64, windows: &[u32]) -> Option<u32> {
    if days_remaining < 0 {
        return None;
    }
    windows
        .iter()
        .copied()
        .filter(|&w| days_remaining <= i64::from(w))
        .min()
}

/// Parse an instant from an RFC 3339 timestamp or a bare `YYYY-MM-DD`
/// date (midnight UTC).
pub fn parse_instant(input: &str) -> EngineResult<DateTime<FixedOffset>> {
    let s = input.trim();
    if s.is_empty() {
        return Err(EngineError::InvalidDate("empty date".to_string()));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt);
    }
    match NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        Ok(date) => Ok(date.and_time(NaiveTime::MIN).and_utc().fixed_offset()),
        Err(_) => Err(EngineError::InvalidDate(format!("cannot parse `{s}`"))),
    }
}

/// Bucket counts for summary badges.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct UrgencyCounts {
    pub overdue: usize,
    pub due_soon: usize,
    pub normal: usize,
}

impl UrgencyCounts {
    pub fn add(&mut self, bucket: UrgencyBucket) {
        match bucket {
            UrgencyBucket::Overdue => self.overdue += 1,
            UrgencyBucket::DueSoon => self.due_soon += 1,
            UrgencyBucket::Normal => self.normal += 1,
        }
    }
}

impl FromIterator<UrgencyBucket> for UrgencyCounts {
    fn from_iter<I: IntoIterator<Item = UrgencyBucket>>(iter: I) -> Self {
        let mut counts = UrgencyCounts::default();
        for bucket in iter {
            counts.add(bucket);
        }
        counts
    }
}
