/*
Deadline computation.
A policy maps priority to a day offset; the due date is the creation
instant plus that many whole calendar days.
*/

use std::collections::BTreeMap;

use chrono::{DateTime, Days, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::PriorityLevel;

/// Day counts selectable on the important-dates page.
pub const NOTICE_DAY_OPTIONS: [u32; 5] = [1, 3, 5, 7, 15];

/// Priority to day-offset table.
///
/// Offsets never grow as priority rises. A policy may leave priorities out;
/// asking for one of those is a configuration error, not a fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<PriorityLevel, u32>", into = "BTreeMap<PriorityLevel, u32>")]
pub struct DeadlinePolicy {
    offsets: BTreeMap<PriorityLevel, u32>,
}

impl DeadlinePolicy {
    pub fn new<I>(entries: I) -> EngineResult<Self>
    where
        I: IntoIterator<Item = (PriorityLevel, u32)>,
    {
        let offsets: BTreeMap<PriorityLevel, u32> = entries.into_iter().collect();

        // BTreeMap iterates low -> critical
        let mut previous: Option<(PriorityLevel, u32)> = None;
        for (&priority, &days) in &offsets {
            if let Some((lower, lower_days)) = previous {
                if days > lower_days {
                    return Err(EngineError::Configuration(format!(
                        "offset for {priority} ({days}d) exceeds offset for {lower} ({lower_days}d)"
                    )));
                }
            }
            previous = Some((priority, days));
        }

        Ok(Self { offsets })
    }

    /// critical=1, high=3, medium=5, low=7
    pub fn standard() -> Self {
        Self {
            offsets: BTreeMap::from([
                (PriorityLevel::Low, 7),
                (PriorityLevel::Medium, 5),
                (PriorityLevel::High, 3),
                (PriorityLevel::Critical, 1),
            ]),
        }
    }

    pub fn offset_days(&self, priority: PriorityLevel) -> EngineResult<u32> {
        self.offsets.get(&priority).copied().ok_or_else(|| {
            EngineError::Configuration(format!("no deadline offset for priority {priority}"))
        })
    }
}

impl Default for DeadlinePolicy {
    fn default() -> Self {
        Self::standard()
    }
}

impl TryFrom<BTreeMap<PriorityLevel, u32>> for DeadlinePolicy {
    type Error = EngineError;

    fn try_from(offsets: BTreeMap<PriorityLevel, u32>) -> EngineResult<Self> {
        Self::new(offsets)
    }
}

impl From<DeadlinePolicy> for BTreeMap<PriorityLevel, u32> {
    fn from(policy: DeadlinePolicy) -> Self {
        policy.offsets
    }
}

/// Due date for a record created at `created_at` with the given priority.
pub fn compute(
    created_at: DateTime<FixedOffset>,
    priority: PriorityLevel,
    policy: &DeadlinePolicy,
) -> EngineResult<DateTime<FixedOffset>> {
    let days = policy.offset_days(priority)?;
    compute_with_offset(created_at, days)
}

/// Whole-day addition; wall-clock time and offset are kept as-is.
pub fn compute_with_offset(
    created_at: DateTime<FixedOffset>,
    days: u32,
) -> EngineResult<DateTime<FixedOffset>> {
    created_at
        .checked_add_days(Days::new(u64::from(days)))
        .ok_or_else(|| {
            EngineError::InvalidDate(format!("{created_at} + {days} days is out of range"))
        })
}

pub fn validate_notice_days(days: u32) -> EngineResult<u32> {
    if NOTICE_DAY_OPTIONS.contains(&days) {
        Ok(days)
    } else {
        Err(EngineError::Range {
            field: "notice_days",
            value: i64::from(days),
            expected: "one of 1, 3, 5, 7, 15",
        })
    }
}
