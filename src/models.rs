use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::filter::Filterable;

/// Qualitative urgency tag. Ordered low < medium < high < critical.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PriorityLevel {
    #[serde(alias = "baja")]
    Low,
    #[serde(alias = "media")]
    Medium,
    #[serde(alias = "alta")]
    High,
    #[serde(alias = "urgent", alias = "urgente", alias = "critica")]
    Critical,
}

impl PriorityLevel {
    pub const ALL: [PriorityLevel; 4] = [
        PriorityLevel::Low,
        PriorityLevel::Medium,
        PriorityLevel::High,
        PriorityLevel::Critical,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PriorityLevel::Low => "low",
            PriorityLevel::Medium => "medium",
            PriorityLevel::High => "high",
            PriorityLevel::Critical => "critical",
        }
    }
}

impl fmt::Display for PriorityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PriorityLevel {
    type Err = EngineError;

    fn from_str(s: &str) -> EngineResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" | "baja" => Ok(PriorityLevel::Low),
            "medium" | "media" => Ok(PriorityLevel::Medium),
            "high" | "alta" => Ok(PriorityLevel::High),
            "critical" | "urgent" | "urgente" | "critica" => Ok(PriorityLevel::Critical),
            other => Err(EngineError::InvalidInput(format!("unknown priority `{other}`"))),
        }
    }
}

/// Anything with a due date the urgency classifier can read.
pub trait TrackedRecord {
    fn due_at(&self) -> DateTime<FixedOffset>;
    fn created_at(&self) -> Option<DateTime<FixedOffset>>;
}

// Progress values entered through forms are clamped, not rejected
pub fn clamp_progress(value: i64) -> u8 {
    value.clamp(0, 100) as u8
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    Pending,
    Approved,
    Rejected,
}

impl BudgetStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            BudgetStatus::Pending => "pending",
            BudgetStatus::Approved => "approved",
            BudgetStatus::Rejected => "rejected",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetItem {
    pub id: Uuid,
    pub title: String,
    pub discipline: String,
    pub amount: f64,
    pub priority: PriorityLevel,
    pub status: BudgetStatus,
    pub created_at: DateTime<FixedOffset>,
    pub due_at: DateTime<FixedOffset>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ClarificationStatus {
    Open,
    Answered,
    Closed,
}

impl ClarificationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ClarificationStatus::Open => "open",
            ClarificationStatus::Answered => "answered",
            ClarificationStatus::Closed => "closed",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScopeClarification {
    pub id: Uuid,
    pub title: String,
    pub question: String,
    pub discipline: String,
    pub requested_by: String,
    pub priority: PriorityLevel,
    pub status: ClarificationStatus,
    pub created_at: DateTime<FixedOffset>,
    pub due_at: DateTime<FixedOffset>,
    pub answer: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DateStatus {
    Pending,
    Completed,
}

impl DateStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DateStatus::Pending => "pending",
            DateStatus::Completed => "completed",
        }
    }
}

// Important dates run on a selectable day count instead of a priority policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportantDate {
    pub id: Uuid,
    pub title: String,
    pub category: String,
    pub discipline: String,
    pub notice_days: u32,
    pub status: DateStatus,
    pub created_at: DateTime<FixedOffset>,
    pub due_at: DateTime<FixedOffset>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Draft,
    Submitted,
    Approved,
}

impl ReportStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ReportStatus::Draft => "draft",
            ReportStatus::Submitted => "submitted",
            ReportStatus::Approved => "approved",
        }
    }
}

/// Contractor progress report: planned vs actual completion, 0..=100.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressReport {
    pub id: Uuid,
    pub contractor: String,
    pub activity: String,
    pub discipline: String,
    pub planned_progress: u8,
    pub actual_progress: u8,
    pub status: ReportStatus,
    pub created_at: DateTime<FixedOffset>,
    pub due_at: DateTime<FixedOffset>,
}

/// Everything the pages hold in memory.
#[derive(Debug, Clone, Default)]
pub struct Workspace {
    pub budgets: Vec<BudgetItem>,
    pub clarifications: Vec<ScopeClarification>,
    pub important_dates: Vec<ImportantDate>,
    pub progress_reports: Vec<ProgressReport>,
}

macro_rules! tracked {
    ($($ty:ty),*) => {$(
        impl TrackedRecord for $ty {
            fn due_at(&self) -> DateTime<FixedOffset> {
                self.due_at
            }
            fn created_at(&self) -> Option<DateTime<FixedOffset>> {
                Some(self.created_at)
            }
        }
    )*};
}

tracked!(BudgetItem, ScopeClarification, ImportantDate, ProgressReport);

impl Filterable for BudgetItem {
    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        match name {
            "title" => Some(Cow::Borrowed(&self.title)),
            "discipline" => Some(Cow::Borrowed(&self.discipline)),
            "status" => Some(Cow::Borrowed(self.status.as_str())),
            "priority" => Some(Cow::Borrowed(self.priority.as_str())),
            "notes" => self.notes.as_deref().map(Cow::Borrowed),
            _ => None,
        }
    }
}

impl Filterable for ScopeClarification {
    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        match name {
            "title" => Some(Cow::Borrowed(&self.title)),
            "question" => Some(Cow::Borrowed(&self.question)),
            "discipline" => Some(Cow::Borrowed(&self.discipline)),
            "requested_by" => Some(Cow::Borrowed(&self.requested_by)),
            "status" => Some(Cow::Borrowed(self.status.as_str())),
            "priority" => Some(Cow::Borrowed(self.priority.as_str())),
            "answer" => self.answer.as_deref().map(Cow::Borrowed),
            _ => None,
        }
    }
}

impl Filterable for ImportantDate {
    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        match name {
            "title" => Some(Cow::Borrowed(&self.title)),
            "category" => Some(Cow::Borrowed(&self.category)),
            "discipline" => Some(Cow::Borrowed(&self.discipline)),
            "status" => Some(Cow::Borrowed(self.status.as_str())),
            "notes" => self.notes.as_deref().map(Cow::Borrowed),
            _ => None,
        }
    }
}

impl Filterable for ProgressReport {
    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        match name {
            "contractor" => Some(Cow::Borrowed(&self.contractor)),
            "activity" => Some(Cow::Borrowed(&self.activity)),
            "discipline" => Some(Cow::Borrowed(&self.discipline)),
            "status" => Some(Cow::Borrowed(self.status.as_str())),
            _ => None,
        }
    }
}
