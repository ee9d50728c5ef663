use serde::{Deserialize, Serialize};

use crate::deadline::DeadlinePolicy;
use crate::urgency::{
    ADVANCE_NOTICE_DAYS, BUDGET_WARN_WINDOW_DAYS, CLARIFICATION_WARN_WINDOW_DAYS, UrgencyClassifier,
};
use crate::variance::{VarianceClassifier, VariancePolicy};

pub const DEFAULT_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_DATA_DIR: &str = "data";

/// Per-page policies. Each page hands its own parameters to the same engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub budget_policy: DeadlinePolicy,
    pub clarification_policy: DeadlinePolicy,
    pub budget_warn_window_days: u32,
    pub clarification_warn_window_days: u32,
    pub dates_warn_window_days: u32,
    pub progress_warn_window_days: u32,
    pub advance_notice_days: Vec<u32>,
    pub variance: VariancePolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            budget_policy: DeadlinePolicy::standard(),
            clarification_policy: DeadlinePolicy::standard(),
            budget_warn_window_days: BUDGET_WARN_WINDOW_DAYS,
            clarification_warn_window_days: CLARIFICATION_WARN_WINDOW_DAYS,
            dates_warn_window_days: BUDGET_WARN_WINDOW_DAYS,
            progress_warn_window_days: BUDGET_WARN_WINDOW_DAYS,
            advance_notice_days: ADVANCE_NOTICE_DAYS.to_vec(),
            variance: VariancePolicy::default(),
        }
    }
}

impl Settings {
    pub fn budget_urgency(&self) -> UrgencyClassifier {
        UrgencyClassifier::new(self.budget_warn_window_days)
    }

    pub fn clarification_urgency(&self) -> UrgencyClassifier {
        UrgencyClassifier::new(self.clarification_warn_window_days)
    }

    pub fn dates_urgency(&self) -> UrgencyClassifier {
        UrgencyClassifier::new(self.dates_warn_window_days)
    }

    pub fn progress_urgency(&self) -> UrgencyClassifier {
        UrgencyClassifier::new(self.progress_warn_window_days)
    }

    pub fn variance_classifier(&self) -> VarianceClassifier {
        VarianceClassifier::new(self.variance)
    }
}

// Process-level configuration from the environment
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: String,
    pub data_dir: String,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            addr: std::env::var("MEP_TRACKER_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string()),
            data_dir: std::env::var("MEP_TRACKER_DATA")
                .unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string()),
        }
    }
}
