//! Planned-vs-actual progress classification.
//!
//! Two independent classifiers: [`VarianceClassifier`] looks at the signed
//! deviation from plan, [`ProgressTierClassifier`] at the absolute completion
//! used for progress-bar coloring.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum VarianceBucket {
    Ahead,
    OnTrack,
    AtRisk,
    Delayed,
}

/// Display direction of the variance; renderers pick the glyph.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Up,
    Down,
    Flat,
}

/// How a variance equal to the threshold is treated.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DelayedBoundary {
    /// `variance < threshold` is delayed; the threshold itself is at risk.
    #[default]
    Exclusive,
    /// `variance <= threshold` is delayed.
    Inclusive,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct VariancePolicy {
    pub delayed_threshold: i64,
    pub boundary: DelayedBoundary,
}

impl Default for VariancePolicy {
    fn default() -> Self {
        Self {
            delayed_threshold: -5,
            boundary: DelayedBoundary::Exclusive,
        }
    }
}

impl VariancePolicy {
    pub fn inclusive() -> Self {
        Self {
            boundary: DelayedBoundary::Inclusive,
            ..Self::default()
        }
    }

    fn is_delayed(&self, variance: i64) -> bool {
        match self.boundary {
            DelayedBoundary::Exclusive => variance < self.delayed_threshold,
            DelayedBoundary::Inclusive => variance <= self.delayed_threshold,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct VarianceClassification {
    pub variance: i64,
    pub bucket: VarianceBucket,
    pub trend: Trend,
}

/// Reject progress values outside 0..=100.
pub fn validate_progress(field: &'static str, value: i64) -> EngineResult<i64> {
    if (0..=100).contains(&value) {
        Ok(value)
    } else {
        Err(EngineError::Range {
            field,
            value,
            expected: "0..=100",
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VarianceClassifier {
    pub policy: VariancePolicy,
}

impl VarianceClassifier {
    pub fn new(policy: VariancePolicy) -> Self {
        Self { policy }
    }

    pub fn classify(&self, planned: i64, actual: i64) -> EngineResult<VarianceClassification> {
        let planned = validate_progress("planned_progress", planned)?;
        let actual = validate_progress("actual_progress", actual)?;
        let variance = actual - planned;

        let bucket = if variance > 0 {
            VarianceBucket::Ahead
        } else if variance == 0 {
            VarianceBucket::OnTrack
        } else if self.policy.is_delayed(variance) {
            VarianceBucket::Delayed
        } else {
            VarianceBucket::AtRisk
        };

        let trend = match variance {
            v if v > 0 => Trend::Up,
            v if v < 0 => Trend::Down,
            _ => Trend::Flat,
        };

        Ok(VarianceClassification {
            variance,
            bucket,
            trend,
        })
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ProgressTier {
    Critical,
    Poor,
    Good,
    Excellent,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressTierClassifier;

impl ProgressTierClassifier {
    /// excellent >= 95, good >= 80, poor >= 65, critical below
    pub fn classify(&self, actual: i64) -> EngineResult<ProgressTier> {
        let actual = validate_progress("actual_progress", actual)?;
        Ok(match actual {
            95.. => ProgressTier::Excellent,
            80..=94 => ProgressTier::Good,
            65..=79 => ProgressTier::Poor,
            _ => ProgressTier::Critical,
        })
    }
}
