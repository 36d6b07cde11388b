//! Budget health: how much of a period's income has been spent.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Message shown when a period has no income to measure against.
pub const NO_INCOME_MESSAGE: &str = "Add your income to start tracking.";

/// Health buckets, ordered from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetHealthStatus {
    Excellent,
    Good,
    Warning,
    Danger,
    Critical,
}

impl BudgetHealthStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetHealthStatus::Excellent => "excellent",
            BudgetHealthStatus::Good => "good",
            BudgetHealthStatus::Warning => "warning",
            BudgetHealthStatus::Danger => "danger",
            BudgetHealthStatus::Critical => "critical",
        }
    }

    /// Message for a period classified by spending ratio.
    pub fn message(&self) -> &'static str {
        match self {
            BudgetHealthStatus::Excellent => "Excellent savings rate this period",
            BudgetHealthStatus::Good => "On track with room to optimize",
            BudgetHealthStatus::Warning => "Approaching budget threshold",
            BudgetHealthStatus::Danger => "Spending exceeds recommended limits",
            BudgetHealthStatus::Critical => "Expenses exceed income this period",
        }
    }
}

impl fmt::Display for BudgetHealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetHealth {
    pub status: BudgetHealthStatus,
    /// Expenses as a percentage of income; 0 when there is no income.
    pub percentage: f64,
    pub message: String,
}

/// Upper percentage bound (inclusive) of each bucket below `Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthThresholds {
    pub excellent: f64,
    pub good: f64,
    pub warning: f64,
    pub danger: f64,
}

impl Default for HealthThresholds {
    fn default() -> Self {
        Self {
            excellent: 50.0,
            good: 70.0,
            warning: 85.0,
            danger: 100.0,
        }
    }
}

impl HealthThresholds {
    pub fn status_for(&self, percentage: f64) -> BudgetHealthStatus {
        let table = [
            (self.excellent, BudgetHealthStatus::Excellent),
            (self.good, BudgetHealthStatus::Good),
            (self.warning, BudgetHealthStatus::Warning),
            (self.danger, BudgetHealthStatus::Danger),
        ];
        table
            .iter()
            .find(|(ceiling, _)| percentage <= *ceiling)
            .map(|(_, status)| *status)
            .unwrap_or(BudgetHealthStatus::Critical)
    }

    pub fn classify(&self, total_income: f64, total_expenses: f64) -> BudgetHealth {
        if total_income == 0.0 {
            return BudgetHealth {
                status: BudgetHealthStatus::Warning,
                percentage: 0.0,
                message: NO_INCOME_MESSAGE.to_string(),
            };
        }

        let percentage = (total_expenses / total_income) * 100.0;
        let status = self.status_for(percentage);
        BudgetHealth {
            status,
            percentage,
            message: status.message().to_string(),
        }
    }
}

/// Classifies a period's totals against the default thresholds.
pub fn classify(total_income: f64, total_expenses: f64) -> BudgetHealth {
    HealthThresholds::default().classify(total_income, total_expenses)
}
