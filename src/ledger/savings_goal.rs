use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{FlowError, Result};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavingsGoal {
    pub id: Uuid,
    pub name: String,
    pub target_amount: f64,
    pub current_amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
    pub icon: String,
}

impl SavingsGoal {
    pub fn new(name: impl Into<String>, target_amount: f64, icon: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            target_amount,
            current_amount: 0.0,
            deadline: None,
            icon: icon.into(),
        }
    }

    /// Share of the target already saved, capped at 100.
    pub fn progress_percentage(&self) -> f64 {
        if self.target_amount <= 0.0 {
            return 0.0;
        }
        (self.current_amount / self.target_amount * 100.0).min(100.0)
    }

    pub fn is_complete(&self) -> bool {
        self.target_amount > 0.0 && self.current_amount >= self.target_amount
    }

    /// A goal needs a name and a positive target.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(FlowError::InvalidRecord(format!(
                "savings goal {} has an empty name",
                self.id
            )));
        }
        if !(self.target_amount.is_finite() && self.target_amount > 0.0) {
            return Err(FlowError::InvalidRecord(format!(
                "savings goal {} has non-positive target {}",
                self.id, self.target_amount
            )));
        }
        Ok(())
    }
}
