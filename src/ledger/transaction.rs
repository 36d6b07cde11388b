use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{FlowError, Result};

/// Highest day-of-month a recurring template may name.
pub const MAX_RECURRING_DAY: u32 = 31;

/// Money received on a calendar day. A recurring income doubles as its own template.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Income {
    pub id: Uuid,
    pub amount: f64,
    pub source: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring_day: Option<u32>,
}

impl Income {
    pub fn new(amount: f64, source: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            amount,
            source: source.into(),
            date,
            is_recurring: false,
            recurring_day: None,
        }
    }

    /// Marks the income as repeating on `day` of every month.
    pub fn recurring_on(mut self, day: u32) -> Self {
        self.is_recurring = true;
        self.recurring_day = Some(day);
        self
    }

    /// Sets or clears the monthly repeat day.
    pub fn set_recurring_day(&mut self, day: Option<u32>) {
        self.is_recurring = day.is_some();
        self.recurring_day = day;
    }

    /// Day of month this record repeats on, when it acts as a recurring template.
    pub fn template_day(&self) -> Option<u32> {
        template_day(self.is_recurring, self.recurring_day)
    }

    pub fn validate(&self) -> Result<()> {
        validate_amount(self.amount, "income", self.id)?;
        if self.source.trim().is_empty() {
            return Err(FlowError::InvalidRecord(format!(
                "income {} has an empty source",
                self.id
            )));
        }
        validate_recurrence(self.is_recurring, self.recurring_day, "income", self.id)
    }
}

/// Money spent on a calendar day, filed under a category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: Uuid,
    pub amount: f64,
    pub description: String,
    pub category_id: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring_day: Option<u32>,
}

impl Expense {
    pub fn new(
        amount: f64,
        description: impl Into<String>,
        category_id: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            amount,
            description: description.into(),
            category_id: category_id.into(),
            date,
            is_recurring: false,
            recurring_day: None,
        }
    }

    /// Marks the expense as repeating on `day` of every month.
    pub fn recurring_on(mut self, day: u32) -> Self {
        self.is_recurring = true;
        self.recurring_day = Some(day);
        self
    }

    pub fn set_recurring_day(&mut self, day: Option<u32>) {
        self.is_recurring = day.is_some();
        self.recurring_day = day;
    }

    pub fn template_day(&self) -> Option<u32> {
        template_day(self.is_recurring, self.recurring_day)
    }

    pub fn validate(&self) -> Result<()> {
        validate_amount(self.amount, "expense", self.id)?;
        if self.description.trim().is_empty() {
            return Err(FlowError::InvalidRecord(format!(
                "expense {} has an empty description",
                self.id
            )));
        }
        validate_recurrence(self.is_recurring, self.recurring_day, "expense", self.id)
    }
}

/// A borrowed income or expense, as shown in the combined transaction list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transaction<'a> {
    Income(&'a Income),
    Expense(&'a Expense),
}

impl Transaction<'_> {
    pub fn id(&self) -> Uuid {
        match self {
            Transaction::Income(income) => income.id,
            Transaction::Expense(expense) => expense.id,
        }
    }

    pub fn date(&self) -> NaiveDate {
        match self {
            Transaction::Income(income) => income.date,
            Transaction::Expense(expense) => expense.date,
        }
    }

    /// Positive for income, negative for spending.
    pub fn signed_amount(&self) -> f64 {
        match self {
            Transaction::Income(income) => income.amount,
            Transaction::Expense(expense) => -expense.amount,
        }
    }

    pub fn is_recurring(&self) -> bool {
        match self {
            Transaction::Income(income) => income.is_recurring,
            Transaction::Expense(expense) => expense.is_recurring,
        }
    }
}

fn template_day(is_recurring: bool, recurring_day: Option<u32>) -> Option<u32> {
    match recurring_day {
        Some(day) if is_recurring && day > 0 => Some(day),
        _ => None,
    }
}

fn validate_amount(amount: f64, kind: &str, id: Uuid) -> Result<()> {
    if amount.is_finite() && amount > 0.0 {
        Ok(())
    } else {
        Err(FlowError::InvalidRecord(format!(
            "{kind} {id} has non-positive amount {amount}"
        )))
    }
}

fn validate_recurrence(
    is_recurring: bool,
    recurring_day: Option<u32>,
    kind: &str,
    id: Uuid,
) -> Result<()> {
    match (is_recurring, recurring_day) {
        (true, Some(day)) if (1..=MAX_RECURRING_DAY).contains(&day) => Ok(()),
        (true, Some(day)) => Err(FlowError::InvalidRecord(format!(
            "{kind} {id} recurs on invalid day {day}"
        ))),
        (true, None) => Err(FlowError::InvalidRecord(format!(
            "{kind} {id} is recurring without a recurring day"
        ))),
        (false, Some(_)) => Err(FlowError::InvalidRecord(format!(
            "{kind} {id} has a recurring day but is not recurring"
        ))),
        (false, None) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn clearing_recurring_day_clears_flag() {
        let mut expense = Expense::new(60.0, "Gym", "health", day(2024, 1, 4)).recurring_on(4);
        expense.set_recurring_day(None);
        assert!(!expense.is_recurring);
        assert_eq!(expense.recurring_day, None);
        assert!(expense.validate().is_ok());
        assert_eq!(Transaction::Expense(&expense).signed_amount(), -60.0);
    }

    #[test]
    fn template_day_requires_flag_and_day() {
        let plain = Income::new(100.0, "Salary", day(2024, 1, 1));
        assert_eq!(plain.template_day(), None);

        let recurring = plain.clone().recurring_on(15);
        assert_eq!(recurring.template_day(), Some(15));

        let mut flagged_only = plain;
        flagged_only.is_recurring = true;
        assert_eq!(flagged_only.template_day(), None);
    }

    #[test]
    fn validate_rejects_malformed_records() {
        assert!(Income::new(0.0, "Salary", day(2024, 1, 1)).validate().is_err());
        assert!(Income::new(10.0, "  ", day(2024, 1, 1)).validate().is_err());
        assert!(Expense::new(10.0, "Rent", "housing", day(2024, 1, 1))
            .recurring_on(32)
            .validate()
            .is_err());

        let mut orphan_day = Expense::new(10.0, "Rent", "housing", day(2024, 1, 1));
        orphan_day.recurring_day = Some(3);
        assert!(orphan_day.validate().is_err());

        assert!(Expense::new(10.0, "Rent", "housing", day(2024, 1, 1))
            .recurring_on(31)
            .validate()
            .is_ok());
    }

    #[test]
    fn serializes_with_document_field_names() {
        let expense = Expense::new(42.5, "Gym", "health", day(2024, 2, 3)).recurring_on(3);
        let json = serde_json::to_value(&expense).unwrap();
        assert_eq!(json["categoryId"], "health");
        assert_eq!(json["date"], "2024-02-03");
        assert_eq!(json["isRecurring"], true);
        assert_eq!(json["recurringDay"], 3);
    }
}
