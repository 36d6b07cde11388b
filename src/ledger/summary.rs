//! Per-period income/expense aggregation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{
    category::Category,
    period::{PeriodCalendar, PeriodWindow},
    transaction::{Expense, Income},
};

/// Totals for one period. Derived on every read, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodData {
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub label: String,
    pub total_income: f64,
    pub total_expenses: f64,
    /// Income minus expenses; negative when overspent.
    pub balance: f64,
}

impl PeriodData {
    pub fn window(&self) -> PeriodWindow {
        PeriodWindow {
            start: self.period_start,
            end: self.period_end,
        }
    }
}

/// Spending against one category within a period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySpending {
    pub category: Category,
    pub amount: f64,
    pub budget: Option<f64>,
    /// `amount / budget * 100`, or 0 when the category has no budget.
    pub percentage: f64,
    pub over_budget: bool,
}

/// Aggregates the default-length period starting at `period_start`.
pub fn compute_period_data(
    period_start: NaiveDate,
    incomes: &[Income],
    expenses: &[Expense],
) -> PeriodData {
    let window = PeriodCalendar::default().window(period_start);
    compute_period_data_in(window, incomes, expenses)
}

/// Sums every record dated inside `window` (inclusive on both ends).
pub fn compute_period_data_in(
    window: PeriodWindow,
    incomes: &[Income],
    expenses: &[Expense],
) -> PeriodData {
    let total_income: f64 = incomes
        .iter()
        .filter(|income| window.contains(income.date))
        .map(|income| income.amount)
        .sum();
    let total_expenses: f64 = expenses
        .iter()
        .filter(|expense| window.contains(expense.date))
        .map(|expense| expense.amount)
        .sum();

    PeriodData {
        period_start: window.start,
        period_end: window.end,
        label: window.label(),
        total_income,
        total_expenses,
        balance: total_income - total_expenses,
    }
}

/// Per-category spending inside `window`, largest first. Categories with no
/// spending are left out; expenses whose category is gone are not counted.
pub fn category_spending(
    window: PeriodWindow,
    categories: &[Category],
    expenses: &[Expense],
) -> Vec<CategorySpending> {
    let mut spending: Vec<CategorySpending> = categories
        .iter()
        .filter_map(|category| {
            let amount: f64 = expenses
                .iter()
                .filter(|expense| expense.category_id == category.id && window.contains(expense.date))
                .map(|expense| expense.amount)
                .sum();
            if amount <= 0.0 {
                return None;
            }
            let (percentage, over_budget) = match category.budget {
                Some(budget) if budget > 0.0 => (amount / budget * 100.0, amount > budget),
                _ => (0.0, false),
            };
            Some(CategorySpending {
                category: category.clone(),
                amount,
                budget: category.budget,
                percentage,
                over_budget,
            })
        })
        .collect();

    spending.sort_by(|a, b| b.amount.total_cmp(&a.amount));
    spending
}
