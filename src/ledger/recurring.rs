//! Materializes recurring incomes and expenses into the current period.
//!
//! Any record flagged recurring with a day of month is a template. For each
//! template the generator works out which dates in the period it is due on and
//! emits an occurrence for every date that has no matching record yet. Running
//! it again against the grown record set emits nothing new.
//!
//! Matching is by value, not by template identity:
//! incomes on `(source, date, amount)`, expenses on
//! `(description, date, amount, category)`. Two distinct templates that agree on
//! all of those fields therefore share one occurrence.

use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::debug;
use uuid::Uuid;

use super::{
    period::{days_in_month, PeriodCalendar, PeriodWindow},
    transaction::{Expense, Income},
};

/// Records the generator wants appended to the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecurringBatch {
    pub new_incomes: Vec<Income>,
    pub new_expenses: Vec<Expense>,
}

impl RecurringBatch {
    pub fn is_empty(&self) -> bool {
        self.new_incomes.is_empty() && self.new_expenses.is_empty()
    }

    pub fn len(&self) -> usize {
        self.new_incomes.len() + self.new_expenses.len()
    }
}

// Amounts are validated finite and positive, so bit equality agrees with `==`.
#[derive(Debug, PartialEq, Eq, Hash)]
struct IncomeKey<'a> {
    source: &'a str,
    date: NaiveDate,
    amount: u64,
}

impl<'a> IncomeKey<'a> {
    fn of(income: &'a Income, date: NaiveDate) -> Self {
        Self {
            source: &income.source,
            date,
            amount: income.amount.to_bits(),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Hash)]
struct ExpenseKey<'a> {
    description: &'a str,
    date: NaiveDate,
    amount: u64,
    category_id: &'a str,
}

impl<'a> ExpenseKey<'a> {
    fn of(expense: &'a Expense, date: NaiveDate) -> Self {
        Self {
            description: &expense.description,
            date,
            amount: expense.amount.to_bits(),
            category_id: &expense.category_id,
        }
    }
}

/// Dates inside `window` on which something recurring on `day` falls due.
///
/// `day` is clamped to each month's length, so day 31 lands on the 30th of a
/// 30-day month. A 14-day window touches at most two months and yields at most
/// two dates.
pub fn recurring_dates_in_period(day: u32, window: PeriodWindow) -> Vec<NaiveDate> {
    window
        .months()
        .into_iter()
        .filter_map(|(year, month)| {
            NaiveDate::from_ymd_opt(year, month, day.min(days_in_month(year, month)))
        })
        .filter(|date| window.contains(*date))
        .collect()
}

/// Generates the missing occurrences for the default-calendar period containing `today`.
pub fn generate_recurring_occurrences(
    today: NaiveDate,
    incomes: &[Income],
    expenses: &[Expense],
) -> RecurringBatch {
    let window = PeriodCalendar::default().current_window(today);
    generate_for_window(window, incomes, expenses)
}

/// Generates the missing occurrences for every template due inside `window`.
pub fn generate_for_window(
    window: PeriodWindow,
    incomes: &[Income],
    expenses: &[Expense],
) -> RecurringBatch {
    RecurringBatch {
        new_incomes: generate_incomes(window, incomes),
        new_expenses: generate_expenses(window, expenses),
    }
}

fn generate_incomes(window: PeriodWindow, incomes: &[Income]) -> Vec<Income> {
    let mut seen: HashSet<IncomeKey<'_>> = incomes
        .iter()
        .map(|income| IncomeKey::of(income, income.date))
        .collect();
    let mut created = Vec::new();

    for template in incomes {
        let Some(day) = template.template_day() else {
            continue;
        };
        for date in recurring_dates_in_period(day, window) {
            if !seen.insert(IncomeKey::of(template, date)) {
                debug!(source = %template.source, %date, "recurring income already present");
                continue;
            }
            debug!(
                source = %template.source,
                %date,
                amount = template.amount,
                "emitting recurring income"
            );
            created.push(Income {
                id: Uuid::new_v4(),
                amount: template.amount,
                source: template.source.clone(),
                date,
                is_recurring: true,
                recurring_day: Some(day),
            });
        }
    }

    created
}

fn generate_expenses(window: PeriodWindow, expenses: &[Expense]) -> Vec<Expense> {
    let mut seen: HashSet<ExpenseKey<'_>> = expenses
        .iter()
        .map(|expense| ExpenseKey::of(expense, expense.date))
        .collect();
    let mut created = Vec::new();

    for template in expenses {
        let Some(day) = template.template_day() else {
            continue;
        };
        for date in recurring_dates_in_period(day, window) {
            if !seen.insert(ExpenseKey::of(template, date)) {
                debug!(
                    description = %template.description,
                    %date,
                    "recurring expense already present"
                );
                continue;
            }
            debug!(
                description = %template.description,
                %date,
                amount = template.amount,
                "emitting recurring expense"
            );
            created.push(Expense {
                id: Uuid::new_v4(),
                amount: template.amount,
                description: template.description.clone(),
                category_id: template.category_id.clone(),
                date,
                is_recurring: true,
                recurring_day: Some(day),
            });
        }
    }

    created
}
