//! Budget records, period math, and the derived read models.

pub mod category;
pub mod health;
pub mod period;
pub mod recurring;
pub mod savings_goal;
pub mod state;
pub mod summary;
pub mod transaction;

pub use category::{default_categories, Category, UNKNOWN_CATEGORY_NAME};
pub use health::{classify, BudgetHealth, BudgetHealthStatus, HealthThresholds};
pub use period::{
    current_period_start, days_in_month, last_n_periods, period_end, period_label,
    reference_date, PeriodCalendar, PeriodWindow, PERIOD_DAYS,
};
pub use recurring::{
    generate_for_window, generate_recurring_occurrences, recurring_dates_in_period,
    RecurringBatch,
};
pub use savings_goal::SavingsGoal;
pub use state::BudgetState;
pub use summary::{
    category_spending, compute_period_data, compute_period_data_in, CategorySpending, PeriodData,
};
pub use transaction::{Expense, Income, Transaction};
