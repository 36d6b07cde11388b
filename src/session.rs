//! One application session: load the document, materialize recurring
//! occurrences once, and serve the period read models.

use chrono::NaiveDate;
use tracing::info;

use crate::{
    errors::Result,
    ledger::{
        category_spending, classify, compute_period_data_in, generate_for_window, BudgetHealth,
        BudgetState, CategorySpending, PeriodCalendar, PeriodData, PeriodWindow, RecurringBatch,
    },
    storage::{import_backup, StorageBackend},
    time::Clock,
};

/// Facade that coordinates the budget document, its storage, and the clock.
pub struct BudgetSession {
    state: BudgetState,
    storage: Box<dyn StorageBackend>,
    clock: Box<dyn Clock>,
    calendar: PeriodCalendar,
    generated: usize,
}

impl BudgetSession {
    /// Opens a session, generating the current period's recurring occurrences.
    ///
    /// Generation runs exactly once, against the document as loaded. Emitted
    /// records are appended and saved before the session is handed out.
    pub fn start(
        storage: Box<dyn StorageBackend>,
        clock: Box<dyn Clock>,
        calendar: PeriodCalendar,
    ) -> Result<Self> {
        let state = storage.load()?.unwrap_or_default();
        let mut session = Self {
            state,
            storage,
            clock,
            calendar,
            generated: 0,
        };

        let today = session.today();
        let batch = session.pending_recurring(today);
        info!(
            %today,
            incomes = batch.new_incomes.len(),
            expenses = batch.new_expenses.len(),
            "recurring occurrences generated"
        );
        if !batch.is_empty() {
            session.generated = session.state.apply_recurring(batch);
            session.save()?;
        }
        Ok(session)
    }

    /// Occurrences still missing from the period containing `today`.
    pub fn pending_recurring(&self, today: NaiveDate) -> RecurringBatch {
        let window = self.calendar.current_window(today);
        generate_for_window(window, &self.state.incomes, &self.state.expenses)
    }

    /// Number of records materialized when the session started.
    pub fn generated_on_start(&self) -> usize {
        self.generated
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn calendar(&self) -> PeriodCalendar {
        self.calendar
    }

    pub fn state(&self) -> &BudgetState {
        &self.state
    }

    /// Mutable access for record edits; call [`BudgetSession::save`] afterwards.
    pub fn state_mut(&mut self) -> &mut BudgetState {
        &mut self.state
    }

    pub fn save(&self) -> Result<()> {
        self.storage.save(&self.state)
    }

    /// Replaces the whole document with a validated backup and persists it.
    pub fn import_backup(&mut self, json: &str) -> Result<()> {
        self.state = import_backup(json)?;
        info!(
            incomes = self.state.incomes.len(),
            expenses = self.state.expenses.len(),
            "backup imported"
        );
        self.save()
    }

    /// Restores the seeded defaults and persists them.
    pub fn reset(&mut self) -> Result<()> {
        self.state.reset();
        info!("budget data reset to defaults");
        self.save()
    }

    pub fn current_window(&self) -> PeriodWindow {
        self.calendar.current_window(self.today())
    }

    pub fn period_data(&self, period_start: NaiveDate) -> PeriodData {
        compute_period_data_in(
            self.calendar.window(period_start),
            &self.state.incomes,
            &self.state.expenses,
        )
    }

    pub fn current_period(&self) -> PeriodData {
        compute_period_data_in(
            self.current_window(),
            &self.state.incomes,
            &self.state.expenses,
        )
    }

    /// The last `n` periods up to and including the current one, oldest first.
    pub fn history(&self, n: usize) -> Vec<PeriodData> {
        self.calendar
            .last_n_periods(self.today(), n, &self.state.incomes, &self.state.expenses)
    }

    pub fn health(&self) -> BudgetHealth {
        let period = self.current_period();
        classify(period.total_income, period.total_expenses)
    }

    pub fn category_spending(&self) -> Vec<CategorySpending> {
        category_spending(
            self.current_window(),
            &self.state.categories,
            &self.state.expenses,
        )
    }

    pub fn remaining_balance(&self) -> f64 {
        self.current_period().balance
    }
}
