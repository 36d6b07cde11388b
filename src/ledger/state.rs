use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use super::{
    category::{default_categories, Category, UNKNOWN_CATEGORY_NAME},
    recurring::RecurringBatch,
    savings_goal::SavingsGoal,
    transaction::{Expense, Income, Transaction},
};
use crate::errors::{FlowError, Result};

/// The persisted budget document: `{categories, incomes, expenses, savingsGoals}`.
///
/// Mutations mirror the user actions of the application. Read models
/// (period totals, health) are computed from the record slices and never stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BudgetState {
    pub categories: Vec<Category>,
    pub incomes: Vec<Income>,
    pub expenses: Vec<Expense>,
    pub savings_goals: Vec<SavingsGoal>,
}

impl Default for BudgetState {
    fn default() -> Self {
        Self {
            categories: default_categories(),
            ..Self::empty()
        }
    }
}

impl BudgetState {
    /// A document with no categories or records.
    pub fn empty() -> Self {
        Self {
            categories: Vec::new(),
            incomes: Vec::new(),
            expenses: Vec::new(),
            savings_goals: Vec::new(),
        }
    }

    /// Drops every record and goal and restores the seeded categories.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn add_income(&mut self, income: Income) -> Uuid {
        let id = income.id;
        self.incomes.push(income);
        id
    }

    pub fn update_income(&mut self, income: Income) -> Result<()> {
        let slot = self
            .incomes
            .iter_mut()
            .find(|existing| existing.id == income.id)
            .ok_or_else(|| FlowError::NotFound(format!("income {}", income.id)))?;
        *slot = income;
        Ok(())
    }

    pub fn delete_income(&mut self, id: Uuid) -> Result<Income> {
        let index = self
            .incomes
            .iter()
            .position(|income| income.id == id)
            .ok_or_else(|| FlowError::NotFound(format!("income {id}")))?;
        Ok(self.incomes.remove(index))
    }

    pub fn add_expense(&mut self, expense: Expense) -> Uuid {
        let id = expense.id;
        self.expenses.push(expense);
        id
    }

    pub fn update_expense(&mut self, expense: Expense) -> Result<()> {
        let slot = self
            .expenses
            .iter_mut()
            .find(|existing| existing.id == expense.id)
            .ok_or_else(|| FlowError::NotFound(format!("expense {}", expense.id)))?;
        *slot = expense;
        Ok(())
    }

    pub fn delete_expense(&mut self, id: Uuid) -> Result<Expense> {
        let index = self
            .expenses
            .iter()
            .position(|expense| expense.id == id)
            .ok_or_else(|| FlowError::NotFound(format!("expense {id}")))?;
        Ok(self.expenses.remove(index))
    }

    pub fn add_category(&mut self, category: Category) -> String {
        let id = category.id.clone();
        self.categories.push(category);
        id
    }

    pub fn update_category(&mut self, category: Category) -> Result<()> {
        let slot = self.category_mut(&category.id)?;
        *slot = category;
        Ok(())
    }

    /// Removes the category together with every expense filed under it.
    pub fn delete_category(&mut self, id: &str) -> Result<Category> {
        let index = self
            .categories
            .iter()
            .position(|category| category.id == id)
            .ok_or_else(|| FlowError::NotFound(format!("category {id}")))?;
        let removed = self.categories.remove(index);
        let before = self.expenses.len();
        self.expenses.retain(|expense| expense.category_id != id);
        info!(
            category = id,
            removed_expenses = before - self.expenses.len(),
            "category deleted"
        );
        Ok(removed)
    }

    /// Sets or clears a category's per-period budget. Non-positive values clear it.
    pub fn set_category_budget(&mut self, id: &str, budget: Option<f64>) -> Result<()> {
        let category = self.category_mut(id)?;
        category.budget = budget.filter(|value| *value > 0.0);
        Ok(())
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }

    /// Display name for a category id, falling back to `Unknown` for stale references.
    pub fn category_name(&self, id: &str) -> &str {
        self.category(id)
            .map(|category| category.name.as_str())
            .unwrap_or(UNKNOWN_CATEGORY_NAME)
    }

    /// Every income and expense, newest first. Same-day records keep insertion order.
    pub fn transactions(&self) -> Vec<Transaction<'_>> {
        let mut list: Vec<Transaction<'_>> = self
            .incomes
            .iter()
            .map(Transaction::Income)
            .chain(self.expenses.iter().map(Transaction::Expense))
            .collect();
        list.sort_by(|a, b| b.date().cmp(&a.date()));
        list
    }

    /// Removes the income or expense with `id`, whichever holds it.
    pub fn delete_transaction(&mut self, id: Uuid) -> Result<()> {
        if self.delete_income(id).is_ok() {
            return Ok(());
        }
        self.delete_expense(id)
            .map(|_| ())
            .map_err(|_| FlowError::NotFound(format!("transaction {id}")))
    }

    pub fn add_savings_goal(&mut self, goal: SavingsGoal) -> Uuid {
        let id = goal.id;
        self.savings_goals.push(goal);
        id
    }

    pub fn update_savings_goal(&mut self, goal: SavingsGoal) -> Result<()> {
        let slot = self.goal_mut(goal.id)?;
        *slot = goal;
        Ok(())
    }

    pub fn delete_savings_goal(&mut self, id: Uuid) -> Result<SavingsGoal> {
        let index = self
            .savings_goals
            .iter()
            .position(|goal| goal.id == id)
            .ok_or_else(|| FlowError::NotFound(format!("savings goal {id}")))?;
        Ok(self.savings_goals.remove(index))
    }

    /// Adds `amount` to a goal and returns its new balance.
    pub fn contribute_to_goal(&mut self, id: Uuid, amount: f64) -> Result<f64> {
        let goal = self.goal_mut(id)?;
        goal.current_amount += amount;
        Ok(goal.current_amount)
    }

    /// Appends generated occurrences and returns how many were added.
    pub fn apply_recurring(&mut self, batch: RecurringBatch) -> usize {
        let added = batch.len();
        self.incomes.extend(batch.new_incomes);
        self.expenses.extend(batch.new_expenses);
        added
    }

    /// Rejects documents holding malformed records.
    pub fn validate(&self) -> Result<()> {
        for income in &self.incomes {
            income.validate()?;
        }
        for expense in &self.expenses {
            expense.validate()?;
        }
        Ok(())
    }

    fn category_mut(&mut self, id: &str) -> Result<&mut Category> {
        self.categories
            .iter_mut()
            .find(|category| category.id == id)
            .ok_or_else(|| FlowError::NotFound(format!("category {id}")))
    }

    fn goal_mut(&mut self, id: Uuid) -> Result<&mut SavingsGoal> {
        self.savings_goals
            .iter_mut()
            .find(|goal| goal.id == id)
            .ok_or_else(|| FlowError::NotFound(format!("savings goal {id}")))
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn default_state_seeds_categories() {
        let state = BudgetState::default();
        assert_eq!(state.categories.len(), 12);
        assert!(state.incomes.is_empty());
        assert_eq!(state.category_name("food"), "Food & Dining");
    }

    #[test]
    fn reset_restores_seeded_defaults() {
        let mut state = BudgetState::empty();
        state.add_income(Income::new(100.0, "Gift", day(2024, 1, 3)));
        state.add_savings_goal(SavingsGoal::new("Car", 5000.0, "C"));
        state.reset();
        assert_eq!(state, BudgetState::default());
        assert_eq!(state.categories.len(), 12);
        assert!(state.incomes.is_empty() && state.savings_goals.is_empty());
    }

    #[test]
    fn missing_category_name_falls_back() {
        let state = BudgetState::empty();
        assert_eq!(state.category_name("gone"), UNKNOWN_CATEGORY_NAME);
    }

    #[test]
    fn deleting_category_drops_its_expenses() {
        let mut state = BudgetState::default();
        state.add_expense(Expense::new(20.0, "Pizza", "food", day(2024, 1, 2)));
        state.add_expense(Expense::new(900.0, "Rent", "housing", day(2024, 1, 1)));

        let removed = state.delete_category("food").unwrap();
        assert_eq!(removed.name, "Food & Dining");
        assert_eq!(state.expenses.len(), 1);
        assert_eq!(state.expenses[0].category_id, "housing");
        assert!(matches!(
            state.delete_category("food"),
            Err(FlowError::NotFound(_))
        ));
    }

    #[test]
    fn budget_of_zero_clears_it() {
        let mut state = BudgetState::default();
        state.set_category_budget("food", Some(300.0)).unwrap();
        assert_eq!(state.category("food").unwrap().budget, Some(300.0));
        state.set_category_budget("food", Some(0.0)).unwrap();
        assert_eq!(state.category("food").unwrap().budget, None);
        assert!(state.set_category_budget("nope", Some(1.0)).is_err());
    }

    #[test]
    fn update_and_delete_income() {
        let mut state = BudgetState::empty();
        let id = state.add_income(Income::new(100.0, "Gift", day(2024, 1, 3)));
        let mut edited = state.incomes[0].clone();
        edited.amount = 150.0;
        state.update_income(edited).unwrap();
        assert_eq!(state.incomes[0].amount, 150.0);

        let removed = state.delete_income(id).unwrap();
        assert_eq!(removed.amount, 150.0);
        assert!(state.incomes.is_empty());
        assert!(state.delete_income(id).is_err());
    }

    #[test]
    fn transactions_list_newest_first() {
        let mut state = BudgetState::default();
        state.add_income(Income::new(2000.0, "Salary", day(2024, 1, 5)));
        state.add_expense(Expense::new(30.0, "Lunch", "food", day(2024, 1, 9)));
        state.add_expense(Expense::new(900.0, "Rent", "housing", day(2024, 1, 1)));

        let dates: Vec<NaiveDate> = state.transactions().iter().map(|t| t.date()).collect();
        assert_eq!(dates, vec![day(2024, 1, 9), day(2024, 1, 5), day(2024, 1, 1)]);
    }

    #[test]
    fn delete_transaction_finds_either_kind() {
        let mut state = BudgetState::default();
        let income = state.add_income(Income::new(10.0, "Tip", day(2024, 1, 2)));
        let expense = state.add_expense(Expense::new(5.0, "Coffee", "food", day(2024, 1, 2)));

        state.delete_transaction(expense).unwrap();
        state.delete_transaction(income).unwrap();
        assert!(state.transactions().is_empty());
        assert!(matches!(
            state.delete_transaction(income),
            Err(FlowError::NotFound(_))
        ));
    }

    #[test]
    fn contributions_accumulate() {
        let mut state = BudgetState::empty();
        let id = state.add_savings_goal(SavingsGoal::new("Car", 5000.0, "C"));
        state.contribute_to_goal(id, 250.0).unwrap();
        assert_eq!(state.contribute_to_goal(id, 100.0).unwrap(), 350.0);
        assert!(state.contribute_to_goal(Uuid::new_v4(), 1.0).is_err());
    }

    #[test]
    fn validate_reports_first_bad_record() {
        let mut state = BudgetState::empty();
        state.add_expense(Expense::new(-5.0, "Refund", "other", day(2024, 1, 2)));
        assert!(matches!(state.validate(), Err(FlowError::InvalidRecord(_))));
    }

    #[test]
    fn serializes_document_shape() {
        let json = serde_json::to_value(BudgetState::empty()).unwrap();
        let object = json.as_object().unwrap();
        for key in ["categories", "incomes", "expenses", "savingsGoals"] {
            assert!(object.contains_key(key), "missing {key}");
        }
    }
}
