//! Backup import/export and CSV export of the budget document.

use std::io;

use chrono::NaiveDate;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use serde_json::Value;
use tracing::warn;

use crate::{
    errors::{FlowError, Result},
    ledger::BudgetState,
};

const REQUIRED_FIELDS: [&str; 4] = ["categories", "incomes", "expenses", "savingsGoals"];
const CSV_HEADER: [&str; 5] = ["Date", "Type", "Category", "Description/Source", "Amount"];

/// Parses a JSON backup, insisting on all four top-level collections and well-formed records.
pub fn import_backup(json: &str) -> Result<BudgetState> {
    let value: Value = serde_json::from_str(json).map_err(|err| {
        warn!(error = %err, "backup is not valid JSON");
        FlowError::InvalidBackup("Failed to parse backup file".into())
    })?;

    let has_all_fields = value.as_object().is_some_and(|object| {
        REQUIRED_FIELDS
            .iter()
            .all(|field| object.get(*field).is_some_and(|v| !v.is_null()))
    });
    if !has_all_fields {
        warn!("backup is missing required collections");
        return Err(FlowError::InvalidBackup("Invalid backup file format".into()));
    }

    let state: BudgetState = serde_json::from_value(value).map_err(|err| {
        warn!(error = %err, "backup records do not match the document shape");
        FlowError::InvalidBackup("Invalid backup file format".into())
    })?;
    state.validate()?;
    Ok(state)
}

pub fn export_backup(state: &BudgetState) -> Result<String> {
    Ok(serde_json::to_string_pretty(state)?)
}

pub fn backup_file_name(date: NaiveDate) -> String {
    format!("flow-finance-backup-{}.json", date.format("%Y-%m-%d"))
}

pub fn csv_file_name(date: NaiveDate) -> String {
    format!("flow-finance-export-{}.csv", date.format("%Y-%m-%d"))
}

/// Renders every income and expense as CSV, ordered by date.
///
/// The header row is bare; every data cell is quoted. Expenses carry negated
/// amounts and their category name; a category that no longer exists leaves
/// the cell empty.
pub fn export_csv(state: &BudgetState) -> Result<String> {
    let mut rows: Vec<(NaiveDate, [String; 5])> = Vec::new();

    for income in &state.incomes {
        rows.push((
            income.date,
            [
                income.date.to_string(),
                "Income".into(),
                String::new(),
                income.source.clone(),
                income.amount.to_string(),
            ],
        ));
    }

    for expense in &state.expenses {
        let category = state
            .category(&expense.category_id)
            .map(|category| category.name.clone())
            .unwrap_or_default();
        rows.push((
            expense.date,
            [
                expense.date.to_string(),
                "Expense".into(),
                category,
                expense.description.clone(),
                (-expense.amount).to_string(),
            ],
        ));
    }

    rows.sort_by_key(|(date, _)| *date);

    let mut header = csv_writer(QuoteStyle::Necessary, Vec::new());
    header.write_record(CSV_HEADER)?;
    let mut body = csv_writer(QuoteStyle::Always, finish(header)?);
    for (_, cells) in &rows {
        body.write_record(cells)?;
    }

    let mut text = String::from_utf8(finish(body)?)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
    if text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}

fn csv_writer(style: QuoteStyle, buffer: Vec<u8>) -> csv::Writer<Vec<u8>> {
    WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .quote_style(style)
        .from_writer(buffer)
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>> {
    writer
        .into_inner()
        .map_err(|err| FlowError::Io(err.into_error()))
}
