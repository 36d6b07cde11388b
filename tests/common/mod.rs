#![allow(dead_code)]

use chrono::NaiveDate;
use flow_finance::ledger::{Expense, Income};

pub fn day(year: i32, month: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, d).expect("valid calendar date")
}

pub fn income(amount: f64, source: &str, date: NaiveDate) -> Income {
    Income::new(amount, source, date)
}

pub fn expense(amount: f64, description: &str, category: &str, date: NaiveDate) -> Expense {
    Expense::new(amount, description, category, date)
}
