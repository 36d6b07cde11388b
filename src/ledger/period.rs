//! Fixed-length budgeting periods anchored to a reference date.
//!
//! Every period is `PERIOD_DAYS` calendar days long and starts a whole number of
//! periods away from the anchor, so two periods never partially overlap. All
//! functions take the calendar day explicitly; see [`crate::time::Clock`].

use chrono::{Datelike, Days, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::{
    summary::{compute_period_data_in, PeriodData},
    transaction::{Expense, Income},
};

/// Length of every budgeting period, in calendar days.
pub const PERIOD_DAYS: i64 = 14;

/// Anchor all periods are counted from: Monday, January 1st 2024.
pub fn reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Inclusive span of calendar days covered by one period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PeriodWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl PeriodWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    pub fn label(&self) -> String {
        period_label(self.start, self.end)
    }

    /// Distinct `(year, month)` pairs touched by the window, oldest first.
    pub fn months(&self) -> Vec<(i32, u32)> {
        let first = (self.start.year(), self.start.month());
        let last = (self.end.year(), self.end.month());
        if first == last {
            vec![first]
        } else {
            vec![first, last]
        }
    }
}

/// Period geometry: where periods are anchored and how long they last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodCalendar {
    pub reference_date: NaiveDate,
    pub length_days: i64,
}

impl Default for PeriodCalendar {
    fn default() -> Self {
        Self::new(reference_date())
    }
}

impl PeriodCalendar {
    pub fn new(reference_date: NaiveDate) -> Self {
        Self {
            reference_date,
            length_days: PERIOD_DAYS,
        }
    }

    pub fn current_period_start(&self, today: NaiveDate) -> NaiveDate {
        current_period_start(today, self.reference_date, self.length_days)
    }

    pub fn period_end(&self, period_start: NaiveDate) -> NaiveDate {
        period_end(period_start, self.length_days)
    }

    pub fn window(&self, period_start: NaiveDate) -> PeriodWindow {
        PeriodWindow {
            start: period_start,
            end: self.period_end(period_start),
        }
    }

    /// The period containing `today`.
    pub fn current_window(&self, today: NaiveDate) -> PeriodWindow {
        self.window(self.current_period_start(today))
    }

    /// Starts of the `n` periods ending with the current one, oldest first.
    ///
    /// Stops early at the first start chrono cannot represent, so a huge `n`
    /// yields every period back to `NaiveDate::MIN` rather than overflowing.
    pub fn recent_starts(&self, today: NaiveDate, n: usize) -> Vec<NaiveDate> {
        let current = self.current_period_start(today);
        let step = self.length_days.unsigned_abs();
        let mut starts: Vec<NaiveDate> = (0..n as u64)
            .map_while(|back| {
                back.checked_mul(step)
                    .and_then(|days| current.checked_sub_days(Days::new(days)))
            })
            .collect();
        starts.reverse();
        starts
    }

    /// Aggregates each of the `n` periods ending with the current one, oldest first.
    pub fn last_n_periods(
        &self,
        today: NaiveDate,
        n: usize,
        incomes: &[Income],
        expenses: &[Expense],
    ) -> Vec<PeriodData> {
        self.recent_starts(today, n)
            .into_iter()
            .map(|start| compute_period_data_in(self.window(start), incomes, expenses))
            .collect()
    }
}

/// Start of the period containing `today`.
///
/// Days before `reference` floor into earlier periods, so the result is never
/// after `today` and always less than `length_days` before it.
pub fn current_period_start(today: NaiveDate, reference: NaiveDate, length_days: i64) -> NaiveDate {
    let elapsed = (today - reference).num_days();
    let periods = elapsed.div_euclid(length_days);
    reference + Duration::days(periods * length_days)
}

/// Last calendar day (inclusive) of the period starting at `period_start`.
pub fn period_end(period_start: NaiveDate, length_days: i64) -> NaiveDate {
    period_start + Duration::days(length_days - 1)
}

/// Short display label: `Jan 1-14` within a month, `Jan 25 - Feb 7` across months.
///
/// Years are not shown, so a period spanning New Year reads `Dec 25 - Jan 7`.
pub fn period_label(start: NaiveDate, end: NaiveDate) -> String {
    if (start.year(), start.month()) == (end.year(), end.month()) {
        format!("{}-{}", start.format("%b %-d"), end.day())
    } else {
        format!("{} - {}", start.format("%b %-d"), end.format("%b %-d"))
    }
}

/// Uses the default calendar. See [`PeriodCalendar::last_n_periods`].
pub fn last_n_periods(
    today: NaiveDate,
    n: usize,
    incomes: &[Income],
    expenses: &[Expense],
) -> Vec<PeriodData> {
    PeriodCalendar::default().last_n_periods(today, n, incomes, expenses)
}

/// Number of days in `month` of `year`.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(28)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn recent_starts_stop_at_earliest_date() {
        let calendar = PeriodCalendar::new(NaiveDate::MIN);
        let today = NaiveDate::MIN.checked_add_days(Days::new(30)).unwrap();
        let starts = calendar.recent_starts(today, usize::MAX);
        assert_eq!(starts.len(), 3);
        assert_eq!(starts[0], NaiveDate::MIN);
        assert_eq!(starts[2], NaiveDate::MIN.checked_add_days(Days::new(28)).unwrap());
    }

    #[test]
    fn start_on_reference_day_is_reference() {
        let reference = reference_date();
        assert_eq!(current_period_start(reference, reference, PERIOD_DAYS), reference);
    }

    #[test]
    fn start_steps_in_whole_periods() {
        let reference = reference_date();
        assert_eq!(
            current_period_start(day(2024, 1, 14), reference, PERIOD_DAYS),
            day(2024, 1, 1)
        );
        assert_eq!(
            current_period_start(day(2024, 1, 15), reference, PERIOD_DAYS),
            day(2024, 1, 15)
        );
        assert_eq!(
            current_period_start(day(2024, 3, 1), reference, PERIOD_DAYS),
            day(2024, 2, 26)
        );
    }

    #[test]
    fn days_before_reference_floor_backwards() {
        let reference = reference_date();
        assert_eq!(
            current_period_start(day(2023, 12, 31), reference, PERIOD_DAYS),
            day(2023, 12, 18)
        );
        assert_eq!(
            current_period_start(day(2023, 12, 18), reference, PERIOD_DAYS),
            day(2023, 12, 18)
        );
        assert_eq!(
            current_period_start(day(2023, 12, 17), reference, PERIOD_DAYS),
            day(2023, 12, 4)
        );
    }

    #[test]
    fn end_is_inclusive() {
        assert_eq!(period_end(day(2024, 1, 1), PERIOD_DAYS), day(2024, 1, 14));
        assert_eq!(period_end(day(2024, 2, 26), PERIOD_DAYS), day(2024, 3, 10));
    }

    #[test]
    fn labels() {
        assert_eq!(period_label(day(2024, 1, 1), day(2024, 1, 14)), "Jan 1-14");
        assert_eq!(period_label(day(2024, 1, 25), day(2024, 2, 7)), "Jan 25 - Feb 7");
        assert_eq!(period_label(day(2024, 12, 23), day(2025, 1, 5)), "Dec 23 - Jan 5");
    }

    #[test]
    fn window_months() {
        let calendar = PeriodCalendar::default();
        assert_eq!(calendar.window(day(2024, 1, 1)).months(), vec![(2024, 1)]);
        assert_eq!(
            calendar.window(day(2024, 12, 23)).months(),
            vec![(2024, 12), (2025, 1)]
        );
    }

    #[test]
    fn recent_starts_are_oldest_first_and_contiguous() {
        let calendar = PeriodCalendar::default();
        let starts = calendar.recent_starts(day(2024, 3, 1), 3);
        assert_eq!(starts, vec![day(2024, 1, 29), day(2024, 2, 12), day(2024, 2, 26)]);
        assert!(calendar.recent_starts(day(2024, 3, 1), 0).is_empty());
    }

    #[test]
    fn month_lengths() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(2024, 4), 30);
        assert_eq!(days_in_month(2024, 12), 31);
    }
}
