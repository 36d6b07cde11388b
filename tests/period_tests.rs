mod common;

use chrono::Duration;
use common::{day, expense, income};
use flow_finance::ledger::{
    compute_period_data, compute_period_data_in, current_period_start, last_n_periods, period_end,
    period_label, reference_date, PeriodCalendar, PeriodWindow, PERIOD_DAYS,
};

#[test]
fn current_start_brackets_every_day_across_two_years() {
    let reference = reference_date();
    let mut today = day(2023, 1, 1);
    while today <= day(2025, 1, 31) {
        let start = current_period_start(today, reference, PERIOD_DAYS);
        assert!(start <= today, "{start} after {today}");
        assert!(today < start + Duration::days(PERIOD_DAYS), "{today} outside period from {start}");
        assert_eq!((start - reference).num_days().rem_euclid(PERIOD_DAYS), 0);
        assert_eq!(start, current_period_start(today, reference, PERIOD_DAYS));
        today += Duration::days(1);
    }
}

#[test]
fn days_in_same_period_share_a_start() {
    let calendar = PeriodCalendar::default();
    let start = calendar.current_period_start(day(2024, 5, 20));
    for offset in 0..PERIOD_DAYS {
        assert_eq!(calendar.current_period_start(start + Duration::days(offset)), start);
    }
    assert_ne!(
        calendar.current_period_start(start + Duration::days(PERIOD_DAYS)),
        start
    );
}

#[test]
fn custom_anchor_shifts_boundaries() {
    let calendar = PeriodCalendar::new(day(2024, 1, 8));
    assert_eq!(calendar.current_period_start(day(2024, 1, 7)), day(2023, 12, 25));
    assert_eq!(calendar.current_period_start(day(2024, 1, 8)), day(2024, 1, 8));
    assert_eq!(calendar.period_end(day(2024, 1, 8)), day(2024, 1, 21));
}

#[test]
fn aggregates_example_period() {
    let incomes = vec![
        income(500.0, "Salary", day(2024, 1, 5)),
        income(300.0, "Freelance", day(2024, 1, 10)),
        income(450.0, "Salary", day(2024, 1, 20)),
    ];
    let expenses = vec![expense(200.0, "Groceries", "food", day(2024, 1, 3))];

    let data = compute_period_data(day(2024, 1, 1), &incomes, &expenses);
    assert_eq!(data.period_start, day(2024, 1, 1));
    assert_eq!(data.period_end, day(2024, 1, 14));
    assert_eq!(data.total_income, 800.0);
    assert_eq!(data.total_expenses, 200.0);
    assert_eq!(data.balance, 600.0);
}

#[test]
fn aggregation_ignores_record_order() {
    let mut incomes = vec![
        income(10.0, "A", day(2024, 1, 2)),
        income(20.0, "B", day(2024, 1, 3)),
        income(30.0, "C", day(2024, 1, 4)),
    ];
    let forward = compute_period_data(day(2024, 1, 1), &incomes, &[]);
    incomes.reverse();
    let backward = compute_period_data(day(2024, 1, 1), &incomes, &[]);
    assert_eq!(forward, backward);
}

#[test]
fn adjacent_periods_sum_to_their_union() {
    let incomes = vec![
        income(100.0, "A", day(2024, 1, 1)),
        income(200.0, "B", day(2024, 1, 14)),
        income(400.0, "C", day(2024, 1, 15)),
        income(800.0, "D", day(2024, 1, 28)),
        income(1600.0, "E", day(2024, 1, 29)),
    ];
    let expenses = vec![
        expense(50.0, "X", "food", day(2024, 1, 7)),
        expense(70.0, "Y", "food", day(2024, 1, 21)),
    ];

    let first = compute_period_data(day(2024, 1, 1), &incomes, &expenses);
    let second = compute_period_data(day(2024, 1, 15), &incomes, &expenses);
    let union = compute_period_data_in(
        PeriodWindow {
            start: day(2024, 1, 1),
            end: day(2024, 1, 28),
        },
        &incomes,
        &expenses,
    );

    assert_eq!(first.total_income + second.total_income, union.total_income);
    assert_eq!(first.total_expenses + second.total_expenses, union.total_expenses);
    assert_eq!(first.balance + second.balance, union.balance);
}

#[test]
fn labels_match_display_format() {
    assert_eq!(period_label(day(2024, 1, 1), day(2024, 1, 14)), "Jan 1-14");
    assert_eq!(period_label(day(2024, 1, 25), day(2024, 2, 7)), "Jan 25 - Feb 7");
    assert_eq!(period_end(day(2024, 1, 29), PERIOD_DAYS), day(2024, 2, 11));
}

#[test]
fn last_n_periods_are_oldest_first_and_independent() {
    let incomes = vec![
        income(100.0, "Early", day(2024, 1, 2)),
        income(250.0, "Late", day(2024, 1, 16)),
    ];
    let expenses = vec![expense(40.0, "Lunch", "food", day(2024, 1, 17))];

    let periods = last_n_periods(day(2024, 1, 20), 3, &incomes, &expenses);
    let labels: Vec<&str> = periods.iter().map(|p| p.label.as_str()).collect();
    assert_eq!(labels, vec!["Dec 18-31", "Jan 1-14", "Jan 15-28"]);
    assert_eq!(periods[0].total_income, 0.0);
    assert_eq!(periods[1].total_income, 100.0);
    assert_eq!(periods[2].total_income, 250.0);
    assert_eq!(periods[2].balance, 210.0);
}
