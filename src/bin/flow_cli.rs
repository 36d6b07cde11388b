use std::{env, fs, path::PathBuf, process};

use chrono::NaiveDate;
use colored::{ColoredString, Colorize};
use uuid::Uuid;

use flow_finance::{
    config::ConfigManager,
    currency::{format_compact_currency, format_currency},
    errors::FlowError,
    init,
    ledger::{BudgetHealthStatus, Expense, Income, PeriodData, SavingsGoal, Transaction},
    session::BudgetSession,
    storage::{backup_file_name, csv_file_name, export_backup, export_csv, JsonStorage},
    time::{Clock, FixedClock, SystemClock},
    utils::{build_info, paths},
};

/// Pins the calendar day instead of reading the system clock.
const TODAY_ENV: &str = "FLOW_FINANCE_TODAY";
/// Upper bound for `history`, roughly ten years of periods.
const MAX_HISTORY_PERIODS: usize = 260;
/// Flags that take no value.
const SWITCHES: [&str; 1] = ["yes"];
const DEFAULT_GOAL_ICON: &str = "G";

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

fn main() {
    init();

    if let Err(err) = run() {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run() -> CliResult<()> {
    let mut args = env::args().skip(1);
    let command = args.next().unwrap_or_else(|| {
        print_usage();
        process::exit(1);
    });

    if command == "version" {
        println!("{}", build_info::current().summary());
        return Ok(());
    }

    let args = CommandArgs::parse(args)?;
    let base = paths::app_data_dir();
    let config = ConfigManager::with_base_dir(base.clone())?.load()?;
    let storage = JsonStorage::new(Some(base))?;
    let mut session = BudgetSession::start(Box::new(storage), clock_from_env()?, config.calendar())?;
    if session.generated_on_start() > 0 {
        println!(
            "Added {} recurring transaction(s) for this period.",
            session.generated_on_start()
        );
    }

    match command.as_str() {
        "summary" => {
            let period = session.current_period();
            print_period(&period);
            let health = session.health();
            println!(
                "Health:   {} ({:.1}%) {}",
                paint(health.status),
                health.percentage,
                health.message
            );
        }
        "history" => {
            let count = match args.optional(0) {
                Some(raw) => raw.parse::<usize>()?,
                None => config.history_periods,
            };
            if count > MAX_HISTORY_PERIODS {
                return Err(format!("history shows at most {MAX_HISTORY_PERIODS} periods").into());
            }
            for period in session.history(count) {
                println!(
                    "{:<16} income {:>12}  expenses {:>12}  balance {:>12}",
                    period.label,
                    format_currency(period.total_income),
                    format_currency(period.total_expenses),
                    format_currency(period.balance)
                );
            }
        }
        "health" => {
            let health = session.health();
            println!("{} {:.1}%", paint(health.status), health.percentage);
            println!("{}", health.message);
        }
        "categories" => print_category_spending(&session),
        "list" => print_transactions(&session),
        "add-income" => add_income(&mut session, &args)?,
        "add-expense" => add_expense(&mut session, &args)?,
        "edit" => edit_transaction(&mut session, &args)?,
        "delete" => {
            let id = parse_id(args.arg(0, "id")?)?;
            session.state_mut().delete_transaction(id)?;
            session.save()?;
            println!("Deleted {id}");
        }
        "set-budget" => set_budget(&mut session, &args)?,
        "goals" => print_goals(&session),
        "add-goal" => add_goal(&mut session, &args)?,
        "contribute" => contribute(&mut session, &args)?,
        "delete-goal" => {
            let id = parse_id(args.arg(0, "goal-id")?)?;
            let goal = session.state_mut().delete_savings_goal(id)?;
            session.save()?;
            println!("Deleted goal {}", goal.name);
        }
        "reset" => {
            if !args.switch("yes") {
                return Err("reset erases every record; pass --yes to confirm".into());
            }
            session.reset()?;
            println!("All data reset to defaults.");
        }
        "export-csv" => {
            let path = output_path(args.optional(0), csv_file_name(session.today()));
            fs::write(&path, export_csv(session.state())?)?;
            println!("Exported CSV to {}", path.display());
        }
        "export-json" => {
            let path = output_path(args.optional(0), backup_file_name(session.today()));
            fs::write(&path, export_backup(session.state())?)?;
            println!("Saved backup to {}", path.display());
        }
        "import" => {
            let path = PathBuf::from(args.arg(0, "file.json")?);
            let data = fs::read_to_string(&path)?;
            session.import_backup(&data)?;
            println!("Imported backup from {}", path.display());
        }
        _ => {
            print_usage();
            process::exit(1);
        }
    }

    Ok(())
}

/// Positional arguments plus `--name value` flags, in any order.
struct CommandArgs {
    positional: Vec<String>,
    flags: Vec<(String, Option<String>)>,
}

impl CommandArgs {
    fn parse(mut args: impl Iterator<Item = String>) -> CliResult<Self> {
        let mut positional = Vec::new();
        let mut flags = Vec::new();
        while let Some(arg) = args.next() {
            if !arg.starts_with("--") {
                positional.push(arg);
                continue;
            }
            let name = arg.trim_start_matches("--").to_string();
            if SWITCHES.contains(&name.as_str()) {
                flags.push((name, None));
            } else {
                let value = args
                    .next()
                    .ok_or_else(|| format!("--{name} needs a value"))?;
                flags.push((name, Some(value)));
            }
        }
        Ok(Self { positional, flags })
    }

    fn arg(&self, index: usize, name: &str) -> CliResult<&str> {
        self.optional(index)
            .ok_or_else(|| format!("missing <{name}>").into())
    }

    fn optional(&self, index: usize) -> Option<&str> {
        self.positional.get(index).map(String::as_str)
    }

    fn flag(&self, name: &str) -> Option<&str> {
        self.flags
            .iter()
            .rev()
            .find(|(flag, _)| flag == name)
            .and_then(|(_, value)| value.as_deref())
    }

    fn switch(&self, name: &str) -> bool {
        self.flags.iter().any(|(flag, _)| flag == name)
    }
}

fn add_income(session: &mut BudgetSession, args: &CommandArgs) -> CliResult<()> {
    let amount = parse_amount(args.arg(0, "amount")?)?;
    let source = args.arg(1, "source")?;
    let date = record_date(session, args)?;

    let mut income = Income::new(amount, source.trim(), date);
    if let Some(day) = args.flag("recurring").map(parse_day).transpose()? {
        income.set_recurring_day(day);
    }
    income.validate()?;

    let id = session.state_mut().add_income(income);
    session.save()?;
    println!("Added income {id}");
    Ok(())
}

fn add_expense(session: &mut BudgetSession, args: &CommandArgs) -> CliResult<()> {
    let amount = parse_amount(args.arg(0, "amount")?)?;
    let category = known_category(session, args.arg(1, "category")?)?;
    let description = args.arg(2, "description")?;
    let date = record_date(session, args)?;

    let mut expense = Expense::new(amount, description.trim(), category, date);
    if let Some(day) = args.flag("recurring").map(parse_day).transpose()? {
        expense.set_recurring_day(day);
    }
    expense.validate()?;

    let id = session.state_mut().add_expense(expense);
    session.save()?;
    println!("Added expense {id}");
    Ok(())
}

fn edit_transaction(session: &mut BudgetSession, args: &CommandArgs) -> CliResult<()> {
    let id = parse_id(args.arg(0, "id")?)?;
    let amount = args.flag("amount").map(parse_amount).transpose()?;
    let date = args.flag("date").map(parse_date).transpose()?;
    let day = args.flag("recurring").map(parse_day).transpose()?;
    let text = args.flag("text").map(str::trim);
    let category = args
        .flag("category")
        .map(|raw| known_category(session, raw))
        .transpose()?;

    let state = session.state_mut();
    let income = state.incomes.iter().find(|income| income.id == id).cloned();
    let expense = state.expenses.iter().find(|expense| expense.id == id).cloned();
    if let Some(mut income) = income {
        if category.is_some() {
            return Err("--category applies to expenses only".into());
        }
        if let Some(amount) = amount {
            income.amount = amount;
        }
        if let Some(text) = text {
            income.source = text.to_string();
        }
        if let Some(date) = date {
            income.date = date;
        }
        if let Some(day) = day {
            income.set_recurring_day(day);
        }
        income.validate()?;
        state.update_income(income)?;
    } else if let Some(mut expense) = expense {
        if let Some(amount) = amount {
            expense.amount = amount;
        }
        if let Some(text) = text {
            expense.description = text.to_string();
        }
        if let Some(category) = category {
            expense.category_id = category;
        }
        if let Some(date) = date {
            expense.date = date;
        }
        if let Some(day) = day {
            expense.set_recurring_day(day);
        }
        expense.validate()?;
        state.update_expense(expense)?;
    } else {
        return Err(FlowError::NotFound(format!("transaction {id}")).into());
    }

    session.save()?;
    println!("Updated {id}");
    Ok(())
}

fn set_budget(session: &mut BudgetSession, args: &CommandArgs) -> CliResult<()> {
    let id = args.arg(0, "category")?;
    let raw = args.arg(1, "amount")?;
    let budget = raw
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value >= 0.0)
        .ok_or_else(|| format!("invalid budget: {raw}"))?;

    session.state_mut().set_category_budget(id, Some(budget))?;
    session.save()?;
    let name = session.state().category_name(id);
    if budget > 0.0 {
        println!("Budget for {name} set to {}", format_currency(budget));
    } else {
        println!("Budget for {name} cleared");
    }
    Ok(())
}

fn add_goal(session: &mut BudgetSession, args: &CommandArgs) -> CliResult<()> {
    let name = args.arg(0, "name")?;
    let target = parse_amount(args.arg(1, "target")?)?;
    let icon = args.flag("icon").unwrap_or(DEFAULT_GOAL_ICON);

    let mut goal = SavingsGoal::new(name.trim(), target, icon);
    goal.deadline = args.flag("deadline").map(parse_date).transpose()?;
    goal.validate()?;

    let id = session.state_mut().add_savings_goal(goal);
    session.save()?;
    println!("Added goal {id}");
    Ok(())
}

fn contribute(session: &mut BudgetSession, args: &CommandArgs) -> CliResult<()> {
    let id = parse_id(args.arg(0, "goal-id")?)?;
    let amount = parse_amount(args.arg(1, "amount")?)?;

    session.state_mut().contribute_to_goal(id, amount)?;
    session.save()?;
    if let Some(goal) = session.state().savings_goals.iter().find(|goal| goal.id == id) {
        println!(
            "Contributed {} to {}: {}",
            format_currency(amount),
            goal.name,
            goal_progress(goal)
        );
    }
    Ok(())
}

fn print_category_spending(session: &BudgetSession) {
    let spending = session.category_spending();
    if spending.is_empty() {
        println!("No spending this period.");
    }
    for entry in spending {
        let budget = match entry.budget {
            Some(limit) => format!(
                " / {} ({:.0}%){}",
                format_currency(limit),
                entry.percentage,
                if entry.over_budget { " over budget" } else { "" }
            ),
            None => String::new(),
        };
        println!(
            "{:<16} {}{}",
            entry.category.name,
            format_currency(entry.amount),
            budget
        );
    }
}

fn print_transactions(session: &BudgetSession) {
    let state = session.state();
    let transactions = state.transactions();
    if transactions.is_empty() {
        println!("No transactions yet. Add your first income or expense to get started.");
    }
    for transaction in transactions {
        let (kind, category, text) = match transaction {
            Transaction::Income(income) => ("Income", "", income.source.as_str()),
            Transaction::Expense(expense) => (
                "Expense",
                state.category_name(&expense.category_id),
                expense.description.as_str(),
            ),
        };
        println!(
            "{}  {:<7}  {:<16}  {:<24} {:>12}{}  {}",
            transaction.date(),
            kind,
            category,
            text,
            format_currency(transaction.signed_amount()),
            if transaction.is_recurring() { " (monthly)" } else { "" },
            transaction.id()
        );
    }
}

fn print_goals(session: &BudgetSession) {
    let goals = &session.state().savings_goals;
    if goals.is_empty() {
        println!("No savings goals yet.");
    }
    for goal in goals {
        println!("{} {:<16} {}  {}", goal.icon, goal.name, goal_progress(goal), goal.id);
    }
}

fn goal_progress(goal: &SavingsGoal) -> String {
    format!(
        "{} of {} ({:.0}%){}",
        format_compact_currency(goal.current_amount),
        format_compact_currency(goal.target_amount),
        goal.progress_percentage(),
        if goal.is_complete() { " complete" } else { "" }
    )
}

fn known_category(session: &BudgetSession, id: &str) -> CliResult<String> {
    match session.state().category(id) {
        Some(category) => Ok(category.id.clone()),
        None => Err(FlowError::NotFound(format!("category {id}")).into()),
    }
}

fn record_date(session: &BudgetSession, args: &CommandArgs) -> CliResult<NaiveDate> {
    match args.flag("date") {
        Some(raw) => parse_date(raw),
        None => Ok(session.today()),
    }
}

fn parse_amount(raw: &str) -> CliResult<f64> {
    raw.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value > 0.0)
        .ok_or_else(|| format!("invalid amount: {raw}").into())
}

fn parse_date(raw: &str) -> CliResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("invalid date {raw}, expected YYYY-MM-DD: {err}").into())
}

/// `0` clears the recurrence; 1-31 sets the monthly day.
fn parse_day(raw: &str) -> CliResult<Option<u32>> {
    match raw.parse::<u32>() {
        Ok(0) => Ok(None),
        Ok(day) if day <= 31 => Ok(Some(day)),
        _ => Err(format!("invalid recurring day: {raw}").into()),
    }
}

fn parse_id(raw: &str) -> CliResult<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|err| format!("invalid id {raw}: {err}").into())
}

fn output_path(arg: Option<&str>, default_name: String) -> PathBuf {
    arg.map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(default_name))
}

fn clock_from_env() -> CliResult<Box<dyn Clock>> {
    match env::var(TODAY_ENV) {
        Ok(raw) => {
            let day = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                .map_err(|err| format!("{TODAY_ENV} must be YYYY-MM-DD: {err}"))?;
            Ok(Box::new(FixedClock::new(day)))
        }
        Err(_) => Ok(Box::new(SystemClock)),
    }
}

fn print_period(period: &PeriodData) {
    println!(
        "Period:   {} ({} to {})",
        period.label, period.period_start, period.period_end
    );
    println!("Income:   {}", format_currency(period.total_income));
    println!("Expenses: {}", format_currency(period.total_expenses));
    println!("Balance:  {}", format_currency(period.balance));
}

fn paint(status: BudgetHealthStatus) -> ColoredString {
    let label = status.as_str();
    match status {
        BudgetHealthStatus::Excellent | BudgetHealthStatus::Good => label.green(),
        BudgetHealthStatus::Warning => label.yellow(),
        BudgetHealthStatus::Danger | BudgetHealthStatus::Critical => label.red(),
    }
}

fn print_usage() {
    eprintln!(
        "Usage: flow_cli <command>\n\
         Commands:\n  \
         summary\n  \
         history [periods]\n  \
         health\n  \
         categories\n  \
         list\n  \
         add-income <amount> <source> [--date YYYY-MM-DD] [--recurring DAY]\n  \
         add-expense <amount> <category> <description> [--date YYYY-MM-DD] [--recurring DAY]\n  \
         edit <id> [--amount X] [--text T] [--category C] [--date YYYY-MM-DD] [--recurring DAY|0]\n  \
         delete <id>\n  \
         set-budget <category> <amount>\n  \
         goals\n  \
         add-goal <name> <target> [--icon I] [--deadline YYYY-MM-DD]\n  \
         contribute <goal-id> <amount>\n  \
         delete-goal <goal-id>\n  \
         export-csv [file.csv]\n  \
         export-json [file.json]\n  \
         import <file.json>\n  \
         reset --yes\n  \
         version"
    );
}
