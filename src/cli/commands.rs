use std::{
    fs,
    io::IsTerminal,
    path::{Path, PathBuf},
};

use chrono::{NaiveDate, Utc};
use dialoguer::{theme::ColorfulTheme, Confirm};
use tracing::info;
use uuid::Uuid;

use super::output::{self, format_money};
use super::{CliError, CommandResult, Session};
use crate::domain::{Frequency, ItemKind, RecurringItem};
use crate::forecast::{build_forecast, CycleAdvance};
use crate::import::{
    import_csv, import_profile_json, parse_boolean, parse_frequency, try_parse_date, CsvImport,
    ImportMode, ProfileExport,
};

pub fn dispatch(session: &mut Session, command: &str, args: &[String]) -> CommandResult {
    match command {
        "forecast" => forecast(session, args),
        "summary" => {
            let profile = session.book.current();
            output::render_summary(session.book.current_name(), &profile.monthly_summary());
            Ok(())
        }
        "plan" => {
            let profile = session.book.current();
            output::render_plan(session.book.current_name(), &profile.action_plan());
            Ok(())
        }
        "list" => {
            list(session);
            Ok(())
        }
        "balance" => balance(session, args),
        "savings" => savings(session, args),
        "add" => add(session, args),
        "remove" => remove(session, args),
        "edit" => edit(session, args),
        "clear" => clear(session, args),
        "import" => import(session, args),
        "import-json" => import_json(session, args),
        "export" => export(session, args),
        "advance" => advance(session),
        "reset" => {
            let today = session.today;
            session.book.current_mut().reset_cycle(today);
            session.persist()?;
            output::success(format!("Forecast cycle restarted on {today}"));
            Ok(())
        }
        "profiles" => {
            for name in session.book.names() {
                let marker = if name == session.book.current_name() {
                    "*"
                } else {
                    " "
                };
                output::info(format!("{marker} {name}"));
            }
            Ok(())
        }
        "profile" => profile(session, args),
        other => {
            super::print_usage();
            Err(CliError::Usage(format!("unknown command `{other}`")))
        }
    }
}

pub fn version() {
    let hash = option_env!("CASHFLOW_CORE_BUILD_HASH").unwrap_or("unknown");
    let status = option_env!("CASHFLOW_CORE_BUILD_STATUS").unwrap_or("unknown");
    let built = option_env!("CASHFLOW_CORE_BUILD_TIMESTAMP").unwrap_or("unknown");
    output::info(format!(
        "cashflow_core {} ({hash}, {status}, built {built})",
        env!("CARGO_PKG_VERSION")
    ));
    output::info(format!(
        "target {} ({}), {}",
        option_env!("CASHFLOW_CORE_BUILD_TARGET").unwrap_or("unknown"),
        option_env!("CASHFLOW_CORE_BUILD_PROFILE").unwrap_or("unknown"),
        option_env!("CASHFLOW_CORE_BUILD_RUSTC").unwrap_or("unknown")
    ));
}

fn forecast(session: &Session, args: &[String]) -> CommandResult {
    let profile = session.book.current();
    let forecast = match args {
        [] => profile.forecast(),
        [flag, date] if flag == "--from" => {
            let from = parse_cli_date(date, session.today)?;
            build_forecast(
                profile.current_balance,
                &profile.incomes,
                &profile.expenses,
                from,
            )
        }
        _ => return Err(usage("forecast [--from DATE]")),
    };
    let current = (forecast.reference_date == profile.forecast_start_date)
        .then(|| profile.current_week(session.today));
    output::render_forecast(session.book.current_name(), &forecast, current);
    Ok(())
}

fn list(session: &Session) {
    let profile = session.book.current();
    for kind in [ItemKind::Income, ItemKind::Expense] {
        output::section(match kind {
            ItemKind::Income => "Incomes",
            ItemKind::Expense => "Expenses",
        });
        let items = profile.items(kind);
        if items.is_empty() {
            output::info("(none)");
        }
        for item in items {
            let essential = if kind == ItemKind::Expense && item.essential {
                " essential"
            } else {
                ""
            };
            output::info(format!(
                "{:<24} {} {} next {}{}",
                item.display_name(kind),
                format_money(item.amount),
                item.frequency,
                item.next_date,
                essential
            ));
        }
    }
    output::info(format!("Balance: {}", format_money(profile.current_balance)));
}

fn balance(session: &mut Session, args: &[String]) -> CommandResult {
    let [amount] = args else {
        return Err(usage("balance <amount>"));
    };
    let amount = parse_number(amount)?;
    session.book.current_mut().current_balance = amount;
    session.persist()?;
    output::success(format!("Current balance set to {}", format_money(amount)));
    Ok(())
}

fn savings(session: &mut Session, args: &[String]) -> CommandResult {
    let [percent] = args else {
        return Err(usage("savings <percent>"));
    };
    let percent: u8 = percent
        .trim()
        .trim_end_matches('%')
        .parse()
        .map_err(|_| CliError::Input(format!("`{percent}` is not a percentage")))?;
    let profile = session.book.current_mut();
    profile.set_savings_percent(percent);
    let stored = profile.savings_percent;
    session.persist()?;
    output::success(format!("Savings target set to {stored}%"));
    Ok(())
}

fn add(session: &mut Session, args: &[String]) -> CommandResult {
    let (kind, name, amount, frequency, date, essential) = match args {
        [kind, name, amount, frequency, date] => (kind, name, amount, frequency, date, None),
        [kind, name, amount, frequency, date, essential] => {
            (kind, name, amount, frequency, date, Some(essential))
        }
        _ => {
            return Err(usage(
                "add <income|expense> <name> <amount> <frequency> <date> [essential]",
            ))
        }
    };
    let kind = parse_kind(kind)?;
    let amount = parse_number(amount)?;
    if amount < 0.0 {
        return Err(CliError::Input("amounts cannot be negative".into()));
    }
    let essential = essential.map(|flag| parse_essential(flag)).unwrap_or(false);
    let next_date = parse_cli_date(date, session.today)?;
    let item = RecurringItem::new(name.trim(), amount, parse_frequency(frequency), next_date)
        .with_essential(essential);

    let summary = format!(
        "Added {kind} `{}`: {} {} from {}",
        item.display_name(kind),
        format_money(item.amount),
        item.frequency,
        item.next_date
    );
    session.book.current_mut().add_item(kind, item);
    session.persist()?;
    output::success(summary);
    Ok(())
}

fn remove(session: &mut Session, args: &[String]) -> CommandResult {
    let [kind, name] = args else {
        return Err(usage("remove <income|expense> <name>"));
    };
    let kind = parse_kind(kind)?;
    let profile = session.book.current_mut();
    let id = find_item(profile.items(kind), kind, name)?;
    profile.remove_item(kind, id)?;
    session.persist()?;
    output::success(format!("Removed {kind} `{name}`"));
    Ok(())
}

fn edit(session: &mut Session, args: &[String]) -> CommandResult {
    let [kind, name, field, value] = args else {
        return Err(usage(
            "edit <income|expense> <name> <name|amount|frequency|date|essential> <value>",
        ));
    };
    let kind = parse_kind(kind)?;
    let change = parse_field_change(field, value, session.today)?;
    let profile = session.book.current_mut();
    let id = find_item(profile.items(kind), kind, name)?;
    profile.update_item(kind, id, |item| change.apply(item))?;
    session.persist()?;
    output::success(format!("Updated {kind} `{}`: {field} set to {value}", name.trim()));
    Ok(())
}

fn clear(session: &mut Session, args: &[String]) -> CommandResult {
    let confirmed = match args {
        [] => confirm_clear(session.book.current_name())?,
        [flag] if flag == "--yes" => true,
        _ => return Err(usage("clear [--yes]")),
    };
    if !confirmed {
        output::info("Nothing cleared");
        return Ok(());
    }
    let today = session.today;
    session.book.current_mut().clear(today);
    session.persist()?;
    output::success(format!(
        "Cleared `{}`; new cycle starts {today}",
        session.book.current_name()
    ));
    Ok(())
}

fn confirm_clear(profile: &str) -> Result<bool, CliError> {
    if !std::io::stdin().is_terminal() {
        return Err(CliError::Usage(
            "refusing to clear without a terminal; pass --yes to confirm".into(),
        ));
    }
    let confirmed = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(format!(
            "Delete every income, expense and the balance of `{profile}`?"
        ))
        .default(false)
        .interact()?;
    Ok(confirmed)
}

fn import(session: &mut Session, args: &[String]) -> CommandResult {
    let mut path = None;
    let mut forced_kind = None;
    let mut mode = ImportMode::Replace;
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--append" => mode = ImportMode::Append,
            "--as" => {
                let value = iter
                    .next()
                    .ok_or_else(|| usage("import <file.csv> [--as income|expense] [--append]"))?;
                forced_kind = Some(parse_kind(value)?);
            }
            other if path.is_none() => path = Some(PathBuf::from(other)),
            other => return Err(CliError::Usage(format!("unexpected argument `{other}`"))),
        }
    }
    let path = path.ok_or_else(|| usage("import <file.csv> [--as income|expense] [--append]"))?;

    let content = fs::read_to_string(&path)?;
    let mut import = import_csv(&content, session.today)?;
    if let Some(kind) = forced_kind {
        import.resolve_kind(kind);
    } else if import.needs_kind_decision() {
        let kind = ask_for_kind(&import)?;
        import.resolve_kind(kind);
    }

    let preview = import.preview();
    let items = import.into_items();
    session.book.current_mut().apply_import(items, mode);
    session.persist()?;
    info!(path = %path.display(), total = preview.total, "csv import applied");

    let verb = match mode {
        ImportMode::Replace => "Replaced items with",
        ImportMode::Append => "Appended",
    };
    output::success(format!(
        "{verb} {} item(s): {} income, {} expense",
        preview.total, preview.incomes, preview.expenses
    ));
    Ok(())
}

fn ask_for_kind(import: &CsvImport) -> Result<ItemKind, CliError> {
    if !std::io::stdin().is_terminal() {
        return Err(CliError::Usage(
            "the file has no type column; pass --as income or --as expense".into(),
        ));
    }
    let total = import.preview().total;
    let as_income = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(format!(
            "No type column found. Import all {total} item(s) as income? (no = expenses)"
        ))
        .default(false)
        .interact()?;
    Ok(if as_income {
        ItemKind::Income
    } else {
        ItemKind::Expense
    })
}

fn import_json(session: &mut Session, args: &[String]) -> CommandResult {
    let [path] = args else {
        return Err(usage("import-json <file.json>"));
    };
    let content = fs::read_to_string(path)?;
    let imported = import_profile_json(&content, session.today)?;
    let target = session.book.current_name().to_string();
    *session.book.current_mut() = imported.profile;
    session.persist()?;
    match imported.name {
        Some(source) => output::success(format!("Imported profile `{source}` into `{target}`")),
        None => output::success(format!("Imported profile data into `{target}`")),
    }
    Ok(())
}

fn export(session: &mut Session, args: &[String]) -> CommandResult {
    let export = ProfileExport::new(
        session.book.current_name(),
        session.book.current(),
        Utc::now(),
    );
    let path = match args {
        [] => PathBuf::from(export.file_name()),
        [target] if Path::new(target).is_dir() => Path::new(target).join(export.file_name()),
        [target] => PathBuf::from(target),
        _ => return Err(usage("export [file.json|directory]")),
    };
    fs::write(&path, export.to_json()?)?;
    output::success(format!("Exported `{}` to {}", export.profile_name, path.display()));
    Ok(())
}

fn advance(session: &mut Session) -> CommandResult {
    let today = session.today;
    let outcome = session.book.current_mut().advance_week(today);
    session.persist()?;
    match outcome {
        CycleAdvance::NextWeek {
            completed_week,
            balance,
            forecast_start,
        } => output::success(format!(
            "Week {completed_week} closed; balance {} carried to {forecast_start}",
            format_money(balance)
        )),
        CycleAdvance::NewCycle {
            balance,
            forecast_start,
        } => output::success(format!(
            "Cycle complete; new 6-week cycle starts {forecast_start} with {}",
            format_money(balance)
        )),
    }
    Ok(())
}

fn profile(session: &mut Session, args: &[String]) -> CommandResult {
    let today = session.today;
    let book = &mut session.book;
    let message = match args {
        [action, name] if action == "new" => {
            book.create(name, today)?;
            format!("Created profile `{}`", book.current_name())
        }
        [action, name] if action == "copy" => {
            let source = book.current_name().to_string();
            book.copy_current(name)?;
            format!("Copied `{source}` to `{}`", book.current_name())
        }
        [action, old, new] if action == "rename" => {
            book.rename(old, new)?;
            format!("Renamed `{old}` to `{}`", new.trim())
        }
        [action, name] if action == "delete" => {
            book.delete(name)?;
            format!("Deleted `{name}`; current profile is `{}`", book.current_name())
        }
        [action, name] if action == "switch" => {
            book.switch(name)?;
            format!("Switched to `{name}`")
        }
        _ => {
            return Err(usage(
                "profile new|copy|delete|switch <name> | profile rename <old> <new>",
            ))
        }
    };
    session.persist()?;
    output::success(message);
    Ok(())
}

fn parse_kind(value: &str) -> Result<ItemKind, CliError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "income" | "incomes" => Ok(ItemKind::Income),
        "expense" | "expenses" => Ok(ItemKind::Expense),
        other => Err(CliError::Input(format!(
            "`{other}` is not a kind; use income or expense"
        ))),
    }
}

fn find_item(items: &[RecurringItem], kind: ItemKind, name: &str) -> Result<Uuid, CliError> {
    items
        .iter()
        .find(|item| item.name.eq_ignore_ascii_case(name.trim()))
        .map(|item| item.id)
        .ok_or_else(|| CliError::Input(format!("no {kind} named `{name}`")))
}

/// A single field change requested by `edit`, validated before the profile is touched.
#[derive(Debug, Clone, PartialEq)]
enum FieldChange {
    Name(String),
    Amount(f64),
    Frequency(Frequency),
    NextDate(NaiveDate),
    Essential(bool),
}

impl FieldChange {
    fn apply(self, item: &mut RecurringItem) {
        match self {
            FieldChange::Name(name) => item.name = name,
            FieldChange::Amount(amount) => item.amount = amount,
            FieldChange::Frequency(frequency) => item.frequency = frequency,
            FieldChange::NextDate(date) => item.next_date = date,
            FieldChange::Essential(essential) => item.essential = essential,
        }
    }
}

fn parse_field_change(
    field: &str,
    value: &str,
    today: NaiveDate,
) -> Result<FieldChange, CliError> {
    match field.trim().to_ascii_lowercase().as_str() {
        "name" => {
            let name = value.trim();
            if name.is_empty() {
                return Err(CliError::Input("names cannot be empty".into()));
            }
            Ok(FieldChange::Name(name.to_string()))
        }
        "amount" => {
            let amount = parse_number(value)?;
            if amount < 0.0 {
                return Err(CliError::Input("amounts cannot be negative".into()));
            }
            Ok(FieldChange::Amount(amount))
        }
        "frequency" => Ok(FieldChange::Frequency(parse_frequency(value))),
        "date" | "next-date" => Ok(FieldChange::NextDate(parse_cli_date(value, today)?)),
        "essential" => Ok(FieldChange::Essential(parse_essential(value))),
        other => Err(CliError::Input(format!(
            "`{other}` is not an editable field; use name, amount, frequency, date or essential"
        ))),
    }
}

fn parse_essential(value: &str) -> bool {
    value.eq_ignore_ascii_case("essential") || parse_boolean(value)
}

/// Dates typed on the command line must parse; unlike imports they never default to today.
fn parse_cli_date(value: &str, today: NaiveDate) -> Result<NaiveDate, CliError> {
    try_parse_date(value, today)
        .ok_or_else(|| CliError::Input(format!("`{value}` is not a valid date")))
}

/// Strict amount parsing for typed arguments; accepts `$` and thousands separators.
fn parse_number(value: &str) -> Result<f64, CliError> {
    let cleaned: String = value
        .chars()
        .filter(|ch| *ch != ',' && *ch != '$' && !ch.is_whitespace())
        .collect();
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
        .ok_or_else(|| CliError::Input(format!("`{value}` is not a valid amount")))
}

fn usage(text: &str) -> CliError {
    CliError::Usage(format!("usage: cashflow_core_cli {text}"))
}
