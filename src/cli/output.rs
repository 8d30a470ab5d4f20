use colored::Colorize;
use std::fmt;

use crate::domain::WeekSummary;
use crate::forecast::{ActionPlan, BreakdownLine, Forecast, HealthStatus, MonthlySummary};

/// Message categories used by the CLI output helpers.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Warning,
    Error,
    Section,
}

fn apply_style(kind: MessageKind, message: impl fmt::Display) -> String {
    let text = message.to_string();
    match kind {
        MessageKind::Section => format!("=== {} ===", text.trim()).bold().to_string(),
        MessageKind::Info => text,
        MessageKind::Success => format!("[ok] {text}").bright_green().to_string(),
        MessageKind::Warning => format!("[!] {text}").bright_yellow().to_string(),
        MessageKind::Error => format!("[x] {text}").bright_red().to_string(),
    }
}

pub fn print(kind: MessageKind, message: impl fmt::Display) {
    let formatted = apply_style(kind, message);
    match kind {
        MessageKind::Section => println!("\n{}", formatted),
        MessageKind::Error => eprintln!("{}", formatted),
        _ => println!("{}", formatted),
    }
}

pub fn info(message: impl fmt::Display) {
    print(MessageKind::Info, message);
}

pub fn success(message: impl fmt::Display) {
    print(MessageKind::Success, message);
}

pub fn warning(message: impl fmt::Display) {
    print(MessageKind::Warning, message);
}

pub fn error(message: impl fmt::Display) {
    print(MessageKind::Error, message);
}

pub fn section(title: impl fmt::Display) {
    print(MessageKind::Section, title);
}

/// Formats an amount as dollars with thousands separators, e.g. `-$1,250.50`.
pub fn format_money(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (idx, ch) in whole.chars().enumerate() {
        if idx > 0 && (whole.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}${grouped}.{:02}", cents % 100)
}

fn balance_text(amount: f64) -> String {
    let text = format_money(amount);
    if amount < 0.0 {
        text.red().bold().to_string()
    } else {
        text
    }
}

pub fn render_forecast(profile_name: &str, forecast: &Forecast, current_week: Option<u32>) {
    section(format!("6-Week Forecast: {profile_name}"));
    info(format!(
        "Starting {} with balance {}",
        forecast.reference_date,
        format_money(forecast.starting_balance)
    ));
    for week in &forecast.weeks {
        render_week(week, current_week == Some(week.week_number));
    }
    info(format!("Final balance: {}", balance_text(forecast.final_balance())));
    let negative: Vec<String> = forecast
        .negative_balance_weeks()
        .map(|week| week.week_number.to_string())
        .collect();
    if !negative.is_empty() {
        warning(format!(
            "Balance goes negative in week(s): {}",
            negative.join(", ")
        ));
    }
}

fn render_week(week: &WeekSummary, is_current: bool) {
    let marker = if is_current { " (current)" } else { "" };
    let header = format!(
        "Week {} [{} to {}]{}",
        week.week_number, week.start_date, week.end_date, marker
    );
    println!("\n{}", header.bold());
    println!(
        "  start {}  in +{}  out -{}  end {}",
        format_money(week.starting_balance),
        format_money(week.inflow),
        format_money(week.outflow),
        balance_text(week.ending_balance)
    );
    for occurrence in week.items_by_date() {
        let line = format!(
            "    {}  {:<24} {}",
            occurrence.date,
            occurrence.name,
            format_money(occurrence.signed_amount())
        );
        if occurrence.kind.is_income() {
            println!("{}", line.green());
        } else {
            println!("{}", line);
        }
    }
}

pub fn render_summary(profile_name: &str, summary: &MonthlySummary) {
    section(format!("Monthly Summary: {profile_name}"));
    info(format!("Income:        {}", format_money(summary.total_income)));
    info(format!("Expenses:      {}", format_money(summary.total_expenses)));
    info(format!("  essential:   {}", format_money(summary.essential_total)));
    info(format!(
        "  other:       {}",
        format_money(summary.non_essential_total)
    ));
    info(format!("Net:           {}", balance_text(summary.net_monthly)));
    if summary.has_savings_target() {
        info(format!(
            "Savings ({}%): {}",
            summary.savings_percent,
            format_money(summary.savings_amount)
        ));
        info(format!(
            "After savings: {}",
            balance_text(summary.net_after_savings)
        ));
    }
}

pub fn render_plan(profile_name: &str, plan: &ActionPlan) {
    section(format!("Action Plan: {profile_name}"));
    match plan.health {
        HealthStatus::Healthy => success("Cash flow is healthy"),
        HealthStatus::Deficit => warning(format!(
            "Monthly deficit of {}",
            format_money(plan.summary.net_monthly.abs())
        )),
        HealthStatus::Unclassified => warning("Current balance is negative"),
    }

    if plan.negative_weeks.is_empty() {
        info("No negative weeks in the forecast");
    } else {
        for week in &plan.negative_weeks {
            warning(format!(
                "Week {} ends at {}",
                week.week_number,
                format_money(week.ending_balance)
            ));
        }
    }

    render_breakdown("Income", &plan.incomes);
    render_breakdown("Essential expenses", &plan.essential_expenses);
    render_breakdown("Non-essential expenses", &plan.non_essential_expenses);

    section("Recommendations");
    for recommendation in &plan.recommendations {
        info(format!("- {}", recommendation.message()));
    }
}

fn render_breakdown(title: &str, lines: &[BreakdownLine]) {
    if lines.is_empty() {
        return;
    }
    println!("\n{}", title.bold());
    for line in lines {
        if line.shows_monthly_equivalent() {
            info(format!(
                "  {:<24} {} {} (~{}/month)",
                line.name,
                format_money(line.amount),
                line.frequency,
                format_money(line.monthly_equivalent)
            ));
        } else {
            info(format!(
                "  {:<24} {} {}",
                line.name,
                format_money(line.amount),
                line.frequency
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_groups_thousands() {
        assert_eq!(format_money(0.0), "$0.00");
        assert_eq!(format_money(1234.5), "$1,234.50");
        assert_eq!(format_money(-1250000.0), "-$1,250,000.00");
        assert_eq!(format_money(999.999), "$1,000.00");
        assert_eq!(format_money(-0.001), "$0.00");
    }
}
