mod common;

use cashflow_core::domain::{Frequency, ItemKind};
use cashflow_core::errors::CashflowError;
use cashflow_core::import::{import_csv, ImportMode};
use cashflow_core::profile::Profile;
use common::date;

const BANK_EXPORT: &str = "\
Expense Name,Amount ($),Next Date,Freq,Necessary
Rent,\"1,200.00\",2025-07-01,Monthly,yes
Groceries,$85.40,Jun 20,weekly,true

Streaming,12.99,6/28,monthly,no
";

#[test]
fn bank_style_export_is_detected_and_normalized() {
    let today = date(2025, 6, 15);
    let import = import_csv(BANK_EXPORT, today).unwrap();

    let columns = import.columns;
    assert_eq!(columns.name, Some(0));
    assert_eq!(columns.amount, Some(1));
    assert_eq!(columns.date, Some(2));
    assert_eq!(columns.frequency, Some(3));
    assert_eq!(columns.essential, Some(4));
    assert_eq!(columns.kind, None);

    let preview = import.preview();
    assert_eq!(preview.total, 3);
    assert!(preview.needs_kind_decision);

    let rows = &import.rows;
    assert_eq!(rows[0].item.amount, 1200.0);
    assert_eq!(rows[1].item.frequency, Frequency::Weekly);
    assert_eq!(rows[1].item.next_date, date(2025, 6, 20));
    assert_eq!(rows[2].item.next_date, date(2025, 6, 28));
    assert!(rows[0].item.essential);
    assert!(!rows[2].item.essential);
}

#[test]
fn resolved_import_replaces_profile_items() {
    let today = date(2025, 6, 15);
    let mut import = import_csv(BANK_EXPORT, today).unwrap();
    import.resolve_kind(ItemKind::Expense);

    let mut profile = Profile::new(today);
    profile.apply_import(import.into_items(), ImportMode::Replace);
    assert_eq!(profile.expenses.len(), 3);
    assert!(profile.incomes.is_empty());

    let summary = profile.monthly_summary();
    let expected = 1200.0 + 85.40 * 4.33 + 12.99;
    assert!((summary.total_expenses - expected).abs() < 1e-6);
    assert!((summary.essential_total - (1200.0 + 85.40 * 4.33)).abs() < 1e-6);
}

#[test]
fn revenue_rows_count_as_income() {
    let csv = "category,item,value\nRevenue - consulting,Client A,2000\nOffice,Desk rent,300\n";
    let items = import_csv(csv, date(2025, 6, 15)).unwrap().into_items();
    assert_eq!(items.incomes.len(), 1);
    assert_eq!(items.incomes[0].name, "Client A");
    assert_eq!(items.expenses.len(), 1);
}

#[test]
fn unknown_headers_fall_back_to_defaults() {
    let today = date(2025, 6, 15);
    let import = import_csv("foo,bar\n1,2\n", today).unwrap();
    let item = &import.rows[0].item;
    assert_eq!(item.name, "");
    assert_eq!(item.amount, 0.0);
    assert_eq!(item.frequency, Frequency::Monthly);
    assert_eq!(item.next_date, today);
    assert!(item.essential);
}

#[test]
fn header_only_file_is_rejected() {
    let err = import_csv("name,amount,date", date(2025, 6, 15)).unwrap_err();
    assert!(matches!(err, CashflowError::InvalidImport(_)));
}
