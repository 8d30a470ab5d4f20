//! Comma-separated import of recurring items.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

use super::fields::{parse_amount, parse_boolean, parse_date, parse_frequency};
use super::ImportedItems;
use crate::domain::{Frequency, ItemKind, RecurringItem};
use crate::errors::{CashflowError, Result};

const NAME_HEADERS: &[&str] = &["name", "expense", "description", "item"];
const AMOUNT_HEADERS: &[&str] = &["amount", "cost", "price", "value"];
const DATE_HEADERS: &[&str] = &["date", "due date", "due", "next date", "duedate"];
const FREQUENCY_HEADERS: &[&str] = &["frequency", "freq", "recurring", "period"];
const ESSENTIAL_HEADERS: &[&str] = &["essential", "necessary", "required", "priority"];
const TYPE_HEADERS: &[&str] = &["type", "category"];
const INCOME_MARKERS: &[&str] = &["income", "revenue"];

/// Splits one line on commas that sit outside double-quoted spans.
///
/// Quote characters only toggle quoting and are dropped from the output; every
/// field is trimmed. Trailing empty fields are preserved.
pub fn parse_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    fields.push(current);

    fields.iter().map(|field| clean_field(field)).collect()
}

fn clean_field(field: &str) -> String {
    let field = field.strip_prefix('"').unwrap_or(field);
    let field = field.strip_suffix('"').unwrap_or(field);
    field.trim().to_string()
}

/// Returns the first header equal to or containing a candidate, trying
/// candidates in priority order.
pub fn find_column_index<S: AsRef<str>>(headers: &[S], candidates: &[&str]) -> Option<usize> {
    candidates.iter().find_map(|candidate| {
        headers.iter().position(|header| {
            let header = header.as_ref();
            header == *candidate || header.contains(candidate)
        })
    })
}

/// Column positions detected from a header row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ColumnMap {
    pub name: Option<usize>,
    pub amount: Option<usize>,
    pub date: Option<usize>,
    pub frequency: Option<usize>,
    pub essential: Option<usize>,
    pub kind: Option<usize>,
}

impl ColumnMap {
    /// Detects columns from raw headers (case and surrounding whitespace ignored).
    pub fn detect<S: AsRef<str>>(headers: &[S]) -> Self {
        let normalized: Vec<String> = headers
            .iter()
            .map(|header| header.as_ref().trim().to_lowercase())
            .collect();
        Self {
            name: find_column_index(&normalized, NAME_HEADERS),
            amount: find_column_index(&normalized, AMOUNT_HEADERS),
            date: find_column_index(&normalized, DATE_HEADERS),
            frequency: find_column_index(&normalized, FREQUENCY_HEADERS),
            essential: find_column_index(&normalized, ESSENTIAL_HEADERS),
            kind: find_column_index(&normalized, TYPE_HEADERS),
        }
    }
}

/// A parsed data row and the side of the ledger it was assigned to.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedRow {
    pub kind: ItemKind,
    pub item: RecurringItem,
}

/// Counts shown to the user before an import is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImportPreview {
    pub total: usize,
    pub incomes: usize,
    pub expenses: usize,
    pub columns: ColumnMap,
    pub needs_kind_decision: bool,
}

/// Result of parsing a CSV document, pending the caller's confirmation.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvImport {
    pub columns: ColumnMap,
    pub rows: Vec<ImportedRow>,
    resolved_kind: Option<ItemKind>,
}

impl CsvImport {
    /// Without a type column the income/expense split must be chosen by a person.
    pub fn needs_kind_decision(&self) -> bool {
        self.columns.kind.is_none() && self.resolved_kind.is_none()
    }

    /// Assigns every row to `kind`, overriding any detected classification.
    pub fn resolve_kind(&mut self, kind: ItemKind) {
        for row in &mut self.rows {
            row.kind = kind;
        }
        self.resolved_kind = Some(kind);
    }

    pub fn resolved_kind(&self) -> Option<ItemKind> {
        self.resolved_kind
    }

    pub fn preview(&self) -> ImportPreview {
        let incomes = self
            .rows
            .iter()
            .filter(|row| row.kind == ItemKind::Income)
            .count();
        ImportPreview {
            total: self.rows.len(),
            incomes,
            expenses: self.rows.len() - incomes,
            columns: self.columns,
            needs_kind_decision: self.needs_kind_decision(),
        }
    }

    pub fn into_items(self) -> ImportedItems {
        let mut items = ImportedItems::default();
        for row in self.rows {
            match row.kind {
                ItemKind::Income => items.incomes.push(row.item),
                ItemKind::Expense => items.expenses.push(row.item),
            }
        }
        items
    }
}

/// Parses CSV text into recurring items.
///
/// Fails only when the document lacks a header plus at least one data row;
/// individual cells fall back to defaults instead of rejecting the row.
pub fn import_csv(content: &str, today: NaiveDate) -> Result<CsvImport> {
    let lines: Vec<&str> = content
        .trim()
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();
    if lines.len() < 2 {
        return Err(CashflowError::InvalidImport(
            "CSV file appears to be empty or invalid".into(),
        ));
    }

    let headers = parse_line(lines[0]);
    let columns = ColumnMap::detect(&headers);
    debug!(?columns, "detected csv columns");

    let mut rows = Vec::new();
    for (line_no, line) in lines.iter().enumerate().skip(1) {
        let values = parse_line(line);
        if values.iter().all(|value| value.trim().is_empty()) {
            debug!(line = line_no + 1, "skipping blank csv row");
            continue;
        }
        rows.push(parse_row(&values, &columns, today));
    }

    info!(rows = rows.len(), "parsed csv import");
    Ok(CsvImport {
        columns,
        rows,
        resolved_kind: None,
    })
}

fn parse_row(values: &[String], columns: &ColumnMap, today: NaiveDate) -> ImportedRow {
    let cell = |index: Option<usize>| {
        index.map(|idx| values.get(idx).map(String::as_str).unwrap_or(""))
    };

    let name = cell(columns.name).unwrap_or("").trim().to_string();
    let amount = cell(columns.amount).map(parse_amount).unwrap_or(0.0);
    let frequency = cell(columns.frequency)
        .map(parse_frequency)
        .unwrap_or(Frequency::Monthly);
    let next_date = cell(columns.date)
        .map(|value| parse_date(value, today))
        .unwrap_or(today);
    // An absent essential column marks every row essential.
    let essential = cell(columns.essential).map(parse_boolean).unwrap_or(true);

    let type_value = cell(columns.kind).unwrap_or("").to_lowercase();
    let kind = if INCOME_MARKERS
        .iter()
        .any(|marker| type_value.contains(marker))
    {
        ItemKind::Income
    } else {
        ItemKind::Expense
    };

    ImportedRow {
        kind,
        item: RecurringItem::new(name, amount, frequency, next_date).with_essential(essential),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    #[test]
    fn quoted_commas_stay_inside_field() {
        assert_eq!(
            parse_line(r#"Rent,"1,200.00",2024-01-01"#),
            vec!["Rent", "1,200.00", "2024-01-01"]
        );
    }

    #[test]
    fn trailing_and_inner_empty_fields_survive() {
        assert_eq!(parse_line("a, ,b,"), vec!["a", "", "b", ""]);
        assert_eq!(parse_line(""), vec![""]);
        assert_eq!(parse_line(r#"  "padded"  "#), vec!["padded"]);
    }

    #[test]
    fn column_lookup_respects_candidate_priority() {
        let headers = ["due", "description", "name"];
        assert_eq!(find_column_index(&headers, &["name", "description"]), Some(2));
        assert_eq!(find_column_index(&headers, &["date", "due"]), Some(0));
        assert_eq!(find_column_index(&headers, &["amount"]), None);
    }

    #[test]
    fn substring_headers_match() {
        let headers = ["expense name", "amount ($)"];
        assert_eq!(find_column_index(&headers, &["name"]), Some(0));
        assert_eq!(find_column_index(&headers, &["amount"]), Some(1));
    }

    #[test]
    fn too_short_document_is_rejected() {
        let err = import_csv("name,amount\n", today()).unwrap_err();
        assert!(matches!(err, CashflowError::InvalidImport(_)));
        assert!(import_csv("   ", today()).is_err());
    }

    #[test]
    fn rows_default_missing_columns() {
        let import = import_csv("Name,Amount\nGym,$30\n,\n", today()).unwrap();
        assert_eq!(import.rows.len(), 1);
        let row = &import.rows[0];
        assert_eq!(row.item.name, "Gym");
        assert_eq!(row.item.amount, 30.0);
        assert_eq!(row.item.frequency, Frequency::Monthly);
        assert_eq!(row.item.next_date, today());
        assert!(row.item.essential);
        assert!(import.needs_kind_decision());
    }

    #[test]
    fn type_column_classifies_rows() {
        let csv = "Type,Description,Cost,Frequency,Due Date,Essential\r\n\
                   Income,Salary,\"2,500\",biweekly,2025-06-06,no\r\n\
                   Expense,Rent,1200,monthly,Jul 1,yes\r\n";
        let import = import_csv(csv, today()).unwrap();
        assert!(!import.needs_kind_decision());
        let preview = import.preview();
        assert_eq!(preview.total, 2);
        assert_eq!(preview.incomes, 1);
        assert_eq!(preview.expenses, 1);

        let items = import.into_items();
        assert_eq!(items.incomes[0].name, "Salary");
        assert_eq!(items.incomes[0].amount, 2500.0);
        assert_eq!(items.incomes[0].frequency, Frequency::Biweekly);
        assert_eq!(items.expenses[0].next_date, NaiveDate::from_ymd_opt(2025, 7, 1).unwrap());
        assert!(items.expenses[0].essential);
    }

    #[test]
    fn resolving_kind_overrides_every_row() {
        let mut import = import_csv("name,amount\nA,1\nB,2\n", today()).unwrap();
        import.resolve_kind(ItemKind::Income);
        assert!(!import.needs_kind_decision());
        assert_eq!(import.preview().incomes, 2);
        assert_eq!(import.into_items().incomes.len(), 2);
    }

    #[test]
    fn present_column_with_missing_cell_is_not_essential() {
        let import = import_csv("name,amount,essential\nA,1\n", today()).unwrap();
        assert!(!import.rows[0].item.essential);
    }
}
