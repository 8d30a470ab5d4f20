//! JSON interchange for whole profiles.
//!
//! Exports are written from the typed model. Imports accept the same shape but
//! tolerate loosely typed values (numbers stored as text, missing fields) and
//! run every field through the parsers in [`super::fields`].

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use super::fields::{parse_amount, parse_boolean, parse_date, parse_frequency};
use crate::domain::RecurringItem;
use crate::errors::Result;
use crate::profile::{Profile, MAX_SAVINGS_PERCENT};

/// Untyped item record as found in foreign or hand-edited files.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawItem {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub name: Value,
    #[serde(default)]
    pub amount: Value,
    #[serde(default)]
    pub frequency: Value,
    #[serde(default)]
    pub next_date: Value,
    #[serde(default)]
    pub is_essential: Value,
}

impl RawItem {
    pub fn normalize(&self, today: NaiveDate) -> RecurringItem {
        let mut item = RecurringItem::new(
            value_text(&self.name).unwrap_or_default(),
            value_amount(&self.amount),
            value_text(&self.frequency)
                .map(|text| parse_frequency(&text))
                .unwrap_or_default(),
            value_text(&self.next_date)
                .map(|text| parse_date(&text, today))
                .unwrap_or(today),
        )
        .with_essential(value_bool(&self.is_essential));
        if let Some(id) = self.id.as_str().and_then(|raw| Uuid::parse_str(raw).ok()) {
            item.id = id;
        }
        item
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProfile {
    #[serde(default)]
    profile_name: Value,
    #[serde(default)]
    incomes: Value,
    #[serde(default)]
    expenses: Value,
    #[serde(default)]
    current_balance: Value,
    #[serde(default)]
    savings_percent: Value,
    #[serde(default)]
    forecast_start_date: Value,
}

/// A profile read from JSON along with the name it was exported under, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedProfile {
    pub name: Option<String>,
    pub profile: Profile,
}

/// Parses an exported profile, normalizing every loosely typed field.
pub fn import_profile_json(content: &str, today: NaiveDate) -> Result<ImportedProfile> {
    let raw: RawProfile = serde_json::from_str(content)?;
    let incomes = normalize_items(&raw.incomes, today);
    let expenses = normalize_items(&raw.expenses, today);
    debug!(
        incomes = incomes.len(),
        expenses = expenses.len(),
        "imported profile json"
    );

    let savings = value_amount(&raw.savings_percent).trunc();
    let profile = Profile {
        incomes,
        expenses,
        current_balance: value_number(&raw.current_balance),
        savings_percent: savings.clamp(0.0, f64::from(MAX_SAVINGS_PERCENT)) as u8,
        forecast_start_date: value_text(&raw.forecast_start_date)
            .map(|text| parse_date(&text, today))
            .unwrap_or(today),
    };

    Ok(ImportedProfile {
        name: value_text(&raw.profile_name),
        profile,
    })
}

/// Serialized form of a profile export.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProfileExport {
    pub profile_name: String,
    pub incomes: Vec<RecurringItem>,
    pub expenses: Vec<RecurringItem>,
    pub current_balance: f64,
    pub savings_percent: u8,
    pub forecast_start_date: NaiveDate,
    pub export_date: DateTime<Utc>,
}

impl ProfileExport {
    pub fn new(name: impl Into<String>, profile: &Profile, exported_at: DateTime<Utc>) -> Self {
        Self {
            profile_name: name.into(),
            incomes: profile.incomes.clone(),
            expenses: profile.expenses.clone(),
            current_balance: profile.current_balance,
            savings_percent: profile.savings_percent,
            forecast_start_date: profile.forecast_start_date,
            export_date: exported_at,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Suggested file name, e.g. `coinforecast-side-hustle-2025-06-15.json`.
    pub fn file_name(&self) -> String {
        let slug = self
            .profile_name
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("-");
        format!(
            "coinforecast-{}-{}.json",
            slug,
            self.export_date.date_naive().format("%Y-%m-%d")
        )
    }
}

/// Normalizes an item list; a section that is not an array imports as empty and
/// entries that are not objects are skipped.
fn normalize_items(section: &Value, today: NaiveDate) -> Vec<RecurringItem> {
    let Some(entries) = section.as_array() else {
        return Vec::new();
    };
    entries
        .iter()
        .filter(|entry| entry.is_object())
        .filter_map(|entry| RawItem::deserialize(entry).ok())
        .map(|raw| raw.normalize(today))
        .collect()
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn value_number(value: &Value) -> f64 {
    match value {
        Value::Number(number) => number.as_f64().filter(|n| n.is_finite()).unwrap_or(0.0),
        Value::String(text) => parse_amount(text),
        _ => 0.0,
    }
}

fn value_amount(value: &Value) -> f64 {
    value_number(value).max(0.0)
}

fn value_bool(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().map(|n| n != 0.0).unwrap_or(false),
        Value::String(text) => parse_boolean(text),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Frequency;
    use chrono::TimeZone;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    #[test]
    fn tolerates_loosely_typed_records() {
        let json = r#"{
            "profileName": "Side Hustle",
            "incomes": [{
                "id": 1718000000000, "name": "Gig", "amount": "$1,050",
                "frequency": "weekly", "nextDate": "2025-06-13"
            }],
            "expenses": [{
                "name": null, "amount": 40, "frequency": "sometimes", "isEssential": "yes"
            }],
            "currentBalance": "2,000.50",
            "savingsPercent": 250
        }"#;
        let imported = import_profile_json(json, today()).unwrap();
        assert_eq!(imported.name.as_deref(), Some("Side Hustle"));

        let profile = imported.profile;
        assert_eq!(profile.current_balance, 2000.5);
        assert_eq!(profile.savings_percent, 100);
        assert_eq!(profile.forecast_start_date, today());

        let gig = &profile.incomes[0];
        assert_eq!(gig.amount, 1050.0);
        assert_eq!(gig.frequency, Frequency::Weekly);
        assert_eq!(gig.next_date, NaiveDate::from_ymd_opt(2025, 6, 13).unwrap());

        let expense = &profile.expenses[0];
        assert_eq!(expense.name, "");
        assert_eq!(expense.frequency, Frequency::Monthly);
        assert_eq!(expense.next_date, today());
        assert!(expense.essential);
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let imported = import_profile_json("{}", today()).unwrap();
        assert!(imported.profile.incomes.is_empty());
        assert_eq!(imported.profile.current_balance, 0.0);
        assert!(imported.name.is_none());
    }

    #[test]
    fn null_sections_and_entries_are_skipped() {
        let json = r#"{
            "profileName": null,
            "incomes": null,
            "expenses": [null, 7, "rent", {"name": "Rent", "amount": 900}],
            "currentBalance": null
        }"#;
        let imported = import_profile_json(json, today()).unwrap();
        assert!(imported.name.is_none());
        assert!(imported.profile.incomes.is_empty());
        assert_eq!(imported.profile.expenses.len(), 1);
        assert_eq!(imported.profile.expenses[0].name, "Rent");
        assert_eq!(imported.profile.expenses[0].amount, 900.0);
        assert_eq!(imported.profile.current_balance, 0.0);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(import_profile_json("{not json", today()).is_err());
    }

    #[test]
    fn export_round_trips_through_import() {
        let mut profile = Profile::new(today());
        profile.current_balance = 125.5;
        profile.savings_percent = 15;
        let item = RecurringItem::new("Pay", 900.0, Frequency::Biweekly, today());
        let id = item.id;
        profile.incomes.push(item);

        let exported_at = Utc.with_ymd_and_hms(2025, 6, 15, 9, 30, 0).unwrap();
        let export = ProfileExport::new("Side Hustle", &profile, exported_at);
        assert_eq!(export.file_name(), "coinforecast-side-hustle-2025-06-15.json");

        let imported = import_profile_json(&export.to_json().unwrap(), today()).unwrap();
        assert_eq!(imported.profile, profile);
        assert_eq!(imported.profile.incomes[0].id, id);
    }
}
