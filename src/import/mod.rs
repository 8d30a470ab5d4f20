//! Import and export of recurring items from external files.

pub mod csv;
pub mod fields;
pub mod json;

use crate::domain::RecurringItem;

pub use csv::{find_column_index, import_csv, parse_line, ColumnMap, CsvImport, ImportPreview};
pub use fields::{parse_amount, parse_boolean, parse_date, parse_frequency, try_parse_date};
pub use json::{import_profile_json, ImportedProfile, ProfileExport, RawItem};

/// Items ready to be merged into a profile.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportedItems {
    pub incomes: Vec<RecurringItem>,
    pub expenses: Vec<RecurringItem>,
}

impl ImportedItems {
    pub fn len(&self) -> usize {
        self.incomes.len() + self.expenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// How imported items combine with a profile's existing lists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImportMode {
    /// Discard the existing lists.
    #[default]
    Replace,
    Append,
}
