use std::collections::BTreeMap;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::Profile;
use crate::errors::{CashflowError, Result};

pub const DEFAULT_PROFILE_NAME: &str = "Personal";

/// Every named profile plus the one currently selected.
///
/// The book always holds at least one profile and `current` always names one
/// of them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProfileBook {
    current: String,
    profiles: BTreeMap<String, Profile>,
}

impl Default for ProfileBook {
    fn default() -> Self {
        Self::new(Local::now().date_naive())
    }
}

impl ProfileBook {
    pub fn new(today: NaiveDate) -> Self {
        let mut profiles = BTreeMap::new();
        profiles.insert(DEFAULT_PROFILE_NAME.to_string(), Profile::new(today));
        Self {
            current: DEFAULT_PROFILE_NAME.to_string(),
            profiles,
        }
    }

    pub fn current_name(&self) -> &str {
        &self.current
    }

    pub fn current(&self) -> &Profile {
        // `current` is kept valid by every mutating method.
        &self.profiles[&self.current]
    }

    pub fn current_mut(&mut self) -> &mut Profile {
        self.profiles
            .entry(self.current.clone())
            .or_insert_with(|| Profile::new(Local::now().date_naive()))
    }

    pub fn get(&self, name: &str) -> Option<&Profile> {
        self.profiles.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Adds an empty profile and makes it current.
    pub fn create(&mut self, name: &str, today: NaiveDate) -> Result<()> {
        self.insert(name, Profile::new(today))
    }

    /// Duplicates the current profile under `name` and makes the copy current.
    pub fn copy_current(&mut self, name: &str) -> Result<()> {
        let copy = self.current().clone();
        self.insert(name, copy)
    }

    /// Stores `profile` under `name`, replacing any profile already there.
    pub fn upsert(&mut self, name: &str, profile: Profile) -> Result<()> {
        let name = validate_name(name)?;
        info!(profile = %name, "storing profile");
        self.profiles.insert(name.to_string(), profile);
        self.current = name.to_string();
        Ok(())
    }

    pub fn rename(&mut self, old: &str, new: &str) -> Result<()> {
        let new = validate_name(new)?;
        if !self.profiles.contains_key(old) {
            return Err(CashflowError::ProfileNotFound(old.to_string()));
        }
        if old == new {
            return Ok(());
        }
        if self.profiles.contains_key(new) {
            return Err(CashflowError::ProfileExists(new.to_string()));
        }
        let profile = self
            .profiles
            .remove(old)
            .ok_or_else(|| CashflowError::ProfileNotFound(old.to_string()))?;
        self.profiles.insert(new.to_string(), profile);
        if self.current == old {
            self.current = new.to_string();
        }
        info!(from = %old, to = %new, "renamed profile");
        Ok(())
    }

    pub fn delete(&mut self, name: &str) -> Result<Profile> {
        if !self.profiles.contains_key(name) {
            return Err(CashflowError::ProfileNotFound(name.to_string()));
        }
        if self.profiles.len() == 1 {
            return Err(CashflowError::InvalidInput(
                "cannot delete the last profile".into(),
            ));
        }
        let removed = self
            .profiles
            .remove(name)
            .ok_or_else(|| CashflowError::ProfileNotFound(name.to_string()))?;
        if self.current == name {
            if let Some(first) = self.profiles.keys().next() {
                self.current = first.clone();
            }
        }
        info!(profile = %name, current = %self.current, "deleted profile");
        Ok(removed)
    }

    pub fn switch(&mut self, name: &str) -> Result<()> {
        if !self.profiles.contains_key(name) {
            return Err(CashflowError::ProfileNotFound(name.to_string()));
        }
        self.current = name.to_string();
        info!(profile = %name, "switched profile");
        Ok(())
    }

    /// Repairs a book loaded from disk so that `current` names a stored profile.
    pub(crate) fn normalize(&mut self, today: NaiveDate) {
        if self.profiles.is_empty() {
            self.profiles
                .insert(DEFAULT_PROFILE_NAME.to_string(), Profile::new(today));
        }
        if !self.profiles.contains_key(&self.current) {
            if let Some(first) = self.profiles.keys().next() {
                self.current = first.clone();
            }
        }
    }

    fn insert(&mut self, name: &str, profile: Profile) -> Result<()> {
        let name = validate_name(name)?;
        if self.profiles.contains_key(name) {
            return Err(CashflowError::ProfileExists(name.to_string()));
        }
        info!(profile = %name, "created profile");
        self.profiles.insert(name.to_string(), profile);
        self.current = name.to_string();
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<&str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CashflowError::InvalidInput(
            "profile name cannot be empty".into(),
        ));
    }
    Ok(trimmed)
}
