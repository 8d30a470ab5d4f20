//! Command-line front end for the forecast engine.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use thiserror::Error;
use tracing::debug;

use crate::config::{Config, ConfigManager};
use crate::errors::CashflowError;
use crate::profile::ProfileBook;
use crate::utils::persistence::{load_book_from_file, save_book_to_file};

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] CashflowError),
    #[error("{0}")]
    Usage(String),
    #[error("{0}")]
    Input(String),
    #[error(transparent)]
    Prompt(#[from] dialoguer::Error),
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Core(CashflowError::Io(err))
    }
}

pub type CommandResult = Result<(), CliError>;

/// Loaded state shared by every command in a single invocation.
pub struct Session {
    config_manager: ConfigManager,
    config: Config,
    profiles_path: PathBuf,
    pub book: ProfileBook,
    pub today: NaiveDate,
}

impl Session {
    pub fn open() -> Result<Self, CliError> {
        let config_manager = ConfigManager::new()?;
        let config = config_manager.load()?;
        let profiles_path = config_manager.profiles_path(&config);
        let mut book = load_book_from_file(&profiles_path)?;
        if let Some(last) = config.last_profile.as_deref() {
            if book.switch(last).is_err() {
                debug!(profile = %last, "last profile no longer exists");
            }
        }
        Ok(Self {
            config_manager,
            config,
            profiles_path,
            book,
            today: Local::now().date_naive(),
        })
    }

    /// Writes the profile book and remembers the current profile.
    pub fn persist(&mut self) -> CommandResult {
        save_book_to_file(&self.book, &self.profiles_path)?;
        let current = self.book.current_name().to_string();
        if self.config.last_profile.as_deref() != Some(current.as_str()) {
            self.config.last_profile = Some(current);
            self.config_manager.save(&self.config)?;
        }
        Ok(())
    }
}

/// Runs one command from the given arguments (program name excluded).
pub fn run_cli<I>(args: I) -> CommandResult
where
    I: IntoIterator<Item = String>,
{
    let args: Vec<String> = args.into_iter().collect();
    let Some((command, rest)) = args.split_first() else {
        print_usage();
        return Err(CliError::Usage("no command given".into()));
    };

    match command.as_str() {
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        "version" | "--version" => {
            commands::version();
            Ok(())
        }
        _ => {
            let mut session = Session::open()?;
            commands::dispatch(&mut session, command, rest)
        }
    }
}

pub fn print_usage() {
    println!(
        "Usage: cashflow_core_cli <command>\n\
         Commands:\n  \
         forecast [--from DATE]\n  \
         summary\n  \
         plan\n  \
         balance <amount>\n  \
         savings <percent>\n  \
         add <income|expense> <name> <amount> <weekly|biweekly|monthly> <date> [essential]\n  \
         remove <income|expense> <name>\n  \
         edit <income|expense> <name> <name|amount|frequency|date|essential> <value>\n  \
         clear [--yes]\n  \
         list\n  \
         import <file.csv> [--as income|expense] [--append]\n  \
         import-json <file.json>\n  \
         export [file.json|directory]\n  \
         advance\n  \
         reset\n  \
         profiles\n  \
         profile new|copy <name>\n  \
         profile rename <old> <new>\n  \
         profile delete|switch <name>\n  \
         version"
    );
}
