use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::Local;
use tracing::{debug, info};

use crate::{errors::Result, profile::ProfileBook};

const TMP_SUFFIX: &str = "tmp";

/// Writes the profile book to disk atomically by staging to a temporary file.
pub fn save_book_to_file(book: &ProfileBook, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(book)?;
    write_atomic(path, &json)?;
    info!(path = %path.display(), profiles = book.len(), "saved profiles");
    Ok(())
}

/// Loads the profile book, starting a fresh one when the file does not exist yet.
pub fn load_book_from_file(path: &Path) -> Result<ProfileBook> {
    if !path.exists() {
        debug!(path = %path.display(), "no profiles file, starting fresh");
        return Ok(ProfileBook::default());
    }
    let data = fs::read_to_string(path)?;
    let mut book: ProfileBook = serde_json::from_str(&data)?;
    book.normalize(Local::now().date_naive());
    debug!(path = %path.display(), profiles = book.len(), "loaded profiles");
    Ok(book)
}

/// Stages `contents` next to `path` and renames it into place.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let tmp = tmp_path(path);
    fs::write(&tmp, contents)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    name.push(".");
    name.push(TMP_SUFFIX);
    path.with_file_name(name)
}
