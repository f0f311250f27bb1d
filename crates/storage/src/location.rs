use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::StoreError;

const DEFAULT_DATABASE_URL: &str = "sqlite://./data/dashboard.db";

/// Where the dashboard keeps its rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    /// Local SQLite database, as a normalized sqlx URL.
    Sqlite(String),
    /// Hosted PostgREST-style service, as its base URL.
    Rest(String),
}

/// Classifies a raw store URL. `http(s)://` selects the hosted store; anything
/// else is treated as a SQLite URL or plain file path.
pub fn parse_store_location(raw: &str) -> StoreLocation {
    let raw = raw.trim();

    if raw.starts_with("http://") || raw.starts_with("https://") {
        return StoreLocation::Rest(raw.trim_end_matches('/').to_string());
    }

    StoreLocation::Sqlite(normalize_database_url(raw))
}

fn normalize_database_url(raw: &str) -> String {
    if raw.is_empty() {
        return DEFAULT_DATABASE_URL.to_string();
    }

    if raw.starts_with("sqlite::memory:") {
        return raw.to_string();
    }

    let path = raw
        .strip_prefix("sqlite://")
        .or_else(|| raw.strip_prefix("sqlite:"))
        .unwrap_or(raw)
        .replace('\\', "/");

    if has_windows_drive(&path) {
        format!("sqlite:{path}")
    } else {
        format!("sqlite://{path}")
    }
}

fn has_windows_drive(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

pub(crate) fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<(), StoreError> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };

    fs::create_dir_all(parent).map_err(|error| {
        StoreError::Config(format!(
            "failed to create parent directory '{}' for database url '{database_url}': {error}",
            parent.display()
        ))
    })
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url.starts_with("sqlite::memory:") || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/location_tests.rs"]
mod tests;
