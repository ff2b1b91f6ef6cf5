//! `.env` file handling.
//!
//! Lines are kept verbatim so comments, blank lines and unrelated keys
//! survive an update. Only `KEY=VALUE` lines are interpreted.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// An editable `.env` file
#[derive(Debug, Clone, Default)]
pub struct EnvFile {
    path: PathBuf,
    lines: Vec<String>,
}

impl EnvFile {
    /// Read `path`; a missing file reads as empty
    pub fn read(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        let lines = match fs::read_to_string(&path) {
            Ok(text) => text.lines().map(String::from).collect(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e),
        };
        Ok(Self { path, lines })
    }

    /// All keys and values; later duplicates win
    pub fn vars(&self) -> BTreeMap<String, String> {
        self.lines
            .iter()
            .filter_map(|line| parse_line(line))
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    /// Replace every assignment of `key`, or append one if none exists
    pub fn set(&mut self, key: &str, value: &str) {
        let mut found = false;
        for line in self.lines.iter_mut() {
            if parse_line(line).map(|(k, _)| k == key).unwrap_or(false) {
                *line = format!("{}={}", key, value);
                found = true;
            }
        }
        if !found {
            self.lines.push(format!("{}={}", key, value));
        }
    }

    /// Write the file back, newline-terminated
    pub fn write(&self) -> io::Result<()> {
        let mut text = self.lines.join("\n");
        text.push('\n');
        fs::write(&self.path, text)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn parse_line(line: &str) -> Option<(&str, String)> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }
    let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);
    let (key, value) = trimmed.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key, unquote(value.trim()).to_string()))
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}
