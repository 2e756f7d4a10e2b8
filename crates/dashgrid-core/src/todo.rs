//! Todo flat file format.
//!
//! One item per line: `<marker> <title>`. A `+` marker means done, any other
//! leading character (canonically `-`) means not done. Lines shorter than
//! two characters are skipped. Writes always rewrite the whole file.
//!
//! Reads accept any bytes: invalid UTF-8 is replaced rather than rejected.
//! A file that does not exist yet reads as an empty list.

use std::fs;
use std::io;
use std::path::Path;

use anyhow::{Context, Result};

const DONE_MARKER: char = '+';
const OPEN_MARKER: char = '-';

/// A single todo entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoItem {
    pub title: String,
    pub done: bool,
}

impl TodoItem {
    pub fn new(title: impl Into<String>, done: bool) -> Self {
        Self {
            title: title.into(),
            done,
        }
    }
}

/// Parses todo file contents.
pub fn parse_todos(contents: &str) -> Vec<TodoItem> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| line.chars().count() >= 2)
        .filter_map(|line| {
            let mut chars = line.chars();
            let marker = chars.next()?;
            Some(TodoItem {
                title: chars.as_str().trim().to_string(),
                done: marker == DONE_MARKER,
            })
        })
        .collect()
}

/// Serializes items to the file format (no trailing newline).
pub fn format_todos(items: &[TodoItem]) -> String {
    items
        .iter()
        .map(|item| {
            let marker = if item.done { DONE_MARKER } else { OPEN_MARKER };
            format!("{marker} {}", item.title)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Reads and parses a todo file.
///
/// # Errors
/// Returns an error if the file exists but cannot be read.
pub fn read_todo_file(path: &Path) -> Result<Vec<TodoItem>> {
    decode(fs::read(path), path)
}

/// Async variant of [`read_todo_file`] used by fetch tasks.
///
/// # Errors
/// Returns an error if the file exists but cannot be read.
pub async fn read_todo_file_async(path: &Path) -> Result<Vec<TodoItem>> {
    decode(tokio::fs::read(path).await, path)
}

fn decode(read: io::Result<Vec<u8>>, path: &Path) -> Result<Vec<TodoItem>> {
    match read {
        Ok(bytes) => Ok(parse_todos(&String::from_utf8_lossy(&bytes))),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => {
            Err(e).with_context(|| format!("Failed to read todo file: {}", path.display()))
        }
    }
}

/// Rewrites the whole todo file with `items`.
///
/// # Errors
/// Returns an error if the file cannot be written.
pub fn write_todo_file(path: &Path, items: &[TodoItem]) -> Result<()> {
    fs::write(path, format_todos(items))
        .with_context(|| format!("Failed to write todo file: {}", path.display()))
}
