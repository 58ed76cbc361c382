//! CSV export of detected tables.
//!
//! Serialization follows RFC 4180 quoting: a cell is wrapped in double quotes
//! when it contains a comma, a quote, a line break or leading/trailing
//! whitespace, and embedded quotes are doubled. Files are named
//! `<base>_<YYYY-MM-DD>.csv`.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::debug;

use crate::table::TableData;
use crate::{Error, Result};

/// Serialize a table to CSV text (`\n` between rows, no trailing newline).
///
/// # Example
///
/// ```rust
/// use rs_chat_navigator::{export, table};
///
/// let table = table::parse_csv("Name,Note\nAlice,\"likes, commas\"").expect("table");
/// assert_eq!(export::to_csv(&table), "Name,Note\nAlice,\"likes, commas\"");
/// ```
#[must_use]
pub fn to_csv(table: &TableData) -> String {
    table
        .rows()
        .iter()
        .map(|row| row.iter().map(|cell| quote_cell(cell)).collect::<Vec<_>>().join(","))
        .collect::<Vec<_>>()
        .join("\n")
}

fn quote_cell(cell: &str) -> String {
    let needs_quotes = cell.contains([',', '"', '\n', '\r']) || cell.trim() != cell;
    if needs_quotes {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

/// Write a table as CSV to any writer.
pub fn write_csv<W: Write>(writer: &mut W, table: &TableData) -> Result<()> {
    writer.write_all(to_csv(table).as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// `<base>_<YYYY-MM-DD>.csv`.
///
/// # Example
///
/// ```rust
/// use chrono::NaiveDate;
/// use rs_chat_navigator::export::export_filename;
///
/// let date = NaiveDate::from_ymd_opt(2025, 9, 6).expect("valid date");
/// assert_eq!(export_filename("ai_table_1_1", date), "ai_table_1_1_2025-09-06.csv");
/// ```
#[must_use]
pub fn export_filename(base: &str, date: NaiveDate) -> String {
    format!("{base}_{}.csv", date.format("%Y-%m-%d"))
}

/// Write `table` into `dir` under [`export_filename`] and return the path.
///
/// Fails with [`Error::Export`] when `base` is not a plain file name and with
/// [`Error::Io`] when the file cannot be written. Calling again overwrites
/// the same file, so a failed export can simply be retried.
pub fn export_to_dir(dir: &Path, base: &str, table: &TableData, date: NaiveDate) -> Result<PathBuf> {
    if base.trim().is_empty() || base.contains(['/', '\\']) || base.starts_with('.') {
        return Err(Error::Export(format!("invalid export name: {base:?}")));
    }

    fs::create_dir_all(dir)?;
    let path = dir.join(export_filename(base, date));
    let mut file = fs::File::create(&path)?;
    write_csv(&mut file, table)?;

    debug!(path = %path.display(), rows = table.len(), "exported table");
    Ok(path)
}
