// Parsing helpers shared by the engine and its callers.
use anyhow::{anyhow, bail, Result};
use chrono::NaiveDate;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

const MAX_SYMBOL_LEN: usize = 32;

// Parses "YYYY-MM-DD" into a calendar date.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|e| anyhow!("Failed to parse date '{}': {}", s, e))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Checks that a symbol is safe to use as a file stem.
///
/// Accepts ASCII alphanumerics plus `.`, `-` and `_`, at most 32 characters,
/// and never a leading `.` (which would hide the file or walk up a directory).
pub fn validate_symbol(symbol: &str) -> Result<()> {
    if symbol.is_empty() {
        bail!("Symbol must not be empty");
    }
    if symbol.len() > MAX_SYMBOL_LEN {
        bail!("Symbol '{}' exceeds {} characters", symbol, MAX_SYMBOL_LEN);
    }
    if symbol.starts_with('.') {
        bail!("Symbol '{}' must not start with '.'", symbol);
    }
    if let Some(bad) = symbol
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_')))
    {
        bail!("Symbol '{}' contains invalid character '{}'", symbol, bad);
    }
    Ok(())
}
