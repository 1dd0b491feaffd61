//! Raw sheet normalization.
//!
//! Turns one untyped sheet (header row + string cells) into a validated
//! [`PriceSeries`]. Row-level noise such as footer notes and annotation
//! lines is dropped silently; sheet-level structural problems (missing
//! columns, duplicate dates) are errors the batch fold reports and skips.

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::error::{Diagnostic, IndexRankError};
use crate::series::PriceSeries;

/// Column holding the trading date.
pub const DATE_COLUMN: &str = "Date";
/// Column holding the closing price.
pub const CLOSE_COLUMN: &str = "Close";

/// Date formats accepted for row dates, tried in order. Spreadsheet exports
/// commonly carry a time component on ISO dates, hence the second entry.
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y-%m-%d %H:%M:%S", "%m/%d/%Y", "%Y/%m/%d"];

/// One sheet as loaded from the workbook: a name and untyped rows, the first
/// row being header labels. Transient; discarded after normalization.
#[derive(Debug, Clone)]
pub struct RawSheet {
    pub name: String,
    pub rows: Vec<Vec<String>>,
}

impl RawSheet {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }
}

/// Normalize one sheet into a price series.
///
/// Fails with `EmptySheet` if there is no header row, or `MissingColumn` if
/// `Date` or `Close` cannot be located after trimming whitespace (including
/// non-breaking spaces) from the header labels. Rows whose date or price
/// fails to parse are dropped, not fatal. Duplicate surviving dates fail the
/// whole sheet with `DuplicateDate`.
pub fn normalize_sheet(sheet: &RawSheet) -> Result<PriceSeries, IndexRankError> {
    let header = sheet.rows.first().ok_or_else(|| IndexRankError::EmptySheet {
        sheet: sheet.name.clone(),
    })?;

    let date_idx = find_column(header, DATE_COLUMN).ok_or_else(|| IndexRankError::MissingColumn {
        sheet: sheet.name.clone(),
        column: DATE_COLUMN.to_string(),
    })?;
    let close_idx =
        find_column(header, CLOSE_COLUMN).ok_or_else(|| IndexRankError::MissingColumn {
            sheet: sheet.name.clone(),
            column: CLOSE_COLUMN.to_string(),
        })?;

    let mut observations = Vec::new();
    let mut dropped = 0usize;

    for row in &sheet.rows[1..] {
        let date = row.get(date_idx).and_then(|cell| parse_date(cell));
        let close = row.get(close_idx).and_then(|cell| parse_close(cell));
        match (date, close) {
            (Some(date), Some(close)) => observations.push((date, close)),
            _ => dropped += 1,
        }
    }

    if dropped > 0 {
        debug!(sheet = %sheet.name, dropped, "dropped unparseable rows");
    }

    PriceSeries::from_observations(sheet.name.clone(), observations)
}

/// Normalize a batch of sheets, skipping failures.
///
/// An explicit fold over the workbook: per-sheet errors become user-visible
/// diagnostics and the remaining sheets are still processed. Never aborts.
pub fn normalize_sheets(sheets: &[RawSheet]) -> (Vec<PriceSeries>, Vec<Diagnostic>) {
    let mut series = Vec::with_capacity(sheets.len());
    let mut diagnostics = Vec::new();

    for sheet in sheets {
        match normalize_sheet(sheet) {
            Ok(s) => series.push(s),
            Err(e) => {
                warn!(sheet = %sheet.name, error = %e, "skipping sheet");
                diagnostics.push(Diagnostic::error(sheet.name.clone(), e.to_string()));
            }
        }
    }

    (series, diagnostics)
}

/// Locate a column by exact name after trimming the header label.
///
/// `str::trim` removes all Unicode whitespace, which covers the non-breaking
/// spaces spreadsheet exports leave in header cells.
fn find_column(header: &[String], name: &str) -> Option<usize> {
    header.iter().position(|label| label.trim() == name)
}

fn parse_date(cell: &str) -> Option<NaiveDate> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(cell, fmt).ok())
        .or_else(|| {
            // ISO datetimes with fractional seconds ("2024-01-02 00:00:00.000")
            NaiveDate::parse_from_str(cell, "%Y-%m-%d %H:%M:%S%.f").ok()
        })
}

/// Parse a closing price. Tolerates thousands separators; rejects anything
/// non-finite or non-positive.
fn parse_close(cell: &str) -> Option<f64> {
    let cleaned = cell.trim().replace(',', "");
    if cleaned.is_empty() {
        return None;
    }
    let value = cleaned.parse::<f64>().ok()?;
    if value.is_finite() && value > 0.0 {
        Some(value)
    } else {
        None
    }
}
