//! The YTD metric engine.
//!
//! For a reference date R in year Y, every index is measured three ways
//! against its fiscal year-end anchor (last trading date of Y-1):
//!
//! - reference-date table: close on (or most recently before) R
//! - month-end table: close exactly on the previous calendar month-end
//! - two-year table: year-end of Y-1 against year-end of Y-2
//!
//! A missing anchor skips that index for the affected table(s) only; the
//! skip is recorded on the debug diagnostic channel and never blocks other
//! indices or the other tables.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use tracing::debug;

use crate::anchor::{exact_month_end, on_or_before, previous_month_end, year_end_anchor};
use crate::error::Diagnostic;
use crate::rank::Ranked;
use crate::series::PriceSeries;

/// One row of the reference-date table: year-end close vs the close on (or
/// most recently before) the reference date.
#[derive(Debug, Clone, Serialize)]
pub struct ReferenceRow {
    pub index: String,
    pub year_end_close: f64,
    pub reference_close: f64,
    pub change_pct: f64,
    pub rank: usize,
}

/// One row of the month-end table: year-end close vs the close exactly on
/// the previous calendar month-end.
#[derive(Debug, Clone, Serialize)]
pub struct MonthEndRow {
    pub index: String,
    pub year_end_close: f64,
    pub month_end_close: f64,
    pub change_pct: f64,
    pub rank: usize,
}

/// One row of the two-year table: year-end close of two years prior vs the
/// most recent year-end close.
#[derive(Debug, Clone, Serialize)]
pub struct TwoYearRow {
    pub index: String,
    pub prior_year_end_close: f64,
    pub year_end_close: f64,
    pub change_pct: f64,
    pub rank: usize,
}

impl Ranked for ReferenceRow {
    fn change_pct(&self) -> f64 {
        self.change_pct
    }
    fn set_rank(&mut self, rank: usize) {
        self.rank = rank;
    }
}

impl Ranked for MonthEndRow {
    fn change_pct(&self) -> f64 {
        self.change_pct
    }
    fn set_rank(&mut self, rank: usize) {
        self.rank = rank;
    }
}

impl Ranked for TwoYearRow {
    fn change_pct(&self) -> f64 {
        self.change_pct
    }
    fn set_rank(&mut self, rank: usize) {
        self.rank = rank;
    }
}

/// Unranked output of one metric pass over all indices.
#[derive(Debug, Default)]
pub struct MetricTables {
    pub reference_rows: Vec<ReferenceRow>,
    pub month_end_rows: Vec<MonthEndRow>,
    pub two_year_rows: Vec<TwoYearRow>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Percentage change from `anchor` to `current`, rounded to two decimals.
///
/// Rounding is half-away-from-zero (`f64::round`), matching common financial
/// reporting; the mode is fixed rather than platform-dependent.
pub fn change_pct(anchor: f64, current: f64) -> f64 {
    round2((current - anchor) / anchor * 100.0)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Compute all three tables for every index.
///
/// An explicit fold: each index contributes whatever rows its anchors allow
/// plus debug diagnostics for each skip. One index's missing data never
/// blocks another's, and never blocks its own other tables unless they share
/// the missing anchor. Rows come back unranked.
pub fn compute_tables(series: &[PriceSeries], reference: NaiveDate) -> MetricTables {
    let mut tables = MetricTables::default();
    for s in series {
        compute_index(s, reference, &mut tables);
    }
    tables
}

fn compute_index(series: &PriceSeries, reference: NaiveDate, tables: &mut MetricTables) {
    let label = series.label();
    let anchor_year = reference.year() - 1;

    let year_end = year_end_anchor(series, anchor_year);

    match year_end {
        Some(year_end) => {
            // Reference-date table: exact match or most recent prior close.
            match on_or_before(series, reference) {
                Some(at_reference) => tables.reference_rows.push(ReferenceRow {
                    index: label.to_string(),
                    year_end_close: year_end.price,
                    reference_close: at_reference.price,
                    change_pct: change_pct(year_end.price, at_reference.price),
                    rank: 0,
                }),
                None => {
                    tables.diagnostics.push(skip(
                        label,
                        format!("no observation on or before {reference}; reference-date row skipped"),
                    ));
                }
            }

            // Month-end table: exact match required, no fallback.
            let month_end_row = previous_month_end(reference)
                .and_then(|month_end| exact_month_end(series, month_end));
            match month_end_row {
                Some(at_month_end) => tables.month_end_rows.push(MonthEndRow {
                    index: label.to_string(),
                    year_end_close: year_end.price,
                    month_end_close: at_month_end.price,
                    change_pct: change_pct(year_end.price, at_month_end.price),
                    rank: 0,
                }),
                None => {
                    tables.diagnostics.push(skip(
                        label,
                        format!(
                            "no close exactly on previous month-end of {reference}; month-end row skipped"
                        ),
                    ));
                }
            }
        }
        None => {
            tables.diagnostics.push(skip(
                label,
                format!(
                    "no trading dates in {anchor_year}; reference-date and month-end rows skipped"
                ),
            ));
        }
    }

    // Two-year table: needs both year-end anchors but nothing else, so it is
    // attempted even when the rows above were skipped.
    match (year_end, year_end_anchor(series, anchor_year - 1)) {
        (Some(year_end), Some(prior)) => tables.two_year_rows.push(TwoYearRow {
            index: label.to_string(),
            prior_year_end_close: prior.price,
            year_end_close: year_end.price,
            change_pct: change_pct(prior.price, year_end.price),
            rank: 0,
        }),
        (Some(_), None) => {
            tables.diagnostics.push(skip(
                label,
                format!("no trading dates in {}; two-year row skipped", anchor_year - 1),
            ));
        }
        (None, _) => {
            tables.diagnostics.push(skip(
                label,
                format!("no trading dates in {anchor_year}; two-year row skipped"),
            ));
        }
    }
}

fn skip(label: &str, message: String) -> Diagnostic {
    debug!(index = label, %message, "anchor unresolved");
    Diagnostic::debug(label.to_string(), message)
}
