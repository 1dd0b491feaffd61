//! Anchor resolution: year-end, on-or-before, and exact month-end lookups.
//!
//! Deterministic, pure date logic over a series' observation map. No wall
//! clock. "Unresolved" (`None`) is a legitimate absence (the series simply
//! has no observation in the requested window); the metric engine decides
//! what to skip because of it.

use chrono::{Datelike, NaiveDate};

use crate::series::PriceSeries;

/// A resolved (trading date, closing price) pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub date: NaiveDate,
    pub price: f64,
}

/// The observation with the maximum date inside calendar `year`.
///
/// Returns `None` if the series has no observation in that year, or the
/// year is outside the representable calendar range.
pub fn year_end_anchor(series: &PriceSeries, year: i32) -> Option<Anchor> {
    let start = NaiveDate::from_ymd_opt(year, 1, 1)?;
    let end = NaiveDate::from_ymd_opt(year, 12, 31)?;
    series
        .observations()
        .range(start..=end)
        .next_back()
        .map(|(date, price)| Anchor {
            date: *date,
            price: *price,
        })
}

/// The observation on `target`, or failing that the one with the maximum
/// date strictly before it.
///
/// Returns `None` if `target` predates the series' entire history.
pub fn on_or_before(series: &PriceSeries, target: NaiveDate) -> Option<Anchor> {
    series
        .observations()
        .range(..=target)
        .next_back()
        .map(|(date, price)| Anchor {
            date: *date,
            price: *price,
        })
}

/// The observation exactly on `month_end`.
///
/// Deliberately no prior-day fallback: the previous-month-end table requires
/// an exact match, unlike the reference-date table.
pub fn exact_month_end(series: &PriceSeries, month_end: NaiveDate) -> Option<Anchor> {
    series.observations().get(&month_end).map(|price| Anchor {
        date: month_end,
        price: *price,
    })
}

/// Last calendar day of the month immediately preceding `reference`'s month,
/// independent of whether it is a trading day.
///
/// Returns `None` only at the calendar's lower bound.
pub fn previous_month_end(reference: NaiveDate) -> Option<NaiveDate> {
    reference.with_day(1)?.pred_opt()
}
