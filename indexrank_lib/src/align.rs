//! Date alignment of multiple price series for the historical chart feed.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::error::Diagnostic;
use crate::series::PriceSeries;

/// One named column of an [`AlignedTable`], parallel to its date axis.
/// Absent observations stay `None`, never zero and never interpolated.
#[derive(Debug, Clone, Serialize)]
pub struct AlignedColumn {
    pub label: String,
    pub closes: Vec<Option<f64>>,
}

/// A date-indexed outer join of every input series.
#[derive(Debug, Clone, Serialize)]
pub struct AlignedTable {
    /// Sorted union of all input trading dates.
    pub dates: Vec<NaiveDate>,
    pub columns: Vec<AlignedColumn>,
}

impl AlignedTable {
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn column(&self, label: &str) -> Option<&AlignedColumn> {
        self.columns.iter().find(|c| c.label == label)
    }
}

/// Reindex every series onto the union of all trading dates.
///
/// One series failing to align must not abort the rest: a duplicate column
/// label (two sheets with the same name reaching this point) skips the later
/// series with a diagnostic and the batch continues.
pub fn align(series: &[PriceSeries]) -> (AlignedTable, Vec<Diagnostic>) {
    let mut diagnostics = Vec::new();

    let mut kept: Vec<&PriceSeries> = Vec::with_capacity(series.len());
    for s in series {
        if kept.iter().any(|k| k.label() == s.label()) {
            debug!(label = %s.label(), "duplicate column label, skipping series");
            diagnostics.push(Diagnostic::debug(
                s.label().to_string(),
                "duplicate column label, series skipped in aligned table",
            ));
            continue;
        }
        kept.push(s);
    }

    let dates: Vec<NaiveDate> = kept
        .iter()
        .flat_map(|s| s.observations().keys().copied())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let columns = kept
        .iter()
        .map(|s| AlignedColumn {
            label: s.label().to_string(),
            closes: dates
                .iter()
                .map(|date| s.observations().get(date).copied())
                .collect(),
        })
        .collect();

    (AlignedTable { dates, columns }, diagnostics)
}
