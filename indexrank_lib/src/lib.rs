//! Core library for IndexRank: comparative year-to-date performance
//! rankings for stock-index closing-price series.
//!
//! The pipeline is synchronous and pure once sheet data is in memory:
//! raw sheets are normalized into per-index series, aligned for charting,
//! measured three ways against year-end anchors, and densely ranked.
//! Per-sheet and per-index failures are skip-and-continue diagnostics;
//! only a workbook with zero usable sheets fails outright.

pub mod align;
pub mod anchor;
pub mod error;
pub mod metrics;
pub mod rank;
pub mod report;
pub mod selection;
pub mod series;
pub mod sheet;

pub use align::{align, AlignedColumn, AlignedTable};
pub use anchor::{
    exact_month_end, on_or_before, previous_month_end, year_end_anchor, Anchor,
};
pub use error::{Diagnostic, IndexRankError, Severity};
pub use metrics::{change_pct, compute_tables, MonthEndRow, ReferenceRow, TwoYearRow};
pub use rank::{rank_descending, Ranked};
pub use report::{analyze, build_report, Analysis, YtdReport};
pub use selection::{IndexSelection, ASEAN_INDICES};
pub use series::PriceSeries;
pub use sheet::{normalize_sheet, normalize_sheets, RawSheet};
