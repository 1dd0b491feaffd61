//! One-pass report assembly: normalize, align, measure, rank, filter.

use chrono::NaiveDate;
use serde::Serialize;

use crate::align::{align, AlignedTable};
use crate::error::{Diagnostic, IndexRankError};
use crate::metrics::{compute_tables, MonthEndRow, ReferenceRow, TwoYearRow};
use crate::rank::rank_descending;
use crate::selection::IndexSelection;
use crate::series::PriceSeries;
use crate::sheet::{normalize_sheets, RawSheet};

/// The three ranked tables for one reference date.
///
/// Tables may be empty (no resolvable anchors); that is a valid result, not
/// an error. Diagnostics carry every per-index skip on the debug channel.
#[derive(Debug, Serialize)]
pub struct YtdReport {
    pub reference_date: NaiveDate,
    pub reference_table: Vec<ReferenceRow>,
    pub month_end_table: Vec<MonthEndRow>,
    pub two_year_table: Vec<TwoYearRow>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Everything one workbook upload produces: the chart feed plus the ranked
/// tables, with normalization and alignment diagnostics alongside.
#[derive(Debug, Serialize)]
pub struct Analysis {
    pub aligned: AlignedTable,
    pub report: YtdReport,
    pub diagnostics: Vec<Diagnostic>,
}

/// Rank and filter the metric tables for already-normalized series.
///
/// Ranks are assigned against the full universe before any subset filter is
/// applied, so a filtered view preserves each index's global rank.
pub fn build_report(
    series: &[PriceSeries],
    reference_date: NaiveDate,
    selection: &IndexSelection,
) -> YtdReport {
    let mut tables = compute_tables(series, reference_date);

    rank_descending(&mut tables.reference_rows);
    rank_descending(&mut tables.month_end_rows);
    rank_descending(&mut tables.two_year_rows);

    tables.reference_rows.retain(|row| selection.includes(&row.index));
    tables.month_end_rows.retain(|row| selection.includes(&row.index));
    tables.two_year_rows.retain(|row| selection.includes(&row.index));

    YtdReport {
        reference_date,
        reference_table: tables.reference_rows,
        month_end_table: tables.month_end_rows,
        two_year_table: tables.two_year_rows,
        diagnostics: tables.diagnostics,
    }
}

/// The full synchronous pass over a workbook.
///
/// Fails only when not a single sheet survives normalization; every lesser
/// failure is a diagnostic on the returned [`Analysis`].
pub fn analyze(
    sheets: &[RawSheet],
    reference_date: NaiveDate,
    selection: &IndexSelection,
) -> Result<Analysis, IndexRankError> {
    let (series, mut diagnostics) = normalize_sheets(sheets);
    if series.is_empty() {
        return Err(IndexRankError::NoUsableSheets);
    }

    let (aligned, align_diagnostics) = align(&series);
    diagnostics.extend(align_diagnostics);

    let report = build_report(&series, reference_date, selection);

    Ok(Analysis {
        aligned,
        report,
        diagnostics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn series(label: &str, obs: &[(NaiveDate, f64)]) -> PriceSeries {
        PriceSeries::from_observations(label, obs.to_vec()).unwrap()
    }

    fn universe() -> Vec<PriceSeries> {
        vec![
            series(
                "PSEI",
                &[
                    (d(2022, 12, 30), 90.0),
                    (d(2023, 12, 29), 100.0),
                    (d(2024, 5, 31), 104.0),
                    (d(2024, 6, 25), 110.0),
                ],
            ),
            series(
                "N225",
                &[
                    (d(2022, 12, 30), 26000.0),
                    (d(2023, 12, 29), 33000.0),
                    (d(2024, 5, 31), 38000.0),
                    (d(2024, 6, 25), 39000.0),
                ],
            ),
            series(
                "STI",
                &[
                    (d(2022, 12, 30), 3250.0),
                    (d(2023, 12, 29), 3200.0),
                    (d(2024, 5, 31), 3330.0),
                    (d(2024, 6, 25), 3300.0),
                ],
            ),
        ]
    }

    #[test]
    fn tables_sorted_descending_with_ranks() {
        let report = build_report(&universe(), d(2024, 6, 25), &IndexSelection::All);

        let order: Vec<_> = report
            .reference_table
            .iter()
            .map(|row| (row.index.as_str(), row.rank))
            .collect();
        // N225 +18.18, PSEI +10.00, STI +3.13
        assert_eq!(order, vec![("N225", 1), ("PSEI", 2), ("STI", 3)]);
    }

    #[test]
    fn subset_filter_preserves_global_ranks() {
        let report = build_report(&universe(), d(2024, 6, 25), &IndexSelection::asean());

        let order: Vec<_> = report
            .reference_table
            .iter()
            .map(|row| (row.index.as_str(), row.rank))
            .collect();
        // N225 is ranked but filtered out of the view; ranks keep the gap.
        assert_eq!(order, vec![("PSEI", 2), ("STI", 3)]);
    }

    #[test]
    fn analyze_rejects_workbook_with_no_usable_sheets() {
        let sheets = vec![RawSheet::new(
            "BROKEN",
            vec![vec!["Date".to_string(), "Open".to_string()]],
        )];
        let result = analyze(&sheets, d(2024, 6, 25), &IndexSelection::All);
        assert!(matches!(result, Err(IndexRankError::NoUsableSheets)));
    }

    #[test]
    fn analyze_empty_workbook_fails() {
        let result = analyze(&[], d(2024, 6, 25), &IndexSelection::All);
        assert!(matches!(result, Err(IndexRankError::NoUsableSheets)));
    }

    #[test]
    fn unresolvable_anchors_yield_empty_tables_not_errors() {
        // All history predates the reference windows' anchor years.
        let sheets = vec![RawSheet::new(
            "OLD",
            vec![
                vec!["Date".to_string(), "Close".to_string()],
                vec!["2019-06-03".to_string(), "100.0".to_string()],
            ],
        )];
        let analysis = analyze(&sheets, d(2024, 6, 25), &IndexSelection::All).unwrap();
        assert!(analysis.report.reference_table.is_empty());
        assert!(analysis.report.month_end_table.is_empty());
        assert!(analysis.report.two_year_table.is_empty());
        assert!(!analysis.report.diagnostics.is_empty());
    }
}
