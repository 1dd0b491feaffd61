use anyhow::Result;
use indexrank_lib::{AlignedTable, MonthEndRow, ReferenceRow, TwoYearRow, YtdReport};
use serde::Serialize;
use tabled::builder::Builder;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Clone, Debug)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
    Markdown,
}

#[derive(Tabled, Serialize)]
struct ReferenceDisplayRow {
    #[tabled(rename = "Rank")]
    #[serde(rename = "Rank")]
    rank: usize,
    #[tabled(rename = "Index")]
    #[serde(rename = "Index")]
    index: String,
    #[tabled(rename = "Year-End Close")]
    #[serde(rename = "Year-End Close")]
    year_end_close: String,
    #[tabled(rename = "Reference Close")]
    #[serde(rename = "Reference Close")]
    reference_close: String,
    #[tabled(rename = "YTD Change (%)")]
    #[serde(rename = "YTD Change (%)")]
    change_pct: String,
}

#[derive(Tabled, Serialize)]
struct MonthEndDisplayRow {
    #[tabled(rename = "Rank")]
    #[serde(rename = "Rank")]
    rank: usize,
    #[tabled(rename = "Index")]
    #[serde(rename = "Index")]
    index: String,
    #[tabled(rename = "Year-End Close")]
    #[serde(rename = "Year-End Close")]
    year_end_close: String,
    #[tabled(rename = "Prev Month-End Close")]
    #[serde(rename = "Prev Month-End Close")]
    month_end_close: String,
    #[tabled(rename = "YTD Change (%)")]
    #[serde(rename = "YTD Change (%)")]
    change_pct: String,
}

#[derive(Tabled, Serialize)]
struct TwoYearDisplayRow {
    #[tabled(rename = "Rank")]
    #[serde(rename = "Rank")]
    rank: usize,
    #[tabled(rename = "Index")]
    #[serde(rename = "Index")]
    index: String,
    #[tabled(rename = "Prior Year-End Close")]
    #[serde(rename = "Prior Year-End Close")]
    prior_year_end_close: String,
    #[tabled(rename = "Year-End Close")]
    #[serde(rename = "Year-End Close")]
    year_end_close: String,
    #[tabled(rename = "Change (%)")]
    #[serde(rename = "Change (%)")]
    change_pct: String,
}

// -- Row builders --

fn build_reference_rows(rows: &[ReferenceRow]) -> Vec<ReferenceDisplayRow> {
    rows.iter()
        .map(|r| ReferenceDisplayRow {
            rank: r.rank,
            index: r.index.clone(),
            year_end_close: format_price(r.year_end_close),
            reference_close: format_price(r.reference_close),
            change_pct: format_change(r.change_pct),
        })
        .collect()
}

fn build_month_end_rows(rows: &[MonthEndRow]) -> Vec<MonthEndDisplayRow> {
    rows.iter()
        .map(|r| MonthEndDisplayRow {
            rank: r.rank,
            index: r.index.clone(),
            year_end_close: format_price(r.year_end_close),
            month_end_close: format_price(r.month_end_close),
            change_pct: format_change(r.change_pct),
        })
        .collect()
}

fn build_two_year_rows(rows: &[TwoYearRow]) -> Vec<TwoYearDisplayRow> {
    rows.iter()
        .map(|r| TwoYearDisplayRow {
            rank: r.rank,
            index: r.index.clone(),
            prior_year_end_close: format_price(r.prior_year_end_close),
            year_end_close: format_price(r.year_end_close),
            change_pct: format_change(r.change_pct),
        })
        .collect()
}

fn section_titles(report: &YtdReport) -> [String; 3] {
    [
        format!("YTD change based on reference date ({})", report.reference_date),
        "YTD change based on previous month-end close".to_string(),
        "Change based on last two year-end closes".to_string(),
    ]
}

// -- Table output --

pub fn print_report_tables(report: &YtdReport) {
    let [t1, t2, t3] = section_titles(report);
    println!("{}\n{}\n", t1, Table::new(build_reference_rows(&report.reference_table)));
    println!("{}\n{}\n", t2, Table::new(build_month_end_rows(&report.month_end_table)));
    println!("{}\n{}", t3, Table::new(build_two_year_rows(&report.two_year_table)));
}

// -- Markdown output --

pub fn print_report_markdown(report: &YtdReport) {
    let [t1, t2, t3] = section_titles(report);
    let mut reference = Table::new(build_reference_rows(&report.reference_table));
    reference.with(Style::markdown());
    let mut month_end = Table::new(build_month_end_rows(&report.month_end_table));
    month_end.with(Style::markdown());
    let mut two_year = Table::new(build_two_year_rows(&report.two_year_table));
    two_year.with(Style::markdown());

    println!("### {}\n\n{}\n", t1, reference);
    println!("### {}\n\n{}\n", t2, month_end);
    println!("### {}\n\n{}", t3, two_year);
}

// -- CSV output --

pub fn print_report_csv(report: &YtdReport) -> Result<()> {
    write_csv_rows(&build_reference_rows(&report.reference_table))?;
    println!();
    write_csv_rows(&build_month_end_rows(&report.month_end_table))?;
    println!();
    write_csv_rows(&build_two_year_rows(&report.two_year_table))?;
    Ok(())
}

fn write_csv_rows<T: Serialize>(rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

// -- JSON output --

pub fn print_json<T: serde::Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}

// -- Aligned history output --

pub fn print_history_table(aligned: &AlignedTable) {
    println!("{}", history_builder(aligned).build());
}

pub fn print_history_markdown(aligned: &AlignedTable) {
    let mut table = history_builder(aligned).build();
    table.with(Style::markdown());
    println!("{}", table);
}

pub fn print_history_csv(aligned: &AlignedTable) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    wtr.write_record(history_header(aligned))?;
    for (i, date) in aligned.dates.iter().enumerate() {
        let mut record = vec![date.to_string()];
        record.extend(aligned.columns.iter().map(|c| history_cell(c.closes[i])));
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

fn history_builder(aligned: &AlignedTable) -> Builder {
    let mut builder = Builder::default();
    builder.push_record(history_header(aligned));
    for (i, date) in aligned.dates.iter().enumerate() {
        let mut record = vec![date.to_string()];
        record.extend(aligned.columns.iter().map(|c| history_cell(c.closes[i])));
        builder.push_record(record);
    }
    builder
}

fn history_header(aligned: &AlignedTable) -> Vec<String> {
    let mut header = vec!["Date".to_string()];
    header.extend(aligned.columns.iter().map(|c| c.label.clone()));
    header
}

fn history_cell(close: Option<f64>) -> String {
    close.map(format_price).unwrap_or_default()
}

fn format_price(price: f64) -> String {
    format!("{:.2}", price)
}

fn format_change(change: f64) -> String {
    format!("{:.2}", change)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use indexrank_lib::{align, IndexSelection, PriceSeries};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn fixture_report() -> YtdReport {
        let series = vec![
            PriceSeries::from_observations(
                "PSEI",
                vec![
                    (d(2022, 12, 30), 5850.0),
                    (d(2023, 12, 29), 6500.0),
                    (d(2024, 5, 31), 6760.0),
                    (d(2024, 6, 25), 7150.0),
                ],
            )
            .unwrap(),
            PriceSeries::from_observations(
                "STI",
                vec![
                    (d(2022, 12, 30), 3250.0),
                    (d(2023, 12, 29), 3200.0),
                    (d(2024, 5, 31), 3330.0),
                    (d(2024, 6, 25), 3300.0),
                ],
            )
            .unwrap(),
        ];
        indexrank_lib::build_report(&series, d(2024, 6, 25), &IndexSelection::All)
    }

    fn fixture_aligned() -> AlignedTable {
        let a = PriceSeries::from_observations(
            "PSEI",
            vec![(d(2024, 1, 2), 6500.0), (d(2024, 1, 4), 6520.0)],
        )
        .unwrap();
        let b = PriceSeries::from_observations("STI", vec![(d(2024, 1, 3), 3200.0)]).unwrap();
        align(&[a, b]).0
    }

    // -- Price/change formatting --

    #[test]
    fn test_format_price_two_decimals() {
        assert_eq!(format_price(6500.0), "6500.00");
        assert_eq!(format_price(3464.171), "3464.17");
    }

    #[test]
    fn test_format_change_signs() {
        assert_eq!(format_change(10.0), "10.00");
        assert_eq!(format_change(-5.0), "-5.00");
    }

    // -- Row builder tests --

    #[test]
    fn test_build_reference_rows_mapping() {
        let report = fixture_report();
        let rows = build_reference_rows(&report.reference_table);
        assert_eq!(rows.len(), 2);

        // PSEI +10.00 ranks first.
        let row = &rows[0];
        assert_eq!(row.rank, 1);
        assert_eq!(row.index, "PSEI");
        assert_eq!(row.year_end_close, "6500.00");
        assert_eq!(row.reference_close, "7150.00");
        assert_eq!(row.change_pct, "10.00");
    }

    #[test]
    fn test_build_month_end_rows_mapping() {
        let report = fixture_report();
        let rows = build_month_end_rows(&report.month_end_table);
        // STI +4.06 edges out PSEI +4.00 on this basis.
        assert_eq!(rows[0].index, "STI");
        assert_eq!(rows[0].change_pct, "4.06");
        assert_eq!(rows[1].index, "PSEI");
        assert_eq!(rows[1].month_end_close, "6760.00");
        assert_eq!(rows[1].change_pct, "4.00");
    }

    #[test]
    fn test_build_two_year_rows_mapping() {
        let report = fixture_report();
        let rows = build_two_year_rows(&report.two_year_table);
        // PSEI 5850 -> 6500 = +11.11 ranks first.
        assert_eq!(rows[0].index, "PSEI");
        assert_eq!(rows[0].prior_year_end_close, "5850.00");
        assert_eq!(rows[0].year_end_close, "6500.00");
        assert_eq!(rows[0].change_pct, "11.11");
    }

    #[test]
    fn test_build_rows_empty() {
        assert!(build_reference_rows(&[]).is_empty());
        assert!(build_month_end_rows(&[]).is_empty());
        assert!(build_two_year_rows(&[]).is_empty());
    }

    // -- CSV output tests --

    fn csv_from_rows<T: Serialize>(rows: &[T]) -> String {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        for row in rows {
            wtr.serialize(row).unwrap();
        }
        wtr.flush().unwrap();
        String::from_utf8(wtr.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn test_csv_reference_headers() {
        let report = fixture_report();
        let csv = csv_from_rows(&build_reference_rows(&report.reference_table));
        let header = csv.lines().next().unwrap();
        assert_eq!(
            header,
            "Rank,Index,Year-End Close,Reference Close,YTD Change (%)"
        );
    }

    #[test]
    fn test_csv_month_end_headers() {
        let report = fixture_report();
        let csv = csv_from_rows(&build_month_end_rows(&report.month_end_table));
        let header = csv.lines().next().unwrap();
        assert_eq!(
            header,
            "Rank,Index,Year-End Close,Prev Month-End Close,YTD Change (%)"
        );
    }

    #[test]
    fn test_csv_two_year_headers() {
        let report = fixture_report();
        let csv = csv_from_rows(&build_two_year_rows(&report.two_year_table));
        let header = csv.lines().next().unwrap();
        assert_eq!(
            header,
            "Rank,Index,Prior Year-End Close,Year-End Close,Change (%)"
        );
    }

    // -- JSON output tests --

    #[test]
    fn test_json_report_serializable() {
        let report = fixture_report();
        let val = serde_json::to_value(&report).unwrap();
        assert!(val["reference_table"].is_array());
        assert_eq!(val["reference_table"].as_array().unwrap().len(), 2);
        assert_eq!(val["reference_date"], "2024-06-25");
    }

    // -- Markdown output tests --

    #[test]
    fn test_markdown_reference_structure() {
        let report = fixture_report();
        let mut table = Table::new(build_reference_rows(&report.reference_table));
        table.with(Style::markdown());
        let md = table.to_string();

        assert!(md.contains('|'));
        assert!(md.contains("---"));
        assert!(md.contains("Rank"));
        assert!(md.contains("YTD Change (%)"));
    }

    // -- History output tests --

    #[test]
    fn test_history_header_has_one_column_per_index() {
        let aligned = fixture_aligned();
        assert_eq!(history_header(&aligned), vec!["Date", "PSEI", "STI"]);
    }

    #[test]
    fn test_history_absent_cells_render_empty() {
        let aligned = fixture_aligned();
        let built = history_builder(&aligned).build().to_string();
        // 2024-01-03 has an STI close but no PSEI close.
        assert!(built.contains("2024-01-03"));
        assert!(built.contains("3200.00"));

        assert_eq!(history_cell(None), "");
        assert_eq!(history_cell(Some(6500.0)), "6500.00");
    }
}
