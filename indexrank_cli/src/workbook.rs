//! Workbook loading: a directory of per-sheet CSV files.
//!
//! Each `<SheetName>.csv` becomes one raw sheet, header row included and
//! cells untyped (typing is the normalizer's job). Files load in sorted
//! name order so a workbook always produces the same sheet sequence.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};
use indexrank_lib::RawSheet;

/// Load every non-excluded `*.csv` in `dir` as a raw sheet.
///
/// Exclusion is by sheet name (file stem), case-insensitive: the workbook's
/// legend/metadata sheet is named out rather than positioned out.
pub fn load_workbook(dir: &Path, exclude: &[String]) -> Result<Vec<RawSheet>> {
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("cannot read workbook directory '{}'", dir.display()))?;

    let mut paths: Vec<_> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.extension()
                .map(|ext| ext.eq_ignore_ascii_case("csv"))
                .unwrap_or(false)
        })
        .collect();
    paths.sort();

    if paths.is_empty() {
        bail!("no CSV sheets found in '{}'", dir.display());
    }

    let mut sheets = Vec::new();
    for path in paths {
        let name = match path.file_stem().and_then(|stem| stem.to_str()) {
            Some(name) => name.to_string(),
            None => continue,
        };
        if is_excluded(&name, exclude) {
            continue;
        }
        let file =
            File::open(&path).with_context(|| format!("cannot open sheet '{}'", path.display()))?;
        sheets.push(parse_sheet(file, &name)?);
    }

    Ok(sheets)
}

/// Parse one sheet's CSV content into untyped rows.
///
/// Reads every record as raw strings; records the CSV reader itself rejects
/// are dropped, mirroring the normalizer's row-level leniency.
pub fn parse_sheet<R: Read>(reader: R, name: &str) -> Result<RawSheet> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in rdr.records() {
        let Ok(record) = record else { continue };
        rows.push(record.iter().map(|cell| cell.to_string()).collect());
    }

    Ok(RawSheet::new(name, rows))
}

fn is_excluded(name: &str, exclude: &[String]) -> bool {
    exclude.iter().any(|e| e.eq_ignore_ascii_case(name))
}
