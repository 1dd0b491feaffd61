pub mod history;
pub mod rank;

use anyhow::{bail, Result};
use indexrank_lib::IndexSelection;

/// Resolve the `--indices` flag into a selection.
pub fn parse_selection(indices: &str) -> Result<IndexSelection> {
    match indices.trim().to_lowercase().as_str() {
        "asean" => Ok(IndexSelection::asean()),
        "all" => Ok(IndexSelection::All),
        other => bail!("Invalid --indices value: '{}'. Valid options: asean, all", other),
    }
}
