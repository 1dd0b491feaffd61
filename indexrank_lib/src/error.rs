//! Error and diagnostic types for the ranking engine.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

/// Errors from normalization and report construction.
///
/// Sheet-level variants are recoverable: the batch fold converts them into
/// [`Diagnostic`]s and continues with the remaining sheets. Only
/// `NoUsableSheets` escapes to the caller.
#[derive(Error, Debug)]
pub enum IndexRankError {
    /// A sheet lacks a required column after header normalization.
    #[error("sheet '{sheet}' is missing required column '{column}'")]
    MissingColumn { sheet: String, column: String },
    /// A sheet has no header row at all.
    #[error("sheet '{sheet}' is empty")]
    EmptySheet { sheet: String },
    /// Two surviving rows share a trading date. Duplicates are a data defect,
    /// never silently merged.
    #[error("sheet '{sheet}' has duplicate observation for {date}")]
    DuplicateDate { sheet: String, date: NaiveDate },
    /// Every sheet in the workbook failed normalization.
    #[error("no usable sheets in workbook")]
    NoUsableSheets,
}

/// How a diagnostic should be surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Expected absence (unresolved anchor, alignment skip). Kept for the
    /// debug channel and mirrored with `tracing::debug!`; not shown to users.
    Debug,
    /// Structural failure the user should see (sheet skipped).
    Error,
}

/// A per-index message produced by the skip-and-continue folds.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    /// Label of the sheet or index the message is about.
    pub index: String,
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    pub fn error(index: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            severity: Severity::Error,
            message: message.into(),
        }
    }

    pub fn debug(index: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            severity: Severity::Debug,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.index, self.message)
    }
}
