//! Validated per-index closing-price series.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::error::IndexRankError;

/// One index's historical closing prices, ordered by trading date.
///
/// Built once per upload by the normalizer and immutable for the session.
/// Invariants: dates are unique (duplicates are rejected at construction),
/// and every price the normalizer admits is finite and positive.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    label: String,
    observations: BTreeMap<NaiveDate, f64>,
}

impl PriceSeries {
    /// Build a series from `(date, close)` pairs.
    ///
    /// Returns `DuplicateDate` if two pairs share a date; the caller must
    /// surface that, not merge it away.
    pub fn from_observations<I>(
        label: impl Into<String>,
        observations: I,
    ) -> Result<Self, IndexRankError>
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        let label = label.into();
        let mut map = BTreeMap::new();
        for (date, close) in observations {
            if map.insert(date, close).is_some() {
                return Err(IndexRankError::DuplicateDate { sheet: label, date });
            }
        }
        Ok(Self {
            label,
            observations: map,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn observations(&self) -> &BTreeMap<NaiveDate, f64> {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// First and last trading dates, if any observations exist.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.observations.keys().next()?;
        let last = self.observations.keys().next_back()?;
        Some((*first, *last))
    }
}
