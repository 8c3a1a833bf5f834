//! Date-indexed price table with derived columns.

use crate::constants::window;
use crate::models::{PriceBar, PriceColumn};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

/// Named column of optional values, aligned with the frame's dates
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

/// Price series laid out column-wise and keyed by ascending date
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PriceFrame {
    dates: Vec<NaiveDate>,
    columns: Vec<Column>,
}

impl PriceFrame {
    /// Build a frame with the five OHLCV columns. Bars must already be
    /// sorted by date with no duplicates (see `models::clean_series`).
    pub fn from_bars(bars: &[PriceBar]) -> Self {
        let dates = bars.iter().map(|b| b.date).collect();
        let columns = PriceColumn::ALL
            .iter()
            .map(|column| Column {
                name: column.as_str().to_string(),
                values: bars.iter().map(|b| Some(b.value(*column))).collect(),
            })
            .collect();
        Self { dates, columns }
    }

    /// Frame over `dates` with no columns yet
    pub fn with_dates(dates: Vec<NaiveDate>) -> Self {
        Self {
            dates,
            columns: Vec::new(),
        }
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Values of a price column with absent entries as NaN
    pub fn price_values(&self, column: PriceColumn) -> Vec<f64> {
        self.column(column.as_str())
            .map(|c| c.values.iter().map(|v| v.unwrap_or(f64::NAN)).collect())
            .unwrap_or_else(|| vec![f64::NAN; self.len()])
    }

    /// Append a derived column, replacing any column with the same name.
    ///
    /// # Panics
    /// Panics if `values` is not the same length as the frame.
    pub fn push_column(&mut self, name: impl Into<String>, values: Vec<Option<f64>>) {
        assert_eq!(values.len(), self.len(), "column length must match frame length");
        let name = name.into();
        self.columns.retain(|c| c.name != name);
        self.columns.push(Column { name, values });
    }

    /// Keep only the last `n` rows (all rows when `n` exceeds the length)
    pub fn trailing(&self, n: usize) -> PriceFrame {
        let start = self.len().saturating_sub(n);
        PriceFrame {
            dates: self.dates[start..].to_vec(),
            columns: self
                .columns
                .iter()
                .map(|c| Column {
                    name: c.name.clone(),
                    values: c.values[start..].to_vec(),
                })
                .collect(),
        }
    }

    /// Row view: (date, value per column in column order)
    pub fn rows(&self) -> Vec<(NaiveDate, Vec<Option<f64>>)> {
        self.dates
            .iter()
            .enumerate()
            .map(|(i, date)| (*date, self.columns.iter().map(|c| c.values[i]).collect()))
            .collect()
    }
}

/// Re-align a series onto another date index.
///
/// Each target date takes the value the source holds for that exact date,
/// or `None` when the source has no such date. The output has exactly one
/// entry per target date, in target order.
pub fn reindex(
    source_dates: &[NaiveDate],
    source_values: &[Option<f64>],
    target_dates: &[NaiveDate],
) -> Vec<Option<f64>> {
    let lookup: HashMap<NaiveDate, Option<f64>> = source_dates
        .iter()
        .copied()
        .zip(source_values.iter().copied())
        .collect();

    target_dates
        .iter()
        .map(|date| lookup.get(date).copied().flatten())
        .collect()
}

/// Resolve the trailing display window for `available` bars.
///
/// The window is clamped to `[MIN, min(MAX, available)]` and snapped down to
/// the slider step counted from `MIN`; the upper bound itself is always
/// reachable. With fewer than `MIN` bars every bar is shown.
pub fn resolve_window(requested: Option<usize>, available: usize) -> usize {
    let upper = available.min(window::MAX);
    if upper < window::MIN {
        return available;
    }

    let requested = requested.unwrap_or(window::DEFAULT);
    if requested >= upper {
        return upper;
    }
    let clamped = requested.max(window::MIN);
    window::MIN + (clamped - window::MIN) / window::STEP * window::STEP
}
