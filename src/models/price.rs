use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Daily OHLCV bar for one symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    /// Trading date (unique and ascending within a series)
    pub date: NaiveDate,

    /// Opening price
    pub open: f64,

    /// Highest price
    pub high: f64,

    /// Lowest price
    pub low: f64,

    /// Closing price
    pub close: f64,

    /// Trading volume
    pub volume: f64,

    /// Quote currency
    #[serde(default)]
    pub currency: String,
}

impl PriceBar {
    /// Create a new bar with an empty currency
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
            currency: String::new(),
        }
    }

    /// Value of the given column
    pub fn value(&self, column: PriceColumn) -> f64 {
        match column {
            PriceColumn::Open => self.open,
            PriceColumn::High => self.high,
            PriceColumn::Low => self.low,
            PriceColumn::Close => self.close,
            PriceColumn::Volume => self.volume,
        }
    }

    /// True when every numeric field holds a finite number
    pub fn is_complete(&self) -> bool {
        PriceColumn::ALL.iter().all(|c| self.value(*c).is_finite())
    }
}

/// Numeric column of a price series selectable for charting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceColumn {
    Open,
    High,
    Low,
    #[default]
    Close,
    Volume,
}

impl PriceColumn {
    pub const ALL: [PriceColumn; 5] = [
        PriceColumn::Open,
        PriceColumn::High,
        PriceColumn::Low,
        PriceColumn::Close,
        PriceColumn::Volume,
    ];

    /// Parse from string
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "open" => Ok(PriceColumn::Open),
            "high" => Ok(PriceColumn::High),
            "low" => Ok(PriceColumn::Low),
            "close" => Ok(PriceColumn::Close),
            "volume" => Ok(PriceColumn::Volume),
            _ => Err(format!(
                "Invalid column: '{}'. Valid values: open, high, low, close, volume",
                s
            )),
        }
    }

    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PriceColumn::Open => "open",
            PriceColumn::High => "high",
            PriceColumn::Low => "low",
            PriceColumn::Close => "close",
            PriceColumn::Volume => "volume",
        }
    }

    /// Turkish column label used in chart titles and series names
    pub fn label(&self) -> &'static str {
        match self {
            PriceColumn::Open => "Açılış",
            PriceColumn::High => "Yüksek",
            PriceColumn::Low => "Düşük",
            PriceColumn::Close => "Kapanış",
            PriceColumn::Volume => "Hacim",
        }
    }
}

/// Keep only complete bars, sorted by date with duplicate dates removed
///
/// When a date appears more than once the last bar for it wins.
pub fn clean_series(bars: Vec<PriceBar>) -> Vec<PriceBar> {
    let mut bars: Vec<PriceBar> = bars.into_iter().filter(PriceBar::is_complete).collect();
    bars.sort_by(|a, b| a.date.cmp(&b.date));

    let mut cleaned: Vec<PriceBar> = Vec::with_capacity(bars.len());
    for bar in bars {
        match cleaned.last_mut() {
            Some(last) if last.date == bar.date => *last = bar,
            _ => cleaned.push(bar),
        }
    }
    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_column_from_str() {
        assert_eq!(PriceColumn::from_str("close").unwrap(), PriceColumn::Close);
        assert_eq!(PriceColumn::from_str("VOLUME").unwrap(), PriceColumn::Volume);
        assert!(PriceColumn::from_str("adj_close").is_err());
        assert_eq!(PriceColumn::default(), PriceColumn::Close);
    }

    #[test]
    fn test_clean_series_drops_incomplete_and_sorts() {
        let bars = vec![
            PriceBar::new(day(3), 1.0, 1.0, 1.0, 3.0, 10.0),
            PriceBar::new(day(1), 1.0, 1.0, 1.0, 1.0, 10.0),
            PriceBar::new(day(2), 1.0, f64::NAN, 1.0, 2.0, 10.0),
            PriceBar::new(day(4), 1.0, 1.0, 1.0, 4.0, 10.0),
            PriceBar::new(day(4), 1.0, 1.0, 1.0, 4.5, 10.0),
        ];

        let cleaned = clean_series(bars);
        let dates: Vec<_> = cleaned.iter().map(|b| b.date).collect();
        assert_eq!(dates, vec![day(1), day(3), day(4)]);
        assert_eq!(cleaned[2].close, 4.5);
    }

    #[test]
    fn test_price_bar_serialize_date() {
        let bar = PriceBar::new(day(5), 1.0, 2.0, 0.5, 1.5, 100.0);
        let json = serde_json::to_value(&bar).unwrap();
        assert_eq!(json["date"], "2024-01-05");
    }
}
