use crate::analysis::frame::PriceFrame;
use serde::Serialize;

/// Descriptive statistics for one column, absent values ignored
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub column: String,
    pub count: usize,
    pub mean: Option<f64>,
    /// Sample standard deviation (n - 1)
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub p25: Option<f64>,
    pub p50: Option<f64>,
    pub p75: Option<f64>,
    pub max: Option<f64>,
}

/// Summarise every column of the frame
pub fn describe(frame: &PriceFrame) -> Vec<ColumnSummary> {
    frame
        .columns()
        .iter()
        .map(|c| summarize(&c.name, &c.values))
        .collect()
}

pub fn summarize(name: &str, values: &[Option<f64>]) -> ColumnSummary {
    let mut present: Vec<f64> = values
        .iter()
        .flatten()
        .copied()
        .filter(|v| v.is_finite())
        .collect();
    present.sort_by(|a, b| a.total_cmp(b));

    let count = present.len();
    let mean = (count > 0).then(|| present.iter().sum::<f64>() / count as f64);
    let std = mean.filter(|_| count > 1).map(|m| {
        let sum_sq: f64 = present.iter().map(|v| (v - m).powi(2)).sum();
        (sum_sq / (count - 1) as f64).sqrt()
    });

    ColumnSummary {
        column: name.to_string(),
        count,
        mean,
        std,
        min: present.first().copied(),
        p25: quantile(&present, 0.25),
        p50: quantile(&present, 0.50),
        p75: quantile(&present, 0.75),
        max: present.last().copied(),
    }
}

/// Linear-interpolated quantile of sorted values
fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let weight = pos - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * weight)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_basic() {
        let values: Vec<Option<f64>> = [1.0, 2.0, 3.0, 4.0].iter().map(|v| Some(*v)).collect();
        let s = summarize("close", &values);

        assert_eq!(s.count, 4);
        assert_eq!(s.mean, Some(2.5));
        assert!((s.std.unwrap() - (5.0_f64 / 3.0).sqrt()).abs() < 1e-12);
        assert_eq!(s.min, Some(1.0));
        assert_eq!(s.p25, Some(1.75));
        assert_eq!(s.p50, Some(2.5));
        assert_eq!(s.p75, Some(3.25));
        assert_eq!(s.max, Some(4.0));
    }

    #[test]
    fn test_summarize_ignores_absent() {
        let s = summarize("sma", &[None, None, Some(5.0)]);
        assert_eq!(s.count, 1);
        assert_eq!(s.mean, Some(5.0));
        assert_eq!(s.std, None);
        assert_eq!(s.p75, Some(5.0));

        let empty = summarize("sma", &[None]);
        assert_eq!(empty.count, 0);
        assert_eq!(empty.mean, None);
        assert_eq!(empty.min, None);
    }
}
