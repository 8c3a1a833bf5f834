//! Rolling-window indicators over a single price column
//!
//! Every function returns one value per input point. Positions where the
//! trailing window is not yet full (`i < period - 1`) are `None`, and so is
//! any window containing a non-finite input.

/// Calculate Simple Moving Average for a given period
///
/// # Arguments
/// * `values` - Price column, oldest first
/// * `period` - Window length (e.g. 20, 100)
///
/// # Returns
/// * Vector of MA values; the first `period - 1` entries are `None`
pub fn calculate_sma(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut ma_values = vec![None; values.len()];

    if period == 0 || values.len() < period {
        return ma_values;
    }

    for i in (period - 1)..values.len() {
        let window = &values[i + 1 - period..=i];
        if window.iter().all(|v| v.is_finite()) {
            let sum: f64 = window.iter().sum();
            ma_values[i] = Some(sum / period as f64);
        }
    }

    ma_values
}

/// Calculate the rolling sample standard deviation (n - 1 denominator)
///
/// A window of one value has no sample deviation, so `period < 2`
/// yields all `None`.
pub fn calculate_rolling_std(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut std_values = vec![None; values.len()];

    if period < 2 || values.len() < period {
        return std_values;
    }

    for i in (period - 1)..values.len() {
        let window = &values[i + 1 - period..=i];
        if !window.iter().all(|v| v.is_finite()) {
            continue;
        }
        let mean = window.iter().sum::<f64>() / period as f64;
        let sum_sq: f64 = window.iter().map(|v| (v - mean).powi(2)).sum();
        std_values[i] = Some((sum_sq / (period - 1) as f64).sqrt());
    }

    std_values
}

/// Upper and lower bounds of a rolling volatility band
#[derive(Debug, Clone, PartialEq)]
pub struct VolatilityBand {
    pub upper: Vec<Option<f64>>,
    pub lower: Vec<Option<f64>>,
}

/// Calculate a volatility band centred on the price itself
///
/// upper = price + width * std, lower = price - width * std, where std is the
/// trailing sample standard deviation over `period` values.
pub fn calculate_volatility_band(values: &[f64], period: usize, width: f64) -> VolatilityBand {
    let std_values = calculate_rolling_std(values, period);

    let (upper, lower) = values
        .iter()
        .zip(std_values)
        .map(|(price, std)| match std {
            Some(std) => (Some(price + width * std), Some(price - width * std)),
            None => (None, None),
        })
        .unzip();

    VolatilityBand { upper, lower }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_calculate_sma() {
        let closes = vec![10.0, 12.0, 11.0, 13.0, 15.0, 14.0, 16.0];
        let ma3 = calculate_sma(&closes, 3);

        assert_eq!(ma3[0], None); // Not enough data
        assert_eq!(ma3[1], None); // Not enough data
        let expected = [11.0, 12.0, 13.0, 14.0, 15.0];
        for (value, want) in ma3[2..].iter().zip(expected) {
            assert!(approx(value.unwrap(), want));
        }
    }

    #[test]
    fn test_sma_equals_trailing_mean() {
        let values: Vec<f64> = (0..60).map(|i| ((i * 37) % 17) as f64 + 0.5 * i as f64).collect();
        for period in [5, 7, 20, 60] {
            let ma = calculate_sma(&values, period);
            for i in 0..values.len() {
                if i + 1 < period {
                    assert!(ma[i].is_none());
                } else {
                    let mean = values[i + 1 - period..=i].iter().sum::<f64>() / period as f64;
                    assert!(approx(ma[i].unwrap(), mean));
                }
            }
        }
    }

    #[test]
    fn test_sma_period_longer_than_series() {
        let ma = calculate_sma(&[1.0, 2.0], 5);
        assert_eq!(ma, vec![None, None]);
        assert_eq!(calculate_sma(&[1.0, 2.0], 0), vec![None, None]);
    }

    #[test]
    fn test_sma_skips_windows_with_nan() {
        let ma = calculate_sma(&[1.0, f64::NAN, 3.0, 4.0, 5.0], 2);
        assert_eq!(ma[1], None);
        assert_eq!(ma[2], None);
        assert!(approx(ma[3].unwrap(), 3.5));
    }

    #[test]
    fn test_rolling_std_sample() {
        // Sample std of [2, 4, 4, 4, 5, 5, 7, 9] is sqrt(32 / 7)
        let values = vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let std = calculate_rolling_std(&values, 8);
        assert!(std[..7].iter().all(Option::is_none));
        assert!(approx(std[7].unwrap(), (32.0_f64 / 7.0).sqrt()));

        assert!(calculate_rolling_std(&values, 1).iter().all(Option::is_none));
    }

    #[test]
    fn test_band_symmetric_around_price() {
        let values: Vec<f64> = (0..40).map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0).collect();
        let period = 7;
        let band = calculate_volatility_band(&values, period, 2.0);
        let std = calculate_rolling_std(&values, period);

        for i in 0..values.len() {
            match (band.upper[i], band.lower[i], std[i]) {
                (Some(upper), Some(lower), Some(s)) => {
                    assert!(approx(upper - values[i], 2.0 * s));
                    assert!(approx(values[i] - lower, 2.0 * s));
                }
                (None, None, None) => assert!(i + 1 < period),
                other => panic!("misaligned band at {}: {:?}", i, other),
            }
        }
    }

    #[test]
    fn test_band_constant_series_collapses() {
        let band = calculate_volatility_band(&[5.0; 10], 5, 2.0);
        assert_eq!(band.upper[9], Some(5.0));
        assert_eq!(band.lower[9], Some(5.0));
    }
}
