//! Least-squares polynomial fitting and extrapolation.
//!
//! The abscissa is mapped onto [-1, 1] before building the Vandermonde
//! matrix, and the system is solved with Householder QR. High degrees
//! (up to 20) stay well-conditioned enough for trend drawing this way.

use crate::error::{AppError, Result};
use chrono::{Duration, NaiveDate};

/// Fitted polynomial in a scaled domain
#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial {
    /// Coefficients in ascending power order, for the scaled abscissa
    coefficients: Vec<f64>,
    x_offset: f64,
    x_scale: f64,
}

impl Polynomial {
    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }

    /// Evaluate at `x` in the original (unscaled) domain
    pub fn eval(&self, x: f64) -> f64 {
        let t = (x - self.x_offset) / self.x_scale;
        // Horner
        self.coefficients
            .iter()
            .rev()
            .fold(0.0, |acc, c| acc * t + c)
    }
}

/// Fit a polynomial of `degree` to the points (x, y) by least squares.
///
/// When there are fewer distinct points than coefficients the system is
/// rank deficient; coefficients that cannot be determined are set to zero.
pub fn polyfit(x: &[f64], y: &[f64], degree: usize) -> Result<Polynomial> {
    if x.len() != y.len() {
        return Err(AppError::InvalidInput(format!(
            "polyfit: x has {} points but y has {}",
            x.len(),
            y.len()
        )));
    }
    if x.is_empty() {
        return Err(AppError::InvalidInput("polyfit: no points to fit".to_string()));
    }
    if x.iter().chain(y).any(|v| !v.is_finite()) {
        return Err(AppError::InvalidInput("polyfit: non-finite input".to_string()));
    }

    let (min, max) = x
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(*v), hi.max(*v)));
    let x_offset = (max + min) / 2.0;
    let x_scale = if max > min { (max - min) / 2.0 } else { 1.0 };

    let cols = degree + 1;
    let mut a: Vec<Vec<f64>> = x
        .iter()
        .map(|xi| {
            let t = (xi - x_offset) / x_scale;
            let mut row = Vec::with_capacity(cols);
            let mut power = 1.0;
            for _ in 0..cols {
                row.push(power);
                power *= t;
            }
            row
        })
        .collect();
    let mut b = y.to_vec();

    let coefficients = solve_least_squares(&mut a, &mut b, cols);

    Ok(Polynomial {
        coefficients,
        x_offset,
        x_scale,
    })
}

/// Householder QR least squares; `a` and `b` are overwritten
fn solve_least_squares(a: &mut [Vec<f64>], b: &mut [f64], cols: usize) -> Vec<f64> {
    let rows = a.len();
    let steps = rows.min(cols);

    for k in 0..steps {
        let norm = (k..rows).map(|i| a[i][k] * a[i][k]).sum::<f64>().sqrt();
        if norm == 0.0 {
            continue;
        }
        let alpha = if a[k][k] > 0.0 { -norm } else { norm };

        let mut v: Vec<f64> = (k..rows).map(|i| a[i][k]).collect();
        v[0] -= alpha;
        let v_norm_sq: f64 = v.iter().map(|vi| vi * vi).sum();
        if v_norm_sq == 0.0 {
            continue;
        }

        for j in k..cols {
            let dot: f64 = (k..rows).map(|i| v[i - k] * a[i][j]).sum();
            let factor = 2.0 * dot / v_norm_sq;
            for i in k..rows {
                a[i][j] -= factor * v[i - k];
            }
        }

        let dot: f64 = (k..rows).map(|i| v[i - k] * b[i]).sum();
        let factor = 2.0 * dot / v_norm_sq;
        for i in k..rows {
            b[i] -= factor * v[i - k];
        }
    }

    let max_diag = (0..steps).map(|k| a[k][k].abs()).fold(0.0, f64::max);
    let tolerance = max_diag * 1e-12 * rows.max(cols) as f64;

    let mut coefficients = vec![0.0; cols];
    for k in (0..steps).rev() {
        if a[k][k].abs() <= tolerance {
            continue;
        }
        let tail: f64 = ((k + 1)..cols).map(|j| a[k][j] * coefficients[j]).sum();
        coefficients[k] = (b[k] - tail) / a[k][k];
    }

    coefficients
}

/// Polynomial trend over a series and its extension past the last point
#[derive(Debug, Clone, PartialEq)]
pub struct Extrapolation {
    /// Observed dates followed by `horizon` forecast dates
    pub dates: Vec<NaiveDate>,
    /// Fitted value for every entry of `dates`
    pub values: Vec<f64>,
}

/// Fit `values` against their index 0..n-1 and evaluate at 0..n-1+horizon.
///
/// Forecast dates are consecutive calendar days after the last observed
/// date.
pub fn extrapolate(
    dates: &[NaiveDate],
    values: &[f64],
    degree: usize,
    horizon: usize,
) -> Result<Extrapolation> {
    if dates.len() != values.len() {
        return Err(AppError::InvalidInput(format!(
            "extrapolate: {} dates but {} values",
            dates.len(),
            values.len()
        )));
    }
    let last_date = *dates
        .last()
        .ok_or_else(|| AppError::InvalidInput("extrapolate: empty series".to_string()))?;

    let x: Vec<f64> = (0..values.len()).map(|i| i as f64).collect();
    let polynomial = polyfit(&x, values, degree)?;

    let total = values.len() + horizon;
    let fitted = (0..total).map(|i| polynomial.eval(i as f64)).collect();

    let mut all_dates = dates.to_vec();
    all_dates.extend(forecast_dates(last_date, horizon));

    Ok(Extrapolation {
        dates: all_dates,
        values: fitted,
    })
}

/// `horizon` consecutive calendar days after `last`
pub fn forecast_dates(last: NaiveDate, horizon: usize) -> Vec<NaiveDate> {
    (1..=horizon as i64).map(|d| last + Duration::days(d)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dates(n: usize) -> Vec<NaiveDate> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        (0..n as i64).map(|d| start + Duration::days(d)).collect()
    }

    #[test]
    fn test_constant_series_degree_zero() {
        let values = vec![42.5; 25];
        for horizon in [1, 7, 90] {
            let result = extrapolate(&dates(25), &values, 0, horizon).unwrap();
            assert_eq!(result.values.len(), 25 + horizon);
            for v in &result.values[25..] {
                assert!((v - 42.5).abs() < 1e-9, "got {}", v);
            }
        }
    }

    #[test]
    fn test_linear_fit_is_exact() {
        let x: Vec<f64> = (0..50).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| 3.0 * v - 7.0).collect();
        let poly = polyfit(&x, &y, 1).unwrap();

        assert_eq!(poly.degree(), 1);
        assert!((poly.eval(0.0) + 7.0).abs() < 1e-8);
        assert!((poly.eval(60.0) - 173.0).abs() < 1e-8);
    }

    #[test]
    fn test_quadratic_fit_recovers_curve() {
        let x: Vec<f64> = (0..100).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| 0.01 * v * v - 0.5 * v + 12.0).collect();
        let poly = polyfit(&x, &y, 2).unwrap();
        for at in [0.0, 37.0, 99.0, 120.0] {
            let want = 0.01 * at * at - 0.5 * at + 12.0;
            assert!((poly.eval(at) - want).abs() < 1e-6);
        }
    }

    #[test]
    fn test_high_degree_stays_finite() {
        let x: Vec<f64> = (0..500).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| 50.0 + (v / 20.0).sin() * 3.0).collect();
        let poly = polyfit(&x, &y, 20).unwrap();
        assert!((0..590).all(|i| poly.eval(i as f64).is_finite()));
    }

    #[test]
    fn test_underdetermined_fit_does_not_fail() {
        let poly = polyfit(&[0.0, 1.0, 2.0], &[1.0, 2.0, 3.0], 5).unwrap();
        for (xi, yi) in [(0.0, 1.0), (1.0, 2.0), (2.0, 3.0)] {
            assert!((poly.eval(xi) - yi).abs() < 1e-8);
        }
    }

    #[test]
    fn test_single_point() {
        let poly = polyfit(&[0.0], &[9.0], 3).unwrap();
        assert!((poly.eval(0.0) - 9.0).abs() < 1e-12);
    }

    #[test]
    fn test_forecast_dates_follow_last_day() {
        let observed = dates(10);
        let result = extrapolate(&observed, &[1.0; 10], 1, 5).unwrap();
        let last = observed[9];

        assert_eq!(result.dates.len(), 15);
        assert_eq!(&result.dates[..10], observed.as_slice());
        for (i, date) in result.dates[10..].iter().enumerate() {
            assert_eq!(*date, last + Duration::days(i as i64 + 1));
        }
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(polyfit(&[], &[], 1).is_err());
        assert!(polyfit(&[1.0, 2.0], &[1.0], 1).is_err());
        assert!(polyfit(&[1.0, 2.0], &[1.0, f64::NAN], 1).is_err());
        assert!(extrapolate(&[], &[], 1, 3).is_err());
    }
}
