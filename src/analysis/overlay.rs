//! Chart pipeline: trailing display window, overlays and forecast.
//!
//! Moving averages and volatility bands are computed over the full history
//! and then reindexed by date onto the display window, so the first visible
//! values already account for bars outside the window. The polynomial trend
//! is fitted on the display window only and extends it by the forecast
//! horizon.

use crate::analysis::frame::{reindex, resolve_window, PriceFrame};
use crate::analysis::indicators::{calculate_sma, calculate_volatility_band};
use crate::analysis::regression::extrapolate;
use crate::constants::band;
use crate::error::{AppError, Result};
use crate::models::{
    clean_series, AnalysisModel, Candle, ChartRequest, ChartSpec, ChartType, PriceBar,
    Series, SeriesKind, SeriesStyle,
};
use tracing::debug;

/// Build the chart description for `symbol` from its full price history
pub fn build_chart(symbol: &str, bars: &[PriceBar], request: &ChartRequest) -> Result<ChartSpec> {
    request.validate().map_err(AppError::InvalidInput)?;

    let bars = clean_series(bars.to_vec());
    if bars.is_empty() {
        return Err(AppError::NotFound(format!("No price data for {}", symbol)));
    }

    let window = resolve_window(request.window, bars.len());
    let full = PriceFrame::from_bars(&bars);
    let display = full.trailing(window);

    debug!(
        symbol,
        available = bars.len(),
        window,
        chart = ?request.chart,
        model = ?request.model,
        "Building chart"
    );

    if request.chart == ChartType::Candlestick {
        let candles = bars[bars.len() - window..]
            .iter()
            .map(|b| Candle {
                date: b.date,
                open: b.open,
                high: b.high,
                low: b.low,
                close: b.close,
            })
            .collect();

        return Ok(ChartSpec {
            symbol: symbol.to_string(),
            title: format!("{} {}", symbol, ChartType::Candlestick.label()),
            chart: ChartType::Candlestick,
            window,
            dates: display.dates().to_vec(),
            series: Vec::new(),
            candles,
        });
    }

    let column = request.column;
    let price_series = Series {
        name: column.label().to_string(),
        kind: SeriesKind::Price,
        values: display.price_values(column).into_iter().map(Some).collect(),
        style: None,
    };

    let mut spec = ChartSpec {
        symbol: symbol.to_string(),
        title: format!("{} {} {}", symbol, column.label(), request.chart.label()),
        chart: request.chart,
        window,
        dates: display.dates().to_vec(),
        series: vec![price_series],
        candles: Vec::new(),
    };

    match request.model {
        None => {}
        Some(AnalysisModel::MovingAverage { first, second }) => {
            let prices = full.price_values(column);
            for (slot, period) in [(1, first), (2, second)] {
                let Some(period) = period else { continue };
                let sma = calculate_sma(&prices, period);
                spec.series.push(Series {
                    name: format!("{}. Yürüyen Ortalama {}", slot, period),
                    kind: SeriesKind::MovingAverage,
                    values: reindex(full.dates(), &sma, display.dates()),
                    style: None,
                });
            }
        }
        Some(AnalysisModel::VolatilityBand { first, second }) => {
            let prices = full.price_values(column);
            spec.series[0].style = Some(SeriesStyle::line(band::PRICE_LINE_COLOR));
            spec.series[0].name = symbol.to_string();

            for (slot, period, (color, fill)) in [(1, first, band::STYLE_1), (2, second, band::STYLE_2)] {
                let Some(period) = period else { continue };
                let bounds = calculate_volatility_band(&prices, period, band::WIDTH_STDDEV);

                let bound_style = |fill_to_previous: bool| SeriesStyle {
                    color: color.to_string(),
                    fill_color: fill_to_previous.then(|| fill.to_string()),
                    fill_to_previous,
                    line_width: Some(0.0),
                    show_legend: false,
                };

                spec.series.push(Series {
                    name: format!("{}. Yürüyen Standart Sapma Üst - {}", slot, period),
                    kind: SeriesKind::BandUpper,
                    values: reindex(full.dates(), &bounds.upper, display.dates()),
                    style: Some(bound_style(false)),
                });
                spec.series.push(Series {
                    name: format!("{}. Yürüyen Standart Sapma Alt - {}", slot, period),
                    kind: SeriesKind::BandLower,
                    values: reindex(full.dates(), &bounds.lower, display.dates()),
                    style: Some(bound_style(true)),
                });
            }
        }
        Some(AnalysisModel::PolynomialRegression { degree, horizon }) => {
            let values = display.price_values(column);
            let trend = extrapolate(display.dates(), &values, degree, horizon)?;

            // Observed series gets empty slots over the forecast horizon
            spec.series[0].values.extend(std::iter::repeat(None).take(horizon));
            spec.series.push(Series {
                name: format!("Polinom Regresyon ({}. derece)", degree),
                kind: SeriesKind::Forecast,
                values: trend.values.into_iter().map(Some).collect(),
                style: None,
            });
            spec.dates = trend.dates;
        }
    }

    Ok(spec)
}

/// Displayed frame behind the statistics and history views.
///
/// Line and area charts give the selected price column followed by one
/// column per overlay series, over the chart's own axis (forecast dates
/// included, where the price column is absent). Candlestick charts give
/// every OHLCV column of the window.
pub fn display_frame(symbol: &str, bars: &[PriceBar], request: &ChartRequest) -> Result<PriceFrame> {
    let spec = build_chart(symbol, bars, request)?;
    if spec.chart == ChartType::Candlestick {
        return Ok(PriceFrame::from_bars(&clean_series(bars.to_vec())).trailing(spec.window));
    }

    let mut frame = PriceFrame::with_dates(spec.dates);
    let mut series = spec.series.into_iter();
    if let Some(price) = series.next() {
        frame.push_column(request.column.as_str(), price.values);
    }
    for overlay in series {
        frame.push_column(overlay.name, overlay.values);
    }
    Ok(frame)
}
