use crate::constants::{band, regression, sma};
use crate::models::PriceColumn;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Chart kind offered by the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    #[default]
    Line,
    Area,
    Candlestick,
}

impl ChartType {
    /// Parse from string
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "line" => Ok(ChartType::Line),
            "area" => Ok(ChartType::Area),
            "candlestick" | "candle" => Ok(ChartType::Candlestick),
            _ => Err(format!(
                "Invalid chart type: '{}'. Valid values: line, area, candlestick",
                s
            )),
        }
    }

    /// Turkish label used in chart titles
    pub fn label(&self) -> &'static str {
        match self {
            ChartType::Line => "Çizgi Grafiği",
            ChartType::Area => "Alan Grafiği",
            ChartType::Candlestick => "Mum Grafiği",
        }
    }
}

/// Analysis model applied on top of a line chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum AnalysisModel {
    /// Up to two simple moving averages; `None` disables that overlay
    MovingAverage {
        first: Option<usize>,
        second: Option<usize>,
    },
    /// Up to two rolling volatility bands; `None` disables that band
    VolatilityBand {
        first: Option<usize>,
        second: Option<usize>,
    },
    /// Least-squares polynomial trend extended `horizon` days past the last bar
    PolynomialRegression { degree: usize, horizon: usize },
}

impl AnalysisModel {
    /// Moving averages with the dashboard defaults (first enabled, second disabled)
    pub fn default_moving_average() -> Self {
        AnalysisModel::MovingAverage {
            first: Some(sma::DEFAULT_WINDOW_1),
            second: None,
        }
    }

    /// Volatility bands with the dashboard defaults (first enabled, second disabled)
    pub fn default_volatility_band() -> Self {
        AnalysisModel::VolatilityBand {
            first: Some(band::DEFAULT_WINDOW_1),
            second: None,
        }
    }

    pub fn default_regression() -> Self {
        AnalysisModel::PolynomialRegression {
            degree: regression::DEFAULT_DEGREE,
            horizon: regression::DEFAULT_HORIZON,
        }
    }

    /// Check every parameter against its allowed range
    pub fn validate(&self) -> Result<(), String> {
        fn check(name: &str, value: usize, min: usize, max: usize) -> Result<(), String> {
            if value < min || value > max {
                Err(format!("{} must be between {} and {}, got {}", name, min, max, value))
            } else {
                Ok(())
            }
        }

        match *self {
            AnalysisModel::MovingAverage { first, second } => {
                if let Some(w) = first {
                    check("sma1_window", w, sma::MIN_WINDOW, sma::MAX_WINDOW)?;
                }
                if let Some(w) = second {
                    check("sma2_window", w, sma::MIN_WINDOW, sma::MAX_WINDOW)?;
                }
                Ok(())
            }
            AnalysisModel::VolatilityBand { first, second } => {
                if let Some(w) = first {
                    check("band1_window", w, band::MIN_WINDOW, band::MAX_WINDOW)?;
                }
                if let Some(w) = second {
                    check("band2_window", w, band::MIN_WINDOW, band::MAX_WINDOW)?;
                }
                Ok(())
            }
            AnalysisModel::PolynomialRegression { degree, horizon } => {
                check("degree", degree, regression::MIN_DEGREE, regression::MAX_DEGREE)?;
                check("horizon", horizon, regression::MIN_HORIZON, regression::MAX_HORIZON)
            }
        }
    }
}

/// Everything the chart section of the dashboard needs
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartRequest {
    /// Requested trailing window; `None` uses the default
    pub window: Option<usize>,
    pub chart: ChartType,
    pub column: PriceColumn,
    pub model: Option<AnalysisModel>,
}

impl ChartRequest {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(model) = &self.model {
            if self.chart != ChartType::Line {
                return Err(format!(
                    "Analysis models are only available for line charts, got {:?}",
                    self.chart
                ));
            }
            model.validate()?;
        }
        Ok(())
    }
}

/// Role of a series within a chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesKind {
    Price,
    MovingAverage,
    BandUpper,
    BandLower,
    Forecast,
}

/// Visual hints for a series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesStyle {
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<String>,
    /// Fill the area between this series and the previous one
    pub fill_to_previous: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_width: Option<f64>,
    pub show_legend: bool,
}

impl SeriesStyle {
    pub fn line(color: &str) -> Self {
        Self {
            color: color.to_string(),
            fill_color: None,
            fill_to_previous: false,
            line_width: None,
            show_legend: true,
        }
    }
}

/// One plotted series, aligned value-for-value with `ChartSpec::dates`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub kind: SeriesKind,
    pub values: Vec<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<SeriesStyle>,
}

/// OHLC candle for candlestick charts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candle {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// Renderable chart description
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub symbol: String,
    pub title: String,
    pub chart: ChartType,
    /// Number of observed bars shown
    pub window: usize,
    /// X axis: displayed dates followed by forecast dates, if any
    pub dates: Vec<NaiveDate>,
    pub series: Vec<Series>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub candles: Vec<Candle>,
}
