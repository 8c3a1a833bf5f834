pub mod frame;
pub mod indicators;
pub mod overlay;
pub mod regression;
pub mod stats;

pub use frame::{reindex, resolve_window, Column, PriceFrame};
pub use indicators::{calculate_rolling_std, calculate_sma, calculate_volatility_band, VolatilityBand};
pub use overlay::{build_chart, display_frame};
pub use regression::{extrapolate, forecast_dates, polyfit, Extrapolation, Polynomial};
pub use stats::{describe, summarize, ColumnSummary};
