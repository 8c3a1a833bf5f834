//! Dashboard Constants
//!
//! Control ranges and defaults for the chart options, plus the fixed
//! endpoints and fallbacks used by the data acquisition layer.
//!
//! ## Control Ranges
//!
//! Every range is inclusive. Requests outside a range are rejected with
//! `AppError::InvalidInput` before any computation happens, except the
//! trailing window which is clamped to the available history.

/// Market country passed to the reference data provider
pub const MARKET_COUNTRY: &str = "turkey";

/// Calendar days of history requested for every symbol
pub const HISTORY_LOOKBACK_DAYS: i64 = 2000;

/// Trailing display window (number of bars shown)
pub mod window {
    pub const MIN: usize = 30;
    pub const MAX: usize = 2000;
    pub const DEFAULT: usize = 500;
    pub const STEP: usize = 10;
}

/// Simple moving average overlay
pub mod sma {
    pub const MIN_WINDOW: usize = 5;
    pub const MAX_WINDOW: usize = 500;
    pub const DEFAULT_WINDOW_1: usize = 20;
    pub const DEFAULT_WINDOW_2: usize = 100;
}

/// Rolling volatility band overlay
pub mod band {
    pub const MIN_WINDOW: usize = 5;
    pub const MAX_WINDOW: usize = 90;
    pub const DEFAULT_WINDOW_1: usize = 7;
    pub const DEFAULT_WINDOW_2: usize = 28;

    /// Number of standard deviations between center and each bound
    pub const WIDTH_STDDEV: f64 = 2.0;

    /// Marker colour and fill for the first band
    pub const STYLE_1: (&str, &str) = ("#633", "rgba(90, 40, 40, 0.3)");
    /// Marker colour and fill for the second band
    pub const STYLE_2: (&str, &str) = ("#a88", "rgba(170, 100, 100, 0.15)");

    /// Line colour for the price series drawn under the bands
    pub const PRICE_LINE_COLOR: &str = "rgb(31, 119, 180)";
}

/// Polynomial trend extrapolation
pub mod regression {
    pub const MIN_DEGREE: usize = 0;
    pub const MAX_DEGREE: usize = 20;
    pub const DEFAULT_DEGREE: usize = 5;
    pub const MIN_HORIZON: usize = 1;
    pub const MAX_HORIZON: usize = 90;
    pub const DEFAULT_HORIZON: usize = 30;
}

/// Number of news items returned per symbol
pub const NEWS_LIMIT: usize = 10;

/// Company registry used for logo lookup
pub const KAP_BASE_URL: &str = "https://www.kap.org.tr";
pub const KAP_COMPANY_LIST_PATH: &str = "/tr/bist-sirketler";

/// Finance news site used for ratios and news
pub const UZMANPARA_BASE_URL: &str = "https://uzmanpara.milliyet.com.tr";

/// Logo shown when the registry lookup fails
pub const FALLBACK_LOGO_URL: &str =
    "https://www.designfreelogoonline.com/wp-content/uploads/2014/12/00240-Design-Free-3D-Company-Logo-Templates-03.png";

/// Messages shown in place of data that could not be fetched
pub const PROFILE_NOT_FOUND: &str = "Cannot Find Summary";
pub const NEWS_NOT_FOUND: &str = "Haber Bulunamadı";
pub const RATIOS_NOT_FOUND: &str = "Oran bulunamadı";

/// Translation endpoint (Google translate public client)
pub const TRANSLATE_URL: &str = "https://translate.googleapis.com/translate_a/single";
pub const TRANSLATE_SOURCE_LANG: &str = "en";
pub const TRANSLATE_TARGET_LANG: &str = "tr";

/// HTTP client timeout for every outbound request
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// Desktop browser user agents rotated by the scrapers
pub const USER_AGENTS: [&str; 4] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:120.0) Gecko/20100101 Firefox/120.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.3 Safari/605.1.15",
];
