pub mod dashboard;
pub mod market_hours;
pub mod memo;
pub mod provider;
pub mod scraper;
pub mod translate;

pub use dashboard::{history_range, normalize_symbol, Dashboard};
pub use market_hours::{get_cache_max_age, is_trading_hours, TradingHours};
pub use memo::Memo;
pub use provider::{MarketDataProvider, ProviderClient};
pub use scraper::{ScrapeOutcome, Scraper};
pub use translate::Translator;
