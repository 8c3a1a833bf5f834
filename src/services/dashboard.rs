//! Dashboard service: every data lookup the UI needs, memoized for the
//! lifetime of the process, plus the chart and statistics pipelines.

use crate::analysis::{build_chart, describe, display_frame, ColumnSummary, PriceFrame};
use crate::constants::{HISTORY_LOOKBACK_DAYS, PROFILE_NOT_FOUND};
use crate::error::{AppError, Result};
use crate::models::{
    clean_series, ChartRequest, ChartSpec, Company, CompanyInformation, CompanyList,
    CompanyProfile, Dividend, FinancialRatios, FinancialStatement, NewsItem, PriceBar,
    StatementPeriod, StatementType, TechnicalIndicator, TechnicalInterval,
};
use crate::services::memo::Memo;
use crate::services::provider::MarketDataProvider;
use crate::services::scraper::{ScrapeOutcome, Scraper};
use crate::services::translate::Translator;
use chrono::{Duration, NaiveDate, Utc};
use std::sync::Arc;
use tracing::{info, instrument, warn};

type StatementKey = (String, StatementType, StatementPeriod);

/// Normalise a user-supplied ticker ("akbnk " -> "AKBNK")
pub fn normalize_symbol(symbol: &str) -> Result<String> {
    let symbol = symbol.trim().to_uppercase();
    if symbol.is_empty() || !symbol.chars().all(|c| c.is_ascii_alphanumeric() || c == '.') {
        return Err(AppError::InvalidInput(format!("Invalid symbol: '{}'", symbol)));
    }
    Ok(symbol)
}

/// Date range requested for a symbol's history, ending `today`
pub fn history_range(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    (today - Duration::days(HISTORY_LOOKBACK_DAYS), today)
}

pub struct Dashboard<P> {
    provider: P,
    scraper: Scraper,
    translator: Translator,

    companies: Memo<(), CompanyList>,
    history: Memo<String, Vec<PriceBar>>,
    profiles: Memo<String, String>,
    translations: Memo<String, String>,
    information: Memo<String, Vec<(String, String)>>,
    technical: Memo<(String, TechnicalInterval), Vec<TechnicalIndicator>>,
    statements: Memo<StatementKey, FinancialStatement>,
    dividends: Memo<String, Vec<Dividend>>,
    ratios: Memo<String, FinancialRatios>,
    news: Memo<String, Vec<NewsItem>>,
    logos: Memo<String, String>,
}

impl<P: MarketDataProvider> Dashboard<P> {
    pub fn new(provider: P) -> Result<Self> {
        Ok(Self::with_clients(provider, Scraper::new()?, Translator::new()?))
    }

    pub fn with_clients(provider: P, scraper: Scraper, translator: Translator) -> Self {
        Self {
            provider,
            scraper,
            translator,
            companies: Memo::new("companies"),
            history: Memo::new("history"),
            profiles: Memo::new("profiles"),
            translations: Memo::new("translations"),
            information: Memo::new("information"),
            technical: Memo::new("technical"),
            statements: Memo::new("statements"),
            dividends: Memo::new("dividends"),
            ratios: Memo::new("ratios"),
            news: Memo::new("news"),
            logos: Memo::new("logos"),
        }
    }

    /// Entry counts of every cache, for the health endpoint
    pub async fn cache_sizes(&self) -> Vec<(&'static str, usize)> {
        vec![
            (self.companies.name(), self.companies.len().await),
            (self.history.name(), self.history.len().await),
            (self.profiles.name(), self.profiles.len().await),
            (self.translations.name(), self.translations.len().await),
            (self.information.name(), self.information.len().await),
            (self.technical.name(), self.technical.len().await),
            (self.statements.name(), self.statements.len().await),
            (self.dividends.name(), self.dividends.len().await),
            (self.ratios.name(), self.ratios.len().await),
            (self.news.name(), self.news.len().await),
            (self.logos.name(), self.logos.len().await),
        ]
    }

    pub async fn companies(&self) -> Result<Arc<CompanyList>> {
        self.companies
            .get_or_try_insert_with((), || async {
                let list = CompanyList::new(self.provider.companies().await?);
                info!(count = list.len(), "Company list cached");
                Ok(list)
            })
            .await
    }

    pub async fn company(&self, symbol: &str) -> Result<Company> {
        let symbol = normalize_symbol(symbol)?;
        self.companies()
            .await?
            .get(&symbol)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Unknown company: {}", symbol)))
    }

    /// Cleaned daily history covering the lookback period
    #[instrument(skip(self))]
    pub async fn history(&self, symbol: &str) -> Result<Arc<Vec<PriceBar>>> {
        let symbol = normalize_symbol(symbol)?;
        self.history
            .get_or_try_insert_with(symbol.clone(), || async {
                let today = Utc::now().with_timezone(&chrono_tz::Europe::Istanbul).date_naive();
                let (from, to) = history_range(today);
                let raw = self.provider.history(&symbol, from, to).await?;
                let fetched = raw.len();
                let bars = clean_series(raw);
                info!(symbol = %symbol, fetched, kept = bars.len(), "History cached");
                Ok(bars)
            })
            .await
    }

    /// Company description, translated when asked; failures give the
    /// placeholder text with `fallback` set
    pub async fn profile(&self, symbol: &str, translate: bool) -> Result<CompanyProfile> {
        let symbol = normalize_symbol(symbol)?;
        let description = self
            .profiles
            .get_or_try_insert_with(symbol.clone(), || self.provider.profile(&symbol))
            .await;

        let description = match description {
            Ok(description) => description,
            Err(e) => {
                warn!(symbol = %symbol, error = %e, "Profile lookup failed");
                return Ok(CompanyProfile {
                    symbol,
                    description: PROFILE_NOT_FOUND.to_string(),
                    translated: None,
                    fallback: true,
                });
            }
        };

        let translated = if translate {
            match self
                .translations
                .get_or_try_insert_with(symbol.clone(), || self.translator.translate(&description))
                .await
            {
                Ok(text) => Some(text.as_ref().clone()),
                Err(e) => {
                    warn!(symbol = %symbol, error = %e, "Translation failed");
                    None
                }
            }
        } else {
            None
        };

        Ok(CompanyProfile {
            symbol,
            description: description.as_ref().clone(),
            translated,
            fallback: false,
        })
    }

    pub async fn information(&self, symbol: &str) -> Result<CompanyInformation> {
        let symbol = normalize_symbol(symbol)?;
        let fields = self
            .information
            .get_or_try_insert_with(symbol.clone(), || self.provider.information(&symbol))
            .await?;
        Ok(CompanyInformation {
            symbol,
            fields: fields.as_ref().clone(),
        })
    }

    pub async fn technical(
        &self,
        symbol: &str,
        interval: TechnicalInterval,
    ) -> Result<Arc<Vec<TechnicalIndicator>>> {
        let symbol = normalize_symbol(symbol)?;
        self.technical
            .get_or_try_insert_with((symbol.clone(), interval), || {
                self.provider.technical(&symbol, interval)
            })
            .await
    }

    pub async fn financials(
        &self,
        symbol: &str,
        statement: StatementType,
        period: StatementPeriod,
    ) -> Result<Arc<FinancialStatement>> {
        let symbol = normalize_symbol(symbol)?;
        self.statements
            .get_or_try_insert_with((symbol.clone(), statement, period), || async {
                let rows = self.provider.financial_summary(&symbol, statement, period).await?;
                Ok(FinancialStatement {
                    symbol: symbol.clone(),
                    statement,
                    period,
                    rows,
                })
            })
            .await
    }

    pub async fn dividends(&self, symbol: &str) -> Result<Arc<Vec<Dividend>>> {
        let symbol = normalize_symbol(symbol)?;
        self.dividends
            .get_or_try_insert_with(symbol.clone(), || self.provider.dividends(&symbol))
            .await
    }

    pub async fn ratios(&self, symbol: &str) -> Result<ScrapeOutcome<Arc<FinancialRatios>>> {
        let symbol = normalize_symbol(symbol)?;
        let result = self
            .ratios
            .get_or_try_insert_with(symbol.clone(), || async {
                self.scraper.financial_ratios(&symbol).await.into_result()
            })
            .await;
        Ok(result.into())
    }

    pub async fn news(&self, symbol: &str) -> Result<ScrapeOutcome<Arc<Vec<NewsItem>>>> {
        let symbol = normalize_symbol(symbol)?;
        let result = self
            .news
            .get_or_try_insert_with(symbol.clone(), || async {
                self.scraper.latest_news(&symbol).await.into_result()
            })
            .await;
        Ok(result.into())
    }

    pub async fn logo(&self, symbol: &str) -> Result<ScrapeOutcome<Arc<String>>> {
        let symbol = normalize_symbol(symbol)?;
        let result = self
            .logos
            .get_or_try_insert_with(symbol.clone(), || async {
                self.scraper.logo_url(&symbol).await.into_result()
            })
            .await;
        Ok(result.into())
    }

    /// Chart description for the trailing window with the requested overlay
    #[instrument(skip(self))]
    pub async fn chart(&self, symbol: &str, request: &ChartRequest) -> Result<ChartSpec> {
        request.validate().map_err(AppError::InvalidInput)?;
        let bars = self.history(symbol).await?;
        build_chart(&normalize_symbol(symbol)?, &bars, request)
    }

    /// Displayed frame for the chart `request` describes: its price column
    /// and overlay columns, or every OHLCV column for candlestick charts
    #[instrument(skip(self))]
    pub async fn display_frame(&self, symbol: &str, request: &ChartRequest) -> Result<PriceFrame> {
        request.validate().map_err(AppError::InvalidInput)?;
        let bars = self.history(symbol).await?;
        display_frame(&normalize_symbol(symbol)?, &bars, request)
    }

    pub async fn stats(&self, symbol: &str, request: &ChartRequest) -> Result<Vec<ColumnSummary>> {
        Ok(describe(&self.display_frame(symbol, request).await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnalysisModel, ChartType};
    use crate::test_support::StubProvider;
    use std::sync::atomic::Ordering;

    fn dashboard(provider: StubProvider) -> Dashboard<StubProvider> {
        Dashboard::new(provider).unwrap()
    }

    #[test]
    fn test_normalize_symbol() {
        assert_eq!(normalize_symbol(" akbnk ").unwrap(), "AKBNK");
        assert!(normalize_symbol("").is_err());
        assert!(normalize_symbol("../etc").is_err());
    }

    #[test]
    fn test_history_range_covers_lookback() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let (from, to) = history_range(today);
        assert_eq!(to, today);
        assert_eq!((to - from).num_days(), HISTORY_LOOKBACK_DAYS);
    }

    #[tokio::test]
    async fn test_history_is_memoized() {
        let provider = StubProvider::with_bars(120);
        let calls = provider.history_calls.clone();
        let dashboard = dashboard(provider);

        let first = dashboard.history("akbnk").await.unwrap();
        let second = dashboard.history("AKBNK").await.unwrap();

        assert_eq!(first.len(), 120);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_company_lookup() {
        let dashboard = dashboard(StubProvider::with_bars(10));
        let company = dashboard.company("garan").await.unwrap();
        assert_eq!(company.label(), "GARAN - Garanti BBVA");
        assert!(matches!(dashboard.company("XXXX").await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_profile_fallback() {
        let dashboard = dashboard(StubProvider::with_bars(10));

        let profile = dashboard.profile("AKBNK", false).await.unwrap();
        assert!(!profile.fallback);
        assert!(profile.description.starts_with("Akbank"));

        let missing = dashboard.profile("GARAN", false).await.unwrap();
        assert!(missing.fallback);
        assert_eq!(missing.description, PROFILE_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_failed_fetch_not_cached() {
        let dashboard = dashboard(StubProvider::with_bars(10));
        let _ = dashboard.profile("GARAN", false).await.unwrap();
        let sizes = dashboard.cache_sizes().await;
        let profiles = sizes.iter().find(|(name, _)| *name == "profiles").unwrap();
        assert_eq!(profiles.1, 0);
    }

    #[tokio::test]
    async fn test_dividend_and_statement_lookups() {
        let dashboard = dashboard(StubProvider::with_bars(10));

        let dividends = dashboard.dividends("AKBNK").await.unwrap();
        assert_eq!(dividends[0].type_code, "QD");

        let statement = dashboard
            .financials("AKBNK", StatementType::BalanceSheet, StatementPeriod::Quarterly)
            .await
            .unwrap();
        assert_eq!(statement.statement, StatementType::BalanceSheet);
        assert_eq!(statement.rows.len(), 1);
    }

    #[tokio::test]
    async fn test_chart_validates_before_fetching() {
        let provider = StubProvider::with_bars(300);
        let calls = provider.history_calls.clone();
        let dashboard = dashboard(provider);

        let request = ChartRequest {
            model: Some(AnalysisModel::PolynomialRegression { degree: 25, horizon: 10 }),
            ..ChartRequest::default()
        };
        assert!(matches!(
            dashboard.chart("AKBNK", &request).await,
            Err(AppError::InvalidInput(_))
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let request = ChartRequest {
            window: Some(100),
            chart: ChartType::Line,
            model: Some(AnalysisModel::default_moving_average()),
            ..ChartRequest::default()
        };
        let spec = dashboard.chart("AKBNK", &request).await.unwrap();
        assert_eq!(spec.dates.len(), 100);
        assert_eq!(spec.series.len(), 2);
    }

    #[tokio::test]
    async fn test_stats_over_display_window() {
        let dashboard = dashboard(StubProvider::with_bars(200));
        let request = ChartRequest {
            window: Some(50),
            ..ChartRequest::default()
        };
        let stats = dashboard.stats("AKBNK", &request).await.unwrap();
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].column, "close");
        assert_eq!(stats[0].count, 50);

        let request = ChartRequest {
            chart: ChartType::Candlestick,
            ..ChartRequest::default()
        };
        let all = dashboard.stats("AKBNK", &request).await.unwrap();
        assert_eq!(all.len(), 5);
    }

    #[tokio::test]
    async fn test_stats_describe_overlay_columns() {
        let dashboard = dashboard(StubProvider::with_bars(200));
        let request = ChartRequest {
            window: Some(50),
            model: Some(AnalysisModel::PolynomialRegression { degree: 2, horizon: 10 }),
            ..ChartRequest::default()
        };
        let stats = dashboard.stats("AKBNK", &request).await.unwrap();
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].count, 50);
        assert_eq!(stats[1].column, "Polinom Regresyon (2. derece)");
        assert_eq!(stats[1].count, 60);
    }

    #[tokio::test]
    async fn test_empty_history_is_not_found() {
        let dashboard = dashboard(StubProvider::with_bars(0));
        assert!(matches!(
            dashboard.display_frame("AKBNK", &ChartRequest::default()).await,
            Err(AppError::NotFound(_))
        ));
    }
}
