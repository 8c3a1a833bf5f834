//! Reference data provider: company listing, price history and
//! fundamentals served as JSON over HTTP.

use crate::constants::{HTTP_TIMEOUT_SECS, MARKET_COUNTRY};
use crate::error::{AppError, Result};
use crate::models::{
    Company, Dividend, LineItem, PriceBar, StatementPeriod, StatementPeriodRow, StatementType,
    TechnicalIndicator, TechnicalInterval,
};
use crate::utils::{format_provider_date, initials};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

/// Source of market reference data for one country's listings
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Every listed company
    async fn companies(&self) -> Result<Vec<Company>>;

    /// Daily OHLCV bars for `symbol` between `from` and `to` inclusive, ascending
    async fn history(&self, symbol: &str, from: NaiveDate, to: NaiveDate) -> Result<Vec<PriceBar>>;

    /// English business description
    async fn profile(&self, symbol: &str) -> Result<String>;

    /// Ordered market information table
    async fn information(&self, symbol: &str) -> Result<Vec<(String, String)>>;

    async fn technical(
        &self,
        symbol: &str,
        interval: TechnicalInterval,
    ) -> Result<Vec<TechnicalIndicator>>;

    async fn financial_summary(
        &self,
        symbol: &str,
        statement: StatementType,
        period: StatementPeriod,
    ) -> Result<Vec<StatementPeriodRow>>;

    async fn dividends(&self, symbol: &str) -> Result<Vec<Dividend>>;
}

#[async_trait]
impl<T: MarketDataProvider + ?Sized> MarketDataProvider for Arc<T> {
    async fn companies(&self) -> Result<Vec<Company>> {
        (**self).companies().await
    }

    async fn history(&self, symbol: &str, from: NaiveDate, to: NaiveDate) -> Result<Vec<PriceBar>> {
        (**self).history(symbol, from, to).await
    }

    async fn profile(&self, symbol: &str) -> Result<String> {
        (**self).profile(symbol).await
    }

    async fn information(&self, symbol: &str) -> Result<Vec<(String, String)>> {
        (**self).information(symbol).await
    }

    async fn technical(
        &self,
        symbol: &str,
        interval: TechnicalInterval,
    ) -> Result<Vec<TechnicalIndicator>> {
        (**self).technical(symbol, interval).await
    }

    async fn financial_summary(
        &self,
        symbol: &str,
        statement: StatementType,
        period: StatementPeriod,
    ) -> Result<Vec<StatementPeriodRow>> {
        (**self).financial_summary(symbol, statement, period).await
    }

    async fn dividends(&self, symbol: &str) -> Result<Vec<Dividend>> {
        (**self).dividends(symbol).await
    }
}

#[derive(Debug, Deserialize)]
struct CompanyRecord {
    #[serde(default)]
    country: String,
    name: String,
    full_name: String,
    #[serde(default)]
    isin: String,
    #[serde(default)]
    currency: String,
    symbol: String,
}

impl From<CompanyRecord> for Company {
    fn from(record: CompanyRecord) -> Self {
        Company {
            symbol: record.symbol,
            short_name: record.name,
            full_name: record.full_name,
            isin: record.isin,
            currency: record.currency,
            country: record.country,
        }
    }
}

/// Price row as sent by the provider; gaps arrive as null
#[derive(Debug, Deserialize)]
struct HistoryRecord {
    date: String,
    open: Option<f64>,
    high: Option<f64>,
    low: Option<f64>,
    close: Option<f64>,
    volume: Option<f64>,
    #[serde(default)]
    currency: String,
}

#[derive(Debug, Deserialize)]
struct ProfileRecord {
    desc: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SummaryRecord {
    date: String,
    /// Keeps the provider's line item order
    items: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct DividendRecord {
    payment_date: String,
    dividend: f64,
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(rename = "yield")]
    dividend_yield: Option<f64>,
}

/// Parse provider dates, which arrive either ISO formatted or as dd/mm/yyyy
fn parse_provider_date(text: &str) -> Result<NaiveDate> {
    let text = text.trim();
    let head = text.get(..10).unwrap_or(text);
    NaiveDate::parse_from_str(head, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(head, "%d/%m/%Y"))
        .map_err(|e| AppError::Parse(format!("Invalid provider date '{}': {}", text, e)))
}

fn into_bar(record: HistoryRecord) -> Result<PriceBar> {
    let nan = f64::NAN;
    Ok(PriceBar {
        date: parse_provider_date(&record.date)?,
        open: record.open.unwrap_or(nan),
        high: record.high.unwrap_or(nan),
        low: record.low.unwrap_or(nan),
        close: record.close.unwrap_or(nan),
        volume: record.volume.unwrap_or(nan),
        currency: record.currency,
    })
}

fn into_statement_row(record: SummaryRecord) -> Result<StatementPeriodRow> {
    let items = record
        .items
        .into_iter()
        .map(|(name, value)| -> Result<LineItem> {
            let value = match value {
                serde_json::Value::Null => None,
                other => Some(other.as_f64().ok_or_else(|| {
                    AppError::Parse(format!("Line item '{}' is not a number: {}", name, other))
                })?),
            };
            Ok(LineItem { name, value })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(StatementPeriodRow {
        date: parse_provider_date(&record.date)?,
        items,
    })
}

fn into_dividend(record: DividendRecord) -> Result<Dividend> {
    Ok(Dividend {
        payment_date: parse_provider_date(&record.payment_date)?,
        amount: record.dividend,
        type_code: initials(&record.kind),
        dividend_yield: record.dividend_yield,
    })
}

/// Render a JSON scalar the way the information table shows it
fn display_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => "-".to_string(),
        other => other.to_string(),
    }
}

/// HTTP client for the reference data provider
pub struct ProviderClient {
    base_url: String,
    country: String,
    client: reqwest::Client,
}

impl ProviderClient {
    /// Create a new provider client
    ///
    /// # Arguments
    /// * `base_url` - Provider root (e.g., "http://localhost:8000")
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();

        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(AppError::Config(format!(
                "Invalid provider url: must start with http:// or https://, got: '{}'",
                base_url
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::Network(format!("Failed to create HTTP client: {}", e)))?;

        info!("Created ProviderClient: base_url='{}'", base_url);

        Ok(Self {
            base_url,
            country: MARKET_COUNTRY.to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `path` with `query` and decode the JSON body
    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, ?query, "Provider request");

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                let msg = format!("Provider request failed: {} (url: {})", e, url);
                error!("{}", msg);
                AppError::Network(msg)
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!("Provider has no data at {}", path)));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let msg = format!("Provider returned {} for {}: {}", status, path, body);
            error!("{}", msg);
            return Err(AppError::Provider(msg));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| AppError::Parse(format!("Invalid provider response for {}: {}", path, e)))
    }
}

#[async_trait]
impl MarketDataProvider for ProviderClient {
    async fn companies(&self) -> Result<Vec<Company>> {
        let records: Vec<CompanyRecord> = self
            .get_json("/stocks", &[("country", self.country.as_str())])
            .await?;
        info!(count = records.len(), "Loaded company list");
        Ok(records.into_iter().map(Company::from).collect())
    }

    async fn history(&self, symbol: &str, from: NaiveDate, to: NaiveDate) -> Result<Vec<PriceBar>> {
        let from = format_provider_date(&from);
        let to = format_provider_date(&to);
        let records: Vec<HistoryRecord> = self
            .get_json(
                &format!("/stocks/{}/historical", symbol),
                &[
                    ("country", self.country.as_str()),
                    ("from_date", from.as_str()),
                    ("to_date", to.as_str()),
                    ("order", "ascending"),
                ],
            )
            .await?;
        debug!(symbol, bars = records.len(), "Fetched price history");
        records.into_iter().map(into_bar).collect()
    }

    async fn profile(&self, symbol: &str) -> Result<String> {
        let record: ProfileRecord = self
            .get_json(&format!("/stocks/{}/profile", symbol), &[("country", self.country.as_str())])
            .await?;
        record
            .desc
            .filter(|d| !d.trim().is_empty())
            .ok_or_else(|| AppError::NotFound(format!("No profile for {}", symbol)))
    }

    async fn information(&self, symbol: &str) -> Result<Vec<(String, String)>> {
        let fields: serde_json::Map<String, serde_json::Value> = self
            .get_json(&format!("/stocks/{}/information", symbol), &[("country", self.country.as_str())])
            .await?;
        Ok(fields
            .iter()
            .map(|(field, value)| (field.clone(), display_value(value)))
            .collect())
    }

    async fn technical(
        &self,
        symbol: &str,
        interval: TechnicalInterval,
    ) -> Result<Vec<TechnicalIndicator>> {
        self.get_json(
            &format!("/stocks/{}/technical", symbol),
            &[
                ("country", self.country.as_str()),
                ("product_type", "stock"),
                ("interval", interval.as_str()),
            ],
        )
        .await
    }

    async fn financial_summary(
        &self,
        symbol: &str,
        statement: StatementType,
        period: StatementPeriod,
    ) -> Result<Vec<StatementPeriodRow>> {
        let records: Vec<SummaryRecord> = self
            .get_json(
                &format!("/stocks/{}/financial-summary", symbol),
                &[
                    ("country", self.country.as_str()),
                    ("summary_type", statement.as_str()),
                    ("period", period.as_str()),
                ],
            )
            .await?;
        records.into_iter().map(into_statement_row).collect()
    }

    async fn dividends(&self, symbol: &str) -> Result<Vec<Dividend>> {
        let records: Vec<DividendRecord> = self
            .get_json(&format!("/stocks/{}/dividends", symbol), &[("country", self.country.as_str())])
            .await?;
        records.into_iter().map(into_dividend).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_bad_url() {
        assert!(ProviderClient::new("localhost:8000").is_err());
        let client = ProviderClient::new("http://localhost:8000/ ").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
    }

    #[test]
    fn test_parse_provider_date_formats() {
        let want = NaiveDate::from_ymd_opt(2023, 4, 7).unwrap();
        assert_eq!(parse_provider_date("2023-04-07").unwrap(), want);
        assert_eq!(parse_provider_date("07/04/2023").unwrap(), want);
        assert_eq!(parse_provider_date("2023-04-07T00:00:00").unwrap(), want);
        assert!(parse_provider_date("April 7").is_err());
    }

    #[test]
    fn test_history_record_with_gap_is_incomplete() {
        let record: HistoryRecord = serde_json::from_str(
            r#"{"date": "2023-04-07", "open": 10.0, "high": null, "low": 9.5, "close": 10.2, "volume": 1200, "currency": "TRY"}"#,
        )
        .unwrap();
        let bar = into_bar(record).unwrap();
        assert!(!bar.is_complete());
        assert_eq!(bar.currency, "TRY");
    }

    #[test]
    fn test_dividend_type_code() {
        let record: DividendRecord = serde_json::from_str(
            r#"{"payment_date": "2022-05-30", "dividend": 1.25, "type": "quarterly_dividend", "yield": 3.4}"#,
        )
        .unwrap();
        let dividend = into_dividend(record).unwrap();
        assert_eq!(dividend.type_code, "QD");
        assert_eq!(dividend.dividend_yield, Some(3.4));
    }

    #[test]
    fn test_company_record_conversion() {
        let record: CompanyRecord = serde_json::from_str(
            r#"{"country": "turkey", "name": "Akbank", "full_name": "Akbank TAS", "isin": "TRAAKBNK91N6", "currency": "TRY", "symbol": "AKBNK"}"#,
        )
        .unwrap();
        let company = Company::from(record);
        assert_eq!(company.label(), "AKBNK - Akbank");
        assert_eq!(company.country, "turkey");
    }

    #[test]
    fn test_information_values_rendered_in_order() {
        let fields: serde_json::Map<String, serde_json::Value> = serde_json::from_str(
            r#"{"Prev. Close": 28.5, "Volume": "12.3M", "Beta": null}"#,
        )
        .unwrap();
        let rendered: Vec<(String, String)> = fields
            .iter()
            .map(|(k, v)| (k.clone(), display_value(v)))
            .collect();
        assert_eq!(rendered[0], ("Prev. Close".to_string(), "28.5".to_string()));
        assert_eq!(rendered[1].1, "12.3M");
        assert_eq!(rendered[2].1, "-");
    }

    #[test]
    fn test_summary_keeps_order_and_missing_items() {
        let record: SummaryRecord = serde_json::from_str(
            r#"{"date": "2023-12-31", "items": {"Total Revenue": 1500.0, "Gross Profit": 600.0, "Operating Income": null, "Net Income": 210.5}}"#,
        )
        .unwrap();
        let row = into_statement_row(record).unwrap();

        let names: Vec<&str> = row.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["Total Revenue", "Gross Profit", "Operating Income", "Net Income"]);
        assert_eq!(row.items[0].value, Some(1500.0));
        assert_eq!(row.items[2].value, None);
        assert_eq!(row.items[3].value, Some(210.5));
    }

    #[test]
    fn test_summary_rejects_non_numeric_item() {
        let record: SummaryRecord =
            serde_json::from_str(r#"{"date": "2023-12-31", "items": {"Total Revenue": "n/a"}}"#).unwrap();
        assert!(matches!(into_statement_row(record), Err(AppError::Parse(_))));
    }
}
