use crate::analysis::{resolve_window, ColumnSummary};
use crate::constants::{band, regression, sma, FALLBACK_LOGO_URL, NEWS_NOT_FOUND, RATIOS_NOT_FOUND};
use crate::error::{AppError, Result};
use crate::models::{
    split_halves, AnalysisModel, ChartRequest, ChartType, Company, NewsItem, PriceColumn,
    StatementPeriod, StatementType, TechnicalIndicator, TechnicalInterval,
};
use crate::server::AppState;
use crate::services::{get_cache_max_age, is_trading_hours};
use crate::utils::format_date;
use axum::{
    extract::{Path, State},
    http::{header::CACHE_CONTROL, header::CONTENT_TYPE, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
};
use axum_extra::extract::Query;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

/// Cache-Control header for price-derived responses, shorter while the market is open
fn price_cache_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    let max_age = get_cache_max_age();
    if let Ok(value) = HeaderValue::from_str(&format!("max-age={}", max_age)) {
        headers.insert(CACHE_CONTROL, value);
    }
    debug!(cache_max_age = max_age, "Applied cache control header based on trading hours");
    headers
}

fn parse_param<T>(value: Option<&str>, parse: fn(&str) -> std::result::Result<T, String>) -> Result<Option<T>> {
    value.map(parse).transpose().map_err(AppError::InvalidInput)
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub uptime_secs: u64,
    pub market_open: bool,
    pub cache_max_age: u32,
    pub cache_entries: BTreeMap<&'static str, usize>,
    pub current_system_time: String,
}

/// GET /health - Process and cache statistics
#[instrument(skip(app_state))]
pub async fn health_handler(State(app_state): State<AppState>) -> impl IntoResponse {
    let cache_entries: BTreeMap<_, _> = app_state.dashboard.cache_sizes().await.into_iter().collect();

    let response = HealthResponse {
        status: "ok",
        uptime_secs: app_state.started_at.elapsed().as_secs(),
        market_open: is_trading_hours(),
        cache_max_age: get_cache_max_age(),
        cache_entries,
        current_system_time: Utc::now().to_rfc3339(),
    };

    (StatusCode::OK, Json(response))
}

#[derive(Debug, Deserialize)]
pub struct CompanyListQuery {
    /// Case-insensitive substring filter on symbol and names
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CompanySummary {
    pub label: String,
    #[serde(flatten)]
    pub company: Company,
}

impl From<Company> for CompanySummary {
    fn from(company: Company) -> Self {
        Self {
            label: company.label(),
            company,
        }
    }
}

/// GET /companies - Company listing sorted by symbol
///
/// Examples:
/// - /companies
/// - /companies?search=bank
#[instrument(skip(app_state))]
pub async fn list_companies_handler(
    State(app_state): State<AppState>,
    Query(params): Query<CompanyListQuery>,
) -> Result<Json<Vec<CompanySummary>>> {
    let companies = app_state.dashboard.companies().await?;

    let selected: Vec<Company> = match params.search.as_deref().map(str::trim) {
        Some(query) if !query.is_empty() => companies.search(query),
        _ => companies.iter().cloned().collect(),
    };

    info!(total = companies.len(), returned = selected.len(), "Returning company list");
    Ok(Json(selected.into_iter().map(CompanySummary::from).collect()))
}

#[derive(Debug, Serialize)]
pub struct CompanyDetail {
    #[serde(flatten)]
    pub summary: CompanySummary,
    pub logo_url: String,
    /// True when the registry lookup failed and `logo_url` is the placeholder
    pub logo_fallback: bool,
}

/// GET /companies/{symbol} - Company record and logo
#[instrument(skip(app_state))]
pub async fn company_handler(
    State(app_state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<CompanyDetail>> {
    let company = app_state.dashboard.company(&symbol).await?;
    let logo = app_state.dashboard.logo(&company.symbol).await?;
    let logo_fallback = !logo.is_found();
    let logo_url = logo
        .map(|url| url.as_ref().clone())
        .unwrap_or_fallback(FALLBACK_LOGO_URL.to_string());

    Ok(Json(CompanyDetail {
        summary: company.into(),
        logo_url,
        logo_fallback,
    }))
}

#[derive(Debug, Serialize)]
pub struct Field {
    pub field: String,
    pub value: String,
}

#[derive(Debug, Serialize)]
pub struct InformationResponse {
    pub symbol: String,
    pub left: Vec<Field>,
    pub right: Vec<Field>,
}

fn to_fields(rows: Vec<(String, String)>) -> Vec<Field> {
    rows.into_iter().map(|(field, value)| Field { field, value }).collect()
}

/// GET /companies/{symbol}/info - Market information in two columns
#[instrument(skip(app_state))]
pub async fn information_handler(
    State(app_state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<InformationResponse>> {
    let info = app_state.dashboard.information(&symbol).await?;
    let (left, right) = split_halves(&info.fields);

    Ok(Json(InformationResponse {
        symbol: info.symbol,
        left: to_fields(left),
        right: to_fields(right),
    }))
}

#[derive(Debug, Deserialize)]
pub struct ProfileQuery {
    /// Translate the description to Turkish - default: false
    #[serde(default)]
    pub translate: bool,
}

/// GET /companies/{symbol}/profile - Business description
#[instrument(skip(app_state))]
pub async fn profile_handler(
    State(app_state): State<AppState>,
    Path(symbol): Path<String>,
    Query(params): Query<ProfileQuery>,
) -> Result<Response> {
    let profile = app_state.dashboard.profile(&symbol, params.translate).await?;
    Ok(Json(profile).into_response())
}

#[derive(Debug, Deserialize)]
pub struct TechnicalQuery {
    /// 5mins, 15mins, 30mins, 1hour (default), 5hours, daily, weekly, monthly
    pub interval: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TechnicalResponse<'a> {
    pub symbol: String,
    pub interval: TechnicalInterval,
    pub label: &'static str,
    pub indicators: &'a [TechnicalIndicator],
}

/// GET /companies/{symbol}/technical - Technical indicator table
#[instrument(skip(app_state))]
pub async fn technical_handler(
    State(app_state): State<AppState>,
    Path(symbol): Path<String>,
    Query(params): Query<TechnicalQuery>,
) -> Result<Response> {
    let interval = parse_param(params.interval.as_deref(), TechnicalInterval::from_str)?
        .unwrap_or_default();
    let indicators = app_state.dashboard.technical(&symbol, interval).await?;

    Ok(Json(TechnicalResponse {
        symbol: symbol.trim().to_uppercase(),
        interval,
        label: interval.label(),
        indicators: &indicators,
    })
    .into_response())
}

#[derive(Debug, Deserialize)]
pub struct FinancialsQuery {
    /// income_statement (default), cash_flow_statement, balance_sheet or dividend
    pub statement: Option<String>,
    /// annual (default) or quarterly; ignored for dividends
    pub period: Option<String>,
}

/// GET /companies/{symbol}/financials - Financial statement or dividend table
///
/// Examples:
/// - /companies/AKBNK/financials?statement=balance_sheet&period=quarterly
/// - /companies/AKBNK/financials?statement=dividend
#[instrument(skip(app_state))]
pub async fn financials_handler(
    State(app_state): State<AppState>,
    Path(symbol): Path<String>,
    Query(params): Query<FinancialsQuery>,
) -> Result<Response> {
    if params.statement.as_deref().is_some_and(|s| s.eq_ignore_ascii_case("dividend")) {
        let dividends = app_state.dashboard.dividends(&symbol).await?;
        return Ok(Json(serde_json::json!({
            "symbol": symbol.trim().to_uppercase(),
            "statement": "dividend",
            "dividends": dividends.as_ref(),
        }))
        .into_response());
    }

    let statement = parse_param(params.statement.as_deref(), StatementType::from_str)?.unwrap_or_default();
    let period = parse_param(params.period.as_deref(), StatementPeriod::from_str)?.unwrap_or_default();
    let table = app_state.dashboard.financials(&symbol, statement, period).await?;

    Ok(Json(table.as_ref()).into_response())
}

#[derive(Debug, Serialize)]
pub struct Ratio {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Serialize)]
pub struct RatiosResponse {
    pub symbol: String,
    pub fallback: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub left: Vec<Ratio>,
    pub right: Vec<Ratio>,
}

/// GET /companies/{symbol}/ratios - Scraped key ratios in two columns
#[instrument(skip(app_state))]
pub async fn ratios_handler(
    State(app_state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<RatiosResponse>> {
    let outcome = app_state.dashboard.ratios(&symbol).await?;
    let symbol = symbol.trim().to_uppercase();

    let to_ratios = |rows: Vec<(String, f64)>| -> Vec<Ratio> {
        rows.into_iter().map(|(label, value)| Ratio { label, value }).collect()
    };

    let response = match outcome.ok() {
        Some(ratios) => {
            let (left, right) = split_halves(&ratios.ratios);
            RatiosResponse {
                symbol,
                fallback: false,
                message: None,
                left: to_ratios(left),
                right: to_ratios(right),
            }
        }
        None => RatiosResponse {
            symbol,
            fallback: true,
            message: Some(RATIOS_NOT_FOUND.to_string()),
            left: Vec::new(),
            right: Vec::new(),
        },
    };
    Ok(Json(response))
}

#[derive(Debug, Serialize)]
pub struct NewsResponse {
    pub symbol: String,
    pub fallback: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub items: Vec<NewsItem>,
}

/// GET /companies/{symbol}/news - Latest headlines
#[instrument(skip(app_state))]
pub async fn news_handler(
    State(app_state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<NewsResponse>> {
    let outcome = app_state.dashboard.news(&symbol).await?;
    let symbol = symbol.trim().to_uppercase();

    let response = match outcome.ok() {
        Some(items) => NewsResponse {
            symbol,
            fallback: false,
            message: None,
            items: items.as_ref().clone(),
        },
        None => NewsResponse {
            symbol,
            fallback: true,
            message: Some(NEWS_NOT_FOUND.to_string()),
            items: Vec::new(),
        },
    };
    Ok(Json(response))
}

/// Query parameters for /companies/{symbol}/chart
#[derive(Debug, Default, Deserialize, Clone)]
pub struct ChartQuery {
    /// Trailing bars to display (30..=2000, step 10) - default: 500
    pub window: Option<usize>,
    /// line (default), area or candlestick
    pub chart: Option<String>,
    /// open, high, low, close (default) or volume
    pub column: Option<String>,
    /// sma, stddev or polyreg; line charts only
    pub model: Option<String>,

    /// First moving average on/off - default: on
    pub sma1: Option<bool>,
    pub sma1_window: Option<usize>,
    /// Second moving average on/off - default: off
    pub sma2: Option<bool>,
    pub sma2_window: Option<usize>,

    /// First volatility band on/off - default: on
    pub band1: Option<bool>,
    pub band1_window: Option<usize>,
    /// Second volatility band on/off - default: off
    pub band2: Option<bool>,
    pub band2_window: Option<usize>,

    pub degree: Option<usize>,
    pub horizon: Option<usize>,
}

impl ChartQuery {
    pub fn into_request(self) -> Result<ChartRequest> {
        let chart = parse_param(self.chart.as_deref(), ChartType::from_str)?.unwrap_or_default();
        let column = parse_param(self.column.as_deref(), PriceColumn::from_str)?.unwrap_or_default();

        let pick = |enabled: Option<bool>, default_on: bool, window: Option<usize>, default: usize| {
            enabled.unwrap_or(default_on).then(|| window.unwrap_or(default))
        };

        let model = match self.model.as_deref().map(str::to_lowercase).as_deref() {
            None | Some("") => None,
            Some("sma") => Some(AnalysisModel::MovingAverage {
                first: pick(self.sma1, true, self.sma1_window, sma::DEFAULT_WINDOW_1),
                second: pick(self.sma2, false, self.sma2_window, sma::DEFAULT_WINDOW_2),
            }),
            Some("stddev") => Some(AnalysisModel::VolatilityBand {
                first: pick(self.band1, true, self.band1_window, band::DEFAULT_WINDOW_1),
                second: pick(self.band2, false, self.band2_window, band::DEFAULT_WINDOW_2),
            }),
            Some("polyreg") => Some(AnalysisModel::PolynomialRegression {
                degree: self.degree.unwrap_or(regression::DEFAULT_DEGREE),
                horizon: self.horizon.unwrap_or(regression::DEFAULT_HORIZON),
            }),
            Some(other) => {
                return Err(AppError::InvalidInput(format!(
                    "Invalid model: '{}'. Valid values: sma, stddev, polyreg",
                    other
                )))
            }
        };

        let request = ChartRequest {
            window: self.window,
            chart,
            column,
            model,
        };
        request.validate().map_err(AppError::InvalidInput)?;
        Ok(request)
    }
}

/// GET /companies/{symbol}/chart - Chart description with optional overlay
///
/// Examples:
/// - /companies/AKBNK/chart
/// - /companies/AKBNK/chart?window=200&model=sma&sma2=true&sma2_window=50
/// - /companies/AKBNK/chart?model=stddev&band1_window=10
/// - /companies/AKBNK/chart?model=polyreg&degree=3&horizon=60
/// - /companies/AKBNK/chart?chart=candlestick
#[instrument(skip(app_state))]
pub async fn chart_handler(
    State(app_state): State<AppState>,
    Path(symbol): Path<String>,
    Query(params): Query<ChartQuery>,
) -> Result<Response> {
    let request = params.into_request()?;
    let spec = app_state.dashboard.chart(&symbol, &request).await?;

    info!(
        symbol = %spec.symbol,
        window = spec.window,
        points = spec.dates.len(),
        series = spec.series.len(),
        "Returning chart"
    );

    Ok((StatusCode::OK, price_cache_headers(), Json(spec)).into_response())
}

/// Output format for /companies/{symbol}/history, read next to `ChartQuery`
#[derive(Debug, Deserialize)]
pub struct FrameQuery {
    /// json (default) or csv
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_format() -> String {
    "json".to_string()
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub symbol: String,
    pub window: usize,
    pub statistics: Vec<ColumnSummary>,
}

/// GET /companies/{symbol}/stats - Descriptive statistics of the displayed frame
///
/// Takes the same parameters as the chart, so overlay columns are described too:
/// - /companies/AKBNK/stats?window=200&model=sma
/// - /companies/AKBNK/stats?chart=candlestick
#[instrument(skip(app_state))]
pub async fn stats_handler(
    State(app_state): State<AppState>,
    Path(symbol): Path<String>,
    Query(params): Query<ChartQuery>,
) -> Result<Response> {
    let request = params.into_request()?;
    let available = app_state.dashboard.history(&symbol).await?.len();
    let statistics = app_state.dashboard.stats(&symbol, &request).await?;

    let response = StatsResponse {
        symbol: symbol.trim().to_uppercase(),
        window: resolve_window(request.window, available),
        statistics,
    };
    Ok((StatusCode::OK, price_cache_headers(), Json(response)).into_response())
}

/// GET /companies/{symbol}/history - Displayed frame as rows, JSON or CSV
///
/// Chart parameters pick the columns: the price column plus overlays for line
/// and area charts, every OHLCV column for candlestick.
#[instrument(skip(app_state))]
pub async fn history_handler(
    State(app_state): State<AppState>,
    Path(symbol): Path<String>,
    Query(params): Query<ChartQuery>,
    Query(output): Query<FrameQuery>,
) -> Result<Response> {
    let request = params.into_request()?;
    let frame = app_state.dashboard.display_frame(&symbol, &request).await?;
    let names: Vec<&str> = frame.columns().iter().map(|c| c.name.as_str()).collect();
    let mut headers = price_cache_headers();

    match output.format.to_lowercase().as_str() {
        "csv" => {
            let mut writer = csv::Writer::from_writer(Vec::new());
            let mut header = vec!["date"];
            header.extend(&names);
            writer.write_record(&header)?;

            for (date, values) in frame.rows() {
                let mut record = vec![format_date(&date)];
                record.extend(values.iter().map(|v| v.map(|v| v.to_string()).unwrap_or_default()));
                writer.write_record(&record)?;
            }

            let body = writer
                .into_inner()
                .map_err(|e| AppError::Io(format!("CSV flush failed: {}", e)))?;

            headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/csv; charset=utf-8"));
            if let Ok(value) = HeaderValue::from_str(&format!(
                "attachment; filename=\"{}.csv\"",
                symbol.trim().to_uppercase()
            )) {
                headers.insert("Content-Disposition", value);
            }
            Ok((StatusCode::OK, headers, body).into_response())
        }
        "json" => {
            let rows: Vec<serde_json::Map<String, serde_json::Value>> = frame
                .rows()
                .into_iter()
                .map(|(date, values)| {
                    let mut row = serde_json::Map::new();
                    row.insert("date".to_string(), format_date(&date).into());
                    for (name, value) in names.iter().zip(values) {
                        row.insert(name.to_string(), value.into());
                    }
                    row
                })
                .collect();

            Ok((StatusCode::OK, headers, Json(rows)).into_response())
        }
        other => Err(AppError::InvalidInput(format!(
            "Invalid format: '{}'. Valid values: json, csv",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::{router, AppState};
    use crate::services::{Dashboard, MarketDataProvider};
    use crate::test_support::StubProvider;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app(bars: usize) -> axum::Router {
        let provider: Arc<dyn MarketDataProvider> = Arc::new(StubProvider::with_bars(bars));
        let dashboard = Dashboard::new(provider).unwrap();
        router(AppState::new(Arc::new(dashboard)))
    }

    async fn get(app: axum::Router, uri: &str) -> (StatusCode, HeaderMap, Vec<u8>) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, body.to_vec())
    }

    async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let (status, _, body) = get(app, uri).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[test]
    fn test_chart_query_defaults() {
        let request = ChartQuery {
            model: Some("sma".to_string()),
            ..ChartQuery::default()
        }
        .into_request()
        .unwrap();
        assert_eq!(request.model, Some(AnalysisModel::default_moving_average()));

        let request = ChartQuery {
            model: Some("stddev".to_string()),
            band2: Some(true),
            ..ChartQuery::default()
        }
        .into_request()
        .unwrap();
        assert_eq!(
            request.model,
            Some(AnalysisModel::VolatilityBand {
                first: Some(band::DEFAULT_WINDOW_1),
                second: Some(band::DEFAULT_WINDOW_2),
            })
        );
    }

    #[test]
    fn test_chart_query_rejections() {
        let unknown = ChartQuery {
            model: Some("arima".to_string()),
            ..ChartQuery::default()
        };
        assert!(matches!(unknown.into_request(), Err(AppError::InvalidInput(_))));

        let on_area = ChartQuery {
            chart: Some("area".to_string()),
            model: Some("polyreg".to_string()),
            ..ChartQuery::default()
        };
        assert!(on_area.into_request().is_err());

        let bad_column = ChartQuery {
            column: Some("adj".to_string()),
            ..ChartQuery::default()
        };
        assert!(bad_column.into_request().is_err());
    }

    #[tokio::test]
    async fn test_health() {
        let (status, json) = get_json(app(10), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
        assert!(json["cache_entries"]["history"].is_number());
    }

    #[tokio::test]
    async fn test_list_companies_with_search() {
        let (status, json) = get_json(app(10), "/companies?search=garanti").await;
        assert_eq!(status, StatusCode::OK);
        let list = json.as_array().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0]["symbol"], "GARAN");
        assert_eq!(list[0]["label"], "GARAN - Garanti BBVA");
    }

    #[tokio::test]
    async fn test_unknown_company_is_404() {
        let (status, json) = get_json(app(10), "/companies/NOPE").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(json["error"].as_str().unwrap().contains("NOPE"));
    }

    #[tokio::test]
    async fn test_chart_with_moving_averages() {
        let (status, headers, body) = get(
            app(400),
            "/companies/akbnk/chart?window=120&model=sma&sma2=true&sma2_window=50",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(headers.get(CACHE_CONTROL).is_some());

        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["window"], 120);
        assert_eq!(json["dates"].as_array().unwrap().len(), 120);
        assert_eq!(json["series"].as_array().unwrap().len(), 3);
        assert_eq!(json["series"][2]["name"], "2. Yürüyen Ortalama 50");
    }

    #[tokio::test]
    async fn test_chart_out_of_range_is_400() {
        let (status, _) = get_json(app(400), "/companies/AKBNK/chart?model=polyreg&degree=21").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = get_json(app(400), "/companies/AKBNK/chart?model=stddev&band1_window=91").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_regression_chart_extends_axis() {
        let (status, json) =
            get_json(app(400), "/companies/AKBNK/chart?window=100&model=polyreg&degree=2&horizon=15").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["dates"].as_array().unwrap().len(), 115);
        assert_eq!(json["series"][1]["kind"], "forecast");
    }

    #[tokio::test]
    async fn test_history_csv() {
        let (status, headers, body) =
            get(app(60), "/companies/AKBNK/history?window=30&chart=candlestick&format=csv").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "text/csv; charset=utf-8");

        let text = String::from_utf8(body).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("date,open,high,low,close,volume"));
        assert_eq!(lines.count(), 30);
    }

    #[tokio::test]
    async fn test_history_json_single_column() {
        let (status, json) = get_json(app(60), "/companies/AKBNK/history?column=close").await;
        assert_eq!(status, StatusCode::OK);
        let rows = json.as_array().unwrap();
        assert_eq!(rows.len(), 60);
        assert!(rows[0]["close"].is_number());
        assert!(rows[0].get("open").is_none());
    }

    #[tokio::test]
    async fn test_history_json_with_forecast_rows() {
        let (status, json) =
            get_json(app(60), "/companies/AKBNK/history?window=30&model=polyreg&degree=1&horizon=5").await;
        assert_eq!(status, StatusCode::OK);
        let rows = json.as_array().unwrap();
        assert_eq!(rows.len(), 35);
        assert!(rows[34]["close"].is_null());
        assert!(rows[34]["Polinom Regresyon (1. derece)"].is_number());
    }

    #[tokio::test]
    async fn test_stats() {
        let (status, json) = get_json(app(300), "/companies/AKBNK/stats?window=100&column=volume").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["window"], 100);
        assert_eq!(json["statistics"][0]["column"], "volume");
        assert_eq!(json["statistics"][0]["count"], 100);
    }

    #[tokio::test]
    async fn test_stats_include_moving_average_column() {
        // 40 bars, 30 shown: the 20-bar average is full from bar 19, so 21 shown values
        let (status, json) = get_json(app(40), "/companies/AKBNK/stats?window=30&model=sma").await;
        assert_eq!(status, StatusCode::OK);
        let statistics = json["statistics"].as_array().unwrap();
        assert_eq!(statistics.len(), 2);
        assert_eq!(statistics[1]["column"], "1. Yürüyen Ortalama 20");
        assert_eq!(statistics[1]["count"], 21);
        assert_eq!(statistics[0]["count"], 30);
    }

    #[tokio::test]
    async fn test_financials_dividend_and_statement() {
        let (status, json) = get_json(app(10), "/companies/AKBNK/financials?statement=dividend").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["dividends"][0]["type_code"], "QD");

        let (status, json) =
            get_json(app(10), "/companies/AKBNK/financials?statement=balance_sheet&period=quarterly").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["statement"], "balance_sheet");
        assert_eq!(json["period"], "quarterly");
        let items = &json["rows"][0]["items"];
        assert_eq!(items[0]["name"], "Total Assets");
        assert_eq!(items[2]["name"], "Goodwill");
        assert!(items[2]["value"].is_null());

        let (status, _) = get_json(app(10), "/companies/AKBNK/financials?statement=ledger").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_profile_fallback_message() {
        let (status, json) = get_json(app(10), "/companies/GARAN/profile").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["fallback"], true);
        assert_eq!(json["description"], "Cannot Find Summary");
    }

    #[tokio::test]
    async fn test_information_halves() {
        let (status, json) = get_json(app(10), "/companies/AKBNK/info").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["left"].as_array().unwrap().len(), 3);
        assert_eq!(json["right"].as_array().unwrap().len(), 2);
        assert_eq!(json["left"][0]["field"], "Volume");
        assert_eq!(json["right"][0]["field"], "Prev. Close");
    }

    #[tokio::test]
    async fn test_technical_default_interval() {
        let (status, json) = get_json(app(10), "/companies/AKBNK/technical").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["interval"], "1hour");
        assert_eq!(json["label"], "1 Saat");

        let (status, _) = get_json(app(10), "/companies/AKBNK/technical?interval=2hours").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
