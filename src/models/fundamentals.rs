//! Company data fetched alongside prices: technical indicator tables,
//! financial statements, dividends, scraped ratios and news.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Calculation period for the provider's technical indicator table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TechnicalInterval {
    #[serde(rename = "5mins")]
    FiveMinutes,
    #[serde(rename = "15mins")]
    FifteenMinutes,
    #[serde(rename = "30mins")]
    ThirtyMinutes,
    #[default]
    #[serde(rename = "1hour")]
    OneHour,
    #[serde(rename = "5hours")]
    FiveHours,
    #[serde(rename = "daily")]
    Daily,
    #[serde(rename = "weekly")]
    Weekly,
    #[serde(rename = "monthly")]
    Monthly,
}

impl TechnicalInterval {
    pub const ALL: [TechnicalInterval; 8] = [
        TechnicalInterval::FiveMinutes,
        TechnicalInterval::FifteenMinutes,
        TechnicalInterval::ThirtyMinutes,
        TechnicalInterval::OneHour,
        TechnicalInterval::FiveHours,
        TechnicalInterval::Daily,
        TechnicalInterval::Weekly,
        TechnicalInterval::Monthly,
    ];

    /// Provider wire value
    pub fn as_str(&self) -> &'static str {
        match self {
            TechnicalInterval::FiveMinutes => "5mins",
            TechnicalInterval::FifteenMinutes => "15mins",
            TechnicalInterval::ThirtyMinutes => "30mins",
            TechnicalInterval::OneHour => "1hour",
            TechnicalInterval::FiveHours => "5hours",
            TechnicalInterval::Daily => "daily",
            TechnicalInterval::Weekly => "weekly",
            TechnicalInterval::Monthly => "monthly",
        }
    }

    /// Turkish label used in the dashboard selector
    pub fn label(&self) -> &'static str {
        match self {
            TechnicalInterval::FiveMinutes => "5 Dakika",
            TechnicalInterval::FifteenMinutes => "15 Dakika",
            TechnicalInterval::ThirtyMinutes => "30 Dakika",
            TechnicalInterval::OneHour => "1 Saat",
            TechnicalInterval::FiveHours => "5 Saat",
            TechnicalInterval::Daily => "Günlük",
            TechnicalInterval::Weekly => "Haftalık",
            TechnicalInterval::Monthly => "Aylık",
        }
    }

    /// Parse from string
    pub fn from_str(s: &str) -> Result<Self, String> {
        Self::ALL
            .iter()
            .copied()
            .find(|i| i.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let valid: Vec<&str> = Self::ALL.iter().map(|i| i.as_str()).collect();
                format!("Invalid interval: '{}'. Valid values: {}", s, valid.join(", "))
            })
    }
}

/// One row of the provider's technical indicator table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalIndicator {
    #[serde(rename = "technical_indicator")]
    pub name: String,
    pub value: f64,
    /// Signal label such as "buy", "sell" or "neutral"
    pub signal: String,
}

/// Financial statement kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementType {
    #[default]
    IncomeStatement,
    CashFlowStatement,
    BalanceSheet,
}

impl StatementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatementType::IncomeStatement => "income_statement",
            StatementType::CashFlowStatement => "cash_flow_statement",
            StatementType::BalanceSheet => "balance_sheet",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "income_statement" | "income" => Ok(StatementType::IncomeStatement),
            "cash_flow_statement" | "cash_flow" => Ok(StatementType::CashFlowStatement),
            "balance_sheet" | "balance" => Ok(StatementType::BalanceSheet),
            _ => Err(format!(
                "Invalid statement: '{}'. Valid values: income_statement, cash_flow_statement, balance_sheet, dividend",
                s
            )),
        }
    }
}

/// Statement periodicity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatementPeriod {
    #[default]
    Annual,
    Quarterly,
}

impl StatementPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatementPeriod::Annual => "annual",
            StatementPeriod::Quarterly => "quarterly",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "annual" | "yearly" => Ok(StatementPeriod::Annual),
            "quarterly" | "quarter" => Ok(StatementPeriod::Quarterly),
            _ => Err(format!("Invalid period: '{}'. Valid values: annual, quarterly", s)),
        }
    }
}

/// Statement line item; `None` when the provider has no figure for the period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub name: String,
    pub value: Option<f64>,
}

/// One reporting period of a financial statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementPeriodRow {
    /// Period end date
    pub date: NaiveDate,
    /// Line items in statement order, missing figures included
    pub items: Vec<LineItem>,
}

/// Financial statement table scoped to (symbol, type, period)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialStatement {
    pub symbol: String,
    pub statement: StatementType,
    pub period: StatementPeriod,
    pub rows: Vec<StatementPeriodRow>,
}

/// Dividend payment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dividend {
    pub payment_date: NaiveDate,
    pub amount: f64,
    /// Type code, initials of the provider's type name ("QD" for quarterly_dividend)
    pub type_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dividend_yield: Option<f64>,
}

/// Key financial ratios scraped for one symbol, in page order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialRatios {
    pub symbol: String,
    pub ratios: Vec<(String, f64)>,
}

/// News headline linking to the full article
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewsItem {
    pub title: String,
    /// Absolute article URL
    pub link: String,
    /// Publication date as shown on the site (first 10 characters)
    pub published: String,
}

/// Company description, optionally translated
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyProfile {
    pub symbol: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translated: Option<String>,
    /// True when the description is the placeholder shown on lookup failure
    pub fallback: bool,
}

/// Ordered market information table (field, value)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyInformation {
    pub symbol: String,
    pub fields: Vec<(String, String)>,
}

/// Split an ordered table into `(left, right)` columns for side-by-side display.
///
/// The right column holds the first `len / 2` rows and the left column the
/// rest, so an odd row lands on the left.
pub fn split_halves<T: Clone>(rows: &[T]) -> (Vec<T>, Vec<T>) {
    let mid = rows.len() / 2;
    (rows[mid..].to_vec(), rows[..mid].to_vec())
}
