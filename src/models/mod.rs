mod chart;
mod company;
mod fundamentals;
mod price;

pub use chart::{
    AnalysisModel, Candle, ChartRequest, ChartSpec, ChartType, Series, SeriesKind, SeriesStyle,
};
pub use company::{Company, CompanyList};
pub use fundamentals::{
    split_halves, CompanyInformation, CompanyProfile, Dividend, FinancialRatios,
    FinancialStatement, LineItem, NewsItem, StatementPeriod, StatementPeriodRow, StatementType,
    TechnicalIndicator, TechnicalInterval,
};
pub use price::{clean_series, PriceBar, PriceColumn};
