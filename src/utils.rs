use chrono::NaiveDate;

/// Default provider base URL when `BIST_PROVIDER_URL` is not set
pub const DEFAULT_PROVIDER_URL: &str = "http://localhost:8000";

/// Default HTTP port when `BIST_PORT` is not set
pub const DEFAULT_PORT: u16 = 3000;

/// Get reference data provider base URL from environment variable or use default
pub fn get_provider_base_url() -> String {
    std::env::var("BIST_PROVIDER_URL")
        .ok()
        .map(|url| url.trim().trim_end_matches('/').to_string())
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| DEFAULT_PROVIDER_URL.to_string())
}

/// Get server port from environment variable or use default
pub fn get_port() -> u16 {
    std::env::var("BIST_PORT")
        .ok()
        .and_then(|port| port.parse().ok())
        .unwrap_or(DEFAULT_PORT)
}

/// Format a date as YYYY-MM-DD
pub fn format_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Format a date the way the provider expects it in query strings (dd/mm/yyyy)
pub fn format_provider_date(date: &NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Parse a number written with Turkish separators ("1.234,56")
pub fn parse_turkish_number(text: &str) -> Option<f64> {
    let cleaned: String = text
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '.' && *c != '%')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    cleaned.parse().ok()
}

/// Reduce a snake_case label to its upper-case initials ("quarterly_dividend" -> "QD")
pub fn initials(label: &str) -> String {
    label
        .split('_')
        .filter_map(|part| part.chars().next())
        .flat_map(|c| c.to_uppercase())
        .collect()
}
