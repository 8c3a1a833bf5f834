use serde::{Deserialize, Serialize};

/// A listed company from the reference table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    /// Ticker symbol, unique across the listing
    pub symbol: String,

    /// Short trading name (e.g. "AKBANK")
    pub short_name: String,

    /// Registered full name
    pub full_name: String,

    pub isin: String,

    /// Trading currency (e.g. "TRY")
    pub currency: String,

    #[serde(default)]
    pub country: String,
}

impl Company {
    /// Label shown in the company selector: "SYMBOL - Short Name"
    pub fn label(&self) -> String {
        format!("{} - {}", self.symbol, self.short_name)
    }

    /// Case-insensitive substring match on symbol and both names
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.symbol.to_lowercase().contains(&query)
            || self.short_name.to_lowercase().contains(&query)
            || self.full_name.to_lowercase().contains(&query)
    }
}

/// The full company listing, sorted by symbol
#[derive(Debug, Clone, Default, Serialize)]
pub struct CompanyList {
    companies: Vec<Company>,
}

impl CompanyList {
    /// Build a listing; records are sorted by symbol and duplicate symbols dropped
    pub fn new(mut companies: Vec<Company>) -> Self {
        companies.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        companies.dedup_by(|a, b| a.symbol == b.symbol);
        Self { companies }
    }

    pub fn get(&self, symbol: &str) -> Option<&Company> {
        self.companies
            .binary_search_by(|c| c.symbol.as_str().cmp(symbol))
            .ok()
            .map(|idx| &self.companies[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Company> {
        self.companies.iter()
    }

    pub fn search(&self, query: &str) -> Vec<Company> {
        self.companies
            .iter()
            .filter(|c| c.matches(query))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.companies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.companies.is_empty()
    }
}
