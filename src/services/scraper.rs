//! HTML scrapers for data the provider does not carry: company logos from
//! the KAP registry, key ratios and latest news from Uzmanpara.
//!
//! Pages are matched with a handful of fixed patterns rather than a full DOM.
//! Every public lookup returns a [`ScrapeOutcome`] so callers can tell a real
//! value from a fallback.

use crate::constants::{
    FALLBACK_LOGO_URL, HTTP_TIMEOUT_SECS, KAP_BASE_URL, KAP_COMPANY_LIST_PATH, NEWS_LIMIT,
    UZMANPARA_BASE_URL, USER_AGENTS,
};
use crate::error::{AppError, Result};
use crate::models::{FinancialRatios, NewsItem};
use crate::utils::parse_turkish_number;
use rand::seq::IndexedRandom;
use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{debug, warn};

/// Result of a scrape: the value, or why it could not be obtained
#[derive(Debug, Clone, PartialEq)]
pub enum ScrapeOutcome<T> {
    Found(T),
    Failed { reason: String },
}

impl<T> ScrapeOutcome<T> {
    pub fn is_found(&self) -> bool {
        matches!(self, ScrapeOutcome::Found(_))
    }

    pub fn ok(self) -> Option<T> {
        match self {
            ScrapeOutcome::Found(value) => Some(value),
            ScrapeOutcome::Failed { .. } => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ScrapeOutcome<U> {
        match self {
            ScrapeOutcome::Found(value) => ScrapeOutcome::Found(f(value)),
            ScrapeOutcome::Failed { reason } => ScrapeOutcome::Failed { reason },
        }
    }

    /// The scraped value, or `fallback` when the scrape failed
    pub fn unwrap_or_fallback(self, fallback: T) -> T {
        self.ok().unwrap_or(fallback)
    }

    pub fn into_result(self) -> Result<T> {
        match self {
            ScrapeOutcome::Found(value) => Ok(value),
            ScrapeOutcome::Failed { reason } => Err(AppError::Other(reason)),
        }
    }
}

impl<T> From<Result<T>> for ScrapeOutcome<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(value) => ScrapeOutcome::Found(value),
            Err(e) => ScrapeOutcome::Failed {
                reason: e.to_string(),
            },
        }
    }
}

static ANCHOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<a\b([^>]*)>(.*?)</a>"#).expect("anchor pattern")
});
static IMG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?is)<img\b([^>]*)/?>"#).expect("img pattern"));
static ROW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?is)<tr\b[^>]*>(.*?)</tr>"#).expect("row pattern"));
static CELL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?is)<td\b([^>]*)>(.*?)</td>"#).expect("cell pattern"));
static LIST_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?is)<li\b[^>]*>(.*?)</li>"#).expect("li pattern"));
static SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?is)<span\b([^>]*)>(.*?)</span>"#).expect("span pattern"));
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("tag pattern"));
static SPACES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("space pattern"));
static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)([A-Za-z_:][-A-Za-z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
        .expect("attribute pattern")
});
/// Opening or closing tag: (slash, name, attributes)
static TAG_BOUNDARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<(/?)([A-Za-z][A-Za-z0-9]*)\b([^>]*)>").expect("tag boundary pattern")
});

/// Value of attribute `name` inside a tag's attribute text
fn attr(attrs: &str, name: &str) -> Option<String> {
    ATTRIBUTE
        .captures_iter(attrs)
        .find(|c| c[1].eq_ignore_ascii_case(name))
        .and_then(|c| c.get(2).or_else(|| c.get(3)))
        .map(|m| m.as_str().to_string())
}

fn has_class(attrs: &str, class: &str) -> bool {
    attr(attrs, "class")
        .map(|classes| classes.split_whitespace().any(|c| c == class))
        .unwrap_or(false)
}

/// Visible text of an HTML fragment
fn text(fragment: &str) -> String {
    let stripped = TAG.replace_all(fragment, " ");
    let decoded = stripped
        .replace("&nbsp;", " ")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&");
    SPACES.replace_all(decoded.trim(), " ").into_owned()
}

/// Body of the first `<tag class="...class...">` element, nested tags of the
/// same name included
fn element_with_class<'a>(html: &'a str, tag: &str, class: &str) -> Option<&'a str> {
    let mut tags = TAG_BOUNDARY
        .captures_iter(html)
        .filter(|c| c[2].eq_ignore_ascii_case(tag));
    let start = tags
        .by_ref()
        .find(|c| c[1].is_empty() && has_class(&c[3], class))?
        .get(0)?
        .end();

    let mut depth = 1usize;
    for m in tags {
        if m[1].is_empty() {
            depth += 1;
        } else {
            depth -= 1;
            if depth == 0 {
                return Some(&html[start..m.get(0)?.start()]);
            }
        }
    }
    Some(&html[start..])
}

fn absolute_url(base: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else if href.starts_with('/') {
        format!("{}{}", base, href)
    } else {
        format!("{}/{}", base, href)
    }
}

/// Href of the first anchor whose text mentions `symbol`
pub fn parse_company_link(html: &str, symbol: &str) -> Option<String> {
    ANCHOR
        .captures_iter(html)
        .find(|c| text(&c[2]).contains(symbol))
        .and_then(|c| attr(&c[1], "href"))
}

/// `src` of the company logo image on a registry detail page
pub fn parse_logo_src(html: &str) -> Option<String> {
    IMG.captures_iter(html)
        .find(|c| has_class(&c[1], "comp-logo"))
        .and_then(|c| attr(&c[1], "src"))
}

/// Label/value pairs of the key ratios table.
///
/// Within `div.detL`, each row's `td.currency` cell is the label and the
/// first cell without a class is the value. Rows whose value is not a number
/// are skipped.
pub fn parse_ratios(html: &str) -> Vec<(String, f64)> {
    let Some(section) = element_with_class(html, "div", "detL") else {
        return Vec::new();
    };

    ROW.captures_iter(section)
        .filter_map(|row| {
            let cells: Vec<_> = CELL.captures_iter(&row[1]).collect();
            let label = cells.iter().find(|c| has_class(&c[1], "currency"))?;
            let value = cells
                .iter()
                .find(|c| attr(&c[1], "class").map_or(true, |v| v.trim().is_empty()))?;
            Some((text(&label[2]), parse_turkish_number(&text(&value[2]))?))
        })
        .collect()
}

/// Up to `limit` news items from the `ul.newsUl` list
pub fn parse_news(html: &str, base_url: &str, limit: usize) -> Vec<NewsItem> {
    let Some(list) = element_with_class(html, "ul", "newsUl") else {
        return Vec::new();
    };

    LIST_ITEM
        .captures_iter(list)
        .take(limit)
        .filter_map(|item| {
            let anchor = ANCHOR.captures(&item[1])?;
            let href = attr(&anchor[1], "href")?;
            let published = SPAN
                .captures_iter(&item[1])
                .find(|s| has_class(&s[1], "date"))
                .map(|s| text(&s[2]).chars().take(10).collect())
                .unwrap_or_default();

            Some(NewsItem {
                title: text(&anchor[2]),
                link: absolute_url(base_url, &href),
                published,
            })
        })
        .collect()
}

/// HTTP front end for the scrapers
pub struct Scraper {
    client: reqwest::Client,
    kap_base_url: String,
    uzmanpara_base_url: String,
}

impl Scraper {
    pub fn new() -> Result<Self> {
        Self::with_base_urls(KAP_BASE_URL, UZMANPARA_BASE_URL)
    }

    pub fn with_base_urls(kap_base_url: &str, uzmanpara_base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            kap_base_url: kap_base_url.trim_end_matches('/').to_string(),
            uzmanpara_base_url: uzmanpara_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn user_agent() -> &'static str {
        USER_AGENTS
            .choose(&mut rand::rng())
            .copied()
            .unwrap_or(USER_AGENTS[0])
    }

    async fn fetch_page(&self, url: &str) -> Result<String> {
        debug!(url, "Fetching page");
        let response = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, Self::user_agent())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Network(format!("{} returned {}", url, status)));
        }
        Ok(response.text().await?)
    }

    /// Logo URL from the KAP registry; callers usually fall back to
    /// [`FALLBACK_LOGO_URL`] on failure
    pub async fn logo_url(&self, symbol: &str) -> ScrapeOutcome<String> {
        let outcome: ScrapeOutcome<String> = self.try_logo_url(symbol).await.into();
        if let ScrapeOutcome::Failed { reason } = &outcome {
            warn!(symbol, reason = %reason, fallback = FALLBACK_LOGO_URL, "Logo lookup failed");
        }
        outcome
    }

    async fn try_logo_url(&self, symbol: &str) -> Result<String> {
        let listing = self
            .fetch_page(&format!("{}{}", self.kap_base_url, KAP_COMPANY_LIST_PATH))
            .await?;
        let href = parse_company_link(&listing, symbol)
            .ok_or_else(|| AppError::NotFound(format!("{} not listed on KAP", symbol)))?;

        let detail = self.fetch_page(&absolute_url(&self.kap_base_url, &href)).await?;
        let src = parse_logo_src(&detail)
            .ok_or_else(|| AppError::NotFound(format!("No logo on KAP page of {}", symbol)))?;

        Ok(absolute_url(&self.kap_base_url, &src))
    }

    pub async fn financial_ratios(&self, symbol: &str) -> ScrapeOutcome<FinancialRatios> {
        let outcome: ScrapeOutcome<FinancialRatios> = self.try_financial_ratios(symbol).await.into();
        if let ScrapeOutcome::Failed { reason } = &outcome {
            warn!(symbol, reason = %reason, "Ratio scrape failed");
        }
        outcome
    }

    async fn try_financial_ratios(&self, symbol: &str) -> Result<FinancialRatios> {
        let url = format!("{}/borsa/anahtar-oranlar/{}/", self.uzmanpara_base_url, symbol);
        let ratios = parse_ratios(&self.fetch_page(&url).await?);
        if ratios.is_empty() {
            return Err(AppError::NotFound(format!("No ratios found for {}", symbol)));
        }
        Ok(FinancialRatios {
            symbol: symbol.to_string(),
            ratios,
        })
    }

    pub async fn latest_news(&self, symbol: &str) -> ScrapeOutcome<Vec<NewsItem>> {
        let outcome: ScrapeOutcome<Vec<NewsItem>> = self.try_latest_news(symbol).await.into();
        if let ScrapeOutcome::Failed { reason } = &outcome {
            warn!(symbol, reason = %reason, "News scrape failed");
        }
        outcome
    }

    async fn try_latest_news(&self, symbol: &str) -> Result<Vec<NewsItem>> {
        let url = format!("{}/hisse/hisse-haberleri/{}/", self.uzmanpara_base_url, symbol);
        let news = parse_news(&self.fetch_page(&url).await?, &self.uzmanpara_base_url, NEWS_LIMIT);
        if news.is_empty() {
            return Err(AppError::NotFound(format!("No news found for {}", symbol)));
        }
        Ok(news)
    }
}
