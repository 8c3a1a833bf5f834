use crate::commands::build_dashboard;
use crate::constants::{FALLBACK_LOGO_URL, NEWS_NOT_FOUND, RATIOS_NOT_FOUND};
use crate::error::{AppError, Result};
use crate::models::{split_halves, TechnicalInterval};

const RULE: &str = "═══════════════════════════════════════════════════════════";

pub async fn run(provider_url: &str, symbol: &str, translate: bool, interval: &str) -> Result<()> {
    let interval = TechnicalInterval::from_str(interval).map_err(AppError::InvalidInput)?;
    let dashboard = build_dashboard(provider_url)?;

    let company = dashboard.company(symbol).await?;
    println!("🏢 {}", company.label());
    println!("   {} | {} | {}", company.full_name, company.isin, company.currency);

    let logo = dashboard.logo(&company.symbol).await?;
    let marker = if logo.is_found() { "" } else { " (fallback)" };
    let logo_url = logo
        .map(|url| url.as_ref().clone())
        .unwrap_or_fallback(FALLBACK_LOGO_URL.to_string());
    println!("   🖼️  Logo: {}{}", logo_url, marker);

    println!("\n{}\n", RULE);
    let profile = dashboard.profile(&company.symbol, translate).await?;
    println!("📝 {}", profile.translated.as_deref().unwrap_or(&profile.description));

    println!("\n{}\n", RULE);
    match dashboard.information(&company.symbol).await {
        Ok(info) => {
            let (left, right) = split_halves(&info.fields);
            println!("📊 Market information");
            for row in 0..left.len().max(right.len()) {
                let cell = |half: &[(String, String)]| {
                    half.get(row)
                        .map(|(k, v)| format!("{:<20} {:<18}", k, v))
                        .unwrap_or_default()
                };
                println!("   {}  {}", cell(&left), cell(&right));
            }
        }
        Err(e) => eprintln!("⚠️  Could not load market information: {}", e),
    }

    println!("\n{}\n", RULE);
    match dashboard.technical(&company.symbol, interval).await {
        Ok(indicators) => {
            println!("📈 Technical indicators ({})", interval.label());
            for indicator in indicators.iter() {
                println!("   {:<20} {:>12.4}  {}", indicator.name, indicator.value, indicator.signal);
            }
        }
        Err(e) => eprintln!("⚠️  Could not load technical indicators: {}", e),
    }

    println!("\n{}\n", RULE);
    match dashboard.ratios(&company.symbol).await?.ok() {
        Some(ratios) => {
            println!("💹 Key ratios");
            for (label, value) in &ratios.ratios {
                println!("   {:<28} {:>16.2}", label, value);
            }
        }
        None => println!("💹 {}", RATIOS_NOT_FOUND),
    }

    println!("\n{}\n", RULE);
    match dashboard.news(&company.symbol).await?.ok() {
        Some(news) => {
            println!("📰 Latest news");
            for item in news.iter() {
                println!("   {}  {}", item.published, item.title);
                println!("              {}", item.link);
            }
        }
        None => println!("📰 {}", NEWS_NOT_FOUND),
    }

    Ok(())
}
