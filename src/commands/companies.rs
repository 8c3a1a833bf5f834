use crate::commands::build_dashboard;
use crate::error::Result;

pub async fn run(provider_url: &str, search: Option<&str>) -> Result<()> {
    let dashboard = build_dashboard(provider_url)?;
    let companies = dashboard.companies().await?;

    let selected = match search {
        Some(query) => companies.search(query),
        None => companies.iter().cloned().collect(),
    };

    if selected.is_empty() {
        println!("⚠️  No companies match");
        return Ok(());
    }

    println!("📋 {} of {} companies\n", selected.len(), companies.len());
    println!("{:<8} {:<32} {:<14} {}", "SYMBOL", "NAME", "ISIN", "CURRENCY");
    for company in &selected {
        println!(
            "{:<8} {:<32} {:<14} {}",
            company.symbol, company.short_name, company.isin, company.currency
        );
    }
    Ok(())
}
