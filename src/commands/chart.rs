use crate::commands::build_dashboard;
use crate::error::Result;
use crate::server::api::ChartQuery;
use crate::utils::format_date;

pub async fn run(provider_url: &str, symbol: &str, query: ChartQuery, json: bool) -> Result<()> {
    let request = query.into_request()?;
    let dashboard = build_dashboard(provider_url)?;
    let spec = dashboard.chart(symbol, &request).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&spec)?);
        return Ok(());
    }

    println!("📈 {}", spec.title);
    if let (Some(first), Some(last)) = (spec.dates.first(), spec.dates.last()) {
        println!(
            "   {} bars shown, axis {} → {}",
            spec.window,
            format_date(first),
            format_date(last)
        );
    }

    if !spec.candles.is_empty() {
        if let Some(candle) = spec.candles.last() {
            println!(
                "   Last candle {}: O {:.2} H {:.2} L {:.2} C {:.2}",
                format_date(&candle.date),
                candle.open,
                candle.high,
                candle.low,
                candle.close
            );
        }
        return Ok(());
    }

    for series in &spec.series {
        let present = series.values.iter().flatten().count();
        match series.values.iter().rev().flatten().next() {
            Some(last) => println!("   {:<40} last {:>12.4}  ({} points)", series.name, last, present),
            None => println!("   {:<40} no values in window", series.name),
        }
    }
    Ok(())
}
