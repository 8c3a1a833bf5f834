use crate::commands::build_dashboard;
use crate::error::{AppError, Result};
use crate::server;

pub async fn run(provider_url: &str, port: u16) -> Result<()> {
    println!("🚀 Starting bistscope server on port {}", port);
    println!("🔗 Reference data provider: {}", provider_url);

    let dashboard = build_dashboard(provider_url)?;

    // Warm the company list so the first request does not pay for it
    match dashboard.companies().await {
        Ok(companies) => println!("✅ Loaded {} companies", companies.len()),
        Err(e) => {
            eprintln!("⚠️  Warning: Failed to load company list: {}", e);
            eprintln!("   Server will start anyway and retry on the first request.");
        }
    }

    server::serve(dashboard, port)
        .await
        .map_err(|e| AppError::Other(format!("Server error: {}", e)))
}
