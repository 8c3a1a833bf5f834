pub mod chart;
pub mod companies;
pub mod company;
pub mod serve;

use crate::error::Result;
use crate::server::SharedDashboard;
use crate::services::{Dashboard, MarketDataProvider, ProviderClient};
use std::sync::Arc;

/// Dashboard backed by the HTTP provider at `provider_url`
pub fn build_dashboard(provider_url: &str) -> Result<SharedDashboard> {
    let provider: Arc<dyn MarketDataProvider> = Arc::new(ProviderClient::new(provider_url)?);
    Ok(Arc::new(Dashboard::new(provider)?))
}
