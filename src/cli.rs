use clap::{Parser, Subcommand};

use crate::commands;
use crate::error::Result;
use crate::server::api::ChartQuery;
use crate::utils::{get_port, get_provider_base_url};

#[derive(Parser)]
#[command(name = "bistscope")]
#[command(about = "BIST company explorer", long_about = None)]
pub struct Cli {
    /// Reference data provider URL (overrides BIST_PROVIDER_URL)
    #[arg(long, global = true)]
    pub provider_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server
    Serve {
        /// Port to listen on (overrides BIST_PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// List companies
    Companies {
        /// Filter by symbol or name
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show everything known about one company
    Company {
        symbol: String,
        /// Translate the profile to Turkish
        #[arg(long)]
        translate: bool,
        /// Technical indicator interval (5mins .. monthly)
        #[arg(long, default_value = "1hour")]
        interval: String,
    },
    /// Compute a chart and print a summary (or the full JSON)
    Chart {
        symbol: String,
        /// Trailing bars to display
        #[arg(short, long)]
        window: Option<usize>,
        /// line, area or candlestick
        #[arg(long)]
        chart: Option<String>,
        /// open, high, low, close or volume
        #[arg(long)]
        column: Option<String>,
        /// sma, stddev or polyreg
        #[arg(short, long)]
        model: Option<String>,
        /// Window of the first moving average or band
        #[arg(long)]
        first_window: Option<usize>,
        /// Enable a second moving average or band with this window
        #[arg(long)]
        second_window: Option<usize>,
        /// Polynomial degree
        #[arg(long)]
        degree: Option<usize>,
        /// Forecast horizon in days
        #[arg(long)]
        horizon: Option<usize>,
        /// Print the chart description as JSON
        #[arg(long)]
        json: bool,
    },
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    let provider_url = cli.provider_url.unwrap_or_else(get_provider_base_url);

    match cli.command {
        Commands::Serve { port } => {
            commands::serve::run(&provider_url, port.unwrap_or_else(get_port)).await
        }
        Commands::Companies { search } => {
            commands::companies::run(&provider_url, search.as_deref()).await
        }
        Commands::Company {
            symbol,
            translate,
            interval,
        } => commands::company::run(&provider_url, &symbol, translate, &interval).await,
        Commands::Chart {
            symbol,
            window,
            chart,
            column,
            model,
            first_window,
            second_window,
            degree,
            horizon,
            json,
        } => {
            let query = ChartQuery {
                window,
                chart,
                column,
                model,
                sma1_window: first_window,
                sma2: second_window.map(|_| true),
                sma2_window: second_window,
                band1_window: first_window,
                band2: second_window.map(|_| true),
                band2_window: second_window,
                degree,
                horizon,
                ..ChartQuery::default()
            };
            commands::chart::run(&provider_url, &symbol, query, json).await
        }
    }
}
