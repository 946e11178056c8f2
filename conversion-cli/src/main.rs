//! Conversion CLI
//!
//! Command-line interface for the Currency Conversion API.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use conversion_client::ConversionClient;
use conversion_types::{CurrencyCode, Quantity};

#[derive(Parser)]
#[command(name = "conversion")]
#[command(author, version, about = "Currency Conversion API CLI client", long_about = None)]
struct Cli {
    /// Base URL of the Currency Conversion API
    #[arg(
        long,
        env = "CONVERSION_API_URL",
        default_value = "http://localhost:8282"
    )]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an amount between two currencies
    Convert {
        /// Source currency (e.g. USD)
        from: String,
        /// Target currency (e.g. INR)
        to: String,
        /// Amount to convert
        quantity: String,
        /// Print the full JSON result
        #[arg(long)]
        json: bool,
    },
    /// Show fallback provider statuses
    Providers,
    /// Check API health
    Health,
}

fn parse_currency(s: &str) -> Result<CurrencyCode> {
    s.parse()
        .with_context(|| format!("Invalid currency: {}", s))
}

fn parse_quantity(s: &str) -> Result<Quantity> {
    s.parse()
        .with_context(|| format!("Invalid quantity: {}", s))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let client = ConversionClient::new(&cli.api_url);

    match cli.command {
        Commands::Health => {
            let healthy = client.health().await?;
            if healthy {
                println!("✓ API is healthy");
            } else {
                println!("✗ API is not healthy");
                std::process::exit(1);
            }
        }

        Commands::Convert {
            from,
            to,
            quantity,
            json,
        } => {
            let from = parse_currency(&from)?;
            let to = parse_currency(&to)?;
            let quantity = parse_quantity(&quantity)?;

            let result = client.convert(&from, &to, quantity).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!(
                    "{} {} = {} {} (rate {}, {})",
                    result.quantity,
                    result.from_currency,
                    result.total_amount,
                    result.to_currency,
                    result.rate,
                    result.provenance
                );
            }
        }

        Commands::Providers => {
            for status in client.provider_statuses().await? {
                println!("{}", status);
            }
        }
    }

    Ok(())
}
