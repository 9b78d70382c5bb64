//! grizly-orders - place grizly.cz orders from a Google Sheets shopping list.

use anyhow::Result;
use clap::{Parser, Subcommand};
use grizly_orders::commands::{OrderCommand, ProductCommand};
use grizly_orders::config::{Config, OutputFormat};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "grizly-orders",
    version,
    about = "Make an order on https://grizly.cz from a Google Sheets shopping list",
    long_about = "Reads product URLs and quantities from a worksheet, adds each line to the \
                  grizly.cz cart, and writes name, status, price and weight back to the sheet."
)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true)]
    format: Option<OutputFormat>,

    /// Request timeout in seconds
    #[arg(long, global = true, env = "GRIZLY_TIMEOUT")]
    timeout: Option<u64>,

    /// Last worksheet row to read
    #[arg(long, global = true, env = "GRIZLY_MAX_ROWS")]
    max_rows: Option<u32>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Order every line of a shopping-list worksheet
    #[command(alias = "o")]
    Order {
        /// Session cookie named `4every1_ses` after login
        #[arg(long, env = "GRIZLY_COOKIE")]
        cookie: String,

        /// Google spreadsheet id that contains the shopping list
        #[arg(long)]
        sheet_id: String,

        /// Name of a worksheet in the spreadsheet
        #[arg(long)]
        worksheet_name: String,

        /// Path to JSON file with Google API service-account auth
        #[arg(long, env = "GOOGLE_API_AUTH")]
        google_api_auth: Option<PathBuf>,

        /// Ready OAuth access token, used instead of the service account
        #[arg(long, env = "GOOGLE_ACCESS_TOKEN", hide_env_values = true)]
        access_token: Option<String>,
    },

    /// Resolve product pages without ordering
    #[command(alias = "p")]
    Product {
        /// Session cookie named `4every1_ses` after login
        #[arg(long, env = "GRIZLY_COOKIE")]
        cookie: String,

        /// Product page URL(s)
        #[arg(required = true)]
        urls: Vec<String>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Progress goes to stdout at INFO unless RUST_LOG says otherwise
    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(Level::INFO.to_string()))
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    if let Some(format) = cli.format {
        config.format = format;
    }
    if let Some(timeout) = cli.timeout {
        config.timeout_secs = timeout;
    }
    if let Some(max_rows) = cli.max_rows {
        config.max_rows = max_rows;
    }

    match cli.command {
        Commands::Order {
            cookie,
            sheet_id,
            worksheet_name,
            google_api_auth,
            access_token,
        } => {
            if let Some(path) = google_api_auth {
                config.google_api_auth = path;
            }

            let cmd = OrderCommand::new(config);
            let output = cmd.execute(&cookie, &sheet_id, &worksheet_name, access_token).await?;
            println!("{}", output);
        }

        Commands::Product { cookie, urls } => {
            let cmd = ProductCommand::new(config);
            let output = cmd.execute(&cookie, &urls).await?;
            println!("{}", output);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_max_rows_accepted_before_subcommand() {
        let cli = Cli::try_parse_from([
            "grizly-orders",
            "--max-rows",
            "50",
            "order",
            "--cookie",
            "abc",
            "--sheet-id",
            "sheet-1",
            "--worksheet-name",
            "Nákup",
        ])
        .unwrap();

        assert_eq!(cli.max_rows, Some(50));
        assert!(matches!(cli.command, Commands::Order { .. }));
    }

    #[test]
    fn test_max_rows_accepted_after_subcommand() {
        let cli = Cli::try_parse_from([
            "grizly-orders",
            "product",
            "--cookie",
            "abc",
            "--max-rows",
            "120",
            "https://www.grizly.cz/kesu",
        ])
        .unwrap();

        assert_eq!(cli.max_rows, Some(120));
        assert!(matches!(cli.command, Commands::Product { .. }));
    }
}
