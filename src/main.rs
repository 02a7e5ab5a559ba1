//! FX Signal Copier
//!
//! Parses free-form trade signals from a copy-trading channel, sizes the
//! position from account balance and configured risk, and forwards the
//! orders to the brokerage API.

mod api;
mod bot;
mod models;
mod signal;
mod trading;

use std::io::Read;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use crate::api::BrokerClient;
use crate::bot::Bot;
use crate::models::symbol;
use crate::signal::{normalize, parse};
use crate::trading::{build_report, compute_risk, RiskConfig};

/// FX signal-copier CLI.
#[derive(Parser)]
#[command(name = "fxcopier")]
#[command(about = "Parse trade signals and size positions by configured risk", long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a signal message and show the extracted trade
    Parse {
        /// Signal text; read from stdin when omitted
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Parse a signal and print the full risk report without trading
    Calculate {
        /// Signal text; read from stdin when omitted
        #[arg(short, long)]
        message: Option<String>,

        /// Account balance to size against
        #[arg(short, long)]
        balance: f64,

        /// Price to pin a market-now entry to (offline substitute for a
        /// live quote)
        #[arg(short, long)]
        price: Option<f64>,
    },

    /// Run the full pipeline against the broker account
    Trade {
        /// Signal text; read from stdin when omitted
        #[arg(short, long)]
        message: Option<String>,

        /// Parse and report but do not place orders
        #[arg(long)]
        dry_run: bool,
    },

    /// Show the active risk configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Setup logging
    let log_level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = RiskConfig::from_env()?;

    match cli.command {
        Commands::Parse { message } => {
            let text = read_message(message)?;
            let lines = normalize(&text)?;
            let trade = parse(&lines, &config)?;

            println!("\n=== Parsed Signal ===");
            println!("Order Type:   {}", trade.order_type);
            println!("Symbol:       {}", trade.symbol);
            println!("Entry:        {}", trade.entry);
            println!("Stop Loss:    {}", trade.stop_loss);
            for (i, tp) in trade.take_profits.iter().enumerate() {
                println!("TP {}:         {}", i + 1, tp);
            }
            println!("Risk Policy:  {}", trade.risk_policy.as_str());
        }

        Commands::Calculate {
            message,
            balance,
            price,
        } => {
            let text = read_message(message)?;
            let balance = Decimal::try_from(balance)?;

            let lines = normalize(&text)?;
            let mut trade = parse(&lines, &config)?;

            if trade.entry.is_market() {
                let price = price.context(
                    "signal executes at the market; pass --price to pin the entry offline",
                )?;
                trade.resolve_entry(Decimal::try_from(price)?);
            }

            compute_risk(&mut trade, balance, &config)?;
            print_report(&build_report(&trade, balance, &config));
        }

        Commands::Trade { message, dry_run } => {
            let text = read_message(message)?;

            let broker = BrokerClient::from_env()?;
            let bot = Bot::new(config, broker, dry_run);

            info!(dry_run, "handling signal");
            match bot.handle_message(&text).await? {
                None => println!("Message ignored: does not look like a trading signal."),
                Some(outcome) => {
                    print_report(&outcome.report);

                    if dry_run {
                        println!("\nDry run: no orders were placed.");
                    } else {
                        println!("\nOrders placed for {}:", outcome.trade.symbol);
                        for order in &outcome.orders {
                            println!("  {} ({})", order.order_id, order.string_code);
                        }
                    }
                }
            }
        }

        Commands::Config => {
            println!("\n=== Risk Configuration ===\n");
            println!("Policy:          {}", config.policy.as_str());
            println!("Risk Factor:     {}%", config.risk_factor * Decimal::from(100));
            println!("Risk Per Trade:  {}%", config.risk_per_trade * Decimal::from(100));
            println!("Trailing Stop:   {}", config.trailing_stop);
            println!("Instruments:     {}", symbol::SYMBOLS.len());
        }
    }

    Ok(())
}

/// Message from the flag, or the whole of stdin.
fn read_message(message: Option<String>) -> Result<String> {
    match message {
        Some(text) => Ok(text),
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read signal from stdin")?;
            Ok(buffer)
        }
    }
}

/// Render report rows as an aligned two-column table.
fn print_report(rows: &[(String, String)]) {
    let width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);

    println!("\n=== Trade Information ===");
    for (label, value) in rows {
        println!("{label:<width$}  {value}");
    }
}
