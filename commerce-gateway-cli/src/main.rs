//! Commerce Gateway CLI - command-line front end for the commerce platform gateway
//!
//! Lists supported platforms, fetches normalized catalogs from configured platform
//! accounts, creates orders and updates stock levels.
//!
//! # Configuration
//!
//! Platform accounts are read from a TOML file (`--config`, `GATEWAY_CONFIG`, default
//! `gateway.toml`). Credentials can reference environment variables with
//! `{ env = "VAR" }`; with the default `dotenv` feature a `.env` file in the working
//! directory is loaded first.
//!
//! # Output
//!
//! Results are printed to stdout as JSON. Logs go to stderr (`--log-format pretty|json`,
//! `LOG_FORMAT`; filtering via `RUST_LOG`).

mod observability;

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use commerce_gateway::{Gateway, GatewayConfig, NormalizedProduct, OrderRequest, Platform};
use futures::future::join_all;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::observability::{LogFormat, init_observability};

/// Uniform access to e-commerce platform APIs.
#[derive(Debug, Parser)]
#[command(name = "commerce-gateway", version, about)]
struct Cli {
    /// Gateway configuration file
    #[arg(short, long, env = "GATEWAY_CONFIG", default_value = "gateway.toml", global = true)]
    config: PathBuf,

    /// Log output format
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List supported platforms and their capabilities
    Platforms,

    /// Fetch products from configured platform accounts (default: all)
    Products {
        /// Account names from the configuration file
        names: Vec<String>,
    },

    /// Create an order on a configured platform account
    Order {
        /// Account name from the configuration file
        name: String,

        /// JSON file with the order in the platform's native shape
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Set a product's stock level on a configured platform account
    Inventory {
        /// Account name from the configuration file
        name: String,

        /// Platform product id
        product_id: String,

        /// New stock level
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
}

#[derive(Debug, Serialize)]
struct PlatformRow {
    id: &'static str,
    name: &'static str,
    capabilities: Vec<&'static str>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    #[cfg(feature = "dotenv")]
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_observability(cli.log_format);

    match cli.command {
        Command::Platforms => {
            print_json(&platform_rows())?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Products { names } => {
            let complete = fetch_products(&load_gateway(&cli.config)?, names).await?;
            Ok(if complete { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
        Command::Order { name, file } => {
            let gateway = load_gateway(&cli.config)?;
            let content = std::fs::read_to_string(&file)
                .with_context(|| format!("cannot read order file {}", file.display()))?;
            let order: Value = serde_json::from_str(&content)
                .with_context(|| format!("order file {} is not valid JSON", file.display()))?;

            let result = gateway
                .configured(&name)?
                .create_order(OrderRequest(order))
                .await
                .with_context(|| format!("creating order on {name}"))?;
            flush_audit().await;

            print_json(&result)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Inventory { name, product_id, quantity } => {
            let gateway = load_gateway(&cli.config)?;
            let result = gateway
                .configured(&name)?
                .update_inventory(&product_id, quantity)
                .await
                .with_context(|| format!("updating inventory of {product_id} on {name}"))?;
            flush_audit().await;

            print_json(&result)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn load_gateway(path: &Path) -> Result<Gateway> {
    let config = GatewayConfig::from_file(path)
        .with_context(|| format!("loading configuration from {}", path.display()))?;
    info!(accounts = config.platforms.len(), "configuration loaded");
    Ok(Gateway::from_config(config)?)
}

fn platform_rows() -> Vec<PlatformRow> {
    Platform::ALL
        .into_iter()
        .map(|platform| PlatformRow {
            id: platform.id(),
            name: platform.display_name(),
            capabilities: platform.capabilities().iter().map(|c| c.as_str()).collect(),
        })
        .collect()
}

/// Fetches every named account concurrently and prints the catalogs. A failing account is
/// reported on stderr and does not stop the others. Returns false if any account failed.
async fn fetch_products(gateway: &Gateway, names: Vec<String>) -> Result<bool> {
    let names = if names.is_empty() {
        gateway.configured_names().map(str::to_owned).collect()
    } else {
        names
    };

    let fetches = names.iter().map(|name| async move {
        let result = match gateway.configured(name) {
            Ok(handle) => handle.fetch_products().await,
            Err(error) => Err(error),
        };
        (name.as_str(), result)
    });

    let mut catalog: BTreeMap<&str, Vec<NormalizedProduct>> = BTreeMap::new();
    let mut failed = false;
    for (name, result) in join_all(fetches).await {
        match result {
            Ok(products) => {
                catalog.insert(name, products);
            }
            Err(error) => {
                warn!(account = name, %error, "fetch failed");
                eprintln!("{name}: {error}");
                failed = true;
            }
        }
    }

    print_json(&catalog)?;
    Ok(!failed)
}

/// Lets the detached audit task run before the runtime shuts down.
async fn flush_audit() {
    tokio::task::yield_now().await;
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_inventory_with_negative_quantity() {
        let cli = Cli::try_parse_from(["commerce-gateway", "inventory", "warehouse", "12", "-3"])
            .unwrap();
        match cli.command {
            Command::Inventory { name, product_id, quantity } => {
                assert_eq!(name, "warehouse");
                assert_eq!(product_id, "12");
                assert_eq!(quantity, -3);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_products_and_global_flags() {
        let cli = Cli::try_parse_from([
            "commerce-gateway",
            "products",
            "main-shop",
            "warehouse",
            "--config",
            "/etc/gateway.toml",
            "--log-format",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.config, PathBuf::from("/etc/gateway.toml"));
        assert_eq!(cli.log_format, LogFormat::Json);
        assert!(matches!(cli.command, Command::Products { ref names } if names.len() == 2));
    }

    #[test]
    fn test_order_requires_file() {
        assert!(Cli::try_parse_from(["commerce-gateway", "order", "main-shop"]).is_err());
    }

    #[test]
    fn test_platform_rows() {
        let rows = platform_rows();
        assert_eq!(rows.len(), Platform::ALL.len());

        let squarespace = rows.iter().find(|row| row.id == "squarespace").unwrap();
        assert_eq!(squarespace.capabilities, ["fetch_products"]);

        let amazon = rows.iter().find(|row| row.id == "amazon").unwrap();
        assert!(amazon.capabilities.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_products_reports_unknown_account() {
        let gateway = Gateway::from_config(GatewayConfig::default()).unwrap();
        let complete = fetch_products(&gateway, vec!["missing".to_owned()]).await.unwrap();
        assert!(!complete);
    }
}
