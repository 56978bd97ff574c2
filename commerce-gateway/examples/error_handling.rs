//! Error handling example showing how to react to the different gateway error kinds.
//!
//! Tries every operation on every platform and sorts the outcomes: capability errors
//! are expected and skipped, validation errors point at the input, transport errors
//! are left to the caller's retry policy.
//!
//! # Running this example
//!
//! ```bash
//! export SHOPIFY_STORE=your-store.myshopify.com
//! export SHOPIFY_TOKEN=shpat_...
//! cargo run --example error_handling
//! ```

#![allow(
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::use_debug,
    reason = "examples are allowed to use println and simple formatting"
)]

use std::env;

use commerce_gateway::{
    Capability, Gateway, GatewayError, OrderRequest, Platform, PlatformConfig, PlatformHandle,
};
use serde_json::json;

fn explain(operation: &str, error: &GatewayError) {
    match error {
        GatewayError::Unsupported { platform, capability } => {
            println!("  {operation}: skipped, {platform} has no {capability} API");
        }
        GatewayError::InvalidQuantity(quantity) => {
            println!("  {operation}: rejected locally, quantity {quantity} is negative");
        }
        GatewayError::InvalidInput(message) | GatewayError::Config(message) => {
            println!("  {operation}: fix the input: {message}");
        }
        error if error.is_transport() => match error.status() {
            Some(401 | 403) => println!("  {operation}: credentials refused ({error})"),
            Some(status) => println!("  {operation}: platform answered {status}"),
            None => println!("  {operation}: network failure, retry later ({error})"),
        },
        other => eprintln!("  {operation}: unexpected error: {other}"),
    }
}

async fn exercise(handle: &PlatformHandle) {
    println!("{} [{}]", handle.platform(), handle.capabilities());

    match handle.fetch_products().await {
        Ok(products) => println!("  fetch_products: {} products", products.len()),
        Err(error) => explain("fetch_products", &error),
    }

    if handle.capabilities().supports(Capability::UpdateInventory) {
        // Negative stock never leaves the process.
        if let Err(error) = handle.update_inventory("1", -1).await {
            explain("update_inventory", &error);
        }
    }

    if let Err(error) = handle.create_order(OrderRequest(json!({"line_items": []}))).await {
        explain("create_order", &error);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_env_filter("warn,audit=info").init();

    let store = env::var("SHOPIFY_STORE").unwrap_or_else(|_| "example.myshopify.com".to_owned());
    let config = PlatformConfig::new("shopify")
        .with_store(store)
        .with_access_token(commerce_gateway::platform::Secret::env("SHOPIFY_TOKEN"));

    let gateway = Gateway::new()?;

    match gateway.platform("shopify", &config) {
        Ok(handle) => exercise(&handle).await,
        Err(error) => explain("resolve shopify", &error),
    }

    // Squarespace is read-only: both writes fail before any request is made.
    let squarespace = PlatformConfig::new("squarespace").with_access_token("unused");
    exercise(&gateway.platform("squarespace", &squarespace)?).await;

    if let Err(error) = gateway.platform("etsy", &PlatformConfig::default()) {
        println!("etsy: {error}");
    }

    println!("supported platforms:");
    for platform in Platform::ALL {
        println!("  {:<18} {}", platform.id(), platform.capabilities());
    }

    Ok(())
}
