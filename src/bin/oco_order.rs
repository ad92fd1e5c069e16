//! OCO: тейк-профит (limit) + стоп-лосс (stop-limit) одной заявкой
//!
//! ```bash
//! oco_order BTCUSDT SELL 0.01 72000 68000 67900 --test
//! ```

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use futures_order_bot::cli::{run_order, CommonArgs};
use futures_order_bot::order::RawOrder;

#[derive(Parser)]
#[command(name = "oco_order", about = "OCO Orders Bot")]
struct Args {
    /// Symbol e.g., BTCUSDT
    symbol: String,
    /// BUY or SELL
    side: String,
    /// Quantity e.g., 0.001
    quantity: String,
    /// Take-profit limit price
    price: String,
    /// Stop trigger price
    stop_price: String,
    /// Stop-limit price
    stop_limit_price: String,
    #[command(flatten)]
    common: CommonArgs,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();
    let raw = RawOrder::oco(
        args.symbol,
        args.side,
        args.quantity,
        args.price,
        args.stop_price,
        args.stop_limit_price,
    );
    run_order(raw, &args.common).await
}
