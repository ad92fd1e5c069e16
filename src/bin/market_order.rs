//! Рыночный ордер на Binance USDT-M Futures
//!
//! ```bash
//! market_order BTCUSDT BUY 0.001 --test
//! ```

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use futures_order_bot::cli::{run_order, CommonArgs};
use futures_order_bot::order::RawOrder;

#[derive(Parser)]
#[command(name = "market_order", about = "Market Orders Bot")]
struct Args {
    /// Symbol e.g., BTCUSDT
    symbol: String,
    /// BUY or SELL
    side: String,
    /// Quantity e.g., 0.001
    quantity: String,
    #[command(flatten)]
    common: CommonArgs,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();
    let raw = RawOrder::market(args.symbol, args.side, args.quantity);
    run_order(raw, &args.common).await
}
