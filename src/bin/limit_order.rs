//! Лимитный ордер (GTC) на Binance USDT-M Futures
//!
//! ```bash
//! limit_order BTCUSDT SELL 0.01 70000 --test
//! ```

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use futures_order_bot::cli::{run_order, CommonArgs};
use futures_order_bot::order::RawOrder;

#[derive(Parser)]
#[command(name = "limit_order", about = "Limit Orders Bot")]
struct Args {
    /// Symbol e.g., BTCUSDT
    symbol: String,
    /// BUY or SELL
    side: String,
    /// Quantity e.g., 0.001
    quantity: String,
    /// Limit price e.g., 60000
    price: String,
    #[command(flatten)]
    common: CommonArgs,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();
    let raw = RawOrder::limit(args.symbol, args.side, args.quantity, args.price);
    run_order(raw, &args.common).await
}
