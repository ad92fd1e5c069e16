//! Общая часть CLI-команд market_order / limit_order / oco_order
//! Загрузка настроек, логирование, клиент биржи и печать результата

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Args;
use log::error;

use crate::bot::{BotError, ExecutionMode, OrderReport, OrderService};
use crate::config::{BotSettings, Credentials};
use crate::exchange::create_exchange;
use crate::logging::init_logging;
use crate::order::{OrderType, RawOrder};

/// Flags shared by every order command.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Simulate the order (no API calls, balance bypassed)
    #[arg(long)]
    pub test: bool,

    /// Settings file (defaults to config/bot.yaml when present)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl CommonArgs {
    pub fn mode(&self) -> ExecutionMode {
        ExecutionMode::from(self.test)
    }
}

/// Builds the service, places `raw` and prints the outcome.
pub async fn run_order(raw: RawOrder, args: &CommonArgs) -> anyhow::Result<ExitCode> {
    let settings = BotSettings::load(args.config.as_deref())?;
    init_logging(settings.log_file.as_deref())?;

    let mode = args.mode();
    let credentials = match Credentials::from_env() {
        Ok(credentials) => credentials,
        Err(_) if mode.is_simulation() => Credentials::default(),
        Err(e) => return Err(e.into()),
    };

    let exchange = create_exchange(&settings, credentials)?;
    let service = OrderService::new(Arc::clone(&exchange), &settings);

    if mode.is_simulation() {
        println!("TEST MODE: Simulating {} order (no API call)...", raw.order_type());
    }

    match service.place(&raw, mode).await {
        Ok(report) => {
            print_report(&report);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            print_failure(&e);
            error!("{} order failed: {}", raw.order_type(), e);
            Ok(ExitCode::FAILURE)
        }
    }
}

pub fn print_report(report: &OrderReport) {
    let balance = &report.balance;
    if balance.simulated {
        println!("TEST MODE: Simulated balance {} {} - Proceeding!", balance.available, balance.asset);
    } else {
        println!("{} Available Balance: {}", balance.asset, balance.available);
        match balance.position {
            Some(position) => println!("Current Position: {} {}", position, report.symbol),
            None => println!("No open position - will open new."),
        }
    }

    if report.step.changed() {
        println!(
            "Auto-rounded qty to {} (step size: {})",
            report.step.rounded, report.step.step
        );
    }

    let title = match report.order_type {
        OrderType::Market => "Market Order",
        OrderType::Limit => "Limit Order",
        OrderType::Oco => "OCO Order",
    };
    let prefix = if report.mode.is_simulation() { "SIMULATED " } else { "" };
    println!("🎉 {}{} Placed Successfully!", prefix, title);
    println!("Symbol: {}", report.symbol);
    println!("Side: {}", report.side);
    println!("Quantity: {}", report.quantity);

    if let Some(price) = report.reference_price {
        println!("Approx. Price: ${}", format_usd(price));
    }
    if let Some(price) = report.price {
        println!("Price: {}", price);
    }
    if let (Some(stop), Some(stop_limit)) = (report.stop_price, report.stop_limit_price) {
        println!("Stop Price: {} / Stop Limit: {}", stop, stop_limit);
    }
    if let Some(id) = report.order_id {
        println!("Order ID: {}", id);
    }
    if let Some(id) = report.order_list_id {
        println!("Order List ID: {}", id);
    }
    if let Some(status) = &report.status {
        println!("Status: {}", status);
    }
}

pub fn print_failure(err: &BotError) {
    match err {
        BotError::Validation(_) => println!("{}", err),
        BotError::InsufficientBalance { .. } | BotError::Leverage { .. } => println!("⚠️ {}", err),
        _ => println!("❌ {}", err),
    }
}

/// `60500` -> `60,500.00`
fn format_usd(value: rust_decimal::Decimal) -> String {
    let fixed = format!("{:.2}", value.round_dp(2));
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((&fixed, "00"));
    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(digits) => ("-", digits),
        None => ("", int_part),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{}{}.{}", sign, grouped, frac_part)
}
