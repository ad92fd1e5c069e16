//! Система логирования с настройкой уровней через переменные окружения
//! Использует env_logger; при заданном файле пишет в него (append), как bot.log
//!
//! Уровни настраиваются через RUST_LOG (по умолчанию info):
//! ```bash
//! RUST_LOG=debug market_order BTCUSDT BUY 0.001 --test
//! RUST_LOG=futures_order_bot::exchange=debug order_server
//! ```

use std::env;
use std::fs::OpenOptions;
use std::path::Path;

use anyhow::Context;
use env_logger::{Builder, Env, Target};

const DEFAULT_LEVEL: &str = "info";

/// Инициализация логирования. Без файла логи идут в stderr.
pub fn init_logging(log_file: Option<&Path>) -> anyhow::Result<()> {
    let mut builder = Builder::from_env(Env::default().default_filter_or(DEFAULT_LEVEL));
    builder
        .format_timestamp_secs()
        .format_module_path(true)
        .format_target(false);

    if let Some(path) = log_file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("cannot open log file {}", path.display()))?;
        builder.target(Target::Pipe(Box::new(file)));
    }

    builder.try_init().context("logger already initialized")?;

    log::info!("=== Bot initialized, log level: {} ===", log_level());
    Ok(())
}

/// Текущий уровень логирования
pub fn log_level() -> String {
    env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LEVEL.to_string())
}
