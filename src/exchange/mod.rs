// exchange/mod.rs
pub mod binance;
pub mod error;
pub mod traits;
pub mod types;

// Re-export main interfaces for easy access
pub use binance::{BinanceFuturesClient, MAINNET_BASE_URL, TESTNET_BASE_URL};
pub use error::ExchangeError;
pub use traits::FuturesExchange;
pub use types::*;

use std::sync::Arc;

use crate::config::{BotSettings, Credentials};

/// Builds the Binance futures client described by `settings`.
pub fn create_exchange(
    settings: &BotSettings,
    credentials: Credentials,
) -> Result<Arc<dyn FuturesExchange>, ExchangeError> {
    let client = BinanceFuturesClient::new(&settings.base_url, credentials, settings.recv_window_ms)?;
    Ok(Arc::new(client))
}
