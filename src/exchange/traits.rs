// =================================================================
// exchange/traits.rs - Futures venue interface
// =================================================================

use async_trait::async_trait;

use super::{
    error::ExchangeError,
    types::{AccountInfo, ExchangeInfo, LeverageAck, OrderAck, OrderTicket, TickerPrice},
};

/// Calls the order service needs from a futures venue.
#[async_trait]
pub trait FuturesExchange: Send + Sync {
    /// Symbol metadata, including LOT_SIZE filters
    async fn exchange_info(&self) -> Result<ExchangeInfo, ExchangeError>;

    /// Balances and positions of the account behind the credentials
    async fn account(&self) -> Result<AccountInfo, ExchangeError>;

    async fn change_leverage(&self, symbol: &str, leverage: u32) -> Result<LeverageAck, ExchangeError>;

    /// Last traded price
    async fn ticker_price(&self, symbol: &str) -> Result<TickerPrice, ExchangeError>;

    async fn create_order(&self, ticket: &OrderTicket) -> Result<OrderAck, ExchangeError>;
}
