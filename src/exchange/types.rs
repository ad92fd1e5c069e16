// =================================================================
// exchange/types.rs - Binance USDT-M futures REST payloads
// =================================================================

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::order::{CanonicalOrder, OrderKind, OrderType, Side, GOOD_TILL_CANCELLED};

/// `GET /fapi/v1/exchangeInfo` (only the parts we read)
#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeInfo {
    pub symbols: Vec<SymbolInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SymbolInfo {
    pub symbol: String,
    #[serde(default)]
    pub filters: Vec<SymbolFilter>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "filterType")]
pub enum SymbolFilter {
    #[serde(rename = "LOT_SIZE", rename_all = "camelCase")]
    LotSize {
        step_size: Decimal,
        #[serde(default)]
        min_qty: Option<Decimal>,
        #[serde(default)]
        max_qty: Option<Decimal>,
    },
    #[serde(other)]
    Other,
}

impl ExchangeInfo {
    /// LOT_SIZE step for `symbol`, if the venue lists one.
    pub fn step_size(&self, symbol: &str) -> Option<Decimal> {
        self.symbols
            .iter()
            .find(|s| s.symbol == symbol)?
            .filters
            .iter()
            .find_map(|f| match f {
                SymbolFilter::LotSize { step_size, .. } => Some(*step_size),
                _ => None,
            })
    }
}

/// `GET /fapi/v2/account`
#[derive(Debug, Clone, Deserialize)]
pub struct AccountInfo {
    #[serde(default)]
    pub assets: Vec<AccountAsset>,
    #[serde(default)]
    pub positions: Vec<PositionInfo>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountAsset {
    pub asset: String,
    pub available_balance: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionInfo {
    pub symbol: String,
    pub position_amt: Decimal,
}

impl AccountInfo {
    /// Available balance of `asset`, zero when the account does not list it.
    pub fn available(&self, asset: &str) -> Decimal {
        self.assets
            .iter()
            .find(|a| a.asset == asset)
            .map(|a| a.available_balance)
            .unwrap_or(Decimal::ZERO)
    }

    pub fn position(&self, symbol: &str) -> Option<Decimal> {
        self.positions
            .iter()
            .find(|p| p.symbol == symbol)
            .map(|p| p.position_amt)
    }
}

/// `GET /fapi/v1/ticker/price`
#[derive(Debug, Clone, Deserialize)]
pub struct TickerPrice {
    pub symbol: String,
    pub price: Decimal,
}

/// `POST /fapi/v1/leverage`
#[derive(Debug, Clone, Deserialize)]
pub struct LeverageAck {
    pub symbol: String,
    pub leverage: u32,
}

/// `POST /fapi/v1/order` response. OCO acknowledgements carry `orderListId` instead of `orderId`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderAck {
    #[serde(default)]
    pub order_id: Option<u64>,
    #[serde(default)]
    pub order_list_id: Option<i64>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Binance error body: `{"code":-2019,"msg":"Margin is insufficient."}`
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub code: i64,
    pub msg: String,
}

/// Parameters of one order submission, in the order the venue documents them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderTicket {
    pub symbol: String,
    pub side: Side,
    pub order_type: OrderType,
    pub quantity: Decimal,
    pub price: Option<Decimal>,
    pub stop_price: Option<Decimal>,
    pub stop_limit_price: Option<Decimal>,
}

impl OrderTicket {
    /// Ticket for a validated order with its step-rounded quantity.
    pub fn new(order: &CanonicalOrder, quantity: Decimal) -> Self {
        let (stop_price, stop_limit_price) = match order.kind {
            OrderKind::Oco {
                stop_price,
                stop_limit_price,
                ..
            } => (Some(stop_price), Some(stop_limit_price)),
            _ => (None, None),
        };

        Self {
            symbol: order.symbol.clone(),
            side: order.side,
            order_type: order.order_type(),
            quantity,
            price: order.kind.price(),
            stop_price,
            stop_limit_price,
        }
    }

    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("symbol", self.symbol.clone()),
            ("side", self.side.to_string()),
            ("type", self.order_type.to_string()),
        ];

        if self.order_type == OrderType::Limit {
            params.push(("timeInForce", GOOD_TILL_CANCELLED.to_string()));
        }
        params.push(("quantity", self.quantity.to_string()));
        if let Some(price) = self.price {
            params.push(("price", price.to_string()));
        }
        if let Some(stop_price) = self.stop_price {
            params.push(("stopPrice", stop_price.to_string()));
        }
        if let Some(stop_limit_price) = self.stop_limit_price {
            params.push(("stopLimitPrice", stop_limit_price.to_string()));
            params.push(("stopLimitTimeInForce", GOOD_TILL_CANCELLED.to_string()));
        }

        params
    }
}
