//! Типы ордеров: сырой ввод (строки из CLI / JSON) и канонический вид после нормализации

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = ValidationError;

    /// Case-insensitive, no trimming: " buy" is rejected the same way "HOLD" is.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "BUY" => Ok(Side::Buy),
            "SELL" => Ok(Side::Sell),
            _ => Err(ValidationError::InvalidSide(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderType {
    Market,
    Limit,
    Oco,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Market => "MARKET",
            OrderType::Limit => "LIMIT",
            OrderType::Oco => "OCO",
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Time-in-force used for limit orders and the stop-limit leg of OCO orders.
pub const GOOD_TILL_CANCELLED: &str = "GTC";

/// Numeric order fields, named the way the venue names them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderField {
    Quantity,
    Price,
    StopPrice,
    StopLimitPrice,
}

impl OrderField {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderField::Quantity => "quantity",
            OrderField::Price => "price",
            OrderField::StopPrice => "stopPrice",
            OrderField::StopLimitPrice => "stopLimitPrice",
        }
    }
}

impl fmt::Display for OrderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type-specific raw fields. Which prices are required follows from the variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawOrderKind {
    Market,
    Limit {
        price: String,
    },
    Oco {
        price: String,
        stop_price: String,
        stop_limit_price: String,
    },
}

/// Order parameters exactly as the caller typed them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawOrder {
    pub symbol: String,
    pub side: String,
    pub quantity: String,
    pub kind: RawOrderKind,
}

impl RawOrder {
    pub fn market(
        symbol: impl Into<String>,
        side: impl Into<String>,
        quantity: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            side: side.into(),
            quantity: quantity.into(),
            kind: RawOrderKind::Market,
        }
    }

    pub fn limit(
        symbol: impl Into<String>,
        side: impl Into<String>,
        quantity: impl Into<String>,
        price: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            side: side.into(),
            quantity: quantity.into(),
            kind: RawOrderKind::Limit {
                price: price.into(),
            },
        }
    }

    pub fn oco(
        symbol: impl Into<String>,
        side: impl Into<String>,
        quantity: impl Into<String>,
        price: impl Into<String>,
        stop_price: impl Into<String>,
        stop_limit_price: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            side: side.into(),
            quantity: quantity.into(),
            kind: RawOrderKind::Oco {
                price: price.into(),
                stop_price: stop_price.into(),
                stop_limit_price: stop_limit_price.into(),
            },
        }
    }

    pub fn order_type(&self) -> OrderType {
        match self.kind {
            RawOrderKind::Market => OrderType::Market,
            RawOrderKind::Limit { .. } => OrderType::Limit,
            RawOrderKind::Oco { .. } => OrderType::Oco,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum OrderKind {
    Market,
    Limit {
        price: Decimal,
    },
    #[serde(rename_all = "camelCase")]
    Oco {
        price: Decimal,
        stop_price: Decimal,
        stop_limit_price: Decimal,
    },
}

impl OrderKind {
    pub fn order_type(&self) -> OrderType {
        match self {
            OrderKind::Market => OrderType::Market,
            OrderKind::Limit { .. } => OrderType::Limit,
            OrderKind::Oco { .. } => OrderType::Oco,
        }
    }

    /// Limit price for LIMIT and OCO orders.
    pub fn price(&self) -> Option<Decimal> {
        match self {
            OrderKind::Market => None,
            OrderKind::Limit { price } | OrderKind::Oco { price, .. } => Some(*price),
        }
    }
}

/// Validated order: uppercase symbol and side, quantity at 3 dp, prices at 2 dp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanonicalOrder {
    pub symbol: String,
    pub side: Side,
    pub quantity: Decimal,
    #[serde(flatten)]
    pub kind: OrderKind,
}

impl CanonicalOrder {
    pub fn order_type(&self) -> OrderType {
        self.kind.order_type()
    }
}

impl From<&CanonicalOrder> for RawOrder {
    fn from(order: &CanonicalOrder) -> Self {
        let kind = match order.kind {
            OrderKind::Market => RawOrderKind::Market,
            OrderKind::Limit { price } => RawOrderKind::Limit {
                price: price.to_string(),
            },
            OrderKind::Oco {
                price,
                stop_price,
                stop_limit_price,
            } => RawOrderKind::Oco {
                price: price.to_string(),
                stop_price: stop_price.to_string(),
                stop_limit_price: stop_limit_price.to_string(),
            },
        };

        RawOrder {
            symbol: order.symbol.clone(),
            side: order.side.to_string(),
            quantity: order.quantity.to_string(),
            kind,
        }
    }
}
