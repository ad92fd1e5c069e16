//! Сервис размещения ордеров
//!
//! Общий поток для MARKET / LIMIT / OCO:
//! валидация → проверка баланса → шаг лота → плечо → отправка ордера.
//! Режим симуляции передается явно в каждый вызов, глобального флага нет.

use log::{info, warn};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

use crate::config::BotSettings;
use crate::exchange::{ExchangeError, FuturesExchange, OrderAck, OrderTicket};
use crate::order::{
    CanonicalOrder, OrderKind, OrderNormalizer, OrderType, RawOrder, Side, StepAdjustment,
    StepSizeError, StepSource, ValidationError,
};

const SIMULATED_BALANCE: Decimal = dec!(1000);
const SIMULATED_MARKET_PRICE: Decimal = dec!(60500.00);
const SIMULATED_MARKET_ORDER_ID: u64 = 999_999;
const SIMULATED_LIMIT_ORDER_ID: u64 = 888_888;
const SIMULATED_OCO_LIST_ID: i64 = 777_777;

/// Live orders go to the venue; simulated ones never touch it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    Live,
    Simulation,
}

impl ExecutionMode {
    pub fn is_simulation(self) -> bool {
        self == ExecutionMode::Simulation
    }
}

impl From<bool> for ExecutionMode {
    /// `true` is the `--test` flag / `"test": true`.
    fn from(simulate: bool) -> Self {
        if simulate {
            ExecutionMode::Simulation
        } else {
            ExecutionMode::Live
        }
    }
}

#[derive(Debug, Error)]
pub enum BotError {
    #[error("Validation Error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Step size error: {0}")]
    StepSize(#[from] StepSizeError),

    #[error("Low balance: {available} {asset} available, at least {required} required. Transfer more {asset} to the Futures wallet.")]
    InsufficientBalance {
        asset: String,
        available: Decimal,
        required: Decimal,
    },

    #[error("Leverage set failed for {symbol}: {source}")]
    Leverage {
        symbol: String,
        #[source]
        source: ExchangeError,
    },

    #[error("API error: {0}")]
    Exchange(#[from] ExchangeError),
}

impl BotError {
    /// Rejections caused by the request itself, as opposed to the venue.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            BotError::Validation(_) | BotError::StepSize(_) | BotError::InsufficientBalance { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceCheck {
    pub asset: String,
    pub available: Decimal,
    /// Current position in the symbol, if the account has one
    pub position: Option<Decimal>,
    pub simulated: bool,
}

/// Everything the caller needs to show after an order went through.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderReport {
    pub mode: ExecutionMode,
    pub symbol: String,
    pub side: Side,
    pub order_type: OrderType,
    pub quantity: Decimal,
    pub step: StepAdjustment,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_limit_price: Option<Decimal>,
    /// Ticker price at submission, market orders only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_list_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    pub balance: BalanceCheck,
}

#[derive(Debug, Clone)]
struct TradingSettings {
    quote_asset: String,
    min_balance: Decimal,
    default_step_size: Decimal,
    leverage: u32,
}

pub struct OrderService {
    exchange: Arc<dyn FuturesExchange>,
    normalizer: OrderNormalizer,
    settings: TradingSettings,
}

impl OrderService {
    pub fn new(exchange: Arc<dyn FuturesExchange>, settings: &BotSettings) -> Self {
        Self {
            exchange,
            normalizer: OrderNormalizer::new(settings.normalizer_config()),
            settings: TradingSettings {
                quote_asset: settings.quote_asset.clone(),
                min_balance: settings.min_balance,
                default_step_size: settings.default_step_size,
                leverage: settings.leverage,
            },
        }
    }

    /// Validates, checks the account and places the order.
    pub async fn place(&self, raw: &RawOrder, mode: ExecutionMode) -> Result<OrderReport, BotError> {
        let order = self.normalizer.validate(raw).inspect_err(|e| {
            warn!("{} validation fail: {}", raw.order_type(), e);
        })?;

        let balance = self.check_balance(&order.symbol, mode).await?;

        let (step_size, source) = self.lookup_step_size(&order.symbol, mode).await;
        let step = StepAdjustment::apply(order.quantity, step_size, source)?;
        if step.changed() {
            info!(
                "Auto-rounded qty {} -> {} (step size: {})",
                step.requested, step.rounded, step.step
            );
        }

        let ticket = OrderTicket::new(&order, step.rounded);

        if mode.is_simulation() {
            let (ack, reference_price) = simulated_ack(order.order_type());
            info!("SIMULATED {} order: {:?}", order.order_type(), ack);
            return Ok(build_report(mode, &order, step, balance, reference_price, ack));
        }

        self.exchange
            .change_leverage(&order.symbol, self.settings.leverage)
            .await
            .map_err(|source| BotError::Leverage {
                symbol: order.symbol.clone(),
                source,
            })?;
        info!("Leverage set to {}x for {}", self.settings.leverage, order.symbol);

        let reference_price = match order.kind {
            OrderKind::Market => Some(self.exchange.ticker_price(&order.symbol).await?.price),
            _ => None,
        };

        let ack = self.exchange.create_order(&ticket).await?;
        info!(
            "{} order placed: symbol {}, side {}, qty {}, id {:?}, list id {:?}, status {:?}",
            order.order_type(),
            order.symbol,
            order.side,
            step.rounded,
            ack.order_id,
            ack.order_list_id,
            ack.status
        );

        Ok(build_report(mode, &order, step, balance, reference_price, ack))
    }

    /// Available quote balance must reach the configured floor.
    pub async fn check_balance(&self, symbol: &str, mode: ExecutionMode) -> Result<BalanceCheck, BotError> {
        let asset = self.settings.quote_asset.clone();

        if mode.is_simulation() {
            info!("TEST MODE: Balance bypassed (simulated {} {})", SIMULATED_BALANCE, asset);
            return Ok(BalanceCheck {
                asset,
                available: SIMULATED_BALANCE,
                position: None,
                simulated: true,
            });
        }

        let account = self.exchange.account().await?;
        let available = account.available(&asset);
        if available < self.settings.min_balance {
            warn!("Low {} balance for order: {}", asset, available);
            return Err(BotError::InsufficientBalance {
                asset,
                available,
                required: self.settings.min_balance,
            });
        }

        Ok(BalanceCheck {
            asset,
            available,
            position: account.position(symbol),
            simulated: false,
        })
    }

    /// LOT_SIZE step from the venue, or the configured default when it cannot be had.
    pub async fn lookup_step_size(&self, symbol: &str, mode: ExecutionMode) -> (Decimal, StepSource) {
        let fallback = (self.settings.default_step_size, StepSource::Fallback);
        if mode.is_simulation() {
            return fallback;
        }

        match self.exchange.exchange_info().await {
            Ok(info) => match info.step_size(symbol) {
                Some(step) if step > Decimal::ZERO => (step, StepSource::Venue),
                _ => {
                    warn!("No LOT_SIZE filter for {}, using step {}", symbol, fallback.0);
                    fallback
                }
            },
            Err(e) => {
                warn!("exchangeInfo unavailable ({}), using step {}", e, fallback.0);
                fallback
            }
        }
    }
}

fn simulated_ack(order_type: OrderType) -> (OrderAck, Option<Decimal>) {
    match order_type {
        OrderType::Market => (
            OrderAck {
                order_id: Some(SIMULATED_MARKET_ORDER_ID),
                status: Some("FILLED".to_string()),
                ..OrderAck::default()
            },
            Some(SIMULATED_MARKET_PRICE),
        ),
        OrderType::Limit => (
            OrderAck {
                order_id: Some(SIMULATED_LIMIT_ORDER_ID),
                status: Some("NEW".to_string()),
                ..OrderAck::default()
            },
            None,
        ),
        OrderType::Oco => (
            OrderAck {
                order_list_id: Some(SIMULATED_OCO_LIST_ID),
                ..OrderAck::default()
            },
            None,
        ),
    }
}

fn build_report(
    mode: ExecutionMode,
    order: &CanonicalOrder,
    step: StepAdjustment,
    balance: BalanceCheck,
    reference_price: Option<Decimal>,
    ack: OrderAck,
) -> OrderReport {
    let (stop_price, stop_limit_price) = match order.kind {
        OrderKind::Oco {
            stop_price,
            stop_limit_price,
            ..
        } => (Some(stop_price), Some(stop_limit_price)),
        _ => (None, None),
    };

    OrderReport {
        mode,
        symbol: order.symbol.clone(),
        side: order.side,
        order_type: order.order_type(),
        quantity: step.rounded,
        step,
        price: order.kind.price(),
        stop_price,
        stop_limit_price,
        reference_price,
        order_id: ack.order_id,
        order_list_id: ack.order_list_id,
        status: ack.status,
        balance,
    }
}
