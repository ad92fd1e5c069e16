#![cfg(feature = "dashboard")]

//! Router-level tests: JSON in, JSON out, no network.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use tower::ServiceExt;

use futures_order_bot::bot::OrderService;
use futures_order_bot::config::BotSettings;
use futures_order_bot::exchange::{
    AccountAsset, AccountInfo, ExchangeError, ExchangeInfo, FuturesExchange, LeverageAck, OrderAck,
    OrderTicket, TickerPrice,
};
use futures_order_bot::web::{create_router, AppState};

struct StubExchange {
    balance: Decimal,
    reject_orders: bool,
    tickets: Mutex<Vec<OrderTicket>>,
}

impl StubExchange {
    fn new(balance: Decimal) -> Self {
        Self {
            balance,
            reject_orders: false,
            tickets: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl FuturesExchange for StubExchange {
    async fn exchange_info(&self) -> Result<ExchangeInfo, ExchangeError> {
        Ok(ExchangeInfo { symbols: vec![] })
    }

    async fn account(&self) -> Result<AccountInfo, ExchangeError> {
        Ok(AccountInfo {
            assets: vec![AccountAsset {
                asset: "USDT".to_string(),
                available_balance: self.balance,
            }],
            positions: vec![],
        })
    }

    async fn change_leverage(&self, symbol: &str, leverage: u32) -> Result<LeverageAck, ExchangeError> {
        Ok(LeverageAck {
            symbol: symbol.to_string(),
            leverage,
        })
    }

    async fn ticker_price(&self, symbol: &str) -> Result<TickerPrice, ExchangeError> {
        Ok(TickerPrice {
            symbol: symbol.to_string(),
            price: dec!(60000),
        })
    }

    async fn create_order(&self, ticket: &OrderTicket) -> Result<OrderAck, ExchangeError> {
        if self.reject_orders {
            return Err(ExchangeError::Api {
                status: 400,
                code: -2019,
                msg: "Margin is insufficient.".to_string(),
            });
        }
        self.tickets.lock().unwrap().push(ticket.clone());
        Ok(OrderAck {
            order_id: Some(1001),
            status: Some("NEW".to_string()),
            ..OrderAck::default()
        })
    }
}

fn app(exchange: Arc<StubExchange>) -> Router {
    let service = OrderService::new(exchange, &BotSettings::default());
    create_router(AppState::new(service), "frontend")
}

async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn simulated_market_order_is_normalized() {
    let exchange = Arc::new(StubExchange::new(dec!(0)));
    let (status, body) = post_json(
        app(exchange.clone()),
        "/market-order",
        json!({"symbol": "btcusdt", "side": "buy", "quantity": "0.0037", "test": true}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["message"], json!("SIMULATED Market order placed successfully"));
    assert_eq!(body["order"]["symbol"], json!("BTCUSDT"));
    assert_eq!(body["order"]["side"], json!("BUY"));
    assert_eq!(body["order"]["quantity"], json!("0.004"));
    assert_eq!(body["order"]["orderId"], json!(999999));
    assert!(exchange.tickets.lock().unwrap().is_empty());
}

#[tokio::test]
async fn numeric_json_fields_are_accepted() {
    let exchange = Arc::new(StubExchange::new(dec!(100)));
    let (status, body) = post_json(
        app(exchange.clone()),
        "/limit-order",
        json!({"symbol": "ETHUSDT", "side": "SELL", "quantity": 0.5, "price": 3500.456}),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["order"]["price"], json!("3500.46"));
    assert_eq!(body["order"]["step"]["source"], json!("fallback"));

    let tickets = exchange.tickets.lock().unwrap();
    assert_eq!(tickets.len(), 1);
    assert_eq!(tickets[0].symbol, "ETHUSDT");
    assert_eq!(tickets[0].price, Some(dec!(3500.46)));
}

#[tokio::test]
async fn invalid_symbol_is_bad_request() {
    let exchange = Arc::new(StubExchange::new(dec!(100)));
    let (status, body) = post_json(
        app(exchange),
        "/market-order",
        json!({"symbol": "BTCUSD", "side": "BUY", "quantity": "0.01"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert!(body["error"].as_str().unwrap().contains("USDT"));
}

#[tokio::test]
async fn omitted_oco_prices_are_non_numeric() {
    let exchange = Arc::new(StubExchange::new(dec!(100)));
    let (status, body) = post_json(
        app(exchange),
        "/oco-order",
        json!({"symbol": "BTCUSDT", "side": "SELL", "quantity": "0.01", "price": "72000", "test": true}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("stopPrice must be a number"));
}

#[tokio::test]
async fn oversized_quantity_is_bad_request() {
    let exchange = Arc::new(StubExchange::new(dec!(100)));
    let (status, body) = post_json(
        app(exchange.clone()),
        "/market-order",
        json!({"symbol": "BTCUSDT", "side": "BUY", "quantity": "100000000000000000000000000"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("too large"));
    assert!(exchange.tickets.lock().unwrap().is_empty());
}

#[tokio::test]
async fn low_balance_is_bad_request() {
    let exchange = Arc::new(StubExchange::new(dec!(5)));
    let (status, body) = post_json(
        app(exchange),
        "/market-order",
        json!({"symbol": "BTCUSDT", "side": "BUY", "quantity": "0.01"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Low balance"));
}

#[tokio::test]
async fn exchange_rejection_is_bad_gateway() {
    let exchange = Arc::new(StubExchange {
        reject_orders: true,
        ..StubExchange::new(dec!(100))
    });
    let (status, body) = post_json(
        app(exchange),
        "/market-order",
        json!({"symbol": "BTCUSDT", "side": "BUY", "quantity": "0.01"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].as_str().unwrap().contains("Margin is insufficient"));
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let exchange = Arc::new(StubExchange::new(dec!(100)));
    let request = Request::builder()
        .method(Method::POST)
        .uri("/market-order")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app(exchange).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn health_reports_ok() {
    let exchange = Arc::new(StubExchange::new(dec!(0)));
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = app(exchange).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({"status": "ok"}));
}
