use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Json,
};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::AppState;
use crate::bot::{BotError, ExecutionMode, OrderReport};
use crate::order::{OrderType, RawOrder};

/// Numeric fields come from the form either as text or as JSON numbers.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(serde_json::Number),
}

impl FieldValue {
    pub fn into_text(self) -> String {
        match self {
            FieldValue::Text(text) => text,
            FieldValue::Number(number) => number.to_string(),
        }
    }
}

/// Request body shared by all three order routes.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderBody {
    pub symbol: Option<String>,
    pub side: Option<String>,
    pub quantity: Option<FieldValue>,
    pub price: Option<FieldValue>,
    pub stop_price: Option<FieldValue>,
    pub stop_limit_price: Option<FieldValue>,
    #[serde(default)]
    pub test: bool,
}

impl OrderBody {
    /// Absent fields become empty strings so validation reports them.
    pub fn into_raw(self, order_type: OrderType) -> RawOrder {
        let text = |value: Option<FieldValue>| value.map(FieldValue::into_text).unwrap_or_default();

        let symbol = self.symbol.unwrap_or_default();
        let side = self.side.unwrap_or_default();
        let quantity = text(self.quantity);

        match order_type {
            OrderType::Market => RawOrder::market(symbol, side, quantity),
            OrderType::Limit => RawOrder::limit(symbol, side, quantity, text(self.price)),
            OrderType::Oco => RawOrder::oco(
                symbol,
                side,
                quantity,
                text(self.price),
                text(self.stop_price),
                text(self.stop_limit_price),
            ),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<OrderReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiResponse {
    fn placed(report: OrderReport) -> Self {
        let label = match report.order_type {
            OrderType::Market => "Market",
            OrderType::Limit => "Limit",
            OrderType::Oco => "OCO",
        };
        let message = if report.mode.is_simulation() {
            format!("SIMULATED {} order placed successfully", label)
        } else {
            format!("{} order placed successfully", label)
        };

        Self {
            success: true,
            message: Some(message),
            order: Some(report),
            error: None,
        }
    }

    fn failed(error: impl ToString) -> Self {
        Self {
            success: false,
            message: None,
            order: None,
            error: Some(error.to_string()),
        }
    }
}

type Reply = (StatusCode, Json<ApiResponse>);

pub async fn market_order(
    State(state): State<AppState>,
    body: Result<Json<OrderBody>, JsonRejection>,
) -> Reply {
    place(&state, body, OrderType::Market).await
}

pub async fn limit_order(
    State(state): State<AppState>,
    body: Result<Json<OrderBody>, JsonRejection>,
) -> Reply {
    place(&state, body, OrderType::Limit).await
}

pub async fn oco_order(
    State(state): State<AppState>,
    body: Result<Json<OrderBody>, JsonRejection>,
) -> Reply {
    place(&state, body, OrderType::Oco).await
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn place(
    state: &AppState,
    body: Result<Json<OrderBody>, JsonRejection>,
    order_type: OrderType,
) -> Reply {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => {
            warn!("Rejected {} request body: {}", order_type, rejection.body_text());
            return (StatusCode::BAD_REQUEST, Json(ApiResponse::failed(rejection.body_text())));
        }
    };

    let mode = ExecutionMode::from(body.test);
    let raw = body.into_raw(order_type);
    info!("{} order request: {} {} {} ({:?})", order_type, raw.symbol, raw.side, raw.quantity, mode);

    match state.service.place(&raw, mode).await {
        Ok(report) => (StatusCode::OK, Json(ApiResponse::placed(report))),
        Err(e) => (status_for(&e), Json(ApiResponse::failed(&e))),
    }
}

fn status_for(err: &BotError) -> StatusCode {
    if err.is_rejection() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::BAD_GATEWAY
    }
}
