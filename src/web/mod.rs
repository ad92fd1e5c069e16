//! HTTP API для фронтенда: ордера идут напрямую в OrderService,
//! без запуска CLI-скриптов

pub mod handlers;
pub mod routes;

pub use handlers::{ApiResponse, FieldValue, OrderBody};
pub use routes::create_router;

use std::sync::Arc;

use crate::bot::OrderService;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<OrderService>,
}

impl AppState {
    pub fn new(service: OrderService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}
