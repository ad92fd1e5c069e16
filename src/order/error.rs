use rust_decimal::Decimal;
use thiserror::Error;

use super::types::OrderField;

/// Rejections produced by the normalizer. The first failing check wins.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("side must be BUY or SELL, got '{0}'")]
    InvalidSide(String),

    #[error("{field} must be a number, got '{value}'")]
    NonNumericField { field: OrderField, value: String },

    #[error("{field} must be {}, got {value}", bound_text(.minimum))]
    NonPositiveField {
        field: OrderField,
        value: Decimal,
        /// Set when the field has a floor above zero (quantity).
        minimum: Option<Decimal>,
    },

    #[error("symbol '{symbol}' must end with {suffix} (e.g. BTC{suffix})")]
    InvalidSymbolSuffix { symbol: String, suffix: String },
}

fn bound_text(minimum: &Option<Decimal>) -> String {
    match minimum {
        Some(min) => format!("at least {}", min),
        None => "greater than zero".to_string(),
    }
}

/// Rejections produced by step-size rounding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StepSizeError {
    #[error("step size must be greater than zero, got {0}")]
    NonPositiveStep(Decimal),

    #[error("quantity {quantity} rounds to zero at step size {step}")]
    RoundsToZero { quantity: Decimal, step: Decimal },

    #[error("quantity {quantity} is too large for step size {step}")]
    Overflow { quantity: Decimal, step: Decimal },
}
