//! Нормализация параметров ордера
//!
//! Одна общая проверка для MARKET / LIMIT / OCO вместо трех копий:
//! символ → сторона → парсинг чисел → положительность → округление до точности.
//! Чистая функция, без логов и без сетевых вызовов.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use std::str::FromStr;

use super::error::ValidationError;
use super::types::{CanonicalOrder, OrderField, OrderKind, RawOrder, RawOrderKind, Side};

pub const DEFAULT_QUOTE_SUFFIX: &str = "USDT";
pub const DEFAULT_MIN_QUANTITY: Decimal = dec!(0.001);
pub const DEFAULT_QUANTITY_PRECISION: u32 = 3;
pub const DEFAULT_PRICE_PRECISION: u32 = 2;

/// Display rounding mode for quantities and prices.
const DISPLAY_ROUNDING: RoundingStrategy = RoundingStrategy::MidpointAwayFromZero;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizerConfig {
    pub quote_suffix: String,
    pub min_quantity: Decimal,
    pub quantity_precision: u32,
    pub price_precision: u32,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            quote_suffix: DEFAULT_QUOTE_SUFFIX.to_string(),
            min_quantity: DEFAULT_MIN_QUANTITY,
            quantity_precision: DEFAULT_QUANTITY_PRECISION,
            price_precision: DEFAULT_PRICE_PRECISION,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct OrderNormalizer {
    config: NormalizerConfig,
}

impl OrderNormalizer {
    pub fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    /// Validate and canonicalize a raw order.
    ///
    /// Checks run in this order and stop at the first failure:
    /// 1. symbol (uppercased) ends with the quote suffix
    /// 2. side is BUY or SELL in any case
    /// 3. every numeric field of the order type parses
    /// 4. every numeric field is positive, quantity is at least `min_quantity`
    pub fn validate(&self, raw: &RawOrder) -> Result<CanonicalOrder, ValidationError> {
        let symbol = self.normalize_symbol(&raw.symbol)?;
        let side = Side::from_str(&raw.side)?;

        let quantity = parse_field(OrderField::Quantity, &raw.quantity)?;
        let prices = match &raw.kind {
            RawOrderKind::Market => RawPrices::Market,
            RawOrderKind::Limit { price } => RawPrices::Limit(parse_field(OrderField::Price, price)?),
            RawOrderKind::Oco {
                price,
                stop_price,
                stop_limit_price,
            } => RawPrices::Oco(
                parse_field(OrderField::Price, price)?,
                parse_field(OrderField::StopPrice, stop_price)?,
                parse_field(OrderField::StopLimitPrice, stop_limit_price)?,
            ),
        };

        let quantity = self.check_quantity(quantity)?;
        let kind = match prices {
            RawPrices::Market => OrderKind::Market,
            RawPrices::Limit(price) => OrderKind::Limit {
                price: self.check_price(OrderField::Price, price)?,
            },
            RawPrices::Oco(price, stop_price, stop_limit_price) => OrderKind::Oco {
                price: self.check_price(OrderField::Price, price)?,
                stop_price: self.check_price(OrderField::StopPrice, stop_price)?,
                stop_limit_price: self.check_price(OrderField::StopLimitPrice, stop_limit_price)?,
            },
        };

        Ok(CanonicalOrder {
            symbol,
            side,
            quantity,
            kind,
        })
    }

    fn normalize_symbol(&self, symbol: &str) -> Result<String, ValidationError> {
        let symbol = symbol.to_uppercase();
        let suffix = self.config.quote_suffix.to_uppercase();

        // "USDT" alone has no base asset
        if !symbol.ends_with(&suffix) || symbol.len() <= suffix.len() {
            return Err(ValidationError::InvalidSymbolSuffix { symbol, suffix });
        }
        Ok(symbol)
    }

    fn check_quantity(&self, quantity: Decimal) -> Result<Decimal, ValidationError> {
        let minimum = self.config.min_quantity;
        if quantity <= Decimal::ZERO || quantity < minimum {
            return Err(ValidationError::NonPositiveField {
                field: OrderField::Quantity,
                value: quantity,
                minimum: (minimum > Decimal::ZERO).then_some(minimum),
            });
        }
        Ok(round_to_precision(quantity, self.config.quantity_precision))
    }

    fn check_price(&self, field: OrderField, price: Decimal) -> Result<Decimal, ValidationError> {
        let rounded = round_to_precision(price, self.config.price_precision);
        // 0.001 would be sent as 0.00
        if price <= Decimal::ZERO || rounded.is_zero() {
            return Err(ValidationError::NonPositiveField {
                field,
                value: price,
                minimum: None,
            });
        }
        Ok(rounded)
    }
}

enum RawPrices {
    Market,
    Limit(Decimal),
    Oco(Decimal, Decimal, Decimal),
}

fn parse_field(field: OrderField, value: &str) -> Result<Decimal, ValidationError> {
    let trimmed = value.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| ValidationError::NonNumericField {
            field,
            value: value.to_string(),
        })
}

/// Round half away from zero and pin the scale, so "1" becomes "1.000".
pub fn round_to_precision(value: Decimal, precision: u32) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(precision, DISPLAY_ROUNDING);
    rounded.rescale(precision);
    rounded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::OrderType;

    fn normalizer() -> OrderNormalizer {
        OrderNormalizer::default()
    }

    #[test]
    fn test_quantity_below_minimum_is_rejected() {
        let err = normalizer()
            .validate(&RawOrder::market("btcusdt", "buy", "0.0005"))
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::NonPositiveField {
                field: OrderField::Quantity,
                value: dec!(0.0005),
                minimum: Some(dec!(0.001)),
            }
        );
    }

    #[test]
    fn test_limit_order_rounds_half_up() {
        let order = normalizer()
            .validate(&RawOrder::limit("BTCUSDT", "BUY", "0.0015", "70000.456"))
            .unwrap();
        assert_eq!(order.symbol, "BTCUSDT");
        assert_eq!(order.side, Side::Buy);
        assert_eq!(order.quantity.to_string(), "0.002");
        assert_eq!(order.kind.price().unwrap().to_string(), "70000.46");
        assert_eq!(order.order_type(), OrderType::Limit);
    }

    #[test]
    fn test_wrong_quote_suffix() {
        let err = normalizer()
            .validate(&RawOrder::limit("ETHBTC", "BUY", "1.0", "100"))
            .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidSymbolSuffix { ref symbol, .. } if symbol == "ETHBTC"));
    }

    #[test]
    fn test_invalid_side() {
        let err = normalizer()
            .validate(&RawOrder::market("BTCUSDT", "HOLD", "1.0"))
            .unwrap_err();
        assert_eq!(err, ValidationError::InvalidSide("HOLD".to_string()));
    }

    #[test]
    fn test_side_and_symbol_are_uppercased() {
        for side in ["BUY", "buy", "Buy"] {
            let order = normalizer()
                .validate(&RawOrder::market("ethusdt", side, "0.5"))
                .unwrap();
            assert_eq!(order.side.as_str(), "BUY");
            assert_eq!(order.symbol, "ETHUSDT");
        }
    }

    #[test]
    fn test_suffix_is_checked_before_other_fields() {
        // Every other field is broken too; the symbol still wins.
        for symbol in ["ETHBTC", "BTCUSD", "usdtbtc", "USDT", ""] {
            let err = normalizer()
                .validate(&RawOrder::oco(symbol, "HOLD", "abc", "-1", "x", "0"))
                .unwrap_err();
            assert!(
                matches!(err, ValidationError::InvalidSymbolSuffix { .. }),
                "{} gave {:?}",
                symbol,
                err
            );
        }
    }

    #[test]
    fn test_non_positive_quantities() {
        for quantity in ["0", "-1", "-0.5", "0.000", "-0.001"] {
            let err = normalizer()
                .validate(&RawOrder::limit("BTCUSDT", "SELL", quantity, "100"))
                .unwrap_err();
            assert!(
                matches!(err, ValidationError::NonPositiveField { field: OrderField::Quantity, .. }),
                "{} gave {:?}",
                quantity,
                err
            );
        }
    }

    #[test]
    fn test_non_numeric_fields() {
        let err = normalizer()
            .validate(&RawOrder::market("BTCUSDT", "BUY", "one"))
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::NonNumericField {
                field: OrderField::Quantity,
                value: "one".to_string()
            }
        );

        let err = normalizer()
            .validate(&RawOrder::oco("BTCUSDT", "BUY", "1", "100", "NaN", "95"))
            .unwrap_err();
        assert!(matches!(
            err,
            ValidationError::NonNumericField { field: OrderField::StopPrice, .. }
        ));

        let err = normalizer()
            .validate(&RawOrder::limit("BTCUSDT", "BUY", "1", "inf"))
            .unwrap_err();
        assert!(matches!(err, ValidationError::NonNumericField { field: OrderField::Price, .. }));
    }

    #[test]
    fn test_parse_errors_come_before_positivity() {
        // quantity is negative, but the price does not parse at all
        let err = normalizer()
            .validate(&RawOrder::limit("BTCUSDT", "BUY", "-1", "abc"))
            .unwrap_err();
        assert!(matches!(err, ValidationError::NonNumericField { field: OrderField::Price, .. }));
    }

    #[test]
    fn test_empty_field_is_non_numeric() {
        let err = normalizer()
            .validate(&RawOrder::limit("BTCUSDT", "BUY", "1", "  "))
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::NonNumericField {
                field: OrderField::Price,
                value: "  ".to_string()
            }
        );

        let err = normalizer()
            .validate(&RawOrder::market("BTCUSDT", "BUY", ""))
            .unwrap_err();
        assert!(matches!(err, ValidationError::NonNumericField { field: OrderField::Quantity, .. }));
    }

    #[test]
    fn test_oco_prices_are_rounded_to_cents() {
        let order = normalizer()
            .validate(&RawOrder::oco("solusdt", "sell", "2", "150.555", "140.004", "139.9"))
            .unwrap();
        assert_eq!(
            order.kind,
            OrderKind::Oco {
                price: dec!(150.56),
                stop_price: dec!(140.00),
                stop_limit_price: dec!(139.90),
            }
        );
        assert_eq!(order.quantity.to_string(), "2.000");
    }

    #[test]
    fn test_price_rounding_to_zero_is_rejected() {
        let err = normalizer()
            .validate(&RawOrder::limit("BTCUSDT", "BUY", "1", "0.004"))
            .unwrap_err();
        assert!(matches!(err, ValidationError::NonPositiveField { field: OrderField::Price, .. }));
    }

    #[test]
    fn test_scientific_notation_is_accepted() {
        let order = normalizer()
            .validate(&RawOrder::market("BTCUSDT", "BUY", "1e-2"))
            .unwrap();
        assert_eq!(order.quantity, dec!(0.010));
    }

    #[test]
    fn test_validate_is_stable_under_its_own_output() {
        let inputs = [
            RawOrder::market("btcusdt", "buy", "0.0015"),
            RawOrder::market("ETHUSDT", "Sell", "12"),
            RawOrder::limit("BTCUSDT", "BUY", "0.0015", "70000.456"),
            RawOrder::oco("solusdt", "sell", "2.4444", "150.555", "140.004", "139.9"),
        ];
        for raw in inputs {
            let first = normalizer().validate(&raw).unwrap();
            let second = normalizer().validate(&RawOrder::from(&first)).unwrap();
            assert_eq!(first, second);
            assert_eq!(RawOrder::from(&first), RawOrder::from(&second));
        }
    }

    #[test]
    fn test_custom_quote_suffix() {
        let normalizer = OrderNormalizer::new(NormalizerConfig {
            quote_suffix: "usdc".to_string(),
            ..NormalizerConfig::default()
        });
        assert!(normalizer.validate(&RawOrder::market("btcusdc", "buy", "1")).is_ok());
        assert!(normalizer.validate(&RawOrder::market("btcusdt", "buy", "1")).is_err());
    }

    #[test]
    fn test_round_to_precision_pins_scale() {
        assert_eq!(round_to_precision(dec!(1), 3).to_string(), "1.000");
        assert_eq!(round_to_precision(dec!(0.0025), 3).to_string(), "0.003");
        assert_eq!(round_to_precision(dec!(99.995), 2).to_string(), "100.00");
    }
}
