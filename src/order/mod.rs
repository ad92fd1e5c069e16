//! Order Parameter Normalizer
//! Проверка и канонизация параметров ордера перед отправкой на биржу

pub mod error;
pub mod normalizer;
pub mod step;
pub mod types;

pub use error::{StepSizeError, ValidationError};
pub use normalizer::{NormalizerConfig, OrderNormalizer};
pub use step::{round_to_step_size, StepAdjustment, StepSource, DEFAULT_STEP_SIZE};
pub use types::{
    CanonicalOrder, OrderField, OrderKind, OrderType, RawOrder, RawOrderKind, Side,
    GOOD_TILL_CANCELLED,
};
