//! Округление количества до шага лота (LOT_SIZE.stepSize)

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::Serialize;

use super::error::StepSizeError;

/// Used when venue metadata is unavailable and in simulation mode.
pub const DEFAULT_STEP_SIZE: Decimal = dec!(0.001);

/// Rounds `quantity` to the nearest multiple of `step`.
///
/// Ties round away from zero (`0.0035 / 0.001` → 4 steps), same as the display rounding in
/// the normalizer. A quantity under half a step would round to zero and is rejected rather
/// than bumped up to one step.
pub fn round_to_step_size(quantity: Decimal, step: Decimal) -> Result<Decimal, StepSizeError> {
    if step <= Decimal::ZERO {
        return Err(StepSizeError::NonPositiveStep(step));
    }

    let overflow = || StepSizeError::Overflow { quantity, step };
    let steps = quantity
        .checked_div(step)
        .ok_or_else(overflow)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    if steps <= Decimal::ZERO {
        return Err(StepSizeError::RoundsToZero { quantity, step });
    }

    let rounded = steps.checked_mul(step).ok_or_else(overflow)?;
    Ok(rounded.normalize())
}

/// Where the step size came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepSource {
    Venue,
    Fallback,
}

/// Step rounding result, kept so the caller can always show what changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepAdjustment {
    pub requested: Decimal,
    pub rounded: Decimal,
    pub step: Decimal,
    pub source: StepSource,
}

impl StepAdjustment {
    pub fn apply(quantity: Decimal, step: Decimal, source: StepSource) -> Result<Self, StepSizeError> {
        let rounded = round_to_step_size(quantity, step)?;
        Ok(Self {
            requested: quantity,
            rounded,
            step,
            source,
        })
    }

    pub fn changed(&self) -> bool {
        self.requested != self.rounded
    }
}
