//! Bounds on monetary amounts.
//!
//! Money columns are `NUMERIC(19, 4)`: fifteen integer digits and four
//! fractional ones. Single amounts are capped well below that so running
//! balances keep headroom.

use rust_decimal::Decimal;
use thiserror::Error;

/// Fractional digits kept by storage.
pub const MAX_SCALE: u32 = 4;

/// Largest absolute value of a single amount (one trillion, exclusive).
pub const MAX_MAGNITUDE: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);

/// Amount that storage could not hold exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AmountError {
    /// More than [`MAX_SCALE`] fractional digits.
    #[error("amount has more than {} decimal places", MAX_SCALE)]
    TooPrecise,
    /// Absolute value reaches [`MAX_MAGNITUDE`].
    #[error("amount must be below {}", MAX_MAGNITUDE)]
    TooLarge,
}

/// Checks that `amount` can be stored without rounding or overflow.
///
/// Trailing zeros do not count towards the scale, so `1.50000` passes.
///
/// # Errors
///
/// `TooPrecise` or `TooLarge`.
pub fn check_amount(amount: Decimal) -> Result<(), AmountError> {
    if amount.normalize().scale() > MAX_SCALE {
        return Err(AmountError::TooPrecise);
    }
    if amount.abs() >= MAX_MAGNITUDE {
        return Err(AmountError::TooLarge);
    }
    Ok(())
}
