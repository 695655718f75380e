// core/src/amount.rs

use crate::error::{PaygateError, PaygateResult};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Paise per rupee.
pub const MINOR_UNITS_PER_MAJOR: i64 = 100;
const MINOR_UNIT_SCALE: u32 = 2;

/// Converts a major-unit amount to the gateway's minor unit.
///
/// Rounds to the nearest minor unit with midpoints going away from zero, so
/// `10.005` becomes `1001`. Zero, negative and out-of-range amounts are rejected.
pub fn to_minor_units(amount: Decimal) -> PaygateResult<i64> {
    if amount <= Decimal::ZERO {
        return Err(PaygateError::InvalidAmount {
            reason: format!("amount must be greater than zero, got {}", amount),
        });
    }

    let scaled = amount
        .checked_mul(Decimal::from(MINOR_UNITS_PER_MAJOR))
        .ok_or_else(|| PaygateError::InvalidAmount {
            reason: format!("amount {} overflows minor-unit conversion", amount),
        })?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

    let minor = scaled.to_i64().ok_or_else(|| PaygateError::InvalidAmount {
        reason: format!("amount {} does not fit in minor units", amount),
    })?;

    if minor == 0 {
        return Err(PaygateError::InvalidAmount {
            reason: format!("amount {} is below the smallest chargeable unit", amount),
        });
    }
    Ok(minor)
}

pub fn from_minor_units(minor: i64) -> Decimal {
    Decimal::new(minor, MINOR_UNIT_SCALE)
}
