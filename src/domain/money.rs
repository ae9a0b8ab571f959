use crate::error::{Result, TrackerError};
use rust_decimal::{Decimal, RoundingStrategy};

/// Monetary values are kept at 2 decimal places.
pub const MONEY_DP: u32 = 2;

const MAX_NAME_LEN: usize = 255;

/// Rounds a monetary value to [`MONEY_DP`] places, half away from zero.
///
/// The source material rounded `(value + epsilon)` to dodge binary-float
/// artifacts; with exact decimals the intended semantic is applied directly.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// Checks that a transaction amount is a non-negative decimal.
pub fn check_amount(field: &'static str, value: Decimal) -> Result<()> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(TrackerError::schema(field, "amount must not be negative"));
    }
    Ok(())
}

/// Checks that a boardgame name is 1-255 characters.
pub fn check_name(field: &'static str, value: &str) -> Result<()> {
    let len = value.chars().count();
    if len == 0 {
        return Err(TrackerError::schema(field, "name must not be empty"));
    }
    if len > MAX_NAME_LEN {
        return Err(TrackerError::schema(
            field,
            format!("name must be at most {MAX_NAME_LEN} characters, got {len}"),
        ));
    }
    Ok(())
}
