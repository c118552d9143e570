//! Whole-percent fee rounding helpers.
//!
//! ## Rounding Policy
//!
//! Fee calculation uses **floor (round-down)** rounding, so the protocol
//! never overcharges: any remainder from the percentage division stays with
//! the payout rather than being collected as fee. The invariant
//! `fee + net == gross` holds for every split.

/// Percentage denominator.
pub const PERCENT: i128 = 100;

/// Maximum allowed fee percentage (100%).
pub const MAX_FEE_PERCENTAGE: u32 = 100;

/// Calculate the fee taken from `amount` at `percentage` (0–100).
///
/// `fee = floor(amount * percentage / 100)`
///
/// Returns 0 when `percentage` is 0 or on overflow.
pub fn calculate_fee(amount: i128, percentage: u32) -> i128 {
    if percentage == 0 {
        return 0;
    }
    amount
        .checked_mul(percentage as i128)
        .and_then(|x| x.checked_div(PERCENT))
        .unwrap_or(0)
}

/// Split `amount` into `(fee, net)` where `fee + net == amount`.
///
/// Fee is floored; any remainder from division stays in `net`.
pub fn split_amount(amount: i128, percentage: u32) -> (i128, i128) {
    let fee = calculate_fee(amount, percentage);
    (fee, amount - fee)
}
