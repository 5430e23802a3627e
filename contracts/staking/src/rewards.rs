//! Integer reward arithmetic.
//!
//! Every helper floors and reports overflow as `None`; callers map that
//! onto `ContractError::ArithmeticOverflow`.

/// Fixed-point scale of the reward-per-share accumulator.
///
/// Accumulator values are multiplied by this constant before storage to
/// keep sub-unit precision without floating point.
pub const PRECISION: i128 = 1_000_000_000_000;

/// Scale of a user's pool share: 10_000 means the whole pool.
pub const SHARE_SCALE: i128 = 10_000;

/// Splits a period budget into a per-block rate and the remainder that
/// the rate cannot release.
///
/// ```text
/// rate = budget / blocks
/// dust = budget - rate × blocks
/// ```
pub fn rate_and_dust(budget: i128, blocks: u32) -> Option<(i128, i128)> {
    if blocks == 0 {
        return None;
    }
    let blocks = i128::from(blocks);
    let rate = budget.checked_div(blocks)?;
    let dust = budget.checked_sub(rate.checked_mul(blocks)?)?;
    Some((rate, dust))
}

/// Reward released by `rate` over `blocks` blocks.
pub fn emitted(rate: i128, blocks: u32) -> Option<i128> {
    rate.checked_mul(i128::from(blocks))
}

/// Accumulator increase for `reward` units spread over `total_staked`.
///
/// ```text
/// Δacc = reward × PRECISION / total_staked
/// ```
///
/// Returns zero when nothing is staked; the caller decides where that
/// undistributed reward goes.
pub fn acc_increment(reward: i128, total_staked: i128) -> Option<i128> {
    if total_staked <= 0 {
        return Some(0);
    }
    reward.checked_mul(PRECISION)?.checked_div(total_staked)
}

/// Reward earned by `amount` between two accumulator readings.
///
/// ```text
/// pending = amount × (acc_now − acc_checkpoint) / PRECISION
/// ```
///
/// A checkpoint ahead of `acc_now` yields zero rather than a negative
/// amount.
pub fn pending(amount: i128, acc_now: i128, acc_checkpoint: i128) -> Option<i128> {
    let delta = acc_now.checked_sub(acc_checkpoint)?;
    if delta <= 0 || amount <= 0 {
        return Some(0);
    }
    amount.checked_mul(delta)?.checked_div(PRECISION)
}

/// A user's share of the pool scaled by [`SHARE_SCALE`].
pub fn share(amount: i128, total_staked: i128) -> Option<i128> {
    if total_staked <= 0 || amount <= 0 {
        return Some(0);
    }
    amount.checked_mul(SHARE_SCALE)?.checked_div(total_staked)
}

// ── Unit tests ──────────────────────────────────────────────────────────────
// Pure-math tests with no Soroban environment dependency.
