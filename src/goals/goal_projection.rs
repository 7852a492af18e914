//! Pure projection of a goal's funding outlook.
//!
//! Everything here is a deterministic function of the goal snapshot and an
//! injected `now`; no clock reads, no I/O, no shared state.

use chrono::{DateTime, NaiveTime, Utc};
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::goals::goals_model::Goal;

/// Flat 30-day month used for the remaining-time estimate. Intentionally not
/// calendar-accurate; the annuity math only needs the period count to match
/// the monthly compounding rate.
const SECONDS_PER_MONTH: i64 = 30 * 24 * 60 * 60;

/// A goal with at least this many whole months left is considered on track.
const ON_TRACK_MONTH_BUFFER: u32 = 3;

/// Derived funding outlook for a single goal. Recomputed on every read,
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalProjection {
    /// current / target × 100, clamped to [0, 100]
    pub progress_percentage: Decimal,
    /// Whole 30-day months between `now` and the target date, floored at 0
    pub months_remaining: u32,
    /// Level monthly payment required to reach the target on time; 0 when the
    /// goal is already met or no months remain
    pub monthly_contribution: Decimal,
    /// Coarse heuristic: met, or at least 3 months of buffer left
    pub is_on_track: bool,
}

/// A goal snapshot together with its projection, the shape read views consume.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalWithProjection {
    #[serde(flatten)]
    pub goal: Goal,
    #[serde(flatten)]
    pub projection: GoalProjection,
}

/// Compute the derived projection fields for a goal snapshot.
///
/// Degenerate inputs never error: a non-positive target yields 0% progress
/// (division guard), a past target date yields zero months and a zero
/// contribution, and an overfunded goal floors the contribution at 0.
pub fn project(goal: &Goal, now: DateTime<Utc>) -> GoalProjection {
    let progress_percentage = if goal.target_amount > Decimal::ZERO {
        (goal.current_amount / goal.target_amount * Decimal::ONE_HUNDRED)
            .clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
    } else {
        Decimal::ZERO
    };

    let months_remaining = whole_months_until(goal, now);
    let monthly_contribution = required_monthly_contribution(goal, months_remaining);

    GoalProjection {
        progress_percentage,
        months_remaining,
        monthly_contribution,
        is_on_track: progress_percentage >= Decimal::ONE_HUNDRED
            || months_remaining >= ON_TRACK_MONTH_BUFFER,
    }
}

/// Whole 30-day months from `now` until midnight UTC of the target date,
/// rounded up, floored at 0.
fn whole_months_until(goal: &Goal, now: DateTime<Utc>) -> u32 {
    let target = goal.target_date.and_time(NaiveTime::MIN).and_utc();
    let seconds = target.signed_duration_since(now).num_seconds();
    if seconds <= 0 {
        0
    } else {
        (seconds as u64).div_ceil(SECONDS_PER_MONTH as u64) as u32
    }
}

/// Solve the level-payment annuity formula for the payment size.
///
/// With monthly rate `i` and `n` periods, constant deposits `A` plus the
/// compounded current balance `C` reach `C(1+i)^n + A((1+i)^n - 1)/i`; setting
/// that equal to the target and isolating `A` gives the required deposit.
/// A zero rate degenerates to simple linear division.
fn required_monthly_contribution(goal: &Goal, months_remaining: u32) -> Decimal {
    if months_remaining == 0 {
        return Decimal::ZERO;
    }

    let remaining = goal.target_amount - goal.current_amount;

    if goal.annual_interest_rate <= Decimal::ZERO {
        return (remaining / Decimal::from(months_remaining)).max(Decimal::ZERO);
    }

    let monthly_rate = goal.annual_interest_rate / dec!(1200);
    let growth = match (Decimal::ONE + monthly_rate).checked_powu(months_remaining as u64) {
        Some(g) => g,
        // Overflow means the horizon is so long that compounding alone
        // dwarfs any target; nothing needs to be scheduled.
        None => return Decimal::ZERO,
    };

    let future_value_of_current = match goal.current_amount.checked_mul(growth) {
        Some(fv) => fv,
        None => return Decimal::ZERO,
    };

    let annuity_factor = (growth - Decimal::ONE) / monthly_rate;
    ((goal.target_amount - future_value_of_current) / annuity_factor).max(Decimal::ZERO)
}
