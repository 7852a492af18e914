//! Tests for the goal-funding projection: progress clamping, the 30-day month
//! estimate, the annuity contribution formula, and the on-track heuristic.

use chrono::{DateTime, Duration, TimeZone, Utc};
use finbox_core::goals::{project, Goal, GoalStatus};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn reference_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap()
}

/// Build a goal whose target date lies exactly `months` 30-day periods after
/// the reference instant, so `months_remaining` equals `months`.
fn goal(target: Decimal, current: Decimal, months: i64, annual_rate: Decimal) -> Goal {
    let target_date = (reference_now() + Duration::days(months * 30)).date_naive();
    Goal {
        id: "goal-1".to_string(),
        user_id: "user-1".to_string(),
        name: "New car".to_string(),
        description: None,
        target_amount: target,
        current_amount: current,
        target_date,
        annual_interest_rate: annual_rate,
        priority: None,
        status: GoalStatus::Active,
        created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
    }
}

#[test]
fn zero_rate_contribution_is_linear_division() {
    let projection = project(&goal(dec!(12000), dec!(0), 12, dec!(0)), reference_now());

    assert_eq!(projection.months_remaining, 12);
    assert_eq!(
        projection.monthly_contribution,
        dec!(1000),
        "12000 over 12 months at 0% is exactly 1000 per month"
    );
}

#[test]
fn higher_rate_strictly_reduces_contribution() {
    let now = reference_now();
    let at_rate = |rate: Decimal| {
        project(&goal(dec!(50000), dec!(5000), 24, rate), now).monthly_contribution
    };

    let flat = at_rate(dec!(0));
    let moderate = at_rate(dec!(6));
    let high = at_rate(dec!(12));

    assert!(
        flat > moderate && moderate > high,
        "contribution must strictly decrease as the rate rises: {} > {} > {}",
        flat,
        moderate,
        high
    );
    assert!(high > Decimal::ZERO, "goal still needs funding at 12%");
}

#[test]
fn contribution_floors_at_zero_when_compounding_alone_suffices() {
    // 999 at 1% monthly over 120 months grows well past the 1000 target.
    let projection = project(&goal(dec!(1000), dec!(999), 120, dec!(12)), reference_now());

    assert_eq!(
        projection.monthly_contribution,
        Decimal::ZERO,
        "future value of the balance already exceeds the target"
    );
}

#[test]
fn already_met_goal_needs_no_contribution() {
    for rate in [dec!(0), dec!(12)] {
        let projection = project(&goal(dec!(5000), dec!(5000), 18, rate), reference_now());

        assert_eq!(projection.monthly_contribution, Decimal::ZERO);
        assert_eq!(projection.progress_percentage, dec!(100));
        assert!(projection.is_on_track, "a met goal is always on track");
    }
}

#[test]
fn zero_months_remaining_schedules_nothing() {
    // Deadline exactly at the reference instant, goal still unmet.
    let projection = project(&goal(dec!(8000), dec!(2000), 0, dec!(0)), reference_now());

    assert_eq!(projection.months_remaining, 0);
    assert_eq!(
        projection.monthly_contribution,
        Decimal::ZERO,
        "no future months means nothing can be scheduled"
    );
    assert!(!projection.is_on_track);
}

#[test]
fn overfunded_progress_clamps_at_one_hundred() {
    let projection = project(&goal(dec!(3000), dec!(6000), 6, dec!(0)), reference_now());

    assert_eq!(
        projection.progress_percentage,
        dec!(100),
        "double-funded goal shows exactly 100%, not 200%"
    );
}

#[test]
fn non_positive_target_yields_zero_progress() {
    let projection = project(&goal(dec!(0), dec!(500), 6, dec!(0)), reference_now());

    assert_eq!(
        projection.progress_percentage,
        Decimal::ZERO,
        "zero target must not divide"
    );
}

#[test]
fn on_track_boundary_sits_at_three_months() {
    let now = reference_now();

    let two_months = project(&goal(dec!(6000), dec!(0), 2, dec!(0)), now);
    assert!(
        !two_months.is_on_track,
        "two months of buffer on an unmet goal is not on track"
    );

    let three_months = project(&goal(dec!(6000), dec!(0), 3, dec!(0)), now);
    assert!(three_months.is_on_track, "three months of buffer is on track");

    let met_with_two_months = project(&goal(dec!(6000), dec!(6000), 2, dec!(0)), now);
    assert!(
        met_with_two_months.is_on_track,
        "a met goal is on track regardless of remaining time"
    );
}

#[test]
fn projection_is_idempotent() {
    let goal = goal(dec!(10000), dec!(2500), 10, dec!(9));
    let now = reference_now();

    assert_eq!(
        project(&goal, now),
        project(&goal, now),
        "identical inputs must produce identical projections"
    );
}

#[test]
fn compounding_scenario_matches_annuity_formula() {
    // target 10000, current 1000, 10 months, 12% annual -> 1% monthly.
    // fv = 1000 * 1.01^10 = 1104.6221..., annuity factor = (1.01^10 - 1)/0.01
    // = 10.4622..., contribution = (10000 - fv) / factor = 850.2387...
    let projection = project(&goal(dec!(10000), dec!(1000), 10, dec!(12)), reference_now());

    assert_eq!(projection.months_remaining, 10);
    let expected = dec!(850.2387);
    let delta = (projection.monthly_contribution - expected).abs();
    assert!(
        delta < dec!(0.001),
        "expected roughly {} per month, got {}",
        expected,
        projection.monthly_contribution
    );
    assert_eq!(projection.progress_percentage, dec!(10));
    assert!(projection.is_on_track);
}

#[test]
fn distant_deadline_does_not_overflow() {
    // ~800 years of monthly compounding overflows Decimal; the projection
    // resolves to a zero contribution instead of panicking.
    let projection = project(&goal(dec!(10000), dec!(100), 9600, dec!(24)), reference_now());

    assert_eq!(projection.monthly_contribution, Decimal::ZERO);
    assert!(projection.is_on_track);
}

#[test]
fn projected_goal_serializes_flat_camel_case() {
    let goal = goal(dec!(12000), dec!(3000), 12, dec!(0));
    let now = reference_now();
    let with_projection = finbox_core::goals::GoalWithProjection {
        projection: project(&goal, now),
        goal,
    };

    let value = serde_json::to_value(&with_projection).expect("serializes");
    assert_eq!(value["targetAmount"], serde_json::json!(12000.0));
    assert_eq!(value["progressPercentage"], serde_json::json!(25.0));
    assert_eq!(value["monthsRemaining"], serde_json::json!(12));
    assert_eq!(value["isOnTrack"], serde_json::json!(true));
}
