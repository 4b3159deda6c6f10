//! Parameterizer: turns a behavior plus the user's trailing-week drink
//! count into a personalized goal.

use rand::Rng;

use crate::catalog::BehaviorKind;

use super::Goal;

/// Headroom subtracted from the observed count so the challenge nudges the
/// user below their current habit.
const CHALLENGE_MARGIN: i64 = 2;

/// Personalize a goal for `behavior` from the trailing-week `drink_count`.
///
/// All computed thresholds floor at 1; a user with no recent drinks still
/// gets a non-degenerate target. The `MaxOnNDays` slip allowance is drawn
/// uniformly from 1..=5.
pub fn personalize<R: Rng + ?Sized>(
    behavior: BehaviorKind,
    drink_count: i64,
    rng: &mut R,
) -> Goal {
    match behavior {
        BehaviorKind::MaxPerWeek => Goal::MaxPerWeek {
            weekly_cap: floor_one(drink_count - CHALLENGE_MARGIN),
        },
        BehaviorKind::MaxPerDay => Goal::MaxPerDay {
            daily_cap: floor_one(drink_count / 7 - CHALLENGE_MARGIN),
        },
        BehaviorKind::MaxOnNDays => Goal::MaxOnNDays {
            daily_cap: floor_one(drink_count / 7 - CHALLENGE_MARGIN),
            tolerance_days: rng.gen_range(1..=5),
        },
        BehaviorKind::MaxBloodPercentage => Goal::MaxBloodPercentage,
        BehaviorKind::AlwaysSucceeds => Goal::AlwaysSucceeds,
    }
}

fn floor_one(value: i64) -> i64 {
    value.max(1)
}
