//! Personalized challenge goals.

use serde::{Deserialize, Serialize};

use crate::catalog::BehaviorKind;

/// A personalized goal, one variant per challenge behavior.
///
/// Each variant carries exactly the thresholds its evaluation needs, so a
/// malformed parameter list is unrepresentable. [`Goal::parameters`] gives
/// the positional integer view used by the wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Goal {
    /// Drink at most `weekly_cap - 1` times across the week.
    MaxPerWeek { weekly_cap: i64 },
    /// No single day may exceed `daily_cap` drinks.
    MaxPerDay { daily_cap: i64 },
    /// Daily cap with a slip allowance. Scored with the inverted comparison
    /// inherited from the original rules: count the days strictly below
    /// `daily_cap` and succeed iff that count is strictly below
    /// `tolerance_days`.
    MaxOnNDays { daily_cap: i64, tolerance_days: i64 },
    /// Blood-alcohol cap. Unimplemented: carries no threshold and is never
    /// scored.
    MaxBloodPercentage,
    /// Fulfilled unconditionally.
    AlwaysSucceeds,
}

impl Goal {
    /// The behavior this goal was personalized for.
    pub fn kind(&self) -> BehaviorKind {
        match self {
            Goal::MaxPerWeek { .. } => BehaviorKind::MaxPerWeek,
            Goal::MaxPerDay { .. } => BehaviorKind::MaxPerDay,
            Goal::MaxOnNDays { .. } => BehaviorKind::MaxOnNDays,
            Goal::MaxBloodPercentage => BehaviorKind::MaxBloodPercentage,
            Goal::AlwaysSucceeds => BehaviorKind::AlwaysSucceeds,
        }
    }

    /// Thresholds in positional order, as consumed by the evaluator and
    /// emitted on the wire. 0, 1 or 2 elements depending on the variant.
    pub fn parameters(&self) -> Vec<i64> {
        match *self {
            Goal::MaxPerWeek { weekly_cap } => vec![weekly_cap],
            Goal::MaxPerDay { daily_cap } => vec![daily_cap],
            Goal::MaxOnNDays {
                daily_cap,
                tolerance_days,
            } => vec![daily_cap, tolerance_days],
            Goal::MaxBloodPercentage | Goal::AlwaysSucceeds => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameters_are_positional() {
        assert_eq!(Goal::MaxPerWeek { weekly_cap: 4 }.parameters(), vec![4]);
        assert_eq!(Goal::MaxPerDay { daily_cap: 2 }.parameters(), vec![2]);
        assert_eq!(
            Goal::MaxOnNDays {
                daily_cap: 2,
                tolerance_days: 3
            }
            .parameters(),
            vec![2, 3]
        );
        assert!(Goal::MaxBloodPercentage.parameters().is_empty());
        assert!(Goal::AlwaysSucceeds.parameters().is_empty());
    }

    #[test]
    fn kind_round_trips_to_behavior() {
        assert_eq!(
            Goal::MaxPerWeek { weekly_cap: 1 }.kind(),
            BehaviorKind::MaxPerWeek
        );
        assert_eq!(Goal::AlwaysSucceeds.kind(), BehaviorKind::AlwaysSucceeds);
    }

    #[test]
    fn goal_serializes_with_type_tag() {
        let json = serde_json::to_value(Goal::MaxOnNDays {
            daily_cap: 2,
            tolerance_days: 3,
        })
        .unwrap();
        assert_eq!(json["type"], "max_on_n_days");
        assert_eq!(json["daily_cap"], 2);
        assert_eq!(json["tolerance_days"], 3);
    }
}
