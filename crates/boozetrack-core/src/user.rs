//! User record as seen by the challenge engine.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::challenge::ChallengeInstance;

/// Days in the challenge window. Both parameterization and evaluation run
/// over the trailing week.
pub const CHALLENGE_WINDOW_DAYS: i64 = 7;

/// A user, reduced to what the engine touches: the booze-point accumulator
/// and the active challenge batch.
///
/// Invariant: `active_challenges` holds 0 or exactly 3 instances with
/// pairwise-distinct template ids; all 3 share one `assigned_at` because
/// they are created together.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub points: i64,
    pub active_challenges: Vec<ChallengeInstance>,
}

impl User {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            points: 0,
            active_challenges: Vec::new(),
        }
    }

    /// When the current batch was assigned, if there is one.
    ///
    /// The batch shares a single assignment instant, so the first instance
    /// stands in for all three.
    pub fn batch_assigned_at(&self) -> Option<DateTime<Utc>> {
        self.active_challenges.first().map(|c| c.assigned_at)
    }

    /// True when the active batch is at least a week old and due for
    /// evaluation.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        match self.batch_assigned_at() {
            Some(assigned) => now - assigned >= Duration::days(CHALLENGE_WINDOW_DAYS),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::challenge::{ChallengeInstance, Goal};
    use chrono::TimeZone;

    fn instance(assigned_at: DateTime<Utc>) -> ChallengeInstance {
        ChallengeInstance {
            template_id: 5,
            user_id: 1,
            goal: Goal::AlwaysSucceeds,
            assigned_at,
            succeeded: None,
        }
    }

    #[test]
    fn empty_user_is_never_due() {
        let user = User::new(1, "alice");
        assert!(!user.is_due(Utc::now()));
    }

    #[test]
    fn due_exactly_at_the_seven_day_boundary() {
        let assigned = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let mut user = User::new(1, "alice");
        user.active_challenges.push(instance(assigned));

        assert!(!user.is_due(assigned + Duration::days(6)));
        assert!(!user.is_due(assigned + Duration::days(7) - Duration::seconds(1)));
        assert!(user.is_due(assigned + Duration::days(7)));
        assert!(user.is_due(assigned + Duration::days(8)));
    }
}
