//! Challenge evaluator: scores the active batch against the elapsed week,
//! awards booze points, then discards the batch and regenerates.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::catalog::TemplateCatalog;
use crate::error::Result;
use crate::history::DrinkHistory;
use crate::user::{User, CHALLENGE_WINDOW_DAYS};

use super::{Generator, Goal};

/// Outcome of a single challenge at rollover.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChallengeOutcome {
    pub template_id: u32,
    /// `None` for the unimplemented blood-percentage behavior, which is
    /// never scored.
    pub succeeded: Option<bool>,
    /// Points credited for this challenge (0 unless succeeded).
    pub reward: u32,
}

/// What happened at a weekly rollover.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RolloverSummary {
    pub outcomes: Vec<ChallengeOutcome>,
    pub points_awarded: i64,
    pub evaluated_at: DateTime<Utc>,
}

/// Scores active challenges and rolls the batch over.
pub struct Evaluator<'a> {
    catalog: &'a TemplateCatalog,
    history: &'a dyn DrinkHistory,
}

impl<'a> Evaluator<'a> {
    pub fn new(catalog: &'a TemplateCatalog, history: &'a dyn DrinkHistory) -> Self {
        Self { catalog, history }
    }

    /// Evaluate the user's active batch over `[window_start, now)`, credit
    /// rewards for fulfilled challenges, then replace the batch with a
    /// freshly generated one. Evaluation and regeneration are one atomic
    /// logical step from the caller's perspective.
    pub fn evaluate<R: Rng + ?Sized>(
        &self,
        user: &mut User,
        window_start: DateTime<Utc>,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<RolloverSummary> {
        for i in 0..user.active_challenges.len() {
            let succeeded = self.score(user.id, user.active_challenges[i].goal, window_start, now)?;
            user.active_challenges[i].succeeded = succeeded;
        }

        // Credit rewards only after the whole batch is scored.
        let mut outcomes = Vec::with_capacity(user.active_challenges.len());
        let mut points_awarded: i64 = 0;
        for instance in &user.active_challenges {
            let template = self.catalog.by_id(instance.template_id)?;
            let reward = if instance.succeeded == Some(true) {
                template.reward
            } else {
                0
            };
            points_awarded += i64::from(reward);
            outcomes.push(ChallengeOutcome {
                template_id: instance.template_id,
                succeeded: instance.succeeded,
                reward,
            });
        }
        user.points += points_awarded;

        user.active_challenges.clear();
        Generator::new(self.catalog, self.history).generate(user, now, rng)?;

        Ok(RolloverSummary {
            outcomes,
            points_awarded,
            evaluated_at: now,
        })
    }

    /// Score one goal over the window. Returns `None` for goals that are
    /// never scored.
    fn score(
        &self,
        user_id: i64,
        goal: Goal,
        window_start: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<Option<bool>> {
        match goal {
            Goal::MaxPerWeek { weekly_cap } => {
                let count = self.history.count_in_window(user_id, window_start, now)?;
                Ok(Some(count < weekly_cap))
            }
            Goal::MaxPerDay { daily_cap } => {
                let records = self.history.list_in_window(user_id, window_start, now)?;
                let buckets = day_buckets(&records, window_start);
                Ok(Some(buckets.iter().all(|&count| count <= daily_cap)))
            }
            Goal::MaxOnNDays {
                daily_cap,
                tolerance_days,
            } => {
                let records = self.history.list_in_window(user_id, window_start, now)?;
                let buckets = day_buckets(&records, window_start);
                // Inherited inverted comparison: count the days that stay
                // strictly below the cap and require that count to be
                // strictly below the tolerance.
                let days_below_cap =
                    buckets.iter().filter(|&&count| count < daily_cap).count() as i64;
                Ok(Some(days_below_cap < tolerance_days))
            }
            // Unimplemented behavior: no computation, outcome stays unset.
            Goal::MaxBloodPercentage => Ok(None),
            Goal::AlwaysSucceeds => Ok(Some(true)),
        }
    }
}

/// Per-day drink counts over the seven calendar days (UTC) starting at the
/// window-start date. Records dated outside those days are ignored.
fn day_buckets(records: &[DateTime<Utc>], window_start: DateTime<Utc>) -> [i64; 7] {
    let first_day = window_start.date_naive();
    let mut buckets = [0i64; 7];
    for ts in records {
        let day = (ts.date_naive() - first_day).num_days();
        if (0..CHALLENGE_WINDOW_DAYS).contains(&day) {
            buckets[day as usize] += 1;
        }
    }
    buckets
}
