//! Challenge generation and evaluation engine.
//!
//! A user carries 0 or 3 active [`ChallengeInstance`]s. The
//! [`ChallengeManager`] is the entry point: it generates a batch for users
//! with none, returns the batch unchanged while it is less than a week old,
//! and on the next call after the 7-day boundary evaluates the batch, awards
//! booze points, and regenerates.

mod evaluator;
mod generator;
mod goal;
mod manager;
mod personalize;

pub use evaluator::{ChallengeOutcome, Evaluator, RolloverSummary};
pub use generator::Generator;
pub use goal::Goal;
pub use manager::{ChallengeManager, ChallengeView, ManageOutcome};
pub use personalize::personalize;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A per-user, time-boxed assignment of a catalog template.
///
/// Created by the generator; only the evaluator sets `succeeded`. The whole
/// batch of three is discarded and replaced at rollover -- instances never
/// outlive one evaluation cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChallengeInstance {
    pub template_id: u32,
    pub user_id: i64,
    pub goal: Goal,
    pub assigned_at: DateTime<Utc>,
    /// Unset until evaluated. Stays unset for the unimplemented
    /// blood-percentage behavior.
    pub succeeded: Option<bool>,
}

impl ChallengeInstance {
    /// Positional parameter view, in the order the evaluator consumes them.
    pub fn parameters(&self) -> Vec<i64> {
        self.goal.parameters()
    }
}
