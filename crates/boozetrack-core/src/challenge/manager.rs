//! Challenge manager: the orchestrating entry point.
//!
//! A user's challenge state is a 2-state machine:
//!
//! ```text
//! Empty --generate--> Active --(< 7 days)--> Active (unchanged)
//!                     Active --(>= 7 days)--> evaluate + regenerate --> Active
//! ```
//!
//! There is no background scheduler. "Weekly" evaluation is lazy: it runs on
//! the first manage call after the 7-day boundary.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use rand::SeedableRng;
use rand_pcg::Mcg128Xsl64;
use serde::{Deserialize, Serialize};

use crate::catalog::TemplateCatalog;
use crate::error::{CatalogError, Result};
use crate::history::{DrinkHistory, UserStore};
use crate::user::CHALLENGE_WINDOW_DAYS;

use super::{ChallengeInstance, Evaluator, Generator, RolloverSummary};

/// One challenge as the service layer sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeView {
    pub description: String,
    pub reward: u32,
    pub parameters: Vec<i64>,
}

impl ChallengeView {
    /// Resolve the instance's template and substitute its parameters into
    /// the description.
    pub fn render(
        instance: &ChallengeInstance,
        catalog: &TemplateCatalog,
    ) -> Result<Self, CatalogError> {
        let template = catalog.by_id(instance.template_id)?;
        let parameters = instance.parameters();
        Ok(Self {
            description: template.render(&parameters),
            reward: template.reward,
            parameters,
        })
    }
}

/// Result of one manage call: the user's current challenge set, plus the
/// rollover summary when this call triggered an evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManageOutcome {
    pub challenges: Vec<ChallengeView>,
    pub rollover: Option<RolloverSummary>,
}

/// Orchestrates generation and weekly evaluation of a user's challenges.
///
/// Collaborators are constructor-injected so tests can substitute them. The
/// whole load-evaluate-save sequence for one user runs under a per-user
/// mutex; two concurrent calls for the same user serialize instead of
/// racing on the read-modify-write.
pub struct ChallengeManager {
    catalog: Arc<TemplateCatalog>,
    store: Arc<dyn UserStore>,
    history: Arc<dyn DrinkHistory>,
    locks: Mutex<HashMap<i64, Arc<Mutex<()>>>>,
    rng: Mutex<Mcg128Xsl64>,
}

impl ChallengeManager {
    /// `seed` pins the template draws for reproducible runs; `None` seeds
    /// from entropy.
    pub fn new(
        catalog: Arc<TemplateCatalog>,
        store: Arc<dyn UserStore>,
        history: Arc<dyn DrinkHistory>,
        seed: Option<u64>,
    ) -> Self {
        let rng = match seed {
            Some(seed) => Mcg128Xsl64::seed_from_u64(seed),
            None => Mcg128Xsl64::from_entropy(),
        };
        Self {
            catalog,
            store,
            history,
            locks: Mutex::new(HashMap::new()),
            rng: Mutex::new(rng),
        }
    }

    /// Manage the user's challenges as of the current wall clock.
    pub fn manage(&self, user_id: i64) -> Result<ManageOutcome> {
        self.manage_at(user_id, Utc::now())
    }

    /// Manage the user's challenges as of `now` (injectable for tests).
    ///
    /// Either a full, internally consistent 3-challenge set comes back or
    /// the call fails outright; there is no partial-failure mode.
    pub fn manage_at(&self, user_id: i64, now: DateTime<Utc>) -> Result<ManageOutcome> {
        let slot = {
            let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
            locks.entry(user_id).or_default().clone()
        };
        let _guard = slot.lock().unwrap_or_else(|e| e.into_inner());

        let mut user = self.store.load(user_id)?;
        let mut rollover = None;

        if user.active_challenges.is_empty() {
            let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
            Generator::new(&self.catalog, self.history.as_ref())
                .generate(&mut user, now, &mut *rng)?;
            drop(rng);
            self.store.save(&user)?;
        } else if user.is_due(now) {
            let window_start = now - Duration::days(CHALLENGE_WINDOW_DAYS);
            let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
            let summary = Evaluator::new(&self.catalog, self.history.as_ref()).evaluate(
                &mut user,
                window_start,
                now,
                &mut *rng,
            )?;
            drop(rng);
            self.store.save(&user)?;
            rollover = Some(summary);
        }

        let challenges = user
            .active_challenges
            .iter()
            .map(|c| ChallengeView::render(c, &self.catalog))
            .collect::<Result<Vec<_>, CatalogError>>()?;

        Ok(ManageOutcome {
            challenges,
            rollover,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::challenge::testutil::{FakeHistory, MemoryStore};
    use crate::user::User;
    use chrono::TimeZone;

    fn manager(history: FakeHistory) -> (ChallengeManager, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::default());
        store.insert(User::new(1, "alice"));
        let manager = ChallengeManager::new(
            Arc::new(TemplateCatalog::builtin().unwrap()),
            store.clone(),
            Arc::new(history),
            Some(11),
        );
        (manager, store)
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn empty_user_gets_three_challenges() {
        let (manager, store) = manager(FakeHistory::default());
        let outcome = manager.manage_at(1, t0()).unwrap();

        assert_eq!(outcome.challenges.len(), 3);
        assert!(outcome.rollover.is_none());
        // Persisted with the same batch.
        assert_eq!(store.get(1).active_challenges.len(), 3);
    }

    #[test]
    fn idempotent_while_not_due() {
        let (manager, _store) = manager(FakeHistory::default());
        let first = manager.manage_at(1, t0()).unwrap();
        let second = manager.manage_at(1, t0() + Duration::days(3)).unwrap();
        let third = manager
            .manage_at(1, t0() + Duration::days(7) - Duration::seconds(1))
            .unwrap();

        assert_eq!(first.challenges, second.challenges);
        assert_eq!(first.challenges, third.challenges);
        assert!(second.rollover.is_none());
        assert!(third.rollover.is_none());
    }

    #[test]
    fn rollover_at_seven_days_awards_and_regenerates() {
        let (manager, store) = manager(FakeHistory::default());
        manager.manage_at(1, t0()).unwrap();

        let outcome = manager.manage_at(1, t0() + Duration::days(7)).unwrap();
        let summary = outcome.rollover.expect("rollover expected");

        assert_eq!(summary.outcomes.len(), 3);
        // With zero drinks every scored challenge passes.
        let expected: i64 = summary.outcomes.iter().map(|o| i64::from(o.reward)).sum();
        assert_eq!(summary.points_awarded, expected);
        assert!(expected > 0);
        assert_eq!(store.get(1).points, expected);

        // Fresh batch with a new 7-day clock.
        assert_eq!(outcome.challenges.len(), 3);
        assert_eq!(
            store.get(1).batch_assigned_at(),
            Some(t0() + Duration::days(7))
        );
    }

    #[test]
    fn exactly_one_evaluation_per_boundary_crossing() {
        let (manager, store) = manager(FakeHistory::default());
        manager.manage_at(1, t0()).unwrap();

        let first = manager.manage_at(1, t0() + Duration::days(8)).unwrap();
        assert!(first.rollover.is_some());
        let points = store.get(1).points;

        // The fresh batch is one day old; no second evaluation.
        let second = manager.manage_at(1, t0() + Duration::days(9)).unwrap();
        assert!(second.rollover.is_none());
        assert_eq!(store.get(1).points, points);
    }

    #[test]
    fn views_render_parameters_into_descriptions() {
        let (manager, _store) = manager(FakeHistory::default());
        let outcome = manager.manage_at(1, t0()).unwrap();
        for view in &outcome.challenges {
            assert!(!view.description.contains('{'), "unrendered placeholder");
            for p in &view.parameters {
                assert!(*p >= 1);
            }
        }
    }

    #[test]
    fn missing_user_fails_the_whole_call() {
        let (manager, _store) = manager(FakeHistory::default());
        assert!(manager.manage_at(99, t0()).is_err());
    }
}
