//! Challenge generator: fills an empty batch with three personalized
//! challenges drawn from the catalog.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use crate::catalog::TemplateCatalog;
use crate::error::Result;
use crate::history::DrinkHistory;
use crate::user::{User, CHALLENGE_WINDOW_DAYS};

use super::{personalize, ChallengeInstance};

/// Number of challenges in a batch.
pub const BATCH_SIZE: usize = 3;

/// Draws templates and produces personalized challenge instances.
pub struct Generator<'a> {
    catalog: &'a TemplateCatalog,
    history: &'a dyn DrinkHistory,
}

impl<'a> Generator<'a> {
    pub fn new(catalog: &'a TemplateCatalog, history: &'a dyn DrinkHistory) -> Self {
        Self { catalog, history }
    }

    /// Fill `user.active_challenges` with a fresh batch of three.
    ///
    /// Precondition: the user has no active challenges. Template ids are
    /// drawn uniformly from 1..=5 with 4 remapped to 5 (template 4 is an
    /// unfinished slot), re-drawing on duplicates within the batch. The
    /// retry loop is bounded: every draw lands on one of four candidate ids
    /// and duplicates only shrink the acceptable set, never to empty.
    ///
    /// All three instances share `assigned_at = now`.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        user: &mut User,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<()> {
        debug_assert!(user.active_challenges.is_empty());
        let window_start = now - Duration::days(CHALLENGE_WINDOW_DAYS);
        let drink_count = self.history.count_in_window(user.id, window_start, now)?;

        for _ in 0..BATCH_SIZE {
            let id = loop {
                let mut id: u32 = rng.gen_range(1..=5);
                if id == 4 {
                    // Template 4 not implemented yet, folded into 5.
                    id = 5;
                }
                if !user.active_challenges.iter().any(|c| c.template_id == id) {
                    break id;
                }
            };
            let template = self.catalog.by_id(id)?;
            let goal = personalize(template.behavior, drink_count, rng);
            user.active_challenges.push(ChallengeInstance {
                template_id: template.id,
                user_id: user.id,
                goal,
                assigned_at: now,
                succeeded: None,
            });
        }
        Ok(())
    }
}
