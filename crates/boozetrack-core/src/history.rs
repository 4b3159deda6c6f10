//! Collaborator contracts consumed by the challenge engine.
//!
//! Both traits are constructor-injected into the engine so tests can swap in
//! fakes. The bundled [`crate::storage::Database`] implements both.

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::user::User;

/// Time-windowed read access to a user's consumption records.
///
/// Windows are half-open: `[start, end)`. Failures propagate out of the
/// engine verbatim -- no retry, no local recovery.
pub trait DrinkHistory {
    /// Number of drinks the user logged in `[start, end)`.
    fn count_in_window(
        &self,
        user_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<i64>;

    /// Timestamps of the drinks the user logged in `[start, end)`.
    fn list_in_window(
        &self,
        user_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<DateTime<Utc>>>;
}

/// Read/write access to user records.
///
/// `save` is atomic at the boundary: points and the active challenge set are
/// persisted together or not at all.
pub trait UserStore {
    fn load(&self, user_id: i64) -> Result<User>;
    fn save(&self, user: &User) -> Result<()>;
}
