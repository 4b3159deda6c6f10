//! SQLite-based persistence.
//!
//! Provides storage for:
//! - Users and their booze-point accumulators
//! - Logged drinks (the consumption history)
//! - Active challenge instances
//!
//! `Database` implements both collaborator contracts the challenge engine
//! consumes: [`UserStore`] and [`DrinkHistory`].

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

use crate::challenge::{ChallengeInstance, Goal};
use crate::error::{DatabaseError, Result};
use crate::history::{DrinkHistory, UserStore};
use crate::user::User;

use super::data_dir;

/// A logged drink.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrinkRecord {
    pub id: i64,
    pub user_id: i64,
    pub drank_at: DateTime<Utc>,
}

/// SQLite database for users, drinks and active challenges.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `data_dir()/boozetrack.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("boozetrack.db");
        Self::open_at(&path)
    }

    /// Open the database at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|e| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source: e,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (tests, throwaway runs).
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| DatabaseError::OpenFailed {
            path: PathBuf::from(":memory:"),
            source: e,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<()> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS users (
                    id     INTEGER PRIMARY KEY AUTOINCREMENT,
                    name   TEXT NOT NULL UNIQUE,
                    points INTEGER NOT NULL DEFAULT 0
                );

                CREATE TABLE IF NOT EXISTS drinks (
                    id       INTEGER PRIMARY KEY AUTOINCREMENT,
                    user_id  INTEGER NOT NULL REFERENCES users(id),
                    drank_at TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS challenges (
                    id          INTEGER PRIMARY KEY AUTOINCREMENT,
                    user_id     INTEGER NOT NULL REFERENCES users(id),
                    template_id INTEGER NOT NULL,
                    goal        TEXT NOT NULL,
                    assigned_at TEXT NOT NULL,
                    succeeded   INTEGER
                );

                CREATE INDEX IF NOT EXISTS idx_drinks_user_time ON drinks(user_id, drank_at);
                CREATE INDEX IF NOT EXISTS idx_challenges_user ON challenges(user_id);",
            )
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(())
    }

    // ── Users ────────────────────────────────────────────────────────

    /// Create a user. The name must be unique.
    pub fn add_user(&self, name: &str) -> Result<User> {
        self.conn
            .execute("INSERT INTO users (name) VALUES (?1)", params![name])?;
        Ok(User::new(self.conn.last_insert_rowid(), name))
    }

    pub fn user_id_by_name(&self, name: &str) -> Result<Option<i64>> {
        let id = self
            .conn
            .query_row(
                "SELECT id FROM users WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()
            .map_err(DatabaseError::from)?;
        Ok(id)
    }

    pub fn list_users(&self) -> Result<Vec<User>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id FROM users ORDER BY id")
            .map_err(DatabaseError::from)?;
        let ids = stmt
            .query_map([], |row| row.get::<_, i64>(0))
            .map_err(DatabaseError::from)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(DatabaseError::from)?;
        ids.into_iter().map(|id| self.load(id)).collect()
    }

    // ── Drinks ───────────────────────────────────────────────────────

    /// Log a drink for the user.
    pub fn add_drink(&self, user_id: i64, drank_at: DateTime<Utc>) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO drinks (user_id, drank_at) VALUES (?1, ?2)",
            params![user_id, drank_at.to_rfc3339()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Remove a logged drink. Returns false if no such drink belongs to the
    /// user.
    pub fn remove_drink(&self, user_id: i64, drink_id: i64) -> Result<bool> {
        let affected = self.conn.execute(
            "DELETE FROM drinks WHERE id = ?1 AND user_id = ?2",
            params![drink_id, user_id],
        )?;
        Ok(affected > 0)
    }

    /// All drinks for the user, oldest first.
    pub fn drinks_for_user(&self, user_id: i64) -> Result<Vec<DrinkRecord>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, user_id, drank_at FROM drinks
                 WHERE user_id = ?1 ORDER BY drank_at",
            )
            .map_err(DatabaseError::from)?;
        let rows = stmt
            .query_map(params![user_id], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })
            .map_err(DatabaseError::from)?;

        let mut records = Vec::new();
        for row in rows {
            let (id, user_id, drank_at) = row.map_err(DatabaseError::from)?;
            records.push(DrinkRecord {
                id,
                user_id,
                drank_at: parse_timestamp(&drank_at)?,
            });
        }
        Ok(records)
    }
}

impl UserStore for Database {
    fn load(&self, user_id: i64) -> Result<User> {
        let (name, points) = self
            .conn
            .query_row(
                "SELECT name, points FROM users WHERE id = ?1",
                params![user_id],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)),
            )
            .optional()
            .map_err(DatabaseError::from)?
            .ok_or(DatabaseError::UserNotFound(user_id))?;

        let mut stmt = self
            .conn
            .prepare(
                "SELECT template_id, goal, assigned_at, succeeded FROM challenges
                 WHERE user_id = ?1 ORDER BY id",
            )
            .map_err(DatabaseError::from)?;
        let rows = stmt
            .query_map(params![user_id], |row| {
                Ok((
                    row.get::<_, u32>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, Option<bool>>(3)?,
                ))
            })
            .map_err(DatabaseError::from)?;

        let mut active_challenges = Vec::new();
        for row in rows {
            let (template_id, goal, assigned_at, succeeded) = row.map_err(DatabaseError::from)?;
            let goal: Goal = serde_json::from_str(&goal)?;
            active_challenges.push(ChallengeInstance {
                template_id,
                user_id,
                goal,
                assigned_at: parse_timestamp(&assigned_at)?,
                succeeded,
            });
        }

        Ok(User {
            id: user_id,
            name,
            points,
            active_challenges,
        })
    }

    /// Persist points and replace the active challenge set in one
    /// transaction.
    fn save(&self, user: &User) -> Result<()> {
        let tx = self
            .conn
            .unchecked_transaction()
            .map_err(DatabaseError::from)?;

        let affected = tx.execute(
            "UPDATE users SET points = ?1 WHERE id = ?2",
            params![user.points, user.id],
        )?;
        if affected == 0 {
            return Err(DatabaseError::UserNotFound(user.id).into());
        }

        tx.execute(
            "DELETE FROM challenges WHERE user_id = ?1",
            params![user.id],
        )?;
        for instance in &user.active_challenges {
            tx.execute(
                "INSERT INTO challenges (user_id, template_id, goal, assigned_at, succeeded)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    user.id,
                    instance.template_id,
                    serde_json::to_string(&instance.goal)?,
                    instance.assigned_at.to_rfc3339(),
                    instance.succeeded,
                ],
            )?;
        }

        tx.commit().map_err(DatabaseError::from)?;
        Ok(())
    }
}

impl DrinkHistory for Database {
    fn count_in_window(
        &self,
        user_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<i64> {
        let count = self
            .conn
            .query_row(
                "SELECT COUNT(*) FROM drinks
                 WHERE user_id = ?1 AND drank_at >= ?2 AND drank_at < ?3",
                params![user_id, start.to_rfc3339(), end.to_rfc3339()],
                |row| row.get(0),
            )
            .map_err(DatabaseError::from)?;
        Ok(count)
    }

    fn list_in_window(
        &self,
        user_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<DateTime<Utc>>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT drank_at FROM drinks
                 WHERE user_id = ?1 AND drank_at >= ?2 AND drank_at < ?3
                 ORDER BY drank_at",
            )
            .map_err(DatabaseError::from)?;
        let rows = stmt
            .query_map(
                params![user_id, start.to_rfc3339(), end.to_rfc3339()],
                |row| row.get::<_, String>(0),
            )
            .map_err(DatabaseError::from)?;

        let mut timestamps = Vec::new();
        for row in rows {
            timestamps.push(parse_timestamp(&row.map_err(DatabaseError::from)?)?);
        }
        Ok(timestamps)
    }
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DatabaseError::QueryFailed(format!("bad timestamp '{raw}': {e}")).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn add_and_find_user() {
        let db = Database::open_memory().unwrap();
        let user = db.add_user("alice").unwrap();
        assert_eq!(db.user_id_by_name("alice").unwrap(), Some(user.id));
        assert_eq!(db.user_id_by_name("bob").unwrap(), None);
        assert!(db.add_user("alice").is_err(), "name must be unique");
    }

    #[test]
    fn load_missing_user_fails() {
        let db = Database::open_memory().unwrap();
        assert!(db.load(7).is_err());
    }

    #[test]
    fn window_queries_are_half_open() {
        let db = Database::open_memory().unwrap();
        let user = db.add_user("alice").unwrap();
        let start = t0();
        let end = start + Duration::days(7);

        db.add_drink(user.id, start - Duration::seconds(1)).unwrap();
        db.add_drink(user.id, start).unwrap();
        db.add_drink(user.id, start + Duration::days(3)).unwrap();
        db.add_drink(user.id, end - Duration::seconds(1)).unwrap();
        db.add_drink(user.id, end).unwrap();

        assert_eq!(db.count_in_window(user.id, start, end).unwrap(), 3);
        let listed = db.list_in_window(user.id, start, end).unwrap();
        assert_eq!(listed.len(), 3);
        assert_eq!(listed[0], start);
        assert_eq!(*listed.last().unwrap(), end - Duration::seconds(1));
    }

    #[test]
    fn windows_are_scoped_per_user() {
        let db = Database::open_memory().unwrap();
        let alice = db.add_user("alice").unwrap();
        let bob = db.add_user("bob").unwrap();
        db.add_drink(alice.id, t0()).unwrap();

        let end = t0() + Duration::days(1);
        assert_eq!(db.count_in_window(alice.id, t0(), end).unwrap(), 1);
        assert_eq!(db.count_in_window(bob.id, t0(), end).unwrap(), 0);
    }

    #[test]
    fn remove_drink_checks_ownership() {
        let db = Database::open_memory().unwrap();
        let alice = db.add_user("alice").unwrap();
        let bob = db.add_user("bob").unwrap();
        let drink = db.add_drink(alice.id, t0()).unwrap();

        assert!(!db.remove_drink(bob.id, drink).unwrap());
        assert!(db.remove_drink(alice.id, drink).unwrap());
        assert!(db.drinks_for_user(alice.id).unwrap().is_empty());
    }

    #[test]
    fn save_and_load_round_trips_challenges() {
        let db = Database::open_memory().unwrap();
        let mut user = db.add_user("alice").unwrap();
        user.points = 40;
        user.active_challenges = vec![
            ChallengeInstance {
                template_id: 1,
                user_id: user.id,
                goal: Goal::MaxPerWeek { weekly_cap: 4 },
                assigned_at: t0(),
                succeeded: None,
            },
            ChallengeInstance {
                template_id: 3,
                user_id: user.id,
                goal: Goal::MaxOnNDays {
                    daily_cap: 2,
                    tolerance_days: 3,
                },
                assigned_at: t0(),
                succeeded: Some(true),
            },
            ChallengeInstance {
                template_id: 5,
                user_id: user.id,
                goal: Goal::AlwaysSucceeds,
                assigned_at: t0(),
                succeeded: None,
            },
        ];
        db.save(&user).unwrap();

        let loaded = db.load(user.id).unwrap();
        assert_eq!(loaded.points, 40);
        assert_eq!(loaded.active_challenges, user.active_challenges);
    }

    #[test]
    fn save_replaces_the_previous_batch() {
        let db = Database::open_memory().unwrap();
        let mut user = db.add_user("alice").unwrap();
        user.active_challenges = vec![ChallengeInstance {
            template_id: 1,
            user_id: user.id,
            goal: Goal::MaxPerWeek { weekly_cap: 4 },
            assigned_at: t0(),
            succeeded: None,
        }];
        db.save(&user).unwrap();

        user.active_challenges = vec![ChallengeInstance {
            template_id: 2,
            user_id: user.id,
            goal: Goal::MaxPerDay { daily_cap: 1 },
            assigned_at: t0() + Duration::days(7),
            succeeded: None,
        }];
        db.save(&user).unwrap();

        let loaded = db.load(user.id).unwrap();
        assert_eq!(loaded.active_challenges.len(), 1);
        assert_eq!(loaded.active_challenges[0].template_id, 2);
    }

    #[test]
    fn save_unknown_user_fails() {
        let db = Database::open_memory().unwrap();
        let user = User::new(99, "ghost");
        assert!(db.save(&user).is_err());
    }

    #[test]
    fn open_at_creates_schema_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("boozetrack.db");
        {
            let db = Database::open_at(&path).unwrap();
            db.add_user("alice").unwrap();
        }
        let db = Database::open_at(&path).unwrap();
        assert_eq!(db.user_id_by_name("alice").unwrap(), Some(1));
    }
}
