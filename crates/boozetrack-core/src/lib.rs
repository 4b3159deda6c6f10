//! # Boozetrack Core Library
//!
//! Core business logic for the Boozetrack habit tracker: a challenge
//! generation and evaluation engine over a user's drink history.
//!
//! ## Architecture
//!
//! - **Template Catalog**: an immutable set of challenge templates loaded
//!   once at startup
//! - **Challenge Engine**: generator, evaluator and orchestrating manager;
//!   a lazy weekly state machine driven by manage calls, not timers
//! - **Storage**: SQLite-backed users/drinks/challenges and TOML-based
//!   configuration
//!
//! ## Key Components
//!
//! - [`ChallengeManager`]: the single entry point for the service layer
//! - [`TemplateCatalog`]: template loading and lookup
//! - [`Database`]: persistence, implementing the [`UserStore`] and
//!   [`DrinkHistory`] contracts the engine consumes

pub mod catalog;
pub mod challenge;
pub mod error;
pub mod history;
pub mod storage;
pub mod user;

pub use catalog::{BehaviorKind, ChallengeTemplate, TemplateCatalog};
pub use challenge::{
    ChallengeInstance, ChallengeManager, ChallengeOutcome, ChallengeView, Goal, ManageOutcome,
    RolloverSummary,
};
pub use error::{CatalogError, ConfigError, CoreError, DatabaseError};
pub use history::{DrinkHistory, UserStore};
pub use storage::{Config, Database, DrinkRecord};
pub use user::{User, CHALLENGE_WINDOW_DAYS};
