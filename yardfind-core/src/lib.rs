//! YardFind Rewards Core
//!
//! Platform-agnostic gamification and trust logic for the YardFind yard
//! sale app. This crate provides XP/level progression, badge evaluation,
//! visit/weekend/streak tracking, and the sale trust ledger without UI or
//! platform-specific dependencies.

pub mod badges;
pub mod constants;
pub mod events;
pub mod levels;
pub mod profile;
pub mod progression;
pub mod session;
pub mod state;
pub mod streak;
pub mod trust;
pub mod visits;
pub mod weekend;

// Re-export commonly used types
pub use badges::{BadgeCatalog, BadgeDef, BadgeKind, CatalogError};
pub use events::{RewardEvent, RewardEvents, RewardOutcome};
pub use levels::{LevelDef, LevelTable, LevelTableError};
pub use profile::{Category, Tier, UserProfile};
pub use progression::{add_badge, add_coins, add_xp, evaluate_badges};
pub use session::RewardsSession;
pub use state::{GeoBucket, GeoPoint, RewardsState, WeekendStamp};
pub use streak::{reconcile_hunt_streak, update_hunt_streak};
pub use trust::{ConfirmationLedger, SaleConfirmation, Vote};
pub use visits::{mark_visited, toggle_save};
pub use weekend::{is_weekend, previous_weekend_key, weekend_key, weekend_saturday};

use chrono::NaiveDateTime;
use std::cell::RefCell;
use std::convert::Infallible;
use std::rc::Rc;

/// Trait for abstracting profile persistence.
/// Platform-specific implementations should provide this.
pub trait ProfileStorage {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the stored profile graph, if one exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored graph cannot be loaded or parsed.
    fn load(&self) -> Result<Option<RewardsState>, Self::Error>;

    /// Persist the full profile graph.
    ///
    /// # Errors
    ///
    /// Returns an error if the graph cannot be saved.
    fn save(&self, state: &RewardsState) -> Result<(), Self::Error>;
}

/// Trait for abstracting the local wall clock.
/// Weekend and time-of-day rules read the user's local time through this.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// Clock backed by the system's local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}

/// Clock pinned to a fixed instant, for tests and demos.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(NaiveDateTime);

impl FixedClock {
    #[must_use]
    pub const fn at(instant: NaiveDateTime) -> Self {
        Self(instant)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// In-memory storage, for tests and demos. Clones share the same record.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    record: Rc<RefCell<Option<RewardsState>>>,
}

impl MemoryStorage {
    /// The last saved graph, if any.
    #[must_use]
    pub fn snapshot(&self) -> Option<RewardsState> {
        self.record.borrow().clone()
    }
}

impl ProfileStorage for MemoryStorage {
    type Error = Infallible;

    fn load(&self) -> Result<Option<RewardsState>, Self::Error> {
        Ok(self.record.borrow().clone())
    }

    fn save(&self, state: &RewardsState) -> Result<(), Self::Error> {
        *self.record.borrow_mut() = Some(state.clone());
        Ok(())
    }
}
