//! The rewards session: the single owner of a user's rewards state, binding
//! it to the storage and clock collaborators.
use crate::badges::{BadgeCatalog, BadgeKind};
use crate::events::RewardOutcome;
use crate::levels::LevelTable;
use crate::profile::{Category, UserProfile};
use crate::progression::{add_badge, add_coins, add_xp, evaluate_badges};
use crate::state::{GeoPoint, RewardsState, WeekendStamp};
use crate::streak;
use crate::trust::{SaleConfirmation, Vote};
use crate::visits;
use crate::weekend::weekend_key;
use crate::{Clock, ProfileStorage};

/// High-level session wrapper owning the rewards state for one user.
///
/// Every command runs synchronously, applies all of its sub-mutations, then
/// persists the whole graph once before returning. Queries never mutate.
#[derive(Debug)]
pub struct RewardsSession<S, C>
where
    S: ProfileStorage,
    C: Clock,
{
    storage: S,
    clock: C,
    levels: LevelTable,
    catalog: BadgeCatalog,
    state: RewardsState,
}

impl<S, C> RewardsSession<S, C>
where
    S: ProfileStorage,
    C: Clock,
{
    /// Open a session with the built-in level table and badge catalog,
    /// loading the stored profile graph or starting a fresh one.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored graph cannot be loaded or the tables
    /// fail validation.
    pub fn open(storage: S, clock: C) -> Result<Self, anyhow::Error>
    where
        S::Error: Into<anyhow::Error>,
    {
        Self::open_with_tables(storage, clock, LevelTable::default(), BadgeCatalog::default())
    }

    /// Open a session with explicit tables (tests, experiments, seasonal
    /// catalogs).
    ///
    /// # Errors
    ///
    /// Returns an error if the stored graph cannot be loaded or the tables
    /// fail validation.
    pub fn open_with_tables(
        storage: S,
        clock: C,
        levels: LevelTable,
        catalog: BadgeCatalog,
    ) -> Result<Self, anyhow::Error>
    where
        S::Error: Into<anyhow::Error>,
    {
        levels.validate()?;
        catalog.validate()?;
        let mut state = storage.load().map_err(Into::into)?.unwrap_or_default();
        if state.profile.created_at.is_none() {
            state.profile.created_at = Some(clock.now());
            storage.save(&state).map_err(Into::into)?;
        }
        Ok(Self {
            storage,
            clock,
            levels,
            catalog,
            state,
        })
    }

    // Commands --------------------------------------------------------

    /// Record a sale visit; see [`visits::mark_visited`].
    pub fn mark_visited(
        &mut self,
        sale_id: &str,
        location: Option<GeoPoint>,
    ) -> Result<RewardOutcome, S::Error> {
        let now = self.clock.now();
        let out = visits::mark_visited(
            &mut self.state,
            &self.levels,
            &self.catalog,
            now,
            sale_id,
            location,
        );
        self.persist(out)
    }

    /// Toggle the saved flag for a sale. Returns the new saved state along
    /// with any rewards.
    pub fn toggle_save(&mut self, sale_id: &str) -> Result<(bool, RewardOutcome), S::Error> {
        let (saved, out) = visits::toggle_save(&mut self.state, &self.levels, &self.catalog, sale_id);
        self.storage.save(&self.state)?;
        Ok((saved, out))
    }

    /// Cast or change this user's vote on whether a sale is still running.
    /// A first vote on a sale also counts toward community badges.
    pub fn confirm_sale(&mut self, sale_id: &str, vote: Vote) -> Result<RewardOutcome, S::Error> {
        let now = self.clock.now();
        let first_vote = self.state.confirmations.confirm(sale_id, vote, now);
        let mut out = RewardOutcome::new();
        if first_vote {
            self.state.confirmations_cast = self.state.confirmations_cast.saturating_add(1);
            evaluate_badges(
                &mut self.state,
                &self.levels,
                &self.catalog,
                &[BadgeKind::Social],
                &mut out,
            );
        }
        self.persist(out)
    }

    /// Count one confirmation vote without touching a ledger entry. The
    /// normal path is [`Self::confirm_sale`]; this exists for flows where the
    /// vote is recorded elsewhere.
    pub fn increment_confirmations(&mut self) -> Result<RewardOutcome, S::Error> {
        self.state.confirmations_cast = self.state.confirmations_cast.saturating_add(1);
        let mut out = RewardOutcome::new();
        evaluate_badges(
            &mut self.state,
            &self.levels,
            &self.catalog,
            &[BadgeKind::Social],
            &mut out,
        );
        self.persist(out)
    }

    /// Count a posted sale and run seller badge checks.
    pub fn increment_sales_posted(&mut self) -> Result<RewardOutcome, S::Error> {
        self.state.profile.total_sales_posted =
            self.state.profile.total_sales_posted.saturating_add(1);
        let mut out = RewardOutcome::new();
        evaluate_badges(
            &mut self.state,
            &self.levels,
            &self.catalog,
            &[BadgeKind::Seller],
            &mut out,
        );
        self.persist(out)
    }

    /// Grant XP directly (promotions, external rewards).
    pub fn add_xp(&mut self, amount: u32) -> Result<RewardOutcome, S::Error> {
        let mut out = RewardOutcome::new();
        add_xp(&mut self.state, &self.levels, amount, &mut out);
        self.persist(out)
    }

    /// Grant coins directly.
    pub fn add_coins(&mut self, amount: u32) -> Result<RewardOutcome, S::Error> {
        let mut out = RewardOutcome::new();
        add_coins(&mut self.state, amount, &mut out);
        self.persist(out)
    }

    /// Award a badge by id; a no-op if already held.
    pub fn add_badge(&mut self, badge_id: &str) -> Result<RewardOutcome, S::Error> {
        let mut out = RewardOutcome::new();
        add_badge(&mut self.state, &self.levels, badge_id, &mut out);
        self.persist(out)
    }

    /// Raw streak increment; see [`streak::update_hunt_streak`].
    pub fn update_hunt_streak(&mut self) -> Result<RewardOutcome, S::Error> {
        let mut out = RewardOutcome::new();
        streak::update_hunt_streak(&mut self.state, &self.levels, &self.catalog, &mut out);
        self.persist(out)
    }

    /// Zero the streak if the run has lapsed; call at session start.
    pub fn reconcile_hunt_streak(&mut self) -> Result<(), S::Error> {
        let today = self.clock.now().date();
        streak::reconcile_hunt_streak(&mut self.state, today);
        self.storage.save(&self.state)
    }

    /// Replace the preferred category set.
    pub fn set_preferred_categories(&mut self, categories: Vec<Category>) -> Result<(), S::Error> {
        self.state.profile.preferred_categories = categories;
        self.storage.save(&self.state)
    }

    /// Update the alert radius in miles.
    pub fn set_alert_radius(&mut self, miles: f64) -> Result<(), S::Error> {
        self.state.profile.alert_radius_miles = miles;
        self.storage.save(&self.state)
    }

    // Queries ---------------------------------------------------------

    #[must_use]
    pub fn is_saved(&self, sale_id: &str) -> bool {
        self.state.is_saved(sale_id)
    }

    #[must_use]
    pub fn is_visited(&self, sale_id: &str) -> bool {
        self.state.is_visited(sale_id)
    }

    /// Tally for a sale, or a zero default. Never creates ledger state.
    #[must_use]
    pub fn get_confirmation(&self, sale_id: &str) -> SaleConfirmation {
        self.state.confirmations.get(sale_id)
    }

    #[must_use]
    pub fn is_likely_ended(&self, sale_id: &str) -> bool {
        self.state.confirmations.is_likely_ended(sale_id)
    }

    /// The stamp for the weekend the clock currently points at (the ongoing
    /// weekend, or the upcoming one on a weekday), empty if nothing has been
    /// stamped yet.
    #[must_use]
    pub fn current_weekend_stamp(&self) -> WeekendStamp {
        let key = weekend_key(self.clock.now().date());
        self.state
            .stamp_for(&key)
            .cloned()
            .unwrap_or_else(|| WeekendStamp::empty(&key))
    }

    /// Borrow the underlying state graph.
    #[must_use]
    pub const fn state(&self) -> &RewardsState {
        &self.state
    }

    /// Borrow the profile.
    #[must_use]
    pub const fn profile(&self) -> &UserProfile {
        &self.state.profile
    }

    /// Consume the session, returning the state graph.
    #[must_use]
    pub fn into_state(self) -> RewardsState {
        self.state
    }

    fn persist(&mut self, out: RewardOutcome) -> Result<RewardOutcome, S::Error> {
        self.storage.save(&self.state)?;
        Ok(out)
    }
}
