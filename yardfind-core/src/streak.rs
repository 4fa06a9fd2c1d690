//! Consecutive-weekend hunt streaks.
//!
//! The streak advances when a weekend gains its first stamp and the weekend
//! immediately before it was stamped too; a gap restarts the count at 1.
//! `reconcile_hunt_streak` is the explicit reset rule for apps to run at
//! session start, since a lapsed streak otherwise only corrects itself on
//! the next stamped weekend.
use chrono::NaiveDate;

use crate::badges::{BadgeCatalog, BadgeKind};
use crate::events::RewardOutcome;
use crate::levels::LevelTable;
use crate::progression::evaluate_badges;
use crate::state::RewardsState;
use crate::weekend::{previous_weekend_key, weekend_key};

/// Raw streak increment, exposed as a command for app-driven scheduling.
/// Updates the longest-streak high water mark and runs streak badge checks.
pub fn update_hunt_streak(
    state: &mut RewardsState,
    levels: &LevelTable,
    catalog: &BadgeCatalog,
    out: &mut RewardOutcome,
) {
    let profile = &mut state.profile;
    profile.hunt_streak = profile.hunt_streak.saturating_add(1);
    profile.longest_hunt_streak = profile.longest_hunt_streak.max(profile.hunt_streak);
    evaluate_badges(state, levels, catalog, &[BadgeKind::Streak], out);
}

/// Apply the streak rule for a weekend that just gained its first stamp:
/// continue the run if the previous weekend was stamped, otherwise restart
/// at 1.
pub(crate) fn advance_streak_for_weekend(
    state: &mut RewardsState,
    levels: &LevelTable,
    catalog: &BadgeCatalog,
    date: NaiveDate,
    out: &mut RewardOutcome,
) {
    let continued = state
        .weekend_stamps
        .contains_key(&previous_weekend_key(date));
    if continued {
        update_hunt_streak(state, levels, catalog, out);
    } else {
        let profile = &mut state.profile;
        profile.hunt_streak = 1;
        profile.longest_hunt_streak = profile.longest_hunt_streak.max(1);
        evaluate_badges(state, levels, catalog, &[BadgeKind::Streak], out);
    }
}

/// Zero a lapsed streak: when neither the weekend `today` belongs to nor the
/// one before it has a stamp, the run is over. The longest-streak high water
/// mark is untouched.
pub fn reconcile_hunt_streak(state: &mut RewardsState, today: NaiveDate) {
    let current_alive = state.weekend_stamps.contains_key(&weekend_key(today));
    let previous_alive = state
        .weekend_stamps
        .contains_key(&previous_weekend_key(today));
    if !current_alive && !previous_alive {
        state.profile.hunt_streak = 0;
    }
}
