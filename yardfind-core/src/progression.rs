//! Progression engine: XP, coins, and badge awards over a rewards state.
//!
//! Level and title are recomputed from XP on every award, so callers can
//! never observe them stale. Badge awards are idempotent and their fixed
//! bonus never re-enters badge evaluation.
use log::debug;

use crate::badges::{BadgeCatalog, BadgeDef, BadgeKind};
use crate::constants::{BADGE_BONUS_COINS, BADGE_BONUS_XP};
use crate::events::{RewardEvent, RewardOutcome};
use crate::levels::LevelTable;
use crate::state::RewardsState;

/// Add XP and re-derive level/title from the table.
pub fn add_xp(state: &mut RewardsState, levels: &LevelTable, amount: u32, out: &mut RewardOutcome) {
    let profile = &mut state.profile;
    profile.xp = profile.xp.saturating_add(amount);
    out.record(RewardEvent::XpAwarded { amount });

    let reached = levels.level_for(profile.xp);
    if reached.level > profile.level {
        debug!(
            "level up: {} -> {} ({})",
            profile.level, reached.level, reached.title
        );
        out.record(RewardEvent::LevelUp {
            level: reached.level,
            title: reached.title.clone(),
        });
    }
    profile.level = reached.level;
    profile.title = reached.title.clone();
}

/// Add coins. No upper bound.
pub fn add_coins(state: &mut RewardsState, amount: u32, out: &mut RewardOutcome) {
    state.profile.coins = state.profile.coins.saturating_add(amount);
    out.record(RewardEvent::CoinsAwarded { amount });
}

/// Award a badge once. Re-awarding an already held badge is a no-op.
///
/// A fresh award grants the fixed badge bonus through `add_xp`/`add_coins`;
/// the bonus never triggers further badge evaluation (badges are not awarded
/// for earning badges).
pub fn add_badge(
    state: &mut RewardsState,
    levels: &LevelTable,
    badge_id: &str,
    out: &mut RewardOutcome,
) {
    if state.profile.has_badge(badge_id) {
        return;
    }
    debug!("badge earned: {badge_id}");
    state.profile.badges.push(badge_id.to_string());
    out.record(RewardEvent::BadgeEarned {
        badge_id: badge_id.to_string(),
    });
    add_xp(state, levels, BADGE_BONUS_XP, out);
    add_coins(state, BADGE_BONUS_COINS, out);
}

/// The profile counter a badge unlocks on, if this core tracks one.
///
/// A handful of badges read a dedicated counter; the rest fall back to the
/// default metric of their kind. Badges with no tracked metric (category
/// visits, ratings, shares) and event-gated badges (time of day, weekend
/// completion) return `None` and are awarded elsewhere or stay locked.
fn badge_metric(state: &RewardsState, badge: &BadgeDef) -> Option<u32> {
    match badge.id.as_str() {
        "saver_10" => Some(state.profile.total_saves),
        "community_helper" => Some(state.confirmations_cast),
        "neighborhood_explorer" => Some(state.distinct_geo_buckets()),
        _ => match badge.kind {
            BadgeKind::Visits => Some(state.profile.total_visits),
            BadgeKind::Streak => Some(state.profile.hunt_streak),
            BadgeKind::Seller => Some(state.profile.total_sales_posted),
            BadgeKind::Time | BadgeKind::Category | BadgeKind::Social => None,
        },
    }
}

/// Evaluate every catalog badge of the given kinds against its metric and
/// award the ones whose threshold is met. Safe to call repeatedly:
/// `add_badge` ignores badges already held.
pub fn evaluate_badges(
    state: &mut RewardsState,
    levels: &LevelTable,
    catalog: &BadgeCatalog,
    kinds: &[BadgeKind],
    out: &mut RewardOutcome,
) {
    for badge in &catalog.badges {
        if !kinds.contains(&badge.kind) {
            continue;
        }
        if let Some(metric) = badge_metric(state, badge) {
            if metric >= badge.threshold {
                add_badge(state, levels, &badge.id, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixtures() -> (RewardsState, LevelTable, BadgeCatalog) {
        (
            RewardsState::default(),
            LevelTable::default(),
            BadgeCatalog::default(),
        )
    }

    #[test]
    fn add_xp_levels_up_at_thresholds() {
        let (mut state, levels, _) = fixtures();
        let mut out = RewardOutcome::new();

        add_xp(&mut state, &levels, 50, &mut out);
        assert_eq!(state.profile.level, 1);
        assert_eq!(state.profile.title, "Curious Browser");
        assert_eq!(out.level_up(), Some((1, "Curious Browser")));

        let mut out = RewardOutcome::new();
        add_xp(&mut state, &levels, 100, &mut out);
        assert_eq!(state.profile.xp, 150);
        assert_eq!(state.profile.level, 2);
        assert_eq!(state.profile.title, "Bargain Scout");
    }

    #[test]
    fn add_xp_below_threshold_keeps_level() {
        let (mut state, levels, _) = fixtures();
        let mut out = RewardOutcome::new();
        add_xp(&mut state, &levels, 49, &mut out);
        assert_eq!(state.profile.level, 0);
        assert_eq!(out.level_up(), None);
    }

    #[test]
    fn add_badge_is_idempotent_and_pays_the_bonus_once() {
        let (mut state, levels, _) = fixtures();
        let mut out = RewardOutcome::new();

        add_badge(&mut state, &levels, "first_find", &mut out);
        assert_eq!(state.profile.xp, BADGE_BONUS_XP);
        assert_eq!(state.profile.coins, BADGE_BONUS_COINS);
        assert_eq!(out.badges_earned().collect::<Vec<_>>(), ["first_find"]);

        let mut repeat = RewardOutcome::new();
        add_badge(&mut state, &levels, "first_find", &mut repeat);
        assert_eq!(state.profile.xp, BADGE_BONUS_XP);
        assert_eq!(state.profile.coins, BADGE_BONUS_COINS);
        assert!(repeat.is_empty());
        assert_eq!(state.profile.badges.len(), 1);
    }

    #[test]
    fn evaluator_awards_every_threshold_already_met() {
        let (mut state, levels, catalog) = fixtures();
        state.profile.total_visits = 12;
        let mut out = RewardOutcome::new();
        evaluate_badges(
            &mut state,
            &levels,
            &catalog,
            &[BadgeKind::Visits],
            &mut out,
        );
        assert!(state.profile.has_badge("first_find"));
        assert!(state.profile.has_badge("treasure_hunter"));
        assert!(!state.profile.has_badge("yard_veteran"));
    }

    #[test]
    fn evaluator_wires_all_seller_thresholds() {
        let (mut state, levels, catalog) = fixtures();
        state.profile.total_sales_posted = 10;
        let mut out = RewardOutcome::new();
        evaluate_badges(
            &mut state,
            &levels,
            &catalog,
            &[BadgeKind::Seller],
            &mut out,
        );
        assert!(state.profile.has_badge("first_sale"));
        assert!(state.profile.has_badge("power_seller"));
    }

    #[test]
    fn social_badges_read_their_dedicated_counters() {
        let (mut state, levels, catalog) = fixtures();
        state.profile.total_saves = 10;
        state.confirmations_cast = 10;
        let mut out = RewardOutcome::new();
        evaluate_badges(
            &mut state,
            &levels,
            &catalog,
            &[BadgeKind::Social],
            &mut out,
        );
        assert!(state.profile.has_badge("saver_10"));
        assert!(state.profile.has_badge("community_helper"));
        // Rating and share counters are untracked; those badges stay locked.
        assert!(!state.profile.has_badge("friendly_face"));
        assert!(!state.profile.has_badge("sharer"));
    }

    #[test]
    fn untracked_kinds_never_award() {
        let (mut state, levels, catalog) = fixtures();
        state.profile.total_visits = 1000;
        let mut out = RewardOutcome::new();
        evaluate_badges(
            &mut state,
            &levels,
            &catalog,
            &[BadgeKind::Category],
            &mut out,
        );
        assert!(out.is_empty());
    }
}
