//! Visit and save tracking: the reward path behind "I'm here" and the save
//! toggle, including weekend stamps and geo diversity.
use chrono::{NaiveDateTime, Timelike};
use log::debug;

use crate::badges::{BadgeCatalog, BadgeKind};
use crate::constants::{
    DAWN_PATROL_HOUR, EARLY_BIRD_HOUR, SAVE_XP, VISIT_COINS, VISIT_XP, WEEKEND_STAMP_BONUS_COINS,
    WEEKEND_STAMP_BONUS_XP,
};
use crate::events::{RewardEvent, RewardOutcome};
use crate::levels::LevelTable;
use crate::progression::{add_badge, add_coins, add_xp, evaluate_badges};
use crate::state::{GeoBucket, GeoPoint, RewardsState, WeekendStamp};
use crate::streak::advance_streak_for_weekend;
use crate::weekend::{is_weekend, weekend_key};

/// Record a sale visit at `now`, paying out at most once per sale.
///
/// A weekend visit also feeds that weekend's stamp; completing the stamp
/// pays the one-time weekend hunt bonus on top of the badge bonus. Supplying
/// the sale's location feeds the geo diversity grid.
#[allow(clippy::cast_possible_truncation)]
pub fn mark_visited(
    state: &mut RewardsState,
    levels: &LevelTable,
    catalog: &BadgeCatalog,
    now: NaiveDateTime,
    sale_id: &str,
    location: Option<GeoPoint>,
) -> RewardOutcome {
    let mut out = RewardOutcome::new();
    if !state.visited_sale_ids.insert(sale_id.to_string()) {
        return out;
    }

    add_xp(state, levels, VISIT_XP, &mut out);
    add_coins(state, VISIT_COINS, &mut out);
    state.profile.total_visits = state.profile.total_visits.saturating_add(1);

    let today = now.date();
    if is_weekend(today) {
        let key = weekend_key(today);
        let new_weekend = !state.weekend_stamps.contains_key(&key);
        let stamp = state
            .weekend_stamps
            .entry(key.clone())
            .or_insert_with(|| WeekendStamp::empty(&key));
        let completed_now = stamp.record(sale_id);
        let stamps = stamp.sale_ids.len() as u32;

        if new_weekend {
            advance_streak_for_weekend(state, levels, catalog, today, &mut out);
        }
        if completed_now {
            debug!("weekend hunt completed: {key} ({stamps} stamps)");
            add_badge(state, levels, "weekend_hunt_5", &mut out);
            add_xp(state, levels, WEEKEND_STAMP_BONUS_XP, &mut out);
            add_coins(state, WEEKEND_STAMP_BONUS_COINS, &mut out);
            out.record(RewardEvent::WeekendHuntCompleted {
                weekend_key: key,
                stamps,
            });
        }
    }

    if let Some(point) = location {
        state.visited_geo_buckets.insert(GeoBucket::containing(point));
    }

    if now.hour() < EARLY_BIRD_HOUR {
        add_badge(state, levels, "early_bird", &mut out);
    }
    if now.hour() < DAWN_PATROL_HOUR {
        add_badge(state, levels, "dawn_patrol", &mut out);
    }

    evaluate_badges(state, levels, catalog, &[BadgeKind::Visits], &mut out);
    out
}

/// Flip the saved flag for a sale, returning the new saved state.
///
/// Saving rewards a little XP and counts toward save badges; unsaving only
/// removes the sale from the list (counters are never rolled back).
pub fn toggle_save(
    state: &mut RewardsState,
    levels: &LevelTable,
    catalog: &BadgeCatalog,
    sale_id: &str,
) -> (bool, RewardOutcome) {
    let mut out = RewardOutcome::new();
    if state.is_saved(sale_id) {
        state.saved_sale_ids.retain(|id| id != sale_id);
        return (false, out);
    }

    state.saved_sale_ids.push(sale_id.to_string());
    add_xp(state, levels, SAVE_XP, &mut out);
    state.profile.total_saves = state.profile.total_saves.saturating_add(1);
    evaluate_badges(state, levels, catalog, &[BadgeKind::Social], &mut out);
    (true, out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn fixtures() -> (RewardsState, LevelTable, BadgeCatalog) {
        (
            RewardsState::default(),
            LevelTable::default(),
            BadgeCatalog::default(),
        )
    }

    fn at(y: i32, m: u32, d: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    // Wednesday midday: no weekend or time badges in play.
    fn weekday_noon() -> NaiveDateTime {
        at(2026, 2, 11, 12)
    }

    #[test]
    fn first_visit_pays_and_repeat_is_a_noop() {
        let (mut state, levels, catalog) = fixtures();

        let out = mark_visited(&mut state, &levels, &catalog, weekday_noon(), "s1", None);
        // 10 visit XP plus the first_find badge bonus.
        assert_eq!(out.xp_awarded(), 35);
        assert_eq!(out.coins_awarded(), 15);
        assert_eq!(state.profile.total_visits, 1);
        assert!(state.profile.has_badge("first_find"));
        assert!(state.is_visited("s1"));

        let repeat = mark_visited(&mut state, &levels, &catalog, weekday_noon(), "s1", None);
        assert!(repeat.is_empty());
        assert_eq!(state.profile.total_visits, 1);
    }

    #[test]
    fn weekday_visits_never_create_stamps() {
        let (mut state, levels, catalog) = fixtures();
        mark_visited(&mut state, &levels, &catalog, weekday_noon(), "s1", None);
        assert!(state.weekend_stamps.is_empty());
    }

    #[test]
    fn sunday_visits_land_on_the_saturday_stamp() {
        let (mut state, levels, catalog) = fixtures();
        mark_visited(&mut state, &levels, &catalog, at(2026, 2, 14, 12), "s1", None);
        mark_visited(&mut state, &levels, &catalog, at(2026, 2, 15, 12), "s2", None);

        let stamp = state.stamp_for("2026-02-14").unwrap();
        assert_eq!(stamp.sale_ids, ["s1", "s2"]);
        assert_eq!(state.weekend_stamps.len(), 1);
    }

    #[test]
    fn completing_a_stamp_pays_the_bonus_once() {
        let (mut state, levels, catalog) = fixtures();
        for n in 0..5 {
            mark_visited(
                &mut state,
                &levels,
                &catalog,
                at(2026, 2, 14, 12),
                &format!("s{n}"),
                None,
            );
        }
        assert!(state.stamp_for("2026-02-14").unwrap().completed);
        assert!(state.profile.has_badge("weekend_hunt_5"));
        // 5 visits (50) + first_find bonus (25) + weekend_hunt_5 bonus (25)
        // + stamp bonus (50).
        assert_eq!(state.profile.xp, 150);

        let sixth = mark_visited(
            &mut state,
            &levels,
            &catalog,
            at(2026, 2, 15, 12),
            "s5",
            None,
        );
        assert!(
            !sixth
                .events
                .iter()
                .any(|e| matches!(e, RewardEvent::WeekendHuntCompleted { .. })),
            "sixth visit must not re-complete the stamp"
        );
        assert_eq!(state.profile.xp, 160);
    }

    #[test]
    fn first_stamp_of_a_weekend_drives_the_streak() {
        let (mut state, levels, catalog) = fixtures();
        mark_visited(&mut state, &levels, &catalog, at(2026, 2, 7, 12), "a", None);
        assert_eq!(state.profile.hunt_streak, 1);
        mark_visited(&mut state, &levels, &catalog, at(2026, 2, 14, 12), "b", None);
        assert_eq!(state.profile.hunt_streak, 2);
        // Second visit in the same weekend leaves the streak alone.
        mark_visited(&mut state, &levels, &catalog, at(2026, 2, 15, 12), "c", None);
        assert_eq!(state.profile.hunt_streak, 2);
        // Skipping two weekends restarts the run.
        mark_visited(&mut state, &levels, &catalog, at(2026, 3, 7, 12), "d", None);
        assert_eq!(state.profile.hunt_streak, 1);
        assert_eq!(state.profile.longest_hunt_streak, 2);
    }

    #[test]
    fn early_hours_unlock_time_badges() {
        let (mut state, levels, catalog) = fixtures();
        mark_visited(&mut state, &levels, &catalog, at(2026, 2, 11, 8), "s1", None);
        assert!(state.profile.has_badge("early_bird"));
        assert!(!state.profile.has_badge("dawn_patrol"));

        mark_visited(&mut state, &levels, &catalog, at(2026, 2, 11, 6), "s2", None);
        assert!(state.profile.has_badge("dawn_patrol"));
    }

    #[test]
    fn three_distinct_buckets_unlock_the_explorer_badge() {
        let (mut state, levels, catalog) = fixtures();
        let spots = [
            (37.77, -122.41),
            (37.81, -122.41),
            (37.85, -122.41),
        ];
        for (n, (lat, lng)) in spots.iter().enumerate() {
            mark_visited(
                &mut state,
                &levels,
                &catalog,
                weekday_noon(),
                &format!("s{n}"),
                Some(GeoPoint {
                    latitude: *lat,
                    longitude: *lng,
                }),
            );
        }
        assert_eq!(state.distinct_geo_buckets(), 3);
        assert!(state.profile.has_badge("neighborhood_explorer"));
    }

    #[test]
    fn toggle_save_rewards_saves_but_not_unsaves() {
        let (mut state, levels, catalog) = fixtures();

        let (saved, out) = toggle_save(&mut state, &levels, &catalog, "s1");
        assert!(saved);
        assert_eq!(out.xp_awarded(), SAVE_XP);
        assert_eq!(state.profile.total_saves, 1);

        let (saved, out) = toggle_save(&mut state, &levels, &catalog, "s1");
        assert!(!saved);
        assert!(out.is_empty());
        assert!(!state.is_saved("s1"));
        // Unsaving never rolls the counter back.
        assert_eq!(state.profile.total_saves, 1);

        let (saved, _) = toggle_save(&mut state, &levels, &catalog, "s1");
        assert!(saved);
        assert_eq!(state.profile.total_saves, 2);
    }

    #[test]
    fn ten_saves_unlock_the_saver_badge() {
        let (mut state, levels, catalog) = fixtures();
        for n in 0..10 {
            toggle_save(&mut state, &levels, &catalog, &format!("s{n}"));
        }
        assert!(state.profile.has_badge("saver_10"));
    }
}
