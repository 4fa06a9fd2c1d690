//! Reward events surfaced to the presentation layer after each command.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Inline-allocated event set; most commands emit a handful at most.
pub type RewardEvents = SmallVec<[RewardEvent; 4]>;

/// A single presentation-worthy consequence of a command (toast material).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RewardEvent {
    XpAwarded { amount: u32 },
    CoinsAwarded { amount: u32 },
    BadgeEarned { badge_id: String },
    LevelUp { level: u32, title: String },
    WeekendHuntCompleted { weekend_key: String, stamps: u32 },
}

/// Everything a command did that the UI may want to announce, in the order
/// it happened.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardOutcome {
    pub events: RewardEvents,
}

impl RewardOutcome {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&mut self, event: RewardEvent) {
        self.events.push(event);
    }

    /// Total XP granted over the whole command, badge bonuses included.
    #[must_use]
    pub fn xp_awarded(&self) -> u32 {
        self.events
            .iter()
            .map(|event| match event {
                RewardEvent::XpAwarded { amount } => *amount,
                _ => 0,
            })
            .sum()
    }

    /// Total coins granted over the whole command.
    #[must_use]
    pub fn coins_awarded(&self) -> u32 {
        self.events
            .iter()
            .map(|event| match event {
                RewardEvent::CoinsAwarded { amount } => *amount,
                _ => 0,
            })
            .sum()
    }

    /// Badge ids earned by this command, in award order.
    pub fn badges_earned(&self) -> impl Iterator<Item = &str> {
        self.events.iter().filter_map(|event| match event {
            RewardEvent::BadgeEarned { badge_id } => Some(badge_id.as_str()),
            _ => None,
        })
    }

    /// The last level-up recorded, if the command caused one.
    #[must_use]
    pub fn level_up(&self) -> Option<(u32, &str)> {
        self.events.iter().rev().find_map(|event| match event {
            RewardEvent::LevelUp { level, title } => Some((*level, title.as_str())),
            _ => None,
        })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
