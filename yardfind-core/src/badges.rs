//! Badge catalog: declarative unlock definitions evaluated by the
//! progression engine.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Domain a badge belongs to, driving which actions re-evaluate it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeKind {
    Visits,
    Streak,
    Time,
    Category,
    Social,
    Seller,
}

impl BadgeKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Visits => "visits",
            Self::Streak => "streak",
            Self::Time => "time",
            Self::Category => "category",
            Self::Social => "social",
            Self::Seller => "seller",
        }
    }
}

impl fmt::Display for BadgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BadgeKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "visits" => Ok(Self::Visits),
            "streak" => Ok(Self::Streak),
            "time" => Ok(Self::Time),
            "category" => Ok(Self::Category),
            "social" => Ok(Self::Social),
            "seller" => Ok(Self::Seller),
            _ => Err(()),
        }
    }
}

/// A single badge definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeDef {
    pub id: String,
    pub name: String,
    pub description: String,
    pub kind: BadgeKind,
    /// Counter value required to unlock. Event-gated badges (time of day,
    /// weekend completion) keep a nominal threshold of 1.
    pub threshold: u32,
}

/// The full badge catalog.
///
/// The catalog is presentation data as much as rule data: locked entries are
/// shown to the user, so it also carries badges whose counters this core does
/// not track (category and rating/share badges stay locked).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeCatalog {
    pub badges: Vec<BadgeDef>,
}

/// Validation failures for a badge catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("duplicate badge id {0}")]
    DuplicateId(String),
    #[error("badge {0} has a zero threshold")]
    ZeroThreshold(String),
}

impl BadgeCatalog {
    /// Load a catalog from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into a valid catalog.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Check the structural invariants: unique ids, thresholds of at least 1.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` describing the first violation found.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut seen = std::collections::HashSet::new();
        for badge in &self.badges {
            if !seen.insert(badge.id.as_str()) {
                return Err(CatalogError::DuplicateId(badge.id.clone()));
            }
            if badge.threshold == 0 {
                return Err(CatalogError::ZeroThreshold(badge.id.clone()));
            }
        }
        Ok(())
    }

    /// Find a badge definition by id.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&BadgeDef> {
        self.badges.iter().find(|badge| badge.id == id)
    }

    /// All badges of a given kind, in catalog order.
    pub fn of_kind(&self, kind: BadgeKind) -> impl Iterator<Item = &BadgeDef> {
        self.badges.iter().filter(move |badge| badge.kind == kind)
    }
}

impl Default for BadgeCatalog {
    fn default() -> Self {
        let badge = |id: &str, name: &str, description: &str, kind: BadgeKind, threshold: u32| {
            BadgeDef {
                id: id.to_string(),
                name: name.to_string(),
                description: description.to_string(),
                kind,
                threshold,
            }
        };
        Self {
            badges: vec![
                // Visit-based
                badge(
                    "first_find",
                    "First Find",
                    "Visit your first yard sale",
                    BadgeKind::Visits,
                    1,
                ),
                badge(
                    "treasure_hunter",
                    "Treasure Hunter",
                    "Visit 10 yard sales",
                    BadgeKind::Visits,
                    10,
                ),
                badge(
                    "yard_veteran",
                    "Yard Veteran",
                    "Visit 50 yard sales",
                    BadgeKind::Visits,
                    50,
                ),
                badge(
                    "legend_100",
                    "Century Club",
                    "Visit 100 yard sales",
                    BadgeKind::Visits,
                    100,
                ),
                badge(
                    "neighborhood_explorer",
                    "Neighborhood Explorer",
                    "Visit sales in 3 different neighborhoods",
                    BadgeKind::Visits,
                    3,
                ),
                // Streak-based
                badge(
                    "weekend_warrior",
                    "Weekend Warrior",
                    "3 consecutive weekends hitting sales",
                    BadgeKind::Streak,
                    3,
                ),
                badge(
                    "streak_master",
                    "Streak Master",
                    "8 consecutive weekends",
                    BadgeKind::Streak,
                    8,
                ),
                badge(
                    "unstoppable",
                    "Unstoppable",
                    "16 consecutive weekends",
                    BadgeKind::Streak,
                    16,
                ),
                // Time-based
                badge(
                    "early_bird",
                    "Early Bird",
                    "Arrive before 9 AM",
                    BadgeKind::Time,
                    1,
                ),
                badge(
                    "dawn_patrol",
                    "Dawn Patrol",
                    "Arrive before 7 AM",
                    BadgeKind::Time,
                    1,
                ),
                badge(
                    "weekend_hunt_5",
                    "Weekend Hunt",
                    "Visit 5 sales in a single weekend",
                    BadgeKind::Time,
                    1,
                ),
                // Category-based
                badge(
                    "tool_hunter",
                    "Tool Hunter",
                    "Visit 10 sales with tools",
                    BadgeKind::Category,
                    10,
                ),
                badge(
                    "vinyl_slayer",
                    "Vinyl Slayer",
                    "Visit 10 sales with music/vinyl",
                    BadgeKind::Category,
                    10,
                ),
                badge(
                    "bookworm",
                    "Bookworm",
                    "Visit 10 sales with books",
                    BadgeKind::Category,
                    10,
                ),
                badge(
                    "vintage_collector",
                    "Vintage Collector",
                    "Visit 10 vintage sales",
                    BadgeKind::Category,
                    10,
                ),
                badge(
                    "kid_stuff_king",
                    "Kid Stuff King",
                    "Visit 10 kids/toys sales",
                    BadgeKind::Category,
                    10,
                ),
                // Social
                badge(
                    "saver_10",
                    "Super Saver",
                    "Save 10 sales to your list",
                    BadgeKind::Social,
                    10,
                ),
                badge(
                    "community_helper",
                    "Community Helper",
                    "Confirm 10 sale listings",
                    BadgeKind::Social,
                    10,
                ),
                badge(
                    "friendly_face",
                    "Friendly Face",
                    "Leave 5 ratings",
                    BadgeKind::Social,
                    5,
                ),
                badge(
                    "reviewer",
                    "Top Reviewer",
                    "Leave 25 ratings",
                    BadgeKind::Social,
                    25,
                ),
                badge(
                    "sharer",
                    "Word Spreader",
                    "Share 5 sales with friends",
                    BadgeKind::Social,
                    5,
                ),
                // Seller
                badge(
                    "first_sale",
                    "First Listing",
                    "Post your first yard sale",
                    BadgeKind::Seller,
                    1,
                ),
                badge(
                    "power_seller",
                    "Power Seller",
                    "Post 10 yard sales",
                    BadgeKind::Seller,
                    10,
                ),
            ],
        }
    }
}
