//! User profile: identity, progression, counters, and preferences.
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::DEFAULT_ALERT_RADIUS_MILES;

/// Subscription tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    #[default]
    Free,
    BuyerPro,
    SellerPro,
}

impl Tier {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::BuyerPro => "buyer_pro",
            Self::SellerPro => "seller_pro",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(Self::Free),
            "buyer_pro" => Ok(Self::BuyerPro),
            "seller_pro" => Ok(Self::SellerPro),
            _ => Err(()),
        }
    }
}

/// Sale category, used for alert preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Furniture,
    Tools,
    Kids,
    Electronics,
    Clothing,
    Collectibles,
    Books,
    Sports,
    Garden,
    Kitchen,
    Vintage,
    Art,
    Auto,
    Music,
    Other,
}

impl Category {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Furniture => "furniture",
            Self::Tools => "tools",
            Self::Kids => "kids",
            Self::Electronics => "electronics",
            Self::Clothing => "clothing",
            Self::Collectibles => "collectibles",
            Self::Books => "books",
            Self::Sports => "sports",
            Self::Garden => "garden",
            Self::Kitchen => "kitchen",
            Self::Vintage => "vintage",
            Self::Art => "art",
            Self::Auto => "auto",
            Self::Music => "music",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "furniture" => Ok(Self::Furniture),
            "tools" => Ok(Self::Tools),
            "kids" => Ok(Self::Kids),
            "electronics" => Ok(Self::Electronics),
            "clothing" => Ok(Self::Clothing),
            "collectibles" => Ok(Self::Collectibles),
            "books" => Ok(Self::Books),
            "sports" => Ok(Self::Sports),
            "garden" => Ok(Self::Garden),
            "kitchen" => Ok(Self::Kitchen),
            "vintage" => Ok(Self::Vintage),
            "art" => Ok(Self::Art),
            "auto" => Ok(Self::Auto),
            "music" => Ok(Self::Music),
            "other" => Ok(Self::Other),
            _ => Err(()),
        }
    }
}

/// The per-user profile aggregate.
///
/// `level` and `title` are derived from `xp` through the level table and are
/// only ever written by the progression engine; `badges` is append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub display_name: String,
    #[serde(default)]
    pub tier: Tier,
    // Progression
    #[serde(default)]
    pub xp: u32,
    #[serde(default)]
    pub level: u32,
    pub title: String,
    #[serde(default)]
    pub coins: u32,
    // Counters
    #[serde(default)]
    pub total_visits: u32,
    #[serde(default)]
    pub total_saves: u32,
    #[serde(default)]
    pub total_sales_posted: u32,
    // Streaks
    #[serde(default)]
    pub hunt_streak: u32,
    #[serde(default)]
    pub longest_hunt_streak: u32,
    /// Earned badge ids in award order. Never shrinks.
    #[serde(default)]
    pub badges: Vec<String>,
    // Preferences
    #[serde(default)]
    pub preferred_categories: Vec<Category>,
    pub alert_radius_miles: f64,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

impl UserProfile {
    /// Whether the badge with `id` has been earned.
    #[must_use]
    pub fn has_badge(&self, id: &str) -> bool {
        self.badges.iter().any(|badge| badge == id)
    }
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            id: "demo_user".to_string(),
            email: "demo@yardfind.app".to_string(),
            display_name: "Yard Hunter".to_string(),
            tier: Tier::Free,
            xp: 0,
            level: 0,
            title: "Newbie Hunter".to_string(),
            coins: 0,
            total_visits: 0,
            total_saves: 0,
            total_sales_posted: 0,
            hunt_streak: 0,
            longest_hunt_streak: 0,
            badges: Vec::new(),
            preferred_categories: Vec::new(),
            alert_radius_miles: DEFAULT_ALERT_RADIUS_MILES,
            created_at: None,
        }
    }
}
