//! The serializable rewards state graph: profile plus visit, weekend,
//! geo-diversity, and trust bookkeeping. One instance per user, owned by the
//! session.
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::constants::{GEO_BUCKET_GRID_DEGREES, WEEKEND_STAMP_GOAL};
use crate::profile::UserProfile;
use crate::trust::ConfirmationLedger;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// A coarse grid cell used to measure geographic diversity of visits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GeoBucket {
    pub lat_cell: i32,
    pub lng_cell: i32,
}

impl GeoBucket {
    /// Bucket containing `point` on the fixed diversity grid.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn containing(point: GeoPoint) -> Self {
        Self {
            lat_cell: (point.latitude / GEO_BUCKET_GRID_DEGREES).floor() as i32,
            lng_cell: (point.longitude / GEO_BUCKET_GRID_DEGREES).floor() as i32,
        }
    }
}

/// Distinct sales visited within one weekend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekendStamp {
    pub weekend_key: String,
    /// Sale ids in visit order; membership is checked before insertion.
    #[serde(default)]
    pub sale_ids: Vec<String>,
    #[serde(default)]
    pub completed: bool,
}

impl WeekendStamp {
    #[must_use]
    pub fn empty(weekend_key: &str) -> Self {
        Self {
            weekend_key: weekend_key.to_string(),
            sale_ids: Vec::new(),
            completed: false,
        }
    }

    #[must_use]
    pub fn contains(&self, sale_id: &str) -> bool {
        self.sale_ids.iter().any(|id| id == sale_id)
    }

    /// Add a sale id if new and refresh `completed`. Returns true when the
    /// stamp transitioned to completed by this call.
    pub(crate) fn record(&mut self, sale_id: &str) -> bool {
        if self.contains(sale_id) {
            return false;
        }
        self.sale_ids.push(sale_id.to_string());
        let was_completed = self.completed;
        self.completed = self.sale_ids.len() >= WEEKEND_STAMP_GOAL;
        self.completed && !was_completed
    }
}

/// The full profile graph persisted by the storage collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RewardsState {
    pub profile: UserProfile,
    /// Saved sales in the order the user saved them.
    #[serde(default)]
    pub saved_sale_ids: Vec<String>,
    /// Sales that already paid out their visit reward.
    #[serde(default)]
    pub visited_sale_ids: HashSet<String>,
    /// Weekend stamps keyed by the weekend's Saturday date.
    #[serde(default)]
    pub weekend_stamps: HashMap<String, WeekendStamp>,
    #[serde(default)]
    pub visited_geo_buckets: HashSet<GeoBucket>,
    /// Confirmation votes this user has cast, across all sales.
    #[serde(default)]
    pub confirmations_cast: u32,
    #[serde(default)]
    pub confirmations: ConfirmationLedger,
}

impl RewardsState {
    /// Deserialize a state graph from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize the state graph to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    #[must_use]
    pub fn is_saved(&self, sale_id: &str) -> bool {
        self.saved_sale_ids.iter().any(|id| id == sale_id)
    }

    #[must_use]
    pub fn is_visited(&self, sale_id: &str) -> bool {
        self.visited_sale_ids.contains(sale_id)
    }

    /// Count of distinct diversity grid cells visited.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn distinct_geo_buckets(&self) -> u32 {
        self.visited_geo_buckets.len() as u32
    }

    /// The stamp recorded for `weekend_key`, if any visit landed there.
    #[must_use]
    pub fn stamp_for(&self, weekend_key: &str) -> Option<&WeekendStamp> {
        self.weekend_stamps.get(weekend_key)
    }
}
