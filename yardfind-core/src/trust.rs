//! Trust confirmations: crowd-sourced "still running?" votes per sale.
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::constants::LIKELY_ENDED_NO_VOTES;

/// A yes/no vote on whether a sale is still active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vote {
    Yes,
    No,
}

impl Vote {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
        }
    }
}

impl fmt::Display for Vote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Vote {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "yes" => Ok(Self::Yes),
            "no" => Ok(Self::No),
            _ => Err(()),
        }
    }
}

/// Vote tally for one sale, plus the owning user's active vote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleConfirmation {
    pub sale_id: String,
    #[serde(default)]
    pub yes_count: u32,
    #[serde(default)]
    pub no_count: u32,
    /// Set only when a "yes" vote lands.
    #[serde(default)]
    pub last_confirmed_at: Option<NaiveDateTime>,
    /// This user's single active vote on the sale.
    #[serde(default)]
    pub user_vote: Option<Vote>,
}

impl SaleConfirmation {
    #[must_use]
    pub fn empty(sale_id: &str) -> Self {
        Self {
            sale_id: sale_id.to_string(),
            yes_count: 0,
            no_count: 0,
            last_confirmed_at: None,
            user_vote: None,
        }
    }
}

/// Per-sale confirmation ledger with one-active-vote-per-user semantics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfirmationLedger {
    #[serde(default)]
    entries: HashMap<String, SaleConfirmation>,
}

impl ConfirmationLedger {
    /// Apply a vote for `sale_id`, reversing any previous vote by this user
    /// first so only one vote per user ever contributes to the tally.
    /// Returns true when this is the user's first vote on the sale.
    pub fn confirm(&mut self, sale_id: &str, vote: Vote, now: NaiveDateTime) -> bool {
        let entry = self
            .entries
            .entry(sale_id.to_string())
            .or_insert_with(|| SaleConfirmation::empty(sale_id));

        let first_vote = entry.user_vote.is_none();
        match entry.user_vote {
            // Clamped at zero to guard against double-reversal.
            Some(Vote::Yes) => entry.yes_count = entry.yes_count.saturating_sub(1),
            Some(Vote::No) => entry.no_count = entry.no_count.saturating_sub(1),
            None => {}
        }

        match vote {
            Vote::Yes => {
                entry.yes_count += 1;
                entry.last_confirmed_at = Some(now);
            }
            Vote::No => entry.no_count += 1,
        }
        entry.user_vote = Some(vote);
        first_vote
    }

    /// Tally for `sale_id`, or a zero-valued default. Never creates state.
    #[must_use]
    pub fn get(&self, sale_id: &str) -> SaleConfirmation {
        self.entries
            .get(sale_id)
            .cloned()
            .unwrap_or_else(|| SaleConfirmation::empty(sale_id))
    }

    /// True once enough "no" votes have accumulated. Monotonic: votes are
    /// only reversed by the same user re-voting, and the threshold check is
    /// re-derived on every call.
    #[must_use]
    pub fn is_likely_ended(&self, sale_id: &str) -> bool {
        self.entries
            .get(sale_id)
            .is_some_and(|entry| entry.no_count >= LIKELY_ENDED_NO_VOTES)
    }

    /// Forget the user's own vote on `sale_id` while keeping the tally.
    /// Used when another conceptual voter is simulated (tests) and by
    /// account resets.
    pub fn clear_user_vote(&mut self, sale_id: &str) {
        if let Some(entry) = self.entries.get_mut(sale_id) {
            entry.user_vote = None;
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 2, 14)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn first_yes_vote_sets_tally_and_timestamp() {
        let mut ledger = ConfirmationLedger::default();
        assert!(ledger.confirm("s1", Vote::Yes, noon()));

        let entry = ledger.get("s1");
        assert_eq!(entry.yes_count, 1);
        assert_eq!(entry.no_count, 0);
        assert_eq!(entry.last_confirmed_at, Some(noon()));
        assert_eq!(entry.user_vote, Some(Vote::Yes));
    }

    #[test]
    fn changing_a_vote_reverses_the_previous_count() {
        let mut ledger = ConfirmationLedger::default();
        assert!(ledger.confirm("s1", Vote::Yes, noon()));
        assert!(!ledger.confirm("s1", Vote::No, noon()));

        let entry = ledger.get("s1");
        assert_eq!(entry.yes_count, 0);
        assert_eq!(entry.no_count, 1);
        assert_eq!(entry.user_vote, Some(Vote::No));
    }

    #[test]
    fn no_votes_never_touch_the_confirmation_timestamp() {
        let mut ledger = ConfirmationLedger::default();
        ledger.confirm("s1", Vote::No, noon());
        assert_eq!(ledger.get("s1").last_confirmed_at, None);
    }

    #[test]
    fn likely_ended_flips_at_the_threshold_and_stays() {
        let mut ledger = ConfirmationLedger::default();
        for round in 0..4 {
            assert_eq!(ledger.is_likely_ended("s1"), round >= 3);
            ledger.confirm("s1", Vote::No, noon());
            ledger.clear_user_vote("s1");
        }
        assert!(ledger.is_likely_ended("s1"));
        assert_eq!(ledger.get("s1").no_count, 4);
    }

    #[test]
    fn reading_a_missing_sale_creates_nothing() {
        let ledger = ConfirmationLedger::default();
        let entry = ledger.get("ghost");
        assert_eq!(entry.yes_count, 0);
        assert_eq!(entry.user_vote, None);
        assert!(ledger.is_empty());
        assert!(!ledger.is_likely_ended("ghost"));
    }

    #[test]
    fn vote_parses_and_displays() {
        assert_eq!("yes".parse::<Vote>(), Ok(Vote::Yes));
        assert_eq!(Vote::No.to_string(), "no");
        assert!("maybe".parse::<Vote>().is_err());
    }
}
