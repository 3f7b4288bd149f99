//! RSVP/capacity ledger.
//!
//! Every write goes through [`submit_rsvp`], which runs against a
//! [`LedgerStore`] inside one transaction: the event row is locked, the
//! submission is validated and admitted, the RSVP is upserted on its
//! `(event_id, user_id)` key and `current_attendees` is recomputed from the
//! attending rows before the transaction commits.

mod dishes;
mod roster;
mod store;
mod submission;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use dishes::{categorize_dishes, classify_dish, DishCategory, MealPlan};
pub use roster::{get_roster, is_event_full, Roster};
pub use store::{LedgerStore, PgLedgerStore};
pub use submission::{admit, recount_attendees, submit_rsvp, RsvpSubmission, SubmitOutcome, ValidatedRsvp};

/// Largest party a single RSVP may bring, responder included.
pub const MAX_GUESTS_PER_RSVP: i32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RsvpStatus {
    Attending,
    Maybe,
    Declined,
}

impl RsvpStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RsvpStatus::Attending => "attending",
            RsvpStatus::Maybe => "maybe",
            RsvpStatus::Declined => "declined",
        }
    }
}

impl fmt::Display for RsvpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RsvpStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "attending" => Ok(RsvpStatus::Attending),
            "maybe" => Ok(RsvpStatus::Maybe),
            "declined" => Ok(RsvpStatus::Declined),
            _ => Err(format!("unknown rsvp status: {s}")),
        }
    }
}

#[cfg(test)]
pub(crate) mod memory;
