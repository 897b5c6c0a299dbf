use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::SlotCatalog;
use crate::errors::TimeError;
use crate::models::slot::SlotCategory;

/// How many active reservations a user may hold at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingPolicy {
    /// One active reservation of any kind.
    #[default]
    Single,
    /// One active full slot plus one active short slot.
    Dual,
}

impl BookingPolicy {
    /// Whether a user's existing reservation of category `held` is released
    /// when the same user books a slot of category `booking`.
    pub fn displaces(&self, held: SlotCategory, booking: SlotCategory) -> bool {
        match self {
            BookingPolicy::Single => true,
            BookingPolicy::Dual => held == booking,
        }
    }
}

impl fmt::Display for BookingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingPolicy::Single => f.write_str("single"),
            BookingPolicy::Dual => f.write_str("dual"),
        }
    }
}

impl FromStr for BookingPolicy {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" => Ok(BookingPolicy::Single),
            "dual" => Ok(BookingPolicy::Dual),
            other => Err(TimeError::Validation(format!(
                "unknown booking policy '{other}', expected 'single' or 'dual'"
            ))),
        }
    }
}

/// Everything the ledger needs to decide whether a booking is allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingRules {
    pub catalog: SlotCatalog,
    pub policy: BookingPolicy,
}

impl BookingRules {
    pub fn new(catalog: SlotCatalog, policy: BookingPolicy) -> Self {
        Self { catalog, policy }
    }
}
