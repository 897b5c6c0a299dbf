//! # Slot Ledger
//!
//! The ledger maps each booked [`SlotKey`] to the user holding it. All
//! booking decisions are pure functions over this map plus the configured
//! [`BookingRules`]; persistence lives elsewhere.
//!
//! A rejected operation never modifies the ledger.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::BookingError;
use crate::models::booking::{SlotStatus, SlotView};
use crate::models::slot::{SlotCategory, SlotKey, TimeSlot};
use crate::policy::BookingRules;

/// The complete slot-key to user mapping.
///
/// Serializes as a flat JSON object, e.g. `{"2024-06-01-7-10":"alice"}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger {
    entries: BTreeMap<SlotKey, String>,
}

/// Result of an accepted [`Ledger::book`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booked {
    pub key: SlotKey,
    pub released: Vec<SlotKey>,
    pub already_held: bool,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SlotKey, &str)> {
        self.entries.iter().map(|(k, v)| (k, v.as_str()))
    }

    pub fn held_by(&self, key: &SlotKey) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn is_booked(&self, key: &SlotKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Every key held by `user`, oldest first.
    pub fn bookings_for(&self, user: &str) -> Vec<SlotKey> {
        self.entries
            .iter()
            .filter(|(_, holder)| holder.as_str() == user)
            .map(|(key, _)| *key)
            .collect()
    }

    /// The earliest reservation of `user` that has not started yet.
    pub fn upcoming_booking(&self, user: &str, now: NaiveDateTime) -> Option<SlotKey> {
        self.entries
            .range(first_key_on(now.date())..)
            .find(|(key, holder)| holder.as_str() == user && !key.is_past(now))
            .map(|(key, _)| *key)
    }

    fn on_date(&self, date: NaiveDate) -> impl Iterator<Item = (&SlotKey, &String)> {
        self.entries
            .range(first_key_on(date)..)
            .take_while(move |(key, _)| key.date == date)
    }

    /// Reserve `key` for `user`.
    ///
    /// The user's active reservations that the policy says this booking
    /// replaces are released in the same step.
    pub fn book(
        &mut self,
        rules: &BookingRules,
        key: SlotKey,
        user: &str,
        now: NaiveDateTime,
    ) -> Result<Booked, BookingError> {
        let category = rules
            .catalog
            .category_of(&key.slot)
            .ok_or_else(|| BookingError::UnknownSlot(key.slot.label()))?;

        if key.is_past(now) {
            return Err(BookingError::PastSlot(key));
        }

        match self.held_by(&key) {
            Some(holder) if holder == user => {
                return Ok(Booked {
                    key,
                    released: Vec::new(),
                    already_held: true,
                });
            }
            Some(holder) => {
                return Err(BookingError::SlotTaken {
                    key,
                    holder: holder.to_string(),
                });
            }
            None => {}
        }

        let today = now.date();
        let released: Vec<SlotKey> = self
            .entries
            .iter()
            .filter(|(held, holder)| holder.as_str() == user && held.is_active(today))
            .filter(|(held, _)| {
                // labels dropped from the catalog count as full slots
                let held_category = rules
                    .catalog
                    .category_of(&held.slot)
                    .unwrap_or(SlotCategory::Full);
                rules.policy.displaces(held_category, category)
            })
            .map(|(held, _)| *held)
            .collect();

        if let Some((existing, _)) = self
            .on_date(key.date)
            .find(|(other, _)| !released.contains(other) && other.slot.overlaps(&key.slot))
        {
            return Err(BookingError::Overlap {
                key,
                existing: *existing,
            });
        }

        for old in &released {
            self.entries.remove(old);
        }
        self.entries.insert(key, user.to_string());
        debug!(%key, user, released = released.len(), "slot booked");

        Ok(Booked {
            key,
            released,
            already_held: false,
        })
    }

    /// Release `key` if `user` holds it and it has not started. Returns
    /// whether anything changed.
    pub fn cancel(&mut self, key: &SlotKey, user: &str, now: NaiveDateTime) -> bool {
        if self.held_by(key) != Some(user) || key.is_past(now) {
            return false;
        }
        self.entries.remove(key);
        debug!(%key, user, "booking cancelled");
        true
    }

    /// Status of every catalog slot on `date` as seen by `viewer`.
    pub fn day_view(
        &self,
        rules: &BookingRules,
        date: NaiveDate,
        viewer: &str,
        now: NaiveDateTime,
    ) -> Vec<SlotView> {
        rules
            .catalog
            .slots()
            .map(|(slot, category)| {
                let key = SlotKey::new(date, slot);
                let held_by = self.held_by(&key).map(str::to_string);
                let is_past = key.is_past(now);
                let status = match held_by.as_deref() {
                    Some(holder) if holder == viewer => SlotStatus::Yours,
                    Some(_) => SlotStatus::Booked,
                    None if is_past => SlotStatus::Past,
                    None => SlotStatus::Available,
                };
                SlotView {
                    key,
                    label: slot.label(),
                    category,
                    status,
                    held_by,
                    is_past,
                }
            })
            .collect()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Rebuild a ledger from its stored form.
    ///
    /// A missing record or unreadable JSON yields an empty ledger; entries
    /// whose key does not parse are dropped. Both cases are logged.
    pub fn decode(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::new();
        };
        let record: BTreeMap<String, String> = match serde_json::from_str(raw) {
            Ok(record) => record,
            Err(e) => {
                warn!("stored ledger is not valid JSON, starting empty: {e}");
                return Self::new();
            }
        };
        record
            .into_iter()
            .filter_map(|(key, user)| match key.parse::<SlotKey>() {
                Ok(key) => Some((key, user)),
                Err(e) => {
                    warn!("dropping stored booking {key:?}: {e}");
                    None
                }
            })
            .collect()
    }
}

impl FromIterator<(SlotKey, String)> for Ledger {
    fn from_iter<I: IntoIterator<Item = (SlotKey, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

fn first_key_on(date: NaiveDate) -> SlotKey {
    SlotKey::new(date, TimeSlot::DAY_FLOOR)
}
