use crate::errors::{CatalogError, SlotParseError};
use crate::models::slot::{SlotCategory, TimeSlot};

/// Full slots offered when nothing else is configured.
pub const DEFAULT_FULL_SLOTS: [&str; 5] = ["7-10", "10-13", "13-16", "16-19", "19-22"];

/// The fixed set of bookable slots for every day.
///
/// Full slots never overlap one another, short slots never overlap one
/// another, and every short slot lies inside some full slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotCatalog {
    full: Vec<TimeSlot>,
    short: Vec<TimeSlot>,
}

impl Default for SlotCatalog {
    fn default() -> Self {
        Self {
            full: default_full_slots(),
            short: Vec::new(),
        }
    }
}

fn default_full_slots() -> Vec<TimeSlot> {
    DEFAULT_FULL_SLOTS
        .iter()
        .filter_map(|label| label.parse().ok())
        .collect()
}

fn check_disjoint(slots: &[TimeSlot]) -> Result<(), CatalogError> {
    for (i, a) in slots.iter().enumerate() {
        for b in &slots[i + 1..] {
            if a == b {
                return Err(CatalogError::DuplicateSlot(a.label()));
            }
            if a.overlaps(b) {
                return Err(CatalogError::OverlappingSlots(a.label(), b.label()));
            }
        }
    }
    Ok(())
}

impl SlotCatalog {
    pub fn new(mut full: Vec<TimeSlot>, mut short: Vec<TimeSlot>) -> Result<Self, CatalogError> {
        if full.is_empty() {
            return Err(CatalogError::NoFullSlots);
        }
        full.sort();
        short.sort();
        check_disjoint(&full)?;
        check_disjoint(&short)?;
        for s in &short {
            if full.contains(s) {
                return Err(CatalogError::DuplicateSlot(s.label()));
            }
            if !full.iter().any(|f| f.contains(s)) {
                return Err(CatalogError::ShortSlotOutsideFullSlot(s.label()));
            }
        }
        Ok(Self { full, short })
    }

    /// Default full slots, each split into one-hour short slots.
    pub fn with_hourly_short_slots() -> Self {
        let full = default_full_slots();
        let short = hourly_pieces(&full);
        Self { full, short }
    }

    /// Given full slots plus their one-hour pieces as short slots.
    pub fn hourly_from(full: Vec<TimeSlot>) -> Result<Self, CatalogError> {
        let short = hourly_pieces(&full);
        Self::new(full, short)
    }

    /// Parse a comma-separated label list such as `7-10, 10-13`.
    pub fn parse_labels(list: &str) -> Result<Vec<TimeSlot>, SlotParseError> {
        list.split(',')
            .map(str::trim)
            .filter(|label| !label.is_empty())
            .map(str::parse)
            .collect()
    }

    pub fn full_slots(&self) -> &[TimeSlot] {
        &self.full
    }

    pub fn short_slots(&self) -> &[TimeSlot] {
        &self.short
    }

    pub fn category_of(&self, slot: &TimeSlot) -> Option<SlotCategory> {
        if self.full.contains(slot) {
            Some(SlotCategory::Full)
        } else if self.short.contains(slot) {
            Some(SlotCategory::Short)
        } else {
            None
        }
    }

    /// Full slots first, then short slots, each in start order.
    pub fn slots(&self) -> impl Iterator<Item = (TimeSlot, SlotCategory)> + '_ {
        self.full
            .iter()
            .map(|s| (*s, SlotCategory::Full))
            .chain(self.short.iter().map(|s| (*s, SlotCategory::Short)))
    }
}

fn hourly_pieces(full: &[TimeSlot]) -> Vec<TimeSlot> {
    full.iter()
        .flat_map(|slot| split_hourly(slot).into_iter().filter(move |piece| piece != slot))
        .collect()
}

fn split_hourly(slot: &TimeSlot) -> Vec<TimeSlot> {
    let one_hour = chrono::Duration::hours(1);
    let mut pieces = Vec::new();
    let mut start = slot.start();
    while start < slot.end() {
        let end = (start + one_hour).min(slot.end());
        // wrapped past midnight
        if end <= start {
            break;
        }
        if let Ok(piece) = TimeSlot::new(start, end) {
            pieces.push(piece);
        }
        start = end;
    }
    pieces
}
