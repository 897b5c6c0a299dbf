use thiserror::Error;

use crate::models::slot::SlotKey;

#[derive(Error, Debug)]
pub enum TimeError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    Storage(#[from] eyre::Report),
}

pub type TimeResult<T> = Result<T, TimeError>;

/// Why a slot key or slot label could not be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlotParseError {
    #[error("invalid date '{0}', expected yyyy-MM-dd")]
    InvalidDate(String),

    #[error("invalid slot label '{0}'")]
    InvalidLabel(String),

    #[error("malformed slot key '{0}'")]
    MalformedKey(String),
}

/// A slot catalog that breaks the containment or uniqueness rules.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("catalog has no full slots")]
    NoFullSlots,

    #[error("slot {0} is listed more than once")]
    DuplicateSlot(String),

    #[error("slots {0} and {1} overlap")]
    OverlappingSlots(String, String),

    #[error("short slot {0} is not inside any full slot")]
    ShortSlotOutsideFullSlot(String),

    #[error(transparent)]
    Parse(#[from] SlotParseError),
}

/// A rejected booking. The ledger is left untouched whenever one of these is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookingError {
    #[error("slot {key} is already booked by {holder}")]
    SlotTaken { key: SlotKey, holder: String },

    #[error("slot {key} overlaps the booking {existing}")]
    Overlap { key: SlotKey, existing: SlotKey },

    #[error("slot {0} has already started")]
    PastSlot(SlotKey),

    #[error("{0} is not a bookable slot")]
    UnknownSlot(String),
}

impl From<BookingError> for TimeError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::SlotTaken { .. } | BookingError::Overlap { .. } => {
                TimeError::Conflict(err.to_string())
            }
            BookingError::PastSlot(_) | BookingError::UnknownSlot(_) => {
                TimeError::Validation(err.to_string())
            }
        }
    }
}

impl From<SlotParseError> for TimeError {
    fn from(err: SlotParseError) -> Self {
        TimeError::Validation(err.to_string())
    }
}
