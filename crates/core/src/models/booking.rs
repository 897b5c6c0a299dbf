use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::slot::{SlotCategory, SlotKey};
use crate::policy::BookingPolicy;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookRequest {
    pub key: String,
}

/// Outcome of an accepted booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookResponse {
    pub key: SlotKey,
    pub description: String,
    /// Keys the user gave up to take this one.
    pub released: Vec<SlotKey>,
    /// The user already held this slot; nothing changed.
    pub already_held: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelResponse {
    pub key: SlotKey,
    pub cancelled: bool,
}

/// How a slot looks to the user viewing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
    Available,
    Yours,
    Booked,
    Past,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotView {
    pub key: SlotKey,
    pub label: String,
    pub category: SlotCategory,
    pub status: SlotStatus,
    pub held_by: Option<String>,
    pub is_past: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayViewResponse {
    pub date: NaiveDate,
    pub title: String,
    pub slots: Vec<SlotView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingLookupResponse {
    pub key: SlotKey,
    pub held_by: Option<String>,
    pub is_booked: bool,
    pub is_past: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MyBookingsResponse {
    pub username: String,
    pub upcoming: Option<SlotKey>,
    pub all: Vec<SlotKey>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSlot {
    pub label: String,
    pub category: SlotCategory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogResponse {
    pub policy: BookingPolicy,
    pub slots: Vec<CatalogSlot>,
}
