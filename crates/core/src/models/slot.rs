use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::SlotParseError;

/// Date layout used inside slot keys.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Half-open time-of-day range `[start, end)`, written `7-10` or `7:30-8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeSlot {
    start: NaiveTime,
    end: NaiveTime,
}

impl TimeSlot {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self, SlotParseError> {
        if start >= end {
            return Err(SlotParseError::InvalidLabel(format!(
                "{}-{}",
                DisplayTime(start),
                DisplayTime(end)
            )));
        }
        Ok(Self { start, end })
    }

    /// Whole-hour slot, e.g. `TimeSlot::hours(7, 10)` for `7-10`.
    pub fn hours(start: u32, end: u32) -> Result<Self, SlotParseError> {
        let label = || SlotParseError::InvalidLabel(format!("{start}-{end}"));
        let start = NaiveTime::from_hms_opt(start, 0, 0).ok_or_else(label)?;
        let end = NaiveTime::from_hms_opt(end, 0, 0).ok_or_else(label)?;
        Self::new(start, end)
    }

    /// Sorts before every real slot; only used as a seek bound over ordered keys.
    pub(crate) const DAY_FLOOR: TimeSlot = TimeSlot {
        start: NaiveTime::MIN,
        end: NaiveTime::MIN,
    };

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    pub fn label(&self) -> String {
        self.to_string()
    }

    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// True if `other` lies entirely within `self`.
    pub fn contains(&self, other: &TimeSlot) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

struct DisplayTime(NaiveTime);

impl fmt::Display for DisplayTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.minute() {
            0 => write!(f, "{}", self.0.hour()),
            m => write!(f, "{}:{:02}", self.0.hour(), m),
        }
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", DisplayTime(self.start), DisplayTime(self.end))
    }
}

fn parse_time_of_day(raw: &str, label: &str) -> Result<NaiveTime, SlotParseError> {
    let invalid = || SlotParseError::InvalidLabel(label.to_string());
    let (hour, minute) = match raw.split_once(':') {
        Some((h, m)) if m.len() == 2 => (h, m),
        Some(_) => return Err(invalid()),
        None => (raw, "00"),
    };
    let all_digits = |s: &str| !s.is_empty() && s.len() <= 2 && s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(hour) || !all_digits(minute) {
        return Err(invalid());
    }
    let hour: u32 = hour.parse().map_err(|_| invalid())?;
    let minute: u32 = minute.parse().map_err(|_| invalid())?;
    let time = NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(invalid)?;
    // one spelling per time: `7`, never `07` or `7:00`
    if DisplayTime(time).to_string() != raw {
        return Err(invalid());
    }
    Ok(time)
}

impl FromStr for TimeSlot {
    type Err = SlotParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s
            .split_once('-')
            .ok_or_else(|| SlotParseError::InvalidLabel(s.to_string()))?;
        let start = parse_time_of_day(start, s)?;
        let end = parse_time_of_day(end, s)?;
        Self::new(start, end).map_err(|_| SlotParseError::InvalidLabel(s.to_string()))
    }
}

/// Granularity of a bookable slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotCategory {
    Full,
    Short,
}

/// A calendar date paired with a time slot, written `yyyy-MM-dd-<label>`.
///
/// Keys order by date, then by slot start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotKey {
    pub date: NaiveDate,
    pub slot: TimeSlot,
}

impl SlotKey {
    pub fn new(date: NaiveDate, slot: TimeSlot) -> Self {
        Self { date, slot }
    }

    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.slot.start())
    }

    /// A slot is past once its start time has been reached.
    pub fn is_past(&self, now: NaiveDateTime) -> bool {
        self.starts_at() <= now
    }

    /// Reservations dated today or later count against a user's booking allowance.
    pub fn is_active(&self, today: NaiveDate) -> bool {
        self.date >= today
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.date.format(DATE_FORMAT), self.slot)
    }
}

/// Parse a strict `yyyy-MM-dd` date.
pub fn parse_date(raw: &str) -> Result<NaiveDate, SlotParseError> {
    let well_formed = raw.len() == 10
        && raw.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !well_formed {
        return Err(SlotParseError::InvalidDate(raw.to_string()));
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|_| SlotParseError::InvalidDate(raw.to_string()))
}

impl FromStr for SlotKey {
    type Err = SlotParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || SlotParseError::MalformedKey(s.to_string());
        let date = s.get(..10).ok_or_else(malformed)?;
        let label = s
            .get(10..)
            .and_then(|rest| rest.strip_prefix('-'))
            .ok_or_else(malformed)?;
        Ok(Self {
            date: parse_date(date)?,
            slot: label.parse()?,
        })
    }
}

impl Serialize for SlotKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SlotKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
