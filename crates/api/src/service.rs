//! # Booking Service
//!
//! Owns the live ledger and the store it is persisted to. All ledger access
//! goes through one async mutex, so a booking's check, update and write-back
//! happen as one step with respect to other requests in this process.

use std::sync::Arc;

use chrono::NaiveDateTime;

use laundrybook_core::display::{describe_slot, format_slot_date};
use laundrybook_core::errors::{TimeError, TimeResult};
use laundrybook_core::ledger::Ledger;
use laundrybook_core::models::booking::{
    BookResponse, BookingLookupResponse, CancelResponse, CatalogResponse, CatalogSlot,
    DayViewResponse, MyBookingsResponse,
};
use laundrybook_core::models::slot::{parse_date, SlotKey};
use laundrybook_core::policy::BookingRules;
use laundrybook_db::LedgerStore;
use mockable::Clock;
use tokio::sync::Mutex;
use tracing::{info, warn};

pub struct BookingService {
    ledger: Mutex<Ledger>,
    store: Box<dyn LedgerStore>,
    rules: BookingRules,
    clock: Arc<dyn Clock>,
}

impl BookingService {
    pub fn new(
        ledger: Ledger,
        store: Box<dyn LedgerStore>,
        rules: BookingRules,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            ledger: Mutex::new(ledger),
            store,
            rules,
            clock,
        }
    }

    /// Build the service from whatever `store` currently holds.
    pub async fn open(
        store: Box<dyn LedgerStore>,
        rules: BookingRules,
        clock: Arc<dyn Clock>,
    ) -> eyre::Result<Self> {
        let ledger = store.load().await?;
        info!("Loaded ledger with {} bookings", ledger.len());
        Ok(Self::new(ledger, store, rules, clock))
    }

    pub fn rules(&self) -> &BookingRules {
        &self.rules
    }

    /// A copy of the ledger as it stands.
    pub async fn snapshot(&self) -> Ledger {
        self.ledger.lock().await.clone()
    }

    pub async fn book(&self, user: &str, raw_key: &str) -> TimeResult<BookResponse> {
        let key: SlotKey = raw_key.parse()?;
        let now = self.now();

        let mut ledger = self.ledger.lock().await;
        let mut next = ledger.clone();
        let booked = next.book(&self.rules, key, user, now).map_err(|e| {
            info!("Booking of {} by {} rejected: {}", key, user, e);
            TimeError::from(e)
        })?;

        if !booked.already_held {
            self.persist(&next).await?;
            *ledger = next;
            info!("{} booked {}", user, key);
        }

        Ok(BookResponse {
            key,
            description: describe_slot(&key),
            released: booked.released,
            already_held: booked.already_held,
        })
    }

    /// Release a slot the user holds. Not holding it is not an error.
    pub async fn cancel(&self, user: &str, raw_key: &str) -> TimeResult<CancelResponse> {
        let key: SlotKey = raw_key.parse()?;
        let now = self.now();

        let mut ledger = self.ledger.lock().await;
        let mut next = ledger.clone();
        let cancelled = next.cancel(&key, user, now);

        if cancelled {
            self.persist(&next).await?;
            *ledger = next;
            info!("{} cancelled {}", user, key);
        }

        Ok(CancelResponse { key, cancelled })
    }

    pub async fn lookup(&self, raw_key: &str) -> TimeResult<BookingLookupResponse> {
        let key: SlotKey = raw_key.parse()?;
        let ledger = self.ledger.lock().await;
        let held_by = ledger.held_by(&key).map(str::to_string);

        Ok(BookingLookupResponse {
            key,
            is_booked: held_by.is_some(),
            held_by,
            is_past: key.is_past(self.now()),
        })
    }

    pub async fn day_view(&self, user: &str, raw_date: &str) -> TimeResult<DayViewResponse> {
        let date = parse_date(raw_date)?;
        let ledger = self.ledger.lock().await;

        Ok(DayViewResponse {
            date,
            title: format_slot_date(raw_date),
            slots: ledger.day_view(&self.rules, date, user, self.now()),
        })
    }

    pub async fn my_bookings(&self, user: &str) -> MyBookingsResponse {
        let ledger = self.ledger.lock().await;

        MyBookingsResponse {
            username: user.to_string(),
            upcoming: ledger.upcoming_booking(user, self.now()),
            all: ledger.bookings_for(user),
        }
    }

    pub fn catalog(&self) -> CatalogResponse {
        CatalogResponse {
            policy: self.rules.policy,
            slots: self
                .rules
                .catalog
                .slots()
                .map(|(slot, category)| CatalogSlot {
                    label: slot.label(),
                    category,
                })
                .collect(),
        }
    }

    /// Building-local wall-clock time.
    fn now(&self) -> NaiveDateTime {
        self.clock.local().naive_local()
    }

    async fn persist(&self, next: &Ledger) -> TimeResult<()> {
        self.store.save(next).await.map_err(|e| {
            warn!("Failed to save ledger, keeping previous state: {:#}", e);
            TimeError::Storage(e)
        })
    }
}
