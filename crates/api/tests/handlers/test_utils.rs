use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue};
use axum_test::TestServer;
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use laundrybook_api::service::BookingService;
use laundrybook_api::{app, ApiState};
use laundrybook_core::ledger::Ledger;
use laundrybook_core::policy::BookingRules;
use laundrybook_db::{LedgerStore, MemoryStore};
use mockable::Clock;

pub const USER_HEADER: &str = "x-laundry-user";

/// Friday morning before the weekend's slots.
pub fn default_now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 31)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap()
}

/// A clock stopped at one building-local instant.
pub struct FixedClock(DateTime<Local>);

impl FixedClock {
    pub fn at(now: NaiveDateTime) -> Self {
        let local = Local
            .from_local_datetime(&now)
            .earliest()
            .expect("fixture time exists in the local zone");
        Self(local)
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0.with_timezone(&Utc)
    }
}

pub fn user_header(name: &str) -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static(USER_HEADER),
        HeaderValue::from_str(name).unwrap(),
    )
}

pub struct TestContext {
    pub rules: BookingRules,
    pub now: NaiveDateTime,
    pub ledger: Ledger,
}

impl TestContext {
    pub fn new() -> Self {
        Self {
            rules: BookingRules::default(),
            now: default_now(),
            ledger: Ledger::new(),
        }
    }

    pub fn with_rules(mut self, rules: BookingRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn at(mut self, now: NaiveDateTime) -> Self {
        self.now = now;
        self
    }

    pub fn with_ledger(mut self, ledger: Ledger) -> Self {
        self.ledger = ledger;
        self
    }

    pub fn build_service(self, store: Box<dyn LedgerStore>) -> BookingService {
        BookingService::new(
            self.ledger,
            store,
            self.rules,
            Arc::new(FixedClock::at(self.now)),
        )
    }

    pub fn build_state(self, store: Box<dyn LedgerStore>) -> Arc<ApiState> {
        Arc::new(ApiState {
            service: self.build_service(store),
        })
    }

    pub fn build_server(self) -> (TestServer, Arc<ApiState>) {
        let state = self.build_state(Box::new(MemoryStore::new()));
        let server = TestServer::new(app(state.clone())).unwrap();
        (server, state)
    }
}
