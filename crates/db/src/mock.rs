pub mod store;

pub use store::MockLedgerStore;

