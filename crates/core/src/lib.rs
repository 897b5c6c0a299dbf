//! # Laundrybook Core
//!
//! Domain types and booking rules for reserving shared laundry machines.
//!
//! - [`models::slot`]: time slots and `yyyy-MM-dd-<slot>` keys
//! - [`catalog`]: the fixed set of bookable full and short slots
//! - [`policy`]: single or dual booking allowance
//! - [`ledger`]: the slot-to-user mapping and its operations
//!
//! Nothing in this crate performs I/O.

pub mod catalog;
pub mod display;
pub mod errors;
pub mod ledger;
pub mod models;
pub mod policy;
