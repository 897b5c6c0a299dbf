pub mod booking;
pub mod health;
pub mod session;
pub mod slots;
