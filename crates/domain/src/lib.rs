//! Fleetdeck domain records and per-screen configuration.
//!
//! Each module owns one back-office screen: its record type, status
//! enumeration and [`fleetdeck_core::ScreenSpec`].

#![forbid(unsafe_code)]

pub mod booking;
pub mod customer;
pub mod driver;

pub use booking::Booking;
pub use customer::Customer;
pub use driver::Driver;
