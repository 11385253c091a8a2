//! Parties domain module (clients and person names).
//!
//! Person names are shared with the fleet crate (drivers are persons too), so
//! the display-name rule lives here once.

pub mod client;
pub mod person;

pub use client::{Client, ClientId, ContactInfo, RegisterClient};
pub use person::{PersonName, join_name_parts};
