//! `marketerp-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! typed identifiers, the domain error taxonomy and the record/version contract
//! shared by every fulfillment entity.

pub mod aggregate;
pub mod error;
pub mod id;
pub mod value_object;

pub use aggregate::{AggregateRoot, ExpectedVersion};
pub use error::{DomainError, DomainResult};
pub use id::UserId;
pub use value_object::ValueObject;

#[doc(hidden)]
pub use uuid;
