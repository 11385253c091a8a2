//! Aggregate root contract shared by every persisted record.

use crate::error::{DomainError, DomainResult};

/// Aggregate root marker + minimal interface.
///
/// Domain crates implement this on their records (sales, orders, shipments,
/// vehicles, ...). It carries just enough for a persistence boundary to key
/// records and perform optimistic check-and-set on save, without bringing any
/// storage concern into the domain.
pub trait AggregateRoot {
    /// Strongly-typed aggregate identifier.
    type Id: Copy + Ord + core::hash::Hash + core::fmt::Debug + core::fmt::Display;

    /// Record kind, used in `NotFound` errors and logs (e.g. `"shipment"`).
    const KIND: &'static str;

    /// Returns the aggregate identifier.
    fn id(&self) -> &Self::Id;

    /// Version of the persisted state this value was read from.
    ///
    /// `0` means the record was never persisted.
    fn version(&self) -> u64;

    /// Record the version assigned by the persistence boundary after a save.
    fn set_version(&mut self, version: u64);
}

/// Optimistic concurrency expectation for an aggregate.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ExpectedVersion {
    /// Skip version checking (administrative upserts).
    Any,
    /// Require the aggregate to be at an exact version.
    Exact(u64),
}

impl ExpectedVersion {
    pub fn matches(self, actual: u64) -> bool {
        match self {
            ExpectedVersion::Any => true,
            ExpectedVersion::Exact(v) => v == actual,
        }
    }

    pub fn check(self, actual: u64) -> DomainResult<()> {
        if self.matches(actual) {
            Ok(())
        } else {
            Err(DomainError::conflict(format!(
                "optimistic concurrency check failed (expected: {self:?}, actual: {actual})"
            )))
        }
    }
}
