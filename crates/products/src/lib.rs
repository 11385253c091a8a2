//! Products domain module.
//!
//! Catalog entries referenced by sale line items. The fulfillment core only
//! reads them (sale detail views); registration is an administrative concern.

pub mod product;

pub use product::{Product, ProductId, RegisterProduct};
