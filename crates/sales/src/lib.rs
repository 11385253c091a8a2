//! Sales domain module.
//!
//! A sale is a finalized checkout: line items plus caller-supplied totals.
//! Totals are recorded as given, never recomputed here.

pub mod sale;
pub mod view;

pub use sale::{FinalizeSale, LineItem, Sale, SaleId, SaleLine, SaleStatus};
pub use view::{SaleLineView, SaleView};
