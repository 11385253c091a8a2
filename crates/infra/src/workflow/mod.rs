//! Fulfillment workflow steps.
//!
//! Each step is a plain function over a [`UnitOfWork`](crate::store::UnitOfWork)
//! and assumes it runs inside a store transaction: steps may fail halfway and
//! rely on the transaction to discard partial effects. The
//! [`FulfillmentOrchestrator`](orchestrator::FulfillmentOrchestrator) is the
//! only public entry point that opens those transactions.

pub mod order_materializer;
pub mod orchestrator;
pub mod queries;
pub mod sale_processor;
pub mod shipment_dispatcher;

pub use orchestrator::FulfillmentOrchestrator;
pub use shipment_dispatcher::DispatchPolicy;
