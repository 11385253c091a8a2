//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects have no identity: two values with the same attributes are the
/// same value (a person's name, a stock key). Aggregates own them and replace
/// them wholesale instead of mutating them in place.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct StockKey {
///     product_id: ProductId,
///     warehouse_id: WarehouseId,
/// }
///
/// impl ValueObject for StockKey {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
