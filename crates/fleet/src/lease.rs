use marketerp_core::DomainResult;

marketerp_core::uuid_newtype!(
    /// Whoever holds a lease on a resource (the dispatched shipment's id).
    LeaseHolder,
    "LeaseHolder"
);

/// An exclusive transport resource (vehicle or driver).
///
/// Only shipment dispatch acquires a lease and only shipment release gives it
/// back. A lease can only be returned by the holder that acquired it. Every
/// other status change is administrative.
pub trait Leasable {
    /// Whether the resource can be assigned to a new shipment right now.
    fn is_available(&self) -> bool;

    /// Current lease holder, if the resource is leased.
    fn leased_by(&self) -> Option<LeaseHolder>;

    /// AVAILABLE -> IN_TRANSIT, recording `holder`.
    ///
    /// Fails with `ResourceUnavailable` (and changes nothing) otherwise.
    fn acquire_lease(&mut self, holder: LeaseHolder) -> DomainResult<()>;

    /// IN_TRANSIT -> AVAILABLE when `holder` holds the lease. Returns whether
    /// anything changed; resources leased to someone else or in any other
    /// status (maintenance, inactive) are left alone.
    fn release_lease(&mut self, holder: LeaseHolder) -> bool;
}
