use chrono::{DateTime, Utc};

use marketerp_core::{AggregateRoot, DomainError, DomainResult};
use marketerp_fleet::{DriverId, LeaseHolder, Leasable, RouteId, VehicleId};
use marketerp_fulfillment::{CreateShipment, DispatchShipment, Shipment, ShipmentId, ShipmentPatch};

use crate::store::UnitOfWork;

/// Which resources a dispatch leases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchPolicy {
    /// Move the driver to IN_TRANSIT along with the vehicle. When off, the
    /// driver must still be AVAILABLE to be assigned but stays AVAILABLE.
    pub lease_driver: bool,
}

impl Default for DispatchPolicy {
    fn default() -> Self {
        Self { lease_driver: true }
    }
}

/// Schedule the shipment of a sale's order.
///
/// An order has at most one shipment. If its shipment is still the bare
/// placeholder created at checkout, that placeholder is filled in place;
/// any other existing shipment is a `Conflict`.
pub fn create_for_sale(
    uow: &mut dyn UnitOfWork,
    shipment_id: ShipmentId,
    cmd: &CreateShipment,
    occurred_at: DateTime<Utc>,
) -> DomainResult<Shipment> {
    let sale_id = cmd.sale_id;
    let order = uow
        .orders()
        .find_one(&|o| o.sale_id() == sale_id)
        .ok_or_else(|| DomainError::not_found("order", format!("for sale {sale_id}")))?;

    let plan = &cmd.plan;
    resolve_resources(uow, plan.vehicle_id, plan.driver_id, plan.route_id)?;

    let order_id = *order.id();
    match uow.shipments().find_one(&|s| s.order_id() == order_id) {
        None => uow
            .shipments_mut()
            .insert(Shipment::schedule(shipment_id, order_id, &cmd.plan, occurred_at)),
        Some(mut existing) => {
            existing.claim_placeholder(&cmd.plan, occurred_at)?;
            uow.shipments_mut().save(existing)
        }
    }
}

/// Assign resources to a PENDING shipment and put it on the road.
///
/// Preconditions are checked in a fixed order and the first failure wins:
/// shipment exists, shipment is PENDING, vehicle exists and is AVAILABLE,
/// driver exists and is AVAILABLE, route exists.
pub fn dispatch(
    uow: &mut dyn UnitOfWork,
    shipment_id: ShipmentId,
    cmd: &DispatchShipment,
    policy: DispatchPolicy,
    occurred_at: DateTime<Utc>,
) -> DomainResult<Shipment> {
    let mut shipment = uow.shipments().require(&shipment_id)?;
    shipment.ensure_dispatchable()?;
    let holder = LeaseHolder::from(shipment_id);

    let mut vehicle = uow.vehicles().require(&cmd.vehicle_id)?;
    vehicle.acquire_lease(holder)?;

    // Acquiring on the local copy doubles as the availability check; the copy
    // is only persisted when the policy leases drivers.
    let mut driver = uow.drivers().require(&cmd.driver_id)?;
    driver.acquire_lease(holder)?;

    uow.routes().require(&cmd.route_id)?;

    let mut order = uow.orders().require(&shipment.order_id())?;

    shipment.dispatch(
        cmd.vehicle_id,
        cmd.driver_id,
        cmd.route_id,
        cmd.notes.clone(),
        occurred_at.date_naive(),
        occurred_at,
    )?;
    order.mark_in_transit();

    uow.vehicles_mut().save(vehicle)?;
    if policy.lease_driver {
        uow.drivers_mut().save(driver)?;
    }
    uow.orders_mut().save(order)?;
    uow.shipments_mut().save(shipment)
}

/// Apply a partial update. Supplied resource ids must exist; availability is
/// not checked and order status is not touched.
pub fn update(
    uow: &mut dyn UnitOfWork,
    shipment_id: ShipmentId,
    patch: &ShipmentPatch,
    occurred_at: DateTime<Utc>,
) -> DomainResult<Shipment> {
    let mut shipment = uow.shipments().require(&shipment_id)?;

    resolve_resources(uow, patch.vehicle_id, patch.driver_id, patch.route_id)?;

    if !shipment.apply_patch(patch, occurred_at)? {
        return Ok(shipment);
    }
    uow.shipments_mut().save(shipment)
}

/// Hand a closed shipment's vehicle and driver back to the pool.
///
/// Only leases this shipment still holds are returned. Resources already
/// released, re-leased to another shipment or sent to maintenance are left
/// alone, so repeating a release is harmless. The shipment itself is not
/// modified.
pub fn release(uow: &mut dyn UnitOfWork, shipment_id: ShipmentId) -> DomainResult<Shipment> {
    let shipment = uow.shipments().require(&shipment_id)?;
    shipment.ensure_releasable()?;
    let holder = LeaseHolder::from(shipment_id);

    if let Some(id) = shipment.vehicle_id() {
        let mut vehicle = uow.vehicles().require(&id)?;
        if vehicle.release_lease(holder) {
            uow.vehicles_mut().save(vehicle)?;
        }
    }
    if let Some(id) = shipment.driver_id() {
        let mut driver = uow.drivers().require(&id)?;
        if driver.release_lease(holder) {
            uow.drivers_mut().save(driver)?;
        }
    }

    Ok(shipment)
}

fn resolve_resources(
    uow: &dyn UnitOfWork,
    vehicle_id: Option<VehicleId>,
    driver_id: Option<DriverId>,
    route_id: Option<RouteId>,
) -> DomainResult<()> {
    if let Some(id) = vehicle_id {
        uow.vehicles().require(&id)?;
    }
    if let Some(id) = driver_id {
        uow.drivers().require(&id)?;
    }
    if let Some(id) = route_id {
        uow.routes().require(&id)?;
    }
    Ok(())
}
