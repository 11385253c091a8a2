use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use marketerp_core::{AggregateRoot, DomainError, DomainResult};
use marketerp_fleet::{DriverId, LeaseHolder, RouteId, VehicleId};
use marketerp_sales::SaleId;

use crate::order::OrderId;

marketerp_core::uuid_newtype!(
    /// Shipment identifier.
    ShipmentId,
    "ShipmentId"
);

/// A dispatched shipment holds its vehicle and driver leases under its own id.
impl From<ShipmentId> for LeaseHolder {
    fn from(id: ShipmentId) -> Self {
        LeaseHolder::from_uuid(*id.as_uuid())
    }
}

/// Shipment status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShipmentStatus {
    Pending,
    InTransit,
    Delivered,
    Cancelled,
}

impl ShipmentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ShipmentStatus::Pending => "PENDING",
            ShipmentStatus::InTransit => "IN_TRANSIT",
            ShipmentStatus::Delivered => "DELIVERED",
            ShipmentStatus::Cancelled => "CANCELLED",
        }
    }

    /// Terminal statuses: the shipment no longer needs its vehicle or driver.
    pub fn is_closed(self) -> bool {
        matches!(self, ShipmentStatus::Delivered | ShipmentStatus::Cancelled)
    }
}

impl core::fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for ShipmentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(ShipmentStatus::Pending),
            "IN_TRANSIT" => Ok(ShipmentStatus::InTransit),
            "DELIVERED" => Ok(ShipmentStatus::Delivered),
            "CANCELLED" => Ok(ShipmentStatus::Cancelled),
            other => Err(DomainError::invalid_argument(format!(
                "unknown shipment status: {other}"
            ))),
        }
    }
}

/// Details supplied when a shipment is scheduled for an order.
///
/// Every field is optional; resource ids must already be resolved by the
/// caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipmentPlan {
    #[serde(default)]
    pub vehicle_id: Option<VehicleId>,
    #[serde(default)]
    pub driver_id: Option<DriverId>,
    #[serde(default)]
    pub route_id: Option<RouteId>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub ship_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "blank_date_as_none")]
    pub delivery_date: Option<NaiveDate>,
    #[serde(default)]
    pub transport_cost: Option<u64>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Command: CreateShipment (schedule the shipment of a sale's order).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateShipment {
    pub sale_id: SaleId,
    #[serde(flatten)]
    pub plan: ShipmentPlan,
}

/// Command: DispatchShipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchShipment {
    pub vehicle_id: VehicleId,
    pub driver_id: DriverId,
    pub route_id: RouteId,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Partial update of a shipment. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipmentPatch {
    #[serde(default)]
    pub vehicle_id: Option<VehicleId>,
    #[serde(default)]
    pub driver_id: Option<DriverId>,
    #[serde(default)]
    pub route_id: Option<RouteId>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub ship_date: Option<NaiveDate>,
    /// An empty string is accepted and means "not supplied".
    #[serde(default, deserialize_with = "blank_date_as_none")]
    pub delivery_date: Option<NaiveDate>,
    #[serde(default)]
    pub transport_cost: Option<u64>,
    /// Symbolic status name (`"DELIVERED"`, ...).
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl ShipmentPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Aggregate root: Shipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Shipment {
    id: ShipmentId,
    order_id: OrderId,
    vehicle_id: Option<VehicleId>,
    driver_id: Option<DriverId>,
    route_id: Option<RouteId>,
    address: Option<String>,
    ship_date: Option<NaiveDate>,
    delivery_date: Option<NaiveDate>,
    transport_cost: Option<u64>,
    status: ShipmentStatus,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    version: u64,
}

impl Shipment {
    /// Bare PENDING shipment created alongside a new order.
    pub fn placeholder(id: ShipmentId, order_id: OrderId, occurred_at: DateTime<Utc>) -> Self {
        Self::schedule(id, order_id, &ShipmentPlan::default(), occurred_at)
    }

    /// New PENDING shipment with the supplied details.
    pub fn schedule(
        id: ShipmentId,
        order_id: OrderId,
        plan: &ShipmentPlan,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        let mut shipment = Self {
            id,
            order_id,
            vehicle_id: None,
            driver_id: None,
            route_id: None,
            address: None,
            ship_date: None,
            delivery_date: None,
            transport_cost: None,
            status: ShipmentStatus::Pending,
            notes: None,
            created_at: occurred_at,
            updated_at: occurred_at,
            version: 0,
        };
        shipment.apply_plan(plan);
        shipment
    }

    pub fn order_id(&self) -> OrderId {
        self.order_id
    }

    pub fn vehicle_id(&self) -> Option<VehicleId> {
        self.vehicle_id
    }

    pub fn driver_id(&self) -> Option<DriverId> {
        self.driver_id
    }

    pub fn route_id(&self) -> Option<RouteId> {
        self.route_id
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn ship_date(&self) -> Option<NaiveDate> {
        self.ship_date
    }

    pub fn delivery_date(&self) -> Option<NaiveDate> {
        self.delivery_date
    }

    pub fn transport_cost(&self) -> Option<u64> {
        self.transport_cost
    }

    pub fn status(&self) -> ShipmentStatus {
        self.status
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// PENDING, unscheduled and with nothing assigned.
    pub fn is_placeholder(&self) -> bool {
        self.status == ShipmentStatus::Pending
            && self.ship_date.is_none()
            && self.vehicle_id.is_none()
            && self.driver_id.is_none()
            && self.route_id.is_none()
    }

    /// Fill an unclaimed placeholder in place (the shipment keeps its id).
    pub fn claim_placeholder(
        &mut self,
        plan: &ShipmentPlan,
        occurred_at: DateTime<Utc>,
    ) -> DomainResult<()> {
        if !self.is_placeholder() {
            return Err(DomainError::conflict(format!(
                "order {} already has a shipment ({})",
                self.order_id, self.id
            )));
        }
        self.apply_plan(plan);
        self.updated_at = occurred_at;
        Ok(())
    }

    pub fn ensure_dispatchable(&self) -> DomainResult<()> {
        if self.status != ShipmentStatus::Pending {
            return Err(DomainError::invalid_state(format!(
                "shipment {} was already dispatched (status {})",
                self.id, self.status
            )));
        }
        Ok(())
    }

    /// Attach resources and put the shipment on the road.
    ///
    /// Resource availability is the caller's concern; this only enforces the
    /// shipment's own status gate.
    pub fn dispatch(
        &mut self,
        vehicle_id: VehicleId,
        driver_id: DriverId,
        route_id: RouteId,
        notes: Option<String>,
        ship_date: NaiveDate,
        occurred_at: DateTime<Utc>,
    ) -> DomainResult<()> {
        self.ensure_dispatchable()?;
        self.vehicle_id = Some(vehicle_id);
        self.driver_id = Some(driver_id);
        self.route_id = Some(route_id);
        self.notes = notes;
        self.ship_date = Some(ship_date);
        self.status = ShipmentStatus::InTransit;
        self.updated_at = occurred_at;
        Ok(())
    }

    /// Apply a partial update. Returns whether anything was written.
    ///
    /// The status name is validated before any field changes, so an invalid
    /// patch leaves the shipment exactly as it was.
    pub fn apply_patch(
        &mut self,
        patch: &ShipmentPatch,
        occurred_at: DateTime<Utc>,
    ) -> DomainResult<bool> {
        let status = patch
            .status
            .as_deref()
            .map(str::parse::<ShipmentStatus>)
            .transpose()?;

        if patch.is_empty() {
            return Ok(false);
        }

        if let Some(v) = patch.vehicle_id {
            self.vehicle_id = Some(v);
        }
        if let Some(d) = patch.driver_id {
            self.driver_id = Some(d);
        }
        if let Some(r) = patch.route_id {
            self.route_id = Some(r);
        }
        if let Some(address) = &patch.address {
            self.address = Some(address.clone());
        }
        if let Some(date) = patch.ship_date {
            self.ship_date = Some(date);
        }
        if let Some(date) = patch.delivery_date {
            self.delivery_date = Some(date);
        }
        if let Some(cost) = patch.transport_cost {
            self.transport_cost = Some(cost);
        }
        if let Some(status) = status {
            self.status = status;
        }
        if let Some(notes) = &patch.notes {
            self.notes = Some(notes.clone());
        }
        self.updated_at = occurred_at;
        Ok(true)
    }

    /// Only closed shipments give their vehicle and driver back.
    pub fn ensure_releasable(&self) -> DomainResult<()> {
        if !self.status.is_closed() {
            return Err(DomainError::invalid_state(format!(
                "shipment {} is {}; only DELIVERED or CANCELLED shipments release resources",
                self.id, self.status
            )));
        }
        Ok(())
    }

    fn apply_plan(&mut self, plan: &ShipmentPlan) {
        self.vehicle_id = plan.vehicle_id;
        self.driver_id = plan.driver_id;
        self.route_id = plan.route_id;
        self.address = plan.address.clone();
        self.ship_date = plan.ship_date;
        self.delivery_date = plan.delivery_date;
        self.transport_cost = plan.transport_cost;
        self.notes = plan.notes.clone();
    }
}

impl AggregateRoot for Shipment {
    type Id = ShipmentId;
    const KIND: &'static str = "shipment";

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }

    fn set_version(&mut self, version: u64) {
        self.version = version;
    }
}

fn blank_date_as_none<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_time() -> DateTime<Utc> {
        Utc::now()
    }

    fn today() -> NaiveDate {
        test_time().date_naive()
    }

    fn placeholder() -> Shipment {
        Shipment::placeholder(ShipmentId::new(), OrderId::new(), test_time())
    }

    fn dispatched() -> Shipment {
        let mut s = placeholder();
        s.dispatch(
            VehicleId::new(),
            DriverId::new(),
            RouteId::new(),
            Some("fragile".to_string()),
            today(),
            test_time(),
        )
        .unwrap();
        s
    }

    #[test]
    fn placeholder_is_pending_and_unassigned() {
        let s = placeholder();
        assert_eq!(s.status(), ShipmentStatus::Pending);
        assert!(s.is_placeholder());
        assert_eq!(s.ship_date(), None);
    }

    #[test]
    fn claiming_a_placeholder_keeps_its_id() {
        let mut s = placeholder();
        let id = *s.id();
        let plan = ShipmentPlan {
            address: Some("Av. Arequipa 123".to_string()),
            ship_date: NaiveDate::from_ymd_opt(2026, 5, 2),
            transport_cost: Some(1_500),
            ..ShipmentPlan::default()
        };
        s.claim_placeholder(&plan, test_time()).unwrap();

        assert_eq!(*s.id(), id);
        assert_eq!(s.address(), Some("Av. Arequipa 123"));
        assert_eq!(s.status(), ShipmentStatus::Pending);

        let err = s.claim_placeholder(&plan, test_time()).unwrap_err();
        match err {
            DomainError::Conflict(msg) if msg.contains("already has a shipment") => {}
            _ => panic!("Expected Conflict for claimed shipment"),
        }
    }

    #[test]
    fn dispatch_moves_to_in_transit_once() {
        let mut s = dispatched();
        assert_eq!(s.status(), ShipmentStatus::InTransit);
        assert_eq!(s.ship_date(), Some(today()));
        assert_eq!(s.notes(), Some("fragile"));

        let err = s
            .dispatch(
                VehicleId::new(),
                DriverId::new(),
                RouteId::new(),
                None,
                today(),
                test_time(),
            )
            .unwrap_err();
        match err {
            DomainError::InvalidState(msg) if msg.contains("already dispatched") => {}
            _ => panic!("Expected InvalidState for second dispatch"),
        }
    }

    #[test]
    fn invalid_status_patch_changes_nothing() {
        let mut s = dispatched();
        let before = s.clone();
        let patch = ShipmentPatch {
            address: Some("new address".to_string()),
            status: Some("LOST".to_string()),
            ..ShipmentPatch::default()
        };

        assert!(matches!(
            s.apply_patch(&patch, test_time()),
            Err(DomainError::InvalidArgument(_))
        ));
        assert_eq!(s, before);
    }

    #[test]
    fn patch_only_touches_supplied_fields() {
        let mut s = dispatched();
        let vehicle = s.vehicle_id();
        let patch = ShipmentPatch {
            status: Some("DELIVERED".to_string()),
            delivery_date: NaiveDate::from_ymd_opt(2026, 5, 3),
            ..ShipmentPatch::default()
        };

        assert!(s.apply_patch(&patch, test_time()).unwrap());
        assert_eq!(s.status(), ShipmentStatus::Delivered);
        assert_eq!(s.delivery_date(), NaiveDate::from_ymd_opt(2026, 5, 3));
        assert_eq!(s.vehicle_id(), vehicle);
        assert_eq!(s.notes(), Some("fragile"));
    }

    #[test]
    fn empty_patch_is_a_no_op() {
        let mut s = dispatched();
        let before = s.clone();
        assert!(!s.apply_patch(&ShipmentPatch::default(), test_time()).unwrap());
        assert_eq!(s, before);
    }

    #[test]
    fn blank_delivery_date_deserializes_as_absent() {
        let patch: ShipmentPatch =
            serde_json::from_str(r#"{"delivery_date": "", "notes": "call first"}"#).unwrap();
        assert_eq!(patch.delivery_date, None);
        assert_eq!(patch.notes.as_deref(), Some("call first"));

        let patch: ShipmentPatch =
            serde_json::from_str(r#"{"delivery_date": "2026-05-03"}"#).unwrap();
        assert_eq!(patch.delivery_date, NaiveDate::from_ymd_opt(2026, 5, 3));

        assert!(serde_json::from_str::<ShipmentPatch>(r#"{"delivery_date": "tomorrow"}"#).is_err());
    }

    #[test]
    fn release_requires_closed_status() {
        let mut s = dispatched();
        assert!(matches!(
            s.ensure_releasable(),
            Err(DomainError::InvalidState(_))
        ));

        let patch = ShipmentPatch {
            status: Some("CANCELLED".to_string()),
            ..ShipmentPatch::default()
        };
        s.apply_patch(&patch, test_time()).unwrap();
        assert!(s.ensure_releasable().is_ok());
    }
}
