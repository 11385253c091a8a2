//! Integration tests for the full fulfillment pipeline.
//!
//! Tests: FinalizeSale → Order → Shipment → Dispatch → Release
//!
//! Verifies:
//! - A sale is all-or-nothing (stock, sale, order, placeholder shipment)
//! - One shipment per order; placeholders are claimed in place
//! - Dispatch preconditions, ordering and resource exclusivity
//! - Races on the same shipment, vehicle or last unit of stock have one winner

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;

    use marketerp_core::{AggregateRoot, DomainError, UserId};
    use marketerp_fleet::{
        Driver, DriverStatus, RegisterDriver, RegisterRoute, RegisterVehicle, Route, RouteId,
        Vehicle, VehicleId, VehicleStatus,
    };
    use marketerp_fulfillment::{
        CreateShipment, DispatchShipment, OrderStatus, Shipment, ShipmentId, ShipmentPatch,
        ShipmentPlan, ShipmentStatus,
    };
    use marketerp_inventory::{SetStock, StockKey, WarehouseId};
    use marketerp_parties::{Client, ClientId, ContactInfo, PersonName, RegisterClient};
    use marketerp_products::{Product, RegisterProduct};
    use marketerp_sales::{FinalizeSale, Sale, SaleId, SaleLine};

    use crate::catalog::CatalogService;
    use crate::error::FulfillmentError;
    use crate::store::{FulfillmentStore, InMemoryStore};
    use crate::workflow::{DispatchPolicy, FulfillmentOrchestrator};

    struct Fixture {
        store: Arc<InMemoryStore>,
        orchestrator: FulfillmentOrchestrator<Arc<InMemoryStore>>,
        catalog: CatalogService<Arc<InMemoryStore>>,
        client: Client,
        product: Product,
        warehouse_id: WarehouseId,
        vehicle: Vehicle,
        driver: Driver,
        route: Route,
    }

    fn setup(stock: i64) -> Fixture {
        setup_with_policy(stock, DispatchPolicy::default())
    }

    fn setup_with_policy(stock: i64, policy: DispatchPolicy) -> Fixture {
        let store = Arc::new(InMemoryStore::new());
        let orchestrator = FulfillmentOrchestrator::new(store.clone()).with_policy(policy);
        let catalog = CatalogService::new(store.clone());

        let client = catalog
            .register_client(&RegisterClient {
                name: PersonName::new("Lucía", Some("Paredes"), Some("Vega")),
                document_number: Some("70112233".to_string()),
                contact: ContactInfo::default(),
            })
            .unwrap();
        let product = catalog
            .register_product(&RegisterProduct {
                name: "Aceite 1L".to_string(),
                sku: Some("ACE-1L".to_string()),
                image_url: None,
                list_price: Some(990),
            })
            .unwrap();
        let warehouse_id = WarehouseId::new();
        catalog
            .set_stock(&SetStock {
                product_id: *product.id(),
                warehouse_id,
                quantity: stock,
            })
            .unwrap();

        let vehicle = register_vehicle(&catalog, "ABC-123");
        let driver = register_driver(&catalog, "Pedro");
        let route = catalog
            .register_route(&RegisterRoute {
                name: "Lima Sur".to_string(),
                origin: "Almacén Central".to_string(),
                destination: "Chorrillos".to_string(),
                distance_km: 14.0,
                estimated_hours: 0.75,
                base_cost: 3_000,
            })
            .unwrap();

        Fixture {
            store,
            orchestrator,
            catalog,
            client,
            product,
            warehouse_id,
            vehicle,
            driver,
            route,
        }
    }

    fn register_vehicle(catalog: &CatalogService<Arc<InMemoryStore>>, plate: &str) -> Vehicle {
        catalog
            .register_vehicle(&RegisterVehicle {
                plate: plate.to_string(),
                brand: Some("Isuzu".to_string()),
                model: None,
                capacity_kg: Some(2_000),
            })
            .unwrap()
    }

    fn register_driver(catalog: &CatalogService<Arc<InMemoryStore>>, name: &str) -> Driver {
        catalog
            .register_driver(&RegisterDriver {
                name: PersonName::new(name, Some("Ramos"), None),
                license_number: format!("LIC-{name}"),
                license_category: None,
            })
            .unwrap()
    }

    impl Fixture {
        fn sale_cmd(&self, quantities: &[i64]) -> FinalizeSale {
            FinalizeSale {
                user_id: UserId::new(),
                client_id: *self.client.id(),
                warehouse_id: self.warehouse_id,
                subtotal: 990 * quantities.iter().sum::<i64>() as u64,
                discount: None,
                tax: 0,
                total: 990 * quantities.iter().sum::<i64>() as u64,
                lines: quantities
                    .iter()
                    .map(|&quantity| SaleLine {
                        product_id: *self.product.id(),
                        quantity,
                        unit_price: 990,
                        subtotal: 990 * quantity as u64,
                    })
                    .collect(),
                occurred_at: Utc::now(),
            }
        }

        fn finalize(&self, quantity: i64) -> Sale {
            self.orchestrator
                .finalize_sale(&self.sale_cmd(&[quantity]))
                .unwrap()
        }

        fn stock(&self) -> i64 {
            self.catalog
                .stock_level(StockKey::new(*self.product.id(), self.warehouse_id))
                .unwrap()
                .quantity()
        }

        fn counts(&self) -> (usize, usize, usize) {
            self.store
                .read(|uow| {
                    Ok((
                        uow.sales().list().len(),
                        uow.orders().list().len(),
                        uow.shipments().list().len(),
                    ))
                })
                .unwrap()
        }

        fn shipment_for(&self, sale_id: SaleId) -> Shipment {
            self.store
                .read(|uow| {
                    let order = uow
                        .orders()
                        .find_one(&|o| o.sale_id() == sale_id)
                        .ok_or_else(|| DomainError::not_found("order", sale_id))?;
                    let order_id = *order.id();
                    Ok(uow
                        .shipments()
                        .find_one(&|s| s.order_id() == order_id)
                        .ok_or_else(|| DomainError::not_found("shipment", order_id))?)
                })
                .unwrap()
        }

        fn order_status(&self, sale_id: SaleId) -> OrderStatus {
            self.store
                .read(|uow| {
                    Ok(uow
                        .orders()
                        .find_one(&|o| o.sale_id() == sale_id)
                        .map(|o| o.status()))
                })
                .unwrap()
                .unwrap()
        }

        fn vehicle_status(&self, id: VehicleId) -> VehicleStatus {
            self.store
                .read(|uow| Ok(uow.vehicles().require(&id)?.status()))
                .unwrap()
        }

        fn driver_status(&self) -> DriverStatus {
            let id = *self.driver.id();
            self.store
                .read(|uow| Ok(uow.drivers().require(&id)?.status()))
                .unwrap()
        }

        fn dispatch_cmd(&self) -> DispatchShipment {
            DispatchShipment {
                vehicle_id: *self.vehicle.id(),
                driver_id: *self.driver.id(),
                route_id: *self.route.id(),
                notes: Some("entregar en recepción".to_string()),
            }
        }
    }

    fn domain_err(err: FulfillmentError) -> DomainError {
        match err {
            FulfillmentError::Domain(e) => e,
            other => panic!("expected domain error, got {other:?}"),
        }
    }

    // ---- finalize_sale ----

    #[test]
    fn finalize_sale_creates_order_and_placeholder_and_takes_stock() {
        let fx = setup(10);
        let sale = fx.finalize(3);

        assert_eq!(fx.stock(), 7);
        assert_eq!(sale.lines().len(), 1);
        assert_eq!(sale.version(), 1);
        assert_eq!(fx.order_status(*sale.id()), OrderStatus::Pending);

        let shipment = fx.shipment_for(*sale.id());
        assert_eq!(shipment.status(), ShipmentStatus::Pending);
        assert!(shipment.is_placeholder());
        assert_eq!(fx.counts(), (1, 1, 1));
    }

    #[test]
    fn selling_exactly_the_stock_on_hand_leaves_zero() {
        let fx = setup(5);
        fx.finalize(5);
        assert_eq!(fx.stock(), 0);
    }

    #[test]
    fn insufficient_stock_rejects_the_whole_sale() {
        let fx = setup(5);
        let err = domain_err(
            fx.orchestrator
                .finalize_sale(&fx.sale_cmd(&[6]))
                .unwrap_err(),
        );

        match err {
            DomainError::InsufficientStock {
                requested,
                available,
                ..
            } => {
                assert_eq!(requested, 6);
                assert_eq!(available, 5);
            }
            other => panic!("Expected InsufficientStock, got {other:?}"),
        }
        assert_eq!(fx.stock(), 5);
        assert_eq!(fx.counts(), (0, 0, 0));
    }

    #[test]
    fn lines_for_the_same_product_decrement_cumulatively() {
        let fx = setup(5);
        let err = domain_err(
            fx.orchestrator
                .finalize_sale(&fx.sale_cmd(&[3, 3]))
                .unwrap_err(),
        );
        assert!(matches!(err, DomainError::InsufficientStock { available: 2, .. }));
        assert_eq!(fx.stock(), 5);

        fx.orchestrator.finalize_sale(&fx.sale_cmd(&[2, 3])).unwrap();
        assert_eq!(fx.stock(), 0);
    }

    #[test]
    fn unknown_client_rolls_back_stock() {
        let fx = setup(5);
        let mut cmd = fx.sale_cmd(&[2]);
        cmd.client_id = ClientId::new();

        let err = domain_err(fx.orchestrator.finalize_sale(&cmd).unwrap_err());
        assert!(matches!(err, DomainError::NotFound { entity: "client", .. }));
        assert_eq!(fx.stock(), 5);
        assert_eq!(fx.counts(), (0, 0, 0));
    }

    #[test]
    fn missing_stock_entry_is_not_found() {
        let fx = setup(5);
        let mut cmd = fx.sale_cmd(&[1]);
        cmd.warehouse_id = WarehouseId::new();

        let err = domain_err(fx.orchestrator.finalize_sale(&cmd).unwrap_err());
        assert!(matches!(err, DomainError::NotFound { entity: "stock entry", .. }));
    }

    #[test]
    fn empty_or_non_positive_lines_are_invalid() {
        let fx = setup(5);
        for quantities in [&[][..], &[0][..], &[2, -1][..]] {
            let err = domain_err(
                fx.orchestrator
                    .finalize_sale(&fx.sale_cmd(quantities))
                    .unwrap_err(),
            );
            assert!(matches!(err, DomainError::InvalidArgument(_)));
        }
        assert_eq!(fx.stock(), 5);
    }

    // ---- create_for_sale ----

    #[test]
    fn create_shipment_claims_the_placeholder_in_place() {
        let fx = setup(10);
        let sale = fx.finalize(1);
        let placeholder = fx.shipment_for(*sale.id());

        let shipment = fx
            .orchestrator
            .create_shipment(&CreateShipment {
                sale_id: *sale.id(),
                plan: ShipmentPlan {
                    vehicle_id: Some(*fx.vehicle.id()),
                    address: Some("Jr. Junín 455".to_string()),
                    ship_date: Utc::now().date_naive().succ_opt(),
                    transport_cost: Some(1_200),
                    ..ShipmentPlan::default()
                },
            })
            .unwrap();

        assert_eq!(shipment.id(), placeholder.id());
        assert_eq!(shipment.status(), ShipmentStatus::Pending);
        assert_eq!(shipment.address(), Some("Jr. Junín 455"));
        assert_eq!(fx.order_status(*sale.id()), OrderStatus::Pending);
        assert_eq!(fx.counts().2, 1);

        // No availability check at creation.
        assert_eq!(fx.vehicle_status(*fx.vehicle.id()), VehicleStatus::Available);

        let err = domain_err(
            fx.orchestrator
                .create_shipment(&CreateShipment {
                    sale_id: *sale.id(),
                    plan: ShipmentPlan::default(),
                })
                .unwrap_err(),
        );
        match err {
            DomainError::Conflict(msg) if msg.contains("already has a shipment") => {}
            other => panic!("Expected Conflict, got {other:?}"),
        }
    }

    #[test]
    fn create_shipment_resolves_references() {
        let fx = setup(10);
        let sale = fx.finalize(1);

        let err = domain_err(
            fx.orchestrator
                .create_shipment(&CreateShipment {
                    sale_id: SaleId::new(),
                    plan: ShipmentPlan::default(),
                })
                .unwrap_err(),
        );
        assert!(matches!(err, DomainError::NotFound { entity: "order", .. }));

        let err = domain_err(
            fx.orchestrator
                .create_shipment(&CreateShipment {
                    sale_id: *sale.id(),
                    plan: ShipmentPlan {
                        route_id: Some(RouteId::new()),
                        ..ShipmentPlan::default()
                    },
                })
                .unwrap_err(),
        );
        assert!(matches!(err, DomainError::NotFound { entity: "route", .. }));
        assert!(fx.shipment_for(*sale.id()).is_placeholder());
    }

    // ---- dispatch ----

    #[test]
    fn dispatch_leases_resources_and_moves_order() {
        let fx = setup(10);
        let sale = fx.finalize(1);
        let shipment_id = *fx.shipment_for(*sale.id()).id();

        let shipment = fx
            .orchestrator
            .dispatch_shipment(shipment_id, &fx.dispatch_cmd())
            .unwrap();

        assert_eq!(shipment.status(), ShipmentStatus::InTransit);
        assert_eq!(shipment.ship_date(), Some(Utc::now().date_naive()));
        assert_eq!(shipment.vehicle_id(), Some(*fx.vehicle.id()));
        assert_eq!(shipment.driver_id(), Some(*fx.driver.id()));
        assert_eq!(shipment.route_id(), Some(*fx.route.id()));
        assert_eq!(shipment.notes(), Some("entregar en recepción"));
        assert_eq!(fx.order_status(*sale.id()), OrderStatus::InTransit);
        assert_eq!(fx.vehicle_status(*fx.vehicle.id()), VehicleStatus::InTransit);
        assert_eq!(fx.driver_status(), DriverStatus::InTransit);
    }

    #[test]
    fn dispatch_without_driver_lease_keeps_driver_available() {
        let fx = setup_with_policy(10, DispatchPolicy { lease_driver: false });
        let sale = fx.finalize(1);
        let shipment_id = *fx.shipment_for(*sale.id()).id();

        fx.orchestrator
            .dispatch_shipment(shipment_id, &fx.dispatch_cmd())
            .unwrap();

        assert_eq!(fx.vehicle_status(*fx.vehicle.id()), VehicleStatus::InTransit);
        assert_eq!(fx.driver_status(), DriverStatus::Available);
    }

    #[test]
    fn second_dispatch_is_invalid_state() {
        let fx = setup(10);
        let sale = fx.finalize(1);
        let shipment_id = *fx.shipment_for(*sale.id()).id();
        fx.orchestrator
            .dispatch_shipment(shipment_id, &fx.dispatch_cmd())
            .unwrap();

        let err = domain_err(
            fx.orchestrator
                .dispatch_shipment(shipment_id, &fx.dispatch_cmd())
                .unwrap_err(),
        );
        match err {
            DomainError::InvalidState(msg) if msg.contains("already dispatched") => {}
            other => panic!("Expected InvalidState, got {other:?}"),
        }
    }

    #[test]
    fn busy_vehicle_is_unavailable_and_nothing_changes() {
        let fx = setup(10);
        let first = fx.finalize(1);
        let second = fx.finalize(1);
        fx.orchestrator
            .dispatch_shipment(*fx.shipment_for(*first.id()).id(), &fx.dispatch_cmd())
            .unwrap();

        let other_driver = register_driver(&fx.catalog, "Raúl");
        let pending = fx.shipment_for(*second.id());
        let cmd = DispatchShipment {
            driver_id: *other_driver.id(),
            ..fx.dispatch_cmd()
        };
        let err = domain_err(
            fx.orchestrator
                .dispatch_shipment(*pending.id(), &cmd)
                .unwrap_err(),
        );

        assert!(matches!(err, DomainError::ResourceUnavailable(_)));
        assert_eq!(fx.shipment_for(*second.id()), pending);
        assert_eq!(fx.order_status(*second.id()), OrderStatus::Pending);
        let other_id = *other_driver.id();
        let other_status = fx
            .store
            .read(|uow| Ok(uow.drivers().require(&other_id)?.status()))
            .unwrap();
        assert_eq!(other_status, DriverStatus::Available);
    }

    #[test]
    fn dispatch_preconditions_fail_in_order() {
        let fx = setup(10);
        let first = fx.finalize(1);
        let second = fx.finalize(1);
        let shipment_id = *fx.shipment_for(*second.id()).id();

        // 1. unknown shipment
        let err = domain_err(
            fx.orchestrator
                .dispatch_shipment(ShipmentId::new(), &fx.dispatch_cmd())
                .unwrap_err(),
        );
        assert!(matches!(err, DomainError::NotFound { entity: "shipment", .. }));

        // 3. unknown vehicle wins over an unknown route
        let cmd = DispatchShipment {
            vehicle_id: VehicleId::new(),
            route_id: RouteId::new(),
            ..fx.dispatch_cmd()
        };
        let err = domain_err(fx.orchestrator.dispatch_shipment(shipment_id, &cmd).unwrap_err());
        assert!(matches!(err, DomainError::NotFound { entity: "vehicle", .. }));

        // 4. busy driver wins over an unknown route
        fx.orchestrator
            .dispatch_shipment(*fx.shipment_for(*first.id()).id(), &fx.dispatch_cmd())
            .unwrap();
        let spare_vehicle = register_vehicle(&fx.catalog, "SPR-001");
        let cmd = DispatchShipment {
            vehicle_id: *spare_vehicle.id(),
            route_id: RouteId::new(),
            ..fx.dispatch_cmd()
        };
        let err = domain_err(fx.orchestrator.dispatch_shipment(shipment_id, &cmd).unwrap_err());
        match err {
            DomainError::ResourceUnavailable(msg) if msg.starts_with("driver") => {}
            other => panic!("Expected driver ResourceUnavailable, got {other:?}"),
        }

        // 5. unknown route
        let spare_driver = register_driver(&fx.catalog, "Ana");
        let cmd = DispatchShipment {
            vehicle_id: *spare_vehicle.id(),
            driver_id: *spare_driver.id(),
            route_id: RouteId::new(),
            notes: None,
        };
        let err = domain_err(fx.orchestrator.dispatch_shipment(shipment_id, &cmd).unwrap_err());
        assert!(matches!(err, DomainError::NotFound { entity: "route", .. }));
        assert_eq!(fx.vehicle_status(*spare_vehicle.id()), VehicleStatus::Available);
    }

    // ---- update ----

    #[test]
    fn update_with_unknown_status_changes_nothing() {
        let fx = setup(10);
        let sale = fx.finalize(1);
        let before = fx.shipment_for(*sale.id());

        let err = domain_err(
            fx.orchestrator
                .update_shipment(
                    *before.id(),
                    &ShipmentPatch {
                        address: Some("otra dirección".to_string()),
                        status: Some("LOST".to_string()),
                        ..ShipmentPatch::default()
                    },
                )
                .unwrap_err(),
        );
        assert!(matches!(err, DomainError::InvalidArgument(_)));
        assert_eq!(fx.shipment_for(*sale.id()), before);
    }

    #[test]
    fn empty_update_is_a_no_op() {
        let fx = setup(10);
        let sale = fx.finalize(1);
        let before = fx.shipment_for(*sale.id());

        let after = fx
            .orchestrator
            .update_shipment(*before.id(), &ShipmentPatch::default())
            .unwrap();
        assert_eq!(after, before);
        assert_eq!(fx.shipment_for(*sale.id()).version(), before.version());
    }

    #[test]
    fn update_does_not_touch_order_or_leases() {
        let fx = setup(10);
        let sale = fx.finalize(1);
        let shipment_id = *fx.shipment_for(*sale.id()).id();
        fx.orchestrator
            .dispatch_shipment(shipment_id, &fx.dispatch_cmd())
            .unwrap();

        let updated = fx
            .orchestrator
            .update_shipment(
                shipment_id,
                &ShipmentPatch {
                    status: Some("DELIVERED".to_string()),
                    delivery_date: Some(Utc::now().date_naive()),
                    ..ShipmentPatch::default()
                },
            )
            .unwrap();

        assert_eq!(updated.status(), ShipmentStatus::Delivered);
        assert_eq!(updated.notes(), Some("entregar en recepción"));
        assert_eq!(fx.order_status(*sale.id()), OrderStatus::InTransit);
        assert_eq!(fx.vehicle_status(*fx.vehicle.id()), VehicleStatus::InTransit);

        let err = domain_err(
            fx.orchestrator
                .update_shipment(
                    shipment_id,
                    &ShipmentPatch {
                        vehicle_id: Some(VehicleId::new()),
                        ..ShipmentPatch::default()
                    },
                )
                .unwrap_err(),
        );
        assert!(matches!(err, DomainError::NotFound { entity: "vehicle", .. }));
    }

    // ---- release ----

    #[test]
    fn release_returns_resources_only_for_closed_shipments() {
        let fx = setup(10);
        let sale = fx.finalize(1);
        let shipment_id = *fx.shipment_for(*sale.id()).id();
        fx.orchestrator
            .dispatch_shipment(shipment_id, &fx.dispatch_cmd())
            .unwrap();

        let err = domain_err(fx.orchestrator.release_shipment(shipment_id).unwrap_err());
        assert!(matches!(err, DomainError::InvalidState(_)));
        assert_eq!(fx.vehicle_status(*fx.vehicle.id()), VehicleStatus::InTransit);

        fx.orchestrator
            .update_shipment(
                shipment_id,
                &ShipmentPatch {
                    status: Some("DELIVERED".to_string()),
                    ..ShipmentPatch::default()
                },
            )
            .unwrap();
        let released = fx.orchestrator.release_shipment(shipment_id).unwrap();

        assert_eq!(released.status(), ShipmentStatus::Delivered);
        assert_eq!(fx.vehicle_status(*fx.vehicle.id()), VehicleStatus::Available);
        assert_eq!(fx.driver_status(), DriverStatus::Available);

        // The vehicle can be leased again.
        let next = fx.finalize(1);
        fx.orchestrator
            .dispatch_shipment(*fx.shipment_for(*next.id()).id(), &fx.dispatch_cmd())
            .unwrap();
    }

    fn mark_delivered(fx: &Fixture, shipment_id: ShipmentId) {
        fx.orchestrator
            .update_shipment(
                shipment_id,
                &ShipmentPatch {
                    status: Some("DELIVERED".to_string()),
                    ..ShipmentPatch::default()
                },
            )
            .unwrap();
    }

    #[test]
    fn repeated_release_keeps_resources_leased_by_the_next_shipment() {
        let fx = setup(10);
        let first = *fx.shipment_for(*fx.finalize(1).id()).id();
        fx.orchestrator
            .dispatch_shipment(first, &fx.dispatch_cmd())
            .unwrap();
        mark_delivered(&fx, first);
        fx.orchestrator.release_shipment(first).unwrap();

        let second = *fx.shipment_for(*fx.finalize(1).id()).id();
        fx.orchestrator
            .dispatch_shipment(second, &fx.dispatch_cmd())
            .unwrap();

        fx.orchestrator.release_shipment(first).unwrap();
        assert_eq!(fx.vehicle_status(*fx.vehicle.id()), VehicleStatus::InTransit);
        assert_eq!(fx.driver_status(), DriverStatus::InTransit);

        let third = *fx.shipment_for(*fx.finalize(1).id()).id();
        let err = domain_err(
            fx.orchestrator
                .dispatch_shipment(third, &fx.dispatch_cmd())
                .unwrap_err(),
        );
        assert!(matches!(err, DomainError::ResourceUnavailable(_)));
    }

    #[test]
    fn release_after_reassignment_keeps_resources_of_another_shipment() {
        let fx = setup(10);
        let first = *fx.shipment_for(*fx.finalize(1).id()).id();
        fx.orchestrator
            .dispatch_shipment(first, &fx.dispatch_cmd())
            .unwrap();
        mark_delivered(&fx, first);
        fx.orchestrator.release_shipment(first).unwrap();

        let truck = register_vehicle(&fx.catalog, "TRK-900");
        let courier = register_driver(&fx.catalog, "Mario");
        let second = *fx.shipment_for(*fx.finalize(1).id()).id();
        let busy = DispatchShipment {
            vehicle_id: *truck.id(),
            driver_id: *courier.id(),
            ..fx.dispatch_cmd()
        };
        fx.orchestrator.dispatch_shipment(second, &busy).unwrap();

        fx.orchestrator
            .update_shipment(
                first,
                &ShipmentPatch {
                    vehicle_id: Some(*truck.id()),
                    driver_id: Some(*courier.id()),
                    ..ShipmentPatch::default()
                },
            )
            .unwrap();
        fx.orchestrator.release_shipment(first).unwrap();

        let courier_id = *courier.id();
        let courier_status = fx
            .store
            .read(|uow| Ok(uow.drivers().require(&courier_id)?.status()))
            .unwrap();
        assert_eq!(fx.vehicle_status(*truck.id()), VehicleStatus::InTransit);
        assert_eq!(courier_status, DriverStatus::InTransit);

        let third = *fx.shipment_for(*fx.finalize(1).id()).id();
        let err = domain_err(fx.orchestrator.dispatch_shipment(third, &busy).unwrap_err());
        assert!(matches!(err, DomainError::ResourceUnavailable(_)));
    }

    // ---- read views ----

    #[test]
    fn shipment_list_joins_labels() {
        let fx = setup(10);
        let sale = fx.finalize(2);
        let undispatched = fx.finalize(1);
        let shipment_id = *fx.shipment_for(*sale.id()).id();
        fx.orchestrator
            .dispatch_shipment(shipment_id, &fx.dispatch_cmd())
            .unwrap();

        let views = fx.orchestrator.list_shipments().unwrap();
        assert_eq!(views.len(), 2);

        let dispatched = views.iter().find(|v| v.shipment_id == shipment_id).unwrap();
        assert_eq!(dispatched.order_total, Some(sale.total()));
        assert_eq!(dispatched.client_name.as_deref(), Some("Lucía Paredes Vega"));
        assert_eq!(dispatched.vehicle_plate.as_deref(), Some("ABC-123"));
        assert_eq!(dispatched.driver_name.as_deref(), Some("Pedro Ramos"));
        assert_eq!(dispatched.route_name.as_deref(), Some("Lima Sur"));

        let bare_id = *fx.shipment_for(*undispatched.id()).id();
        let bare = views.iter().find(|v| v.shipment_id == bare_id).unwrap();
        assert_eq!(bare.vehicle_plate, None);
        assert_eq!(bare.driver_name, None);
        assert_eq!(bare.route_name, None);
    }

    #[test]
    fn pending_and_available_orders() {
        let fx = setup(10);
        let untouched = fx.finalize(1);
        let scheduled = fx.finalize(1);
        let dispatched = fx.finalize(1);

        fx.orchestrator
            .create_shipment(&CreateShipment {
                sale_id: *scheduled.id(),
                plan: ShipmentPlan {
                    ship_date: Utc::now().date_naive().succ_opt(),
                    ..ShipmentPlan::default()
                },
            })
            .unwrap();
        fx.orchestrator
            .dispatch_shipment(*fx.shipment_for(*dispatched.id()).id(), &fx.dispatch_cmd())
            .unwrap();

        let pending: Vec<SaleId> = fx
            .orchestrator
            .pending_orders()
            .unwrap()
            .into_iter()
            .map(|o| o.sale_id)
            .collect();
        assert_eq!(pending.len(), 2);
        assert!(pending.contains(untouched.id()));
        assert!(pending.contains(scheduled.id()));

        let available = fx.orchestrator.available_orders().unwrap();
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].sale_id, *untouched.id());
        assert!(available[0].has_shipment);
        assert_eq!(available[0].shipment_status, Some(ShipmentStatus::Pending));
        assert_eq!(available[0].client_name.as_deref(), Some("Lucía Paredes Vega"));
    }

    #[test]
    fn sale_details_include_product_labels() {
        let fx = setup(10);
        let sale = fx.finalize(2);

        let view = fx.orchestrator.sale_details(*sale.id()).unwrap();
        assert_eq!(view.lines.len(), 1);
        assert_eq!(view.lines[0].product_name.as_deref(), Some("Aceite 1L"));
        assert_eq!(fx.orchestrator.list_sales().unwrap().len(), 1);

        let err = domain_err(fx.orchestrator.sale_details(SaleId::new()).unwrap_err());
        assert!(matches!(err, DomainError::NotFound { entity: "sale", .. }));
    }

    // ---- catalog ----

    #[test]
    fn duplicate_plate_is_a_conflict() {
        let fx = setup(1);
        let err = domain_err(
            fx.catalog
                .register_vehicle(&RegisterVehicle {
                    plate: "abc-123".to_string(),
                    brand: None,
                    model: None,
                    capacity_kg: None,
                })
                .unwrap_err(),
        );
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn set_stock_upserts_and_lists_filter_by_status() {
        let fx = setup(1);
        fx.catalog
            .set_stock(&SetStock {
                product_id: *fx.product.id(),
                warehouse_id: fx.warehouse_id,
                quantity: 40,
            })
            .unwrap();
        assert_eq!(fx.stock(), 40);

        let sale = fx.finalize(1);
        fx.orchestrator
            .dispatch_shipment(*fx.shipment_for(*sale.id()).id(), &fx.dispatch_cmd())
            .unwrap();
        register_vehicle(&fx.catalog, "NEW-777");

        let available = fx
            .catalog
            .list_vehicles(Some(VehicleStatus::Available))
            .unwrap();
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].plate(), "NEW-777");
        assert_eq!(fx.catalog.list_vehicles(None).unwrap().len(), 2);
        assert!(fx
            .catalog
            .list_drivers(Some(DriverStatus::Available))
            .unwrap()
            .is_empty());
    }

    // ---- races ----

    #[test]
    fn concurrent_dispatch_of_one_shipment_has_one_winner() {
        let fx = setup(10);
        let sale = fx.finalize(1);
        let shipment_id = *fx.shipment_for(*sale.id()).id();
        let spare_vehicle = register_vehicle(&fx.catalog, "RAC-002");
        let spare_driver = register_driver(&fx.catalog, "Iván");
        let commands = [
            fx.dispatch_cmd(),
            DispatchShipment {
                vehicle_id: *spare_vehicle.id(),
                driver_id: *spare_driver.id(),
                ..fx.dispatch_cmd()
            },
        ];

        let orchestrator = &fx.orchestrator;
        let results: Vec<_> = std::thread::scope(|s| {
            let handles: Vec<_> = commands
                .iter()
                .map(|cmd| s.spawn(move || orchestrator.dispatch_shipment(shipment_id, cmd)))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        let loser = results.into_iter().find_map(Result::err).unwrap();
        assert!(matches!(domain_err(loser), DomainError::InvalidState(_)));
    }

    #[test]
    fn concurrent_dispatch_for_one_vehicle_has_one_winner() {
        let fx = setup(10);
        let a = fx.finalize(1);
        let b = fx.finalize(1);
        let other_driver = register_driver(&fx.catalog, "Nora");
        let jobs = [
            (*fx.shipment_for(*a.id()).id(), fx.dispatch_cmd()),
            (
                *fx.shipment_for(*b.id()).id(),
                DispatchShipment {
                    driver_id: *other_driver.id(),
                    ..fx.dispatch_cmd()
                },
            ),
        ];

        let orchestrator = &fx.orchestrator;
        let results: Vec<_> = std::thread::scope(|s| {
            let handles: Vec<_> = jobs
                .iter()
                .map(|(id, cmd)| s.spawn(move || orchestrator.dispatch_shipment(*id, cmd)))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        let loser = results.into_iter().find_map(Result::err).unwrap();
        assert!(matches!(domain_err(loser), DomainError::ResourceUnavailable(_)));
    }

    #[test]
    fn concurrent_sales_for_the_last_unit_have_one_winner() {
        let fx = setup(1);
        let commands = [fx.sale_cmd(&[1]), fx.sale_cmd(&[1])];

        let orchestrator = &fx.orchestrator;
        let results: Vec<_> = std::thread::scope(|s| {
            let handles: Vec<_> = commands
                .iter()
                .map(|cmd| s.spawn(move || orchestrator.finalize_sale(cmd)))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        let loser = results.into_iter().find_map(Result::err).unwrap();
        assert!(matches!(
            domain_err(loser),
            DomainError::InsufficientStock { .. }
        ));
        assert_eq!(fx.stock(), 0);
        assert_eq!(fx.counts(), (1, 1, 1));
    }
}
