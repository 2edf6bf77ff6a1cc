use std::sync::Arc;

use chrono::Duration;
use trip_audit_core::analysis::ReturnTripValidator;
use trip_audit_core::clock::FixedClock;
use trip_audit_core::repository::InMemoryTripStore;
use trip_audit_core::test_helpers::{base_time, TripBuilder};
use trip_audit_core::trip::Trip;

use super::repository::ScriptedTripStore;

/// Reference "now" for fleet tests: two days after the fixtures' base time.
pub fn fleet_now() -> chrono::DateTime<chrono::Utc> {
    base_time() + Duration::days(2)
}

/// Store with the depot/quarry/plant destination names registered.
pub fn named_store(trips: impl IntoIterator<Item = Trip>) -> InMemoryTripStore {
    let mut store = InMemoryTripStore::with_trips(trips);
    store.name_destination("depot", "Central Depot");
    store.name_destination("quarry", "North Quarry");
    store.name_destination("plant", "Cement Plant");
    store
}

pub fn validator_for(store: InMemoryTripStore) -> ReturnTripValidator {
    let store = Arc::new(store);
    ReturnTripValidator::new(store.clone(), store).with_clock(Arc::new(FixedClock(fleet_now())))
}

pub fn scripted_validator(store: ScriptedTripStore) -> (Arc<ScriptedTripStore>, ReturnTripValidator) {
    let store = Arc::new(store);
    let validator = ReturnTripValidator::new(store.clone(), store.clone())
        .with_clock(Arc::new(FixedClock(fleet_now())));
    (store, validator)
}

/// Outbound 1000 → 1300 km on 40 L, ending six hours after base time.
pub fn scenario_a_outbound() -> Trip {
    TripBuilder::new("a-out", "truck-7")
        .serial("T-0100")
        .odometer(1000.0, 1300.0)
        .fuel(40.0)
        .starting_after(Duration::zero(), Duration::hours(6))
        .destinations(&["depot", "quarry"])
        .build()
}

/// Return leg of scenario A: 300 km on 55 L, leaving ten hours after arrival.
pub fn scenario_a_return() -> Trip {
    TripBuilder::new("a-ret", "truck-7")
        .serial("T-0101")
        .odometer(1300.0, 1600.0)
        .fuel(55.0)
        .starting_after(Duration::hours(16), Duration::hours(6))
        .destinations(&["quarry", "depot"])
        .build()
}

/// One-way 120 km trip lasting ten hours with no return leg.
pub fn scenario_b_outbound() -> Trip {
    TripBuilder::new("b-out", "truck-8")
        .serial("T-0200")
        .odometer(5000.0, 5120.0)
        .starting_after(Duration::hours(1), Duration::hours(10))
        .destinations(&["plant"])
        .build()
}

/// Self-flagged round trip covering only 15 km.
pub fn scenario_c_round_trip() -> Trip {
    TripBuilder::new("c-rt", "van-2")
        .serial("T-0300")
        .odometer(800.0, 815.0)
        .starting_after(Duration::hours(2), Duration::hours(1))
        .destinations(&["depot"])
        .round_trip()
        .build()
}

/// A fleet of `count` one-way trips on distinct vehicles, alternating
/// between short legitimate trips and long trips lacking a return leg.
pub fn one_way_fleet(count: usize) -> Vec<Trip> {
    (0..count)
        .map(|i| {
            let distance = if i % 2 == 0 { 20.0 } else { 90.0 };
            TripBuilder::new(&format!("trip-{i:03}"), &format!("veh-{i:03}"))
                .odometer(0.0, distance)
                .starting_after(Duration::minutes(i as i64), Duration::hours(1))
                .destinations(&["depot"])
                .build()
        })
        .collect()
}
