use std::collections::HashMap;

use chrono::{DateTime, Utc};

use super::{DestinationResolver, TripRepository};
use crate::error::RepositoryError;
use crate::trip::{DestinationId, Trip, TripId, TripRef, VehicleId};

/// Trip log held in memory.
///
/// Lookups honour the same window and ordering contract a database-backed
/// repository must provide, which makes this store usable both in tests and
/// for replaying exported trip logs.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTripStore {
    trips: HashMap<TripId, Trip>,
    destination_names: HashMap<DestinationId, String>,
}

impl InMemoryTripStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_trips(trips: impl IntoIterator<Item = Trip>) -> Self {
        let mut store = Self::new();
        for trip in trips {
            store.insert(trip);
        }
        store
    }

    /// Insert or replace a trip.
    pub fn insert(&mut self, trip: Trip) {
        self.trips.insert(trip.id.clone(), trip);
    }

    pub fn remove(&mut self, id: &TripId) -> Option<Trip> {
        self.trips.remove(id)
    }

    pub fn name_destination(&mut self, id: impl Into<String>, name: impl Into<String>) {
        self.destination_names
            .insert(DestinationId::new(id), name.into());
    }

    pub fn len(&self) -> usize {
        self.trips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }
}

impl TripRepository for InMemoryTripStore {
    fn trip_by_id(&self, id: &TripId) -> Result<Trip, RepositoryError> {
        self.trips
            .get(id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound {
                trip_id: id.clone(),
            })
    }

    fn trips_by_vehicle_in_window(
        &self,
        vehicle_id: &VehicleId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude_id: &TripId,
    ) -> Result<Vec<Trip>, RepositoryError> {
        let mut found: Vec<Trip> = self
            .trips
            .values()
            .filter(|trip| {
                &trip.vehicle.id == vehicle_id
                    && &trip.id != exclude_id
                    && trip.trip_start_date >= start
                    && trip.trip_start_date <= end
            })
            .cloned()
            .collect();
        found.sort_by(|a, b| {
            a.trip_start_date
                .cmp(&b.trip_start_date)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(found)
    }

    fn recent_trips(
        &self,
        since: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<TripRef>, RepositoryError> {
        let mut refs: Vec<TripRef> = self
            .trips
            .values()
            .filter(|trip| trip.trip_start_date >= since)
            .map(Trip::trip_ref)
            .collect();
        refs.sort_by(|a, b| {
            b.trip_start_date
                .cmp(&a.trip_start_date)
                .then_with(|| a.id.cmp(&b.id))
        });
        refs.truncate(limit);
        Ok(refs)
    }
}

impl DestinationResolver for InMemoryTripStore {
    fn resolve_names(&self, ids: &[DestinationId]) -> Result<Vec<String>, RepositoryError> {
        Ok(ids
            .iter()
            .filter_map(|id| self.destination_names.get(id).cloned())
            .collect())
    }
}
