use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, Utc};
use trip_audit_core::repository::{DestinationResolver, InMemoryTripStore, TripRepository};
use trip_audit_core::trip::{DestinationId, Trip, TripId, TripRef, VehicleId};
use trip_audit_core::RepositoryError;

/// In-memory store with scripted failures for exercising error paths.
#[derive(Debug, Default)]
pub struct ScriptedTripStore {
    pub inner: InMemoryTripStore,
    pub fail_listing: bool,
    pub fail_window_search: bool,
    pub fail_destinations: bool,
    pub unreadable_trips: HashSet<TripId>,
    pub window_queries: AtomicUsize,
}

impl ScriptedTripStore {
    pub fn new(inner: InMemoryTripStore) -> Self {
        Self {
            inner,
            ..Self::default()
        }
    }

    pub fn failing_listing(mut self) -> Self {
        self.fail_listing = true;
        self
    }

    pub fn failing_window_search(mut self) -> Self {
        self.fail_window_search = true;
        self
    }

    pub fn failing_destinations(mut self) -> Self {
        self.fail_destinations = true;
        self
    }

    pub fn unreadable(mut self, id: &str) -> Self {
        self.unreadable_trips.insert(TripId::new(id));
        self
    }

    pub fn window_query_count(&self) -> usize {
        self.window_queries.load(Ordering::SeqCst)
    }
}

impl TripRepository for ScriptedTripStore {
    fn trip_by_id(&self, id: &TripId) -> Result<Trip, RepositoryError> {
        if self.unreadable_trips.contains(id) {
            return Err(RepositoryError::query("trip_by_id", "row decode failed"));
        }
        self.inner.trip_by_id(id)
    }

    fn trips_by_vehicle_in_window(
        &self,
        vehicle_id: &VehicleId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude_id: &TripId,
    ) -> Result<Vec<Trip>, RepositoryError> {
        self.window_queries.fetch_add(1, Ordering::SeqCst);
        if self.fail_window_search {
            return Err(RepositoryError::Unavailable("replica lagging".to_string()));
        }
        self.inner
            .trips_by_vehicle_in_window(vehicle_id, start, end, exclude_id)
    }

    fn recent_trips(
        &self,
        since: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<TripRef>, RepositoryError> {
        if self.fail_listing {
            return Err(RepositoryError::query("recent_trips", "statement timeout"));
        }
        self.inner.recent_trips(since, limit)
    }
}

impl DestinationResolver for ScriptedTripStore {
    fn resolve_names(&self, ids: &[DestinationId]) -> Result<Vec<String>, RepositoryError> {
        if self.fail_destinations {
            return Err(RepositoryError::Unavailable("names service down".to_string()));
        }
        self.inner.resolve_names(ids)
    }
}
