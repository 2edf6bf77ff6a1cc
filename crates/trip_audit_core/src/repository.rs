//! Persistence seams: the trip log and destination-name lookups.
//!
//! Two implementations ship with the crate:
//!
//! - **`InMemoryTripStore`**: an in-process trip log plus destination table.
//! - **`CachedDestinationResolver`**: LRU decorator over any resolver.
//!
//! Production deployments implement [`TripRepository`] and
//! [`DestinationResolver`] over their own database client.

pub mod cached;
pub mod memory;

use chrono::{DateTime, Utc};

use crate::error::RepositoryError;
use crate::trip::{DestinationId, Trip, TripId, TripRef, VehicleId};

pub use cached::CachedDestinationResolver;
pub use memory::InMemoryTripStore;

/// Read access to the fleet's trip log. Implementations must be `Send + Sync`
/// so a validator can be shared with aggregation workers.
pub trait TripRepository: Send + Sync {
    /// Fetch one trip. Returns [`RepositoryError::NotFound`] when absent.
    fn trip_by_id(&self, id: &TripId) -> Result<Trip, RepositoryError>;

    /// Trips of `vehicle_id` starting within `[start, end]`, excluding
    /// `exclude_id`, ordered by start time ascending.
    fn trips_by_vehicle_in_window(
        &self,
        vehicle_id: &VehicleId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude_id: &TripId,
    ) -> Result<Vec<Trip>, RepositoryError>;

    /// Trips starting at or after `since`, most recent first, at most `limit`.
    fn recent_trips(
        &self,
        since: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<TripRef>, RepositoryError>;
}

/// Maps destination identifiers to display names.
pub trait DestinationResolver: Send + Sync {
    /// Names in the same order as `ids`. Unknown ids may be skipped.
    fn resolve_names(&self, ids: &[DestinationId]) -> Result<Vec<String>, RepositoryError>;
}
