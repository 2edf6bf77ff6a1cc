//! Trip records as read from the fleet's trip log.
//!
//! Trips are owned by the persistence layer; the validation engine only ever
//! reads them. Distances are odometer deltas in kilometres and durations are
//! fractional hours.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Persistent identifier of a trip record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TripId(pub String);

impl TripId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TripId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Persistent identifier of a vehicle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VehicleId(pub String);

impl VehicleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a destination (depot, customer site, city).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DestinationId(pub String);

impl DestinationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

/// Vehicle a trip was driven with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleRef {
    pub id: VehicleId,
    /// Registration plate, when the vehicle record carries one.
    #[serde(default)]
    pub registration: Option<String>,
}

/// A persisted trip record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub id: TripId,
    pub vehicle: VehicleRef,
    /// Human-readable trip label, e.g. `T-2024-0042`.
    pub serial_number: String,
    pub trip_start_date: DateTime<Utc>,
    pub trip_end_date: DateTime<Utc>,
    pub start_km: f64,
    pub end_km: f64,
    /// The record covers both the outbound and the return leg.
    #[serde(default)]
    pub is_return_trip: bool,
    #[serde(default)]
    pub destinations: Vec<DestinationId>,
    /// Fuel consumed, in litres.
    #[serde(default)]
    pub fuel_quantity: Option<f64>,
    /// Stored fuel efficiency in km per litre.
    #[serde(default)]
    pub calculated_kmpl: Option<f64>,
}

impl Trip {
    /// Odometer delta in kilometres.
    pub fn distance_km(&self) -> f64 {
        self.end_km - self.start_km
    }

    /// Elapsed time between trip start and end, in hours.
    pub fn duration_hours(&self) -> f64 {
        hours_between(self.trip_start_date, self.trip_end_date)
    }

    /// Fuel quantity only when it is strictly positive.
    pub fn reported_fuel(&self) -> Option<f64> {
        self.fuel_quantity.filter(|fuel| *fuel > 0.0)
    }

    /// True when both trips share at least one destination.
    ///
    /// This is a deliberately loose "same route" proxy: it ignores the order
    /// and direction of the destination lists.
    pub fn shares_destination_with(&self, other: &Trip) -> bool {
        let own: HashSet<&DestinationId> = self.destinations.iter().collect();
        other.destinations.iter().any(|d| own.contains(d))
    }

    pub fn trip_ref(&self) -> TripRef {
        TripRef {
            id: self.id.clone(),
            trip_start_date: self.trip_start_date,
        }
    }
}

/// Lightweight handle returned by trip listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripRef {
    pub id: TripId,
    pub trip_start_date: DateTime<Utc>,
}

/// Signed elapsed hours from `from` to `to`.
pub fn hours_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_seconds() as f64 / SECONDS_PER_HOUR
}
