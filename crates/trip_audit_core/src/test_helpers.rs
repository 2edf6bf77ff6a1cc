//! Test helpers for common trip fixtures.
//!
//! Shared by unit tests, integration tests and benchmarks so every suite
//! builds trips the same way.

use std::sync::Mutex;

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::analysis::ReturnTripAnalysis;
use crate::audit::AuditLogger;
use crate::error::AuditError;
use crate::issues::ReturnTripIssue;
use crate::trip::{DestinationId, Trip, TripId, VehicleId, VehicleRef};

/// Fixed reference instant used across test files: 2024-03-04 08:00 UTC.
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 4, 8, 0, 0)
        .single()
        .expect("base time should be a valid UTC instant")
}

/// Builder for [`Trip`] fixtures.
///
/// Defaults: 30 km one-way trip starting at [`base_time`] and lasting one
/// hour, to a single `depot` destination, with no fuel data.
#[derive(Debug, Clone)]
pub struct TripBuilder {
    trip: Trip,
}

impl TripBuilder {
    pub fn new(id: &str, vehicle_id: &str) -> Self {
        let start = base_time();
        Self {
            trip: Trip {
                id: TripId::new(id),
                vehicle: VehicleRef {
                    id: VehicleId::new(vehicle_id),
                    registration: Some(format!("REG-{}", vehicle_id.to_uppercase())),
                },
                serial_number: format!("T-{}", id.to_uppercase()),
                trip_start_date: start,
                trip_end_date: start + Duration::hours(1),
                start_km: 0.0,
                end_km: 30.0,
                is_return_trip: false,
                destinations: vec![DestinationId::new("depot")],
                fuel_quantity: None,
                calculated_kmpl: None,
            },
        }
    }

    pub fn serial(mut self, serial_number: &str) -> Self {
        self.trip.serial_number = serial_number.to_string();
        self
    }

    pub fn registration(mut self, registration: Option<&str>) -> Self {
        self.trip.vehicle.registration = registration.map(str::to_string);
        self
    }

    pub fn odometer(mut self, start_km: f64, end_km: f64) -> Self {
        self.trip.start_km = start_km;
        self.trip.end_km = end_km;
        self
    }

    pub fn window(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.trip.trip_start_date = start;
        self.trip.trip_end_date = end;
        self
    }

    /// Start `offset` after [`base_time`] and last `duration`.
    pub fn starting_after(self, offset: Duration, duration: Duration) -> Self {
        let start = base_time() + offset;
        self.window(start, start + duration)
    }

    pub fn destinations(mut self, ids: &[&str]) -> Self {
        self.trip.destinations = ids.iter().map(|id| DestinationId::new(*id)).collect();
        self
    }

    pub fn fuel(mut self, litres: f64) -> Self {
        self.trip.fuel_quantity = Some(litres);
        self
    }

    pub fn kmpl(mut self, kmpl: f64) -> Self {
        self.trip.calculated_kmpl = Some(kmpl);
        self
    }

    pub fn round_trip(mut self) -> Self {
        self.trip.is_return_trip = true;
        self
    }

    pub fn build(self) -> Trip {
        self.trip
    }
}

/// Audit sink that keeps every record, optionally rejecting them afterwards.
#[derive(Debug, Default)]
pub struct RecordingAuditLogger {
    records: Mutex<Vec<(TripId, usize)>>,
    reject: bool,
}

impl RecordingAuditLogger {
    /// Records every call, then reports failure.
    pub fn rejecting() -> Self {
        Self {
            reject: true,
            ..Self::default()
        }
    }

    /// `(trip_id, issue_count)` per call, in call order.
    pub fn records(&self) -> Vec<(TripId, usize)> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }
}

impl AuditLogger for RecordingAuditLogger {
    fn log_return_trip_validation(
        &self,
        trip_id: &TripId,
        _analysis: &ReturnTripAnalysis,
        issues: &[ReturnTripIssue],
    ) -> Result<(), AuditError> {
        if let Ok(mut records) = self.records.lock() {
            records.push((trip_id.clone(), issues.len()));
        }
        if self.reject {
            return Err(AuditError::Rejected("audit store is read-only".to_string()));
        }
        Ok(())
    }
}

/// Install a `tracing` fmt subscriber honouring `RUST_LOG`. Safe to call from
/// several tests; only the first call takes effect.
#[cfg(feature = "test-helpers")]
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
