//! Audit-trail sink notified after each single-trip validation.
//!
//! The validator treats the sink as fire-and-forget: a failed audit write is
//! logged and never changes the analysis handed back to the caller.

use tracing::info;

use crate::analysis::ReturnTripAnalysis;
use crate::error::AuditError;
use crate::issues::ReturnTripIssue;
use crate::trip::TripId;

pub trait AuditLogger: Send + Sync {
    fn log_return_trip_validation(
        &self,
        trip_id: &TripId,
        analysis: &ReturnTripAnalysis,
        issues: &[ReturnTripIssue],
    ) -> Result<(), AuditError>;
}

/// Discards every record.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopAuditLogger;

impl AuditLogger for NoopAuditLogger {
    fn log_return_trip_validation(
        &self,
        _trip_id: &TripId,
        _analysis: &ReturnTripAnalysis,
        _issues: &[ReturnTripIssue],
    ) -> Result<(), AuditError> {
        Ok(())
    }
}

/// Emits one structured `tracing` event per validation under the
/// `trip_audit::audit` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAuditLogger;

impl AuditLogger for TracingAuditLogger {
    fn log_return_trip_validation(
        &self,
        trip_id: &TripId,
        analysis: &ReturnTripAnalysis,
        issues: &[ReturnTripIssue],
    ) -> Result<(), AuditError> {
        let highest = issues
            .iter()
            .map(|issue| issue.severity)
            .max()
            .map(|severity| severity.as_str())
            .unwrap_or("none");
        info!(
            target: "trip_audit::audit",
            trip_id = %trip_id,
            vehicle_id = %analysis.vehicle_id,
            has_return_trip = analysis.has_return_trip,
            is_round_trip = analysis.is_round_trip,
            issue_count = issues.len(),
            highest_severity = highest,
            "return trip validated"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::ReturnTripValidator;
    use crate::repository::InMemoryTripStore;
    use crate::test_helpers::TripBuilder;
    use std::sync::Arc;

    fn analysed() -> ReturnTripAnalysis {
        let trip = TripBuilder::new("t1", "v1").odometer(0.0, 80.0).build();
        let store = Arc::new(InMemoryTripStore::with_trips([trip.clone()]));
        ReturnTripValidator::new(store.clone(), store).analyze_trip(&trip)
    }

    #[test]
    fn builtin_sinks_accept_every_record() {
        let analysis = analysed();
        assert_eq!(analysis.issues.len(), 1);

        let trip_id = TripId::new("t1");
        assert!(NoopAuditLogger
            .log_return_trip_validation(&trip_id, &analysis, &analysis.issues)
            .is_ok());
        assert!(TracingAuditLogger
            .log_return_trip_validation(&trip_id, &analysis, &analysis.issues)
            .is_ok());
        assert!(TracingAuditLogger
            .log_return_trip_validation(&trip_id, &analysis, &[])
            .is_ok());
    }

    #[test]
    fn tracing_sink_plugs_into_the_validator() {
        let trip = TripBuilder::new("t1", "v1").odometer(0.0, 80.0).build();
        let store = Arc::new(InMemoryTripStore::with_trips([trip]));
        let validator = ReturnTripValidator::new(store.clone(), store)
            .with_audit_logger(Arc::new(TracingAuditLogger));

        let analysis = validator
            .validate_return_trip(&TripId::new("t1"))
            .expect("analysis");
        assert_eq!(analysis, analysed());
    }
}
