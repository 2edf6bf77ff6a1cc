//! Single-trip validation pipeline.
//!
//! [`ReturnTripValidator`] ties the collaborators together: it fetches the
//! subject trip, resolves a route description, searches for return legs and
//! runs whichever checks apply:
//!
//! | subject trip | checks |
//! |---|---|
//! | self-flagged round trip | [`check_round_trip`] |
//! | outbound with return candidates | [`check_pair`] against every candidate |
//! | outbound without candidates | [`check_missing_return`] |
//!
//! The validator holds no mutable state; every call re-reads the trip log.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info_span, warn};

use crate::audit::{AuditLogger, NoopAuditLogger};
use crate::checks::{check_missing_return, check_pair, check_round_trip};
use crate::clock::{Clock, SystemClock};
use crate::config::ValidationConfig;
use crate::issues::{IssueContext, ReturnTripIssue};
use crate::matching::{find_return_candidates, DestinationOverlapMatching, ReturnMatcher};
use crate::metrics::{one_way_metrics, pair_metrics, round_trip_metrics, ReturnTripMetrics};
use crate::repository::{DestinationResolver, TripRepository};
use crate::trip::{Trip, TripId, VehicleId};

/// Route description used when destination names cannot be resolved.
pub const UNKNOWN_ROUTE: &str = "Unknown route";

const ROUTE_SEPARATOR: &str = " → ";

/// Per-trip validation result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnTripAnalysis {
    pub trip_id: TripId,
    pub vehicle_id: VehicleId,
    pub vehicle_registration: Option<String>,
    /// A round-trip record, or at least one matched return leg.
    pub has_return_trip: bool,
    pub is_round_trip: bool,
    pub issues: Vec<ReturnTripIssue>,
    pub metrics: ReturnTripMetrics,
}

impl ReturnTripAnalysis {
    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }
}

/// Stateless return-trip validation service.
pub struct ReturnTripValidator {
    repository: Arc<dyn TripRepository>,
    resolver: Arc<dyn DestinationResolver>,
    audit: Arc<dyn AuditLogger>,
    matcher: Arc<dyn ReturnMatcher>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) config: ValidationConfig,
}

impl ReturnTripValidator {
    /// Validator with default thresholds, destination-overlap matching, the
    /// system clock and no audit sink.
    pub fn new(
        repository: Arc<dyn TripRepository>,
        resolver: Arc<dyn DestinationResolver>,
    ) -> Self {
        Self {
            repository,
            resolver,
            audit: Arc::new(NoopAuditLogger),
            matcher: Arc::new(DestinationOverlapMatching),
            clock: Arc::new(SystemClock),
            config: ValidationConfig::default(),
        }
    }

    /// Replace the thresholds. The config is not validated here:
    /// [`system_wide_issues`](Self::system_wide_issues) rejects an invalid
    /// one, and single-trip validation treats an unrepresentable search window
    /// as "no return found".
    pub fn with_config(mut self, config: ValidationConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_audit_logger(mut self, audit: Arc<dyn AuditLogger>) -> Self {
        self.audit = audit;
        self
    }

    pub fn with_matcher(mut self, matcher: Arc<dyn ReturnMatcher>) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    pub(crate) fn repository(&self) -> &dyn TripRepository {
        self.repository.as_ref()
    }

    /// Validate one trip and notify the audit sink.
    ///
    /// Returns `None` when the trip cannot be fetched. That is distinct from
    /// `Some` analysis with no issues.
    pub fn validate_return_trip(&self, trip_id: &TripId) -> Option<ReturnTripAnalysis> {
        let _span = info_span!("validate_return_trip", trip_id = %trip_id).entered();

        let trip = match self.repository.trip_by_id(trip_id) {
            Ok(trip) => trip,
            Err(error) => {
                warn!(%error, "could not load trip for return validation");
                return None;
            }
        };

        let analysis = self.analyze_trip(&trip);

        if let Err(error) =
            self.audit
                .log_return_trip_validation(trip_id, &analysis, &analysis.issues)
        {
            warn!(%error, "audit logging failed; returning analysis anyway");
        }

        Some(analysis)
    }

    /// Run the checks on an already-loaded trip. Does not notify the audit
    /// sink.
    pub fn analyze_trip(&self, trip: &Trip) -> ReturnTripAnalysis {
        let route = self.describe_route(trip);
        let ctx = IssueContext {
            trip,
            route: &route,
        };

        let (has_return_trip, issues, metrics): (bool, Vec<ReturnTripIssue>, ReturnTripMetrics) =
            if trip.is_return_trip {
                (
                    true,
                    check_round_trip(&ctx, &self.config),
                    round_trip_metrics(trip),
                )
            } else {
                let candidates = find_return_candidates(
                    self.repository.as_ref(),
                    self.matcher.as_ref(),
                    trip,
                    &self.config,
                );
                match candidates.first() {
                    None => (
                        false,
                        check_missing_return(&ctx, &self.config).into_iter().collect(),
                        one_way_metrics(trip),
                    ),
                    Some(first) => {
                        let issues = candidates
                            .iter()
                            .flat_map(|candidate| check_pair(&ctx, candidate, &self.config))
                            .collect();
                        (true, issues, pair_metrics(trip, first))
                    }
                }
            };

        debug!(
            trip_id = %trip.id,
            has_return_trip,
            issue_count = issues.len(),
            "trip analysed"
        );

        ReturnTripAnalysis {
            trip_id: trip.id.clone(),
            vehicle_id: trip.vehicle.id.clone(),
            vehicle_registration: trip.vehicle.registration.clone(),
            has_return_trip,
            is_round_trip: trip.is_return_trip,
            issues,
            metrics,
        }
    }

    /// Destination names joined in trip order, or [`UNKNOWN_ROUTE`].
    pub fn describe_route(&self, trip: &Trip) -> String {
        match self.resolver.resolve_names(&trip.destinations) {
            Ok(names) if !names.is_empty() => names.join(ROUTE_SEPARATOR),
            Ok(_) => UNKNOWN_ROUTE.to_string(),
            Err(error) => {
                debug!(trip_id = %trip.id, %error, "destination lookup failed");
                UNKNOWN_ROUTE.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issues::{IssueType, Severity};
    use crate::repository::InMemoryTripStore;
    use crate::test_helpers::{base_time, TripBuilder};
    use chrono::Duration;

    fn validator(store: InMemoryTripStore) -> ReturnTripValidator {
        let store = Arc::new(store);
        ReturnTripValidator::new(store.clone(), store)
    }

    #[test]
    fn new_validator_uses_default_thresholds() {
        let validator = validator(InMemoryTripStore::new());
        assert_eq!(validator.config(), &ValidationConfig::default());

        let tuned = validator.with_config(ValidationConfig::default().with_max_time_gap_hours(24.0));
        assert_eq!(tuned.config().max_time_gap_hours, 24.0);
    }

    #[test]
    fn unknown_trip_yields_none() {
        let validator = validator(InMemoryTripStore::new());
        assert!(validator
            .validate_return_trip(&TripId::new("missing"))
            .is_none());
    }

    #[test]
    fn route_uses_destination_names_in_order() {
        let mut store = InMemoryTripStore::new();
        store.name_destination("depot", "Central Depot");
        store.name_destination("quarry", "North Quarry");
        let trip = TripBuilder::new("t1", "v1")
            .destinations(&["depot", "quarry"])
            .build();

        let validator = validator(store);
        assert_eq!(
            validator.describe_route(&trip),
            "Central Depot → North Quarry"
        );
    }

    #[test]
    fn unnamed_destinations_fall_back_to_unknown_route() {
        let trip = TripBuilder::new("t1", "v1").destinations(&["x"]).build();
        let validator = validator(InMemoryTripStore::new());
        assert_eq!(validator.describe_route(&trip), UNKNOWN_ROUTE);
    }

    #[test]
    fn every_candidate_is_checked_but_first_sets_metrics() {
        let t0 = base_time();
        let outbound = TripBuilder::new("out", "v1")
            .odometer(0.0, 200.0)
            .window(t0, t0 + Duration::hours(4))
            .destinations(&["depot"])
            .build();
        let first = TripBuilder::new("ret-1", "v1")
            .odometer(200.0, 390.0)
            .window(t0 + Duration::hours(6), t0 + Duration::hours(10))
            .destinations(&["depot"])
            .build();
        let second = TripBuilder::new("ret-2", "v1")
            .odometer(390.0, 490.0)
            .window(t0 + Duration::hours(12), t0 + Duration::hours(14))
            .destinations(&["depot"])
            .build();

        let validator = validator(InMemoryTripStore::with_trips([
            outbound.clone(),
            first,
            second,
        ]));
        let analysis = validator.analyze_trip(&outbound);

        assert!(analysis.has_return_trip);
        assert_eq!(analysis.metrics.return_distance, Some(190.0));
        assert_eq!(analysis.issues.len(), 1);
        let issue = &analysis.issues[0];
        assert_eq!(issue.issue_type, IssueType::DistanceMismatch);
        assert_eq!(issue.severity, Severity::High);
        assert_eq!(
            issue.related_trip.as_ref().map(|r| r.trip_id.as_str()),
            Some("ret-2")
        );
    }

    #[test]
    fn round_trip_skips_candidate_search() {
        let t0 = base_time();
        let round = TripBuilder::new("rt", "v1")
            .odometer(0.0, 150.0)
            .window(t0, t0 + Duration::hours(8))
            .destinations(&["depot"])
            .round_trip()
            .build();
        let later = TripBuilder::new("later", "v1")
            .odometer(150.0, 160.0)
            .window(t0 + Duration::hours(10), t0 + Duration::hours(11))
            .destinations(&["depot"])
            .build();

        let validator = validator(InMemoryTripStore::with_trips([round.clone(), later]));
        let analysis = validator.analyze_trip(&round);

        assert!(analysis.is_round_trip);
        assert!(analysis.has_return_trip);
        assert!(analysis.issues.is_empty());
        assert_eq!(analysis.metrics.outbound_distance, Some(75.0));
    }

    #[test]
    fn unrepresentable_search_window_is_a_missing_return() {
        let trip = TripBuilder::new("t1", "v1").odometer(0.0, 120.0).build();
        let store = InMemoryTripStore::with_trips([trip]);
        let validator =
            validator(store).with_config(ValidationConfig::default().with_max_time_gap_hours(1e10));

        let analysis = validator
            .validate_return_trip(&TripId::new("t1"))
            .expect("analysis instead of a panic");
        assert!(!analysis.has_return_trip);
        assert_eq!(analysis.issues.len(), 1);
        assert_eq!(analysis.issues[0].issue_type, IssueType::MissingReturn);
    }
}
