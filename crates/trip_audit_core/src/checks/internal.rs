use tracing::debug;

use crate::config::ValidationConfig;
use crate::issues::{IssueContext, IssueDetails, IssueType, ReturnTripIssue, Severity};
use crate::metrics::variance_percent;

const DISTANCE_RECOMMENDATIONS: [&str; 3] = [
    "Verify the start and end odometer readings",
    "Consider reclassifying the trip as one-way",
    "Review the accuracy of the recorded destinations",
];

const FUEL_RECOMMENDATIONS: [&str; 3] = [
    "Verify the recorded fuel entries",
    "Check for refuelling stops during the journey",
    "Review the mileage calculation for this trip",
];

/// Validate a record that covers both legs of a round trip.
pub fn check_round_trip(ctx: &IssueContext<'_>, config: &ValidationConfig) -> Vec<ReturnTripIssue> {
    let trip = ctx.trip;
    let mut issues = Vec::new();
    let total_distance = trip.distance_km();

    let floor = config.round_trip_distance_floor_km();
    if total_distance < floor {
        issues.push(ctx.issue(
            IssueType::DistanceMismatch,
            Severity::High,
            format!(
                "Round trip {} covers {total_distance:.1} km, below the {floor:.1} km minimum for an outbound and return journey",
                trip.serial_number
            ),
            IssueDetails::comparison(floor, total_distance),
            &DISTANCE_RECOMMENDATIONS,
        ));
    }

    if let (Some(fuel), Some(stored_kmpl)) = (trip.reported_fuel(), trip.calculated_kmpl) {
        let expected_kmpl = total_distance / fuel;
        if let Some(variance) = variance_percent(stored_kmpl, expected_kmpl) {
            debug!(trip_id = %trip.id, variance, "round trip fuel variance");
            if variance > config.fuel_tolerance_percent {
                issues.push(ctx.issue(
                    IssueType::FuelInconsistency,
                    Severity::escalate_above(variance, config.round_trip_fuel_high_severity_percent),
                    format!(
                        "Round trip {} reports {stored_kmpl:.2} km/L but odometer and fuel give {expected_kmpl:.2} km/L ({variance:.1}% variance)",
                        trip.serial_number
                    ),
                    IssueDetails::comparison(expected_kmpl, stored_kmpl)
                        .with_tolerance(config.fuel_tolerance_percent),
                    &FUEL_RECOMMENDATIONS,
                ));
            }
        }
    }

    issues
}
