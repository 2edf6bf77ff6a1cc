use tracing::debug;

use crate::config::ValidationConfig;
use crate::issues::{IssueContext, IssueDetails, IssueType, ReturnTripIssue, Severity};
use crate::metrics::{efficiency_kmpl, time_gap_hours, variance_percent};
use crate::trip::Trip;

const DISTANCE_RECOMMENDATIONS: [&str; 3] = [
    "Verify the odometer readings on both legs",
    "Check whether either leg included a detour",
    "Review the accuracy of the recorded destinations",
];

const FUEL_RECOMMENDATIONS: [&str; 3] = [
    "Check for additional fuel purchases on either leg",
    "Verify the recorded fuel entries",
    "Consider traffic or route differences between the legs",
];

const TIME_GAP_RECOMMENDATIONS: [&str; 3] = [
    "Verify the recorded trip dates and times",
    "Check for intermediate activity between the legs",
    "Consider treating the legs as separate journeys",
];

/// Validate an outbound trip against one matched return leg.
///
/// Distance, fuel-efficiency and time-gap rules run independently, so a pair
/// yields between zero and three issues.
pub fn check_pair(
    ctx: &IssueContext<'_>,
    return_trip: &Trip,
    config: &ValidationConfig,
) -> Vec<ReturnTripIssue> {
    let mut issues = Vec::new();
    issues.extend(check_distance(ctx, return_trip, config));
    issues.extend(check_fuel_efficiency(ctx, return_trip, config));
    issues.extend(check_time_gap(ctx, return_trip, config));
    issues
}

fn check_distance(
    ctx: &IssueContext<'_>,
    return_trip: &Trip,
    config: &ValidationConfig,
) -> Option<ReturnTripIssue> {
    let outbound_distance = ctx.trip.distance_km();
    let return_distance = return_trip.distance_km();
    let variance = variance_percent(outbound_distance, return_distance)?;
    debug!(trip_id = %ctx.trip.id, return_id = %return_trip.id, variance, "pair distance variance");

    if variance <= config.distance_tolerance_percent {
        return None;
    }
    Some(
        ctx.issue(
            IssueType::DistanceMismatch,
            Severity::escalate_above(variance, config.distance_high_severity_percent),
            format!(
                "Return trip {} covered {return_distance:.1} km against {outbound_distance:.1} km outbound ({variance:.1}% variance)",
                return_trip.serial_number
            ),
            IssueDetails::comparison(outbound_distance, return_distance)
                .with_tolerance(config.distance_tolerance_percent),
            &DISTANCE_RECOMMENDATIONS,
        )
        .with_related_trip(return_trip),
    )
}

fn check_fuel_efficiency(
    ctx: &IssueContext<'_>,
    return_trip: &Trip,
    config: &ValidationConfig,
) -> Option<ReturnTripIssue> {
    let outbound_kmpl = efficiency_kmpl(ctx.trip)?;
    let return_kmpl = efficiency_kmpl(return_trip)?;
    let variance = variance_percent(outbound_kmpl, return_kmpl)?;
    debug!(trip_id = %ctx.trip.id, return_id = %return_trip.id, variance, "pair fuel variance");

    if variance <= config.fuel_tolerance_percent {
        return None;
    }
    Some(
        ctx.issue(
            IssueType::FuelInconsistency,
            Severity::escalate_above(variance, config.pair_fuel_high_severity_percent),
            format!(
                "Fuel efficiency differs between legs: {outbound_kmpl:.2} km/L outbound vs {return_kmpl:.2} km/L on return trip {} ({variance:.1}% variance)",
                return_trip.serial_number
            ),
            IssueDetails::comparison(outbound_kmpl, return_kmpl)
                .with_tolerance(config.fuel_tolerance_percent),
            &FUEL_RECOMMENDATIONS,
        )
        .with_related_trip(return_trip),
    )
}

fn check_time_gap(
    ctx: &IssueContext<'_>,
    return_trip: &Trip,
    config: &ValidationConfig,
) -> Option<ReturnTripIssue> {
    let gap = time_gap_hours(ctx.trip, return_trip);
    if gap <= config.max_time_gap_hours {
        return None;
    }
    Some(
        ctx.issue(
            IssueType::TimeGap,
            Severity::escalate_above(gap, config.time_gap_high_severity_hours),
            format!(
                "Return trip {} started {gap:.1} hours after the outbound trip ended (limit {:.0} hours)",
                return_trip.serial_number, config.max_time_gap_hours
            ),
            IssueDetails::time_gap(gap, config.max_time_gap_hours),
            &TIME_GAP_RECOMMENDATIONS,
        )
        .with_related_trip(return_trip),
    )
}
