use crate::config::ValidationConfig;
use crate::issues::{IssueContext, IssueDetails, IssueType, ReturnTripIssue, Severity};

const RECOMMENDATIONS: [&str; 3] = [
    "Check for a return trip recorded under a different serial number",
    "Verify whether the journey was genuinely one-way",
    "Create a return trip record if the round journey was completed",
];

/// Flag an unmatched outbound trip that is long enough, in distance or in
/// time, that a return leg would be expected.
///
/// Only call this for trips that are not self-flagged round trips and for
/// which no return candidate was found.
pub fn check_missing_return(
    ctx: &IssueContext<'_>,
    config: &ValidationConfig,
) -> Option<ReturnTripIssue> {
    let distance = ctx.trip.distance_km();
    let duration = ctx.trip.duration_hours();

    let long_distance = distance > config.missing_return_distance_km;
    let long_duration = duration > config.missing_return_duration_hours;
    if !long_distance && !long_duration {
        return None;
    }

    Some(ctx.issue(
        IssueType::MissingReturn,
        Severity::Medium,
        format!(
            "Trip {} ({distance:.1} km over {duration:.1} hours) has no matching return trip within {:.0} hours",
            ctx.trip.serial_number, config.max_time_gap_hours
        ),
        IssueDetails::default(),
        &RECOMMENDATIONS,
    ))
}
