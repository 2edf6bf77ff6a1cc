//! Return-leg matching: find trips that plausibly bring a vehicle back from
//! an outbound journey.
//!
//! Candidates are trips of the same vehicle that start between
//! `min_return_delay_hours` and `max_time_gap_hours` after the outbound trip
//! ends. A [`ReturnMatcher`] then decides which of those count as the return
//! leg.

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};

use crate::config::ValidationConfig;
use crate::repository::TripRepository;
use crate::trip::Trip;

/// Decides whether a trip found in the search window is a return leg of the
/// outbound trip.
pub trait ReturnMatcher: Send + Sync {
    fn is_return_candidate(&self, outbound: &Trip, candidate: &Trip) -> bool;
}

/// Accepts a candidate sharing at least one destination with the outbound
/// trip.
///
/// This is an approximation of "same route, opposite direction": the order
/// and direction of the destination lists are not checked. Issue rates
/// downstream depend on this looseness, so it is kept as the default.
#[derive(Debug, Default, Clone, Copy)]
pub struct DestinationOverlapMatching;

impl ReturnMatcher for DestinationOverlapMatching {
    fn is_return_candidate(&self, outbound: &Trip, candidate: &Trip) -> bool {
        outbound.shares_destination_with(candidate)
    }
}

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Fractional hours as a `Duration`, or `None` when out of range.
fn hours(value: f64) -> Option<Duration> {
    let millis = (value * MILLIS_PER_HOUR).round();
    if !millis.is_finite() || millis.abs() >= i64::MAX as f64 {
        return None;
    }
    Duration::try_milliseconds(millis as i64)
}

fn search_window(
    outbound: &Trip,
    config: &ValidationConfig,
) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let end = outbound.trip_end_date;
    let start = end.checked_add_signed(hours(config.min_return_delay_hours)?)?;
    let finish = end.checked_add_signed(hours(config.max_time_gap_hours)?)?;
    Some((start, finish))
}

/// Search the trip log for return legs of `outbound`, in start-time order.
///
/// Fails open: a repository error, or a window that cannot be represented,
/// yields an empty list so the caller falls back to the missing-return
/// heuristic.
pub fn find_return_candidates(
    repository: &dyn TripRepository,
    matcher: &dyn ReturnMatcher,
    outbound: &Trip,
    config: &ValidationConfig,
) -> Vec<Trip> {
    let Some((window_start, window_end)) = search_window(outbound, config) else {
        warn!(
            trip_id = %outbound.id,
            trip_end_date = %outbound.trip_end_date,
            "return search window out of range; treating trip as unmatched"
        );
        return Vec::new();
    };

    let found = match repository.trips_by_vehicle_in_window(
        &outbound.vehicle.id,
        window_start,
        window_end,
        &outbound.id,
    ) {
        Ok(trips) => trips,
        Err(error) => {
            warn!(
                trip_id = %outbound.id,
                vehicle_id = %outbound.vehicle.id,
                %error,
                "return candidate search failed; treating trip as unmatched"
            );
            return Vec::new();
        }
    };

    let searched = found.len();
    let candidates: Vec<Trip> = found
        .into_iter()
        .filter(|candidate| matcher.is_return_candidate(outbound, candidate))
        .collect();

    debug!(
        trip_id = %outbound.id,
        searched,
        matched = candidates.len(),
        "return candidate search complete"
    );
    candidates
}
