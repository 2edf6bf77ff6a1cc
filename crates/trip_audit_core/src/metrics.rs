//! Quantitative summary attached to each analysis.
//!
//! All functions here are pure. Fields stay `None` whenever the inputs needed
//! to compute them are missing or zero.

use serde::{Deserialize, Serialize};

use crate::trip::{hours_between, Trip};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReturnTripMetrics {
    pub outbound_distance: Option<f64>,
    pub return_distance: Option<f64>,
    /// Percent.
    pub distance_variance: Option<f64>,
    pub outbound_fuel: Option<f64>,
    pub return_fuel: Option<f64>,
    /// Percent, fuel efficiency (km/L) of the return leg against the outbound leg.
    pub fuel_variance: Option<f64>,
    pub time_gap_hours: Option<f64>,
}

/// `|reference - observed| / reference * 100`, or `None` for a zero reference.
pub fn variance_percent(reference: f64, observed: f64) -> Option<f64> {
    if reference == 0.0 || !reference.is_finite() {
        return None;
    }
    Some((reference - observed).abs() / reference.abs() * 100.0)
}

/// Kilometres per litre, when fuel was reported.
pub fn efficiency_kmpl(trip: &Trip) -> Option<f64> {
    trip.reported_fuel().map(|fuel| trip.distance_km() / fuel)
}

/// Hours between the outbound arrival and the return departure.
pub fn time_gap_hours(outbound: &Trip, return_trip: &Trip) -> f64 {
    hours_between(outbound.trip_end_date, return_trip.trip_start_date)
}

/// Fuel-efficiency variance between two legs; requires fuel on both.
pub fn pair_fuel_variance(outbound: &Trip, return_trip: &Trip) -> Option<f64> {
    let outbound_eff = efficiency_kmpl(outbound)?;
    let return_eff = efficiency_kmpl(return_trip)?;
    variance_percent(outbound_eff, return_eff)
}

/// Metrics of a matched outbound/return pair.
pub fn pair_metrics(outbound: &Trip, return_trip: &Trip) -> ReturnTripMetrics {
    let outbound_distance = outbound.distance_km();
    let return_distance = return_trip.distance_km();
    ReturnTripMetrics {
        outbound_distance: Some(outbound_distance),
        return_distance: Some(return_distance),
        distance_variance: variance_percent(outbound_distance, return_distance),
        outbound_fuel: outbound.fuel_quantity,
        return_fuel: return_trip.fuel_quantity,
        fuel_variance: pair_fuel_variance(outbound, return_trip),
        time_gap_hours: Some(time_gap_hours(outbound, return_trip)),
    }
}

/// Metrics of a record covering both legs. Distance and fuel are split evenly
/// since there are no independent legs to compare.
pub fn round_trip_metrics(trip: &Trip) -> ReturnTripMetrics {
    let half_distance = trip.distance_km() / 2.0;
    let half_fuel = trip.fuel_quantity.map(|fuel| fuel / 2.0);
    ReturnTripMetrics {
        outbound_distance: Some(half_distance),
        return_distance: Some(half_distance),
        distance_variance: Some(0.0),
        outbound_fuel: half_fuel,
        return_fuel: half_fuel,
        fuel_variance: Some(0.0),
        time_gap_hours: None,
    }
}

/// Metrics of an outbound trip with no return leg.
pub fn one_way_metrics(trip: &Trip) -> ReturnTripMetrics {
    ReturnTripMetrics {
        outbound_distance: Some(trip.distance_km()),
        outbound_fuel: trip.fuel_quantity,
        ..ReturnTripMetrics::default()
    }
}
