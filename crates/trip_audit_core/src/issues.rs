//! Anomalies detected by the return-trip checks.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::trip::{Trip, TripId};

/// Category of a detected anomaly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    DistanceMismatch,
    FuelInconsistency,
    TimeGap,
    MissingReturn,
    /// Reserved: a return leg without an outbound leg. No rule emits it yet.
    OrphanedReturn,
}

impl IssueType {
    pub const ALL: [IssueType; 5] = [
        IssueType::DistanceMismatch,
        IssueType::FuelInconsistency,
        IssueType::TimeGap,
        IssueType::MissingReturn,
        IssueType::OrphanedReturn,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            IssueType::DistanceMismatch => "distance_mismatch",
            IssueType::FuelInconsistency => "fuel_inconsistency",
            IssueType::TimeGap => "time_gap",
            IssueType::MissingReturn => "missing_return",
            IssueType::OrphanedReturn => "orphaned_return",
        }
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Severity::Low, Severity::Medium, Severity::High];

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }

    /// `High` when `value` is strictly above `cutoff`, `Medium` otherwise.
    pub(crate) fn escalate_above(value: f64, cutoff: f64) -> Self {
        if value > cutoff {
            Severity::High
        } else {
            Severity::Medium
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Quantities backing an issue. Only the fields relevant to the issue type
/// are populated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IssueDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difference: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tolerance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_gap_hours: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_allowed_gap_hours: Option<f64>,
}

impl IssueDetails {
    /// Expected/actual comparison; `difference` is the absolute gap.
    pub fn comparison(expected: f64, actual: f64) -> Self {
        Self {
            expected_value: Some(expected),
            actual_value: Some(actual),
            difference: Some((expected - actual).abs()),
            ..Self::default()
        }
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = Some(tolerance);
        self
    }

    pub fn time_gap(gap_hours: f64, max_allowed_hours: f64) -> Self {
        Self {
            time_gap_hours: Some(gap_hours),
            max_allowed_gap_hours: Some(max_allowed_hours),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Trip an issue refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripLabel {
    pub trip_id: TripId,
    pub serial_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_registration: Option<String>,
}

impl TripLabel {
    pub fn of(trip: &Trip) -> Self {
        Self {
            trip_id: trip.id.clone(),
            serial_number: trip.serial_number.clone(),
            vehicle_registration: trip.vehicle.registration.clone(),
        }
    }
}

/// Counterpart trip of a pair-level issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedTrip {
    pub trip_id: TripId,
    pub serial_number: String,
}

impl RelatedTrip {
    pub fn of(trip: &Trip) -> Self {
        Self {
            trip_id: trip.id.clone(),
            serial_number: trip.serial_number.clone(),
        }
    }
}

/// A single detected anomaly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnTripIssue {
    #[serde(rename = "type")]
    pub issue_type: IssueType,
    pub trip: TripLabel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_trip: Option<RelatedTrip>,
    pub route: String,
    pub severity: Severity,
    pub description: String,
    pub details: IssueDetails,
    pub recommendations: Vec<String>,
}

/// Context shared by every issue raised for one subject trip.
#[derive(Debug, Clone)]
pub struct IssueContext<'a> {
    pub trip: &'a Trip,
    pub route: &'a str,
}

impl IssueContext<'_> {
    pub(crate) fn issue(
        &self,
        issue_type: IssueType,
        severity: Severity,
        description: String,
        details: IssueDetails,
        recommendations: &[&str],
    ) -> ReturnTripIssue {
        ReturnTripIssue {
            issue_type,
            trip: TripLabel::of(self.trip),
            related_trip: None,
            route: self.route.to_string(),
            severity,
            description,
            details,
            recommendations: recommendations.iter().map(|r| r.to_string()).collect(),
        }
    }
}

impl ReturnTripIssue {
    pub fn with_related_trip(mut self, related: &Trip) -> Self {
        self.related_trip = Some(RelatedTrip::of(related));
        self
    }
}
