//! Fleet-wide aggregation of return-trip issues.
//!
//! Walks the most recent trips (bounded by look-back window and a hard
//! limit), runs the single-trip pipeline on each, and tallies issues by type
//! and severity. A trip whose validation fails is left out of the result; only
//! a failure to list the trip window fails the whole call.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, info_span, warn};

use crate::analysis::{ReturnTripAnalysis, ReturnTripValidator};
use crate::config::ExecutionMode;
use crate::error::ValidationError;
use crate::issues::{IssueType, Severity};
use crate::trip::TripRef;

/// Point-in-time snapshot of return-trip issues across the fleet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemWideResult {
    pub total_trips_analyzed: usize,
    pub trips_with_issues: usize,
    /// Every issue type is present, with zero for types not seen.
    pub issues_by_type: BTreeMap<IssueType, usize>,
    /// Every severity is present, with zero for severities not seen.
    pub issues_by_severity: BTreeMap<Severity, usize>,
    pub analyses: Vec<ReturnTripAnalysis>,
}

impl SystemWideResult {
    /// Tally a set of analyses.
    pub fn from_analyses(analyses: Vec<ReturnTripAnalysis>) -> Self {
        let mut issues_by_type: BTreeMap<IssueType, usize> =
            IssueType::ALL.iter().map(|t| (*t, 0)).collect();
        let mut issues_by_severity: BTreeMap<Severity, usize> =
            Severity::ALL.iter().map(|s| (*s, 0)).collect();

        for issue in analyses.iter().flat_map(|a| a.issues.iter()) {
            *issues_by_type.entry(issue.issue_type).or_default() += 1;
            *issues_by_severity.entry(issue.severity).or_default() += 1;
        }

        Self {
            total_trips_analyzed: analyses.len(),
            trips_with_issues: analyses.iter().filter(|a| a.has_issues()).count(),
            issues_by_type,
            issues_by_severity,
            analyses,
        }
    }

    pub fn total_issues(&self) -> usize {
        self.issues_by_type.values().sum()
    }

    pub fn count_of_type(&self, issue_type: IssueType) -> usize {
        self.issues_by_type.get(&issue_type).copied().unwrap_or(0)
    }

    pub fn count_of_severity(&self, severity: Severity) -> usize {
        self.issues_by_severity.get(&severity).copied().unwrap_or(0)
    }
}

impl ReturnTripValidator {
    /// Aggregate issues over the configured look-back window ending now.
    pub fn system_wide_issues(&self) -> Result<SystemWideResult, ValidationError> {
        self.system_wide_issues_at(self.clock.now())
    }

    /// Aggregate issues over the configured look-back window ending at `now`.
    ///
    /// The config is validated here, so a validator built with an invalid
    /// [`ValidationConfig`] fails with [`ValidationError::Config`] instead of
    /// analysing anything.
    pub fn system_wide_issues_at(
        &self,
        now: DateTime<Utc>,
    ) -> Result<SystemWideResult, ValidationError> {
        let _span = info_span!("system_wide_issues").entered();
        self.config.validate()?;

        let days = self.config.aggregation_window_days;
        let since = Duration::try_days(i64::from(days))
            .and_then(|window| now.checked_sub_signed(window))
            .ok_or(ValidationError::LookbackOutOfRange { now, days })?;

        let trip_refs = self
            .repository()
            .recent_trips(since, self.config.aggregation_limit)
            .map_err(ValidationError::TripListing)?;

        let analyses = match self.config.execution {
            ExecutionMode::Sequential => self.analyze_sequential(&trip_refs),
            ExecutionMode::Parallel { workers } => self.analyze_parallel(&trip_refs, workers)?,
        };

        let skipped = trip_refs.len() - analyses.len();
        let result = SystemWideResult::from_analyses(analyses);
        info!(
            listed = trip_refs.len(),
            analysed = result.total_trips_analyzed,
            skipped,
            trips_with_issues = result.trips_with_issues,
            total_issues = result.total_issues(),
            "fleet return-trip aggregation complete"
        );
        Ok(result)
    }

    fn analyze_one(&self, trip_ref: &TripRef) -> Option<ReturnTripAnalysis> {
        let analysis = self.validate_return_trip(&trip_ref.id);
        if analysis.is_none() {
            warn!(trip_id = %trip_ref.id, "trip skipped in fleet aggregation");
        }
        analysis
    }

    fn analyze_sequential(&self, trip_refs: &[TripRef]) -> Vec<ReturnTripAnalysis> {
        trip_refs
            .iter()
            .filter_map(|trip_ref| self.analyze_one(trip_ref))
            .collect()
    }

    /// Analyse on a dedicated pool of `workers` threads. Output keeps the
    /// listing order.
    fn analyze_parallel(
        &self,
        trip_refs: &[TripRef],
        workers: usize,
    ) -> Result<Vec<ReturnTripAnalysis>, ValidationError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|index| format!("trip-audit-{index}"))
            .build()
            .map_err(|error| ValidationError::WorkerPool(error.to_string()))?;

        let results: Vec<Option<ReturnTripAnalysis>> = pool.install(|| {
            trip_refs
                .par_iter()
                .map(|trip_ref| self.analyze_one(trip_ref))
                .collect()
        });

        Ok(results.into_iter().flatten().collect())
    }
}
