//! Return-trip consistency validation for fleet trip logs.
//!
//! Given a vehicle's trip log, the engine checks whether outbound trips have a
//! matching return trip, cross-checks distance, fuel efficiency and timing
//! between the legs (or within a record self-flagged as a round trip), grades
//! each anomaly by severity and aggregates the findings fleet-wide.
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use trip_audit_core::analysis::ReturnTripValidator;
//! use trip_audit_core::repository::InMemoryTripStore;
//! use trip_audit_core::test_helpers::TripBuilder;
//! use trip_audit_core::trip::TripId;
//!
//! let store = Arc::new(InMemoryTripStore::with_trips([TripBuilder::new("t1", "v1")
//!     .odometer(0.0, 120.0)
//!     .build()]));
//! let validator = ReturnTripValidator::new(store.clone(), store);
//!
//! let analysis = validator.validate_return_trip(&TripId::new("t1")).unwrap();
//! assert!(!analysis.has_return_trip);
//! assert_eq!(analysis.issues.len(), 1);
//! ```
//!
//! # Architecture
//!
//! - [`matching`]: return-leg search and destination-overlap matching
//! - [`checks`]: round-trip, pair and missing-return rules
//! - [`metrics`]: per-analysis quantitative summary
//! - [`analysis`]: the single-trip pipeline and [`analysis::ReturnTripValidator`]
//! - [`fleet`]: fleet-wide aggregation, sequential or on a bounded worker pool
//! - [`repository`], [`audit`], [`clock`]: collaborator seams

pub mod analysis;
pub mod audit;
pub mod checks;
pub mod clock;
pub mod config;
pub mod error;
pub mod fleet;
pub mod issues;
pub mod matching;
pub mod metrics;
pub mod repository;
pub mod trip;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

pub use analysis::{ReturnTripAnalysis, ReturnTripValidator};
pub use config::ValidationConfig;
pub use error::{RepositoryError, ValidationError};
pub use fleet::SystemWideResult;
pub use issues::{IssueType, ReturnTripIssue, Severity};
