//! Consistency rules applied to a subject trip.
//!
//! - [`internal`]: a single record self-flagged as a round trip
//! - [`pair`]: an outbound trip against one matched return leg
//! - [`missing_return`]: an outbound trip for which no return leg was found
//!
//! Every rule that applies runs; no rule short-circuits another.

pub mod internal;
pub mod missing_return;
pub mod pair;

pub use internal::check_round_trip;
pub use missing_return::check_missing_return;
pub use pair::check_pair;
